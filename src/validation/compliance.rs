//! Strict-level security compliance and resource-requirement checks.

use crate::domain::model::FlowConfiguration;
use crate::estimator::ResourceRequirements;

use super::types::Findings;

const MEMORY_WARNING_MB: f64 = 1000.0;
const CPU_WARNING_CORES: f64 = 4.0;

pub(crate) fn validate(
    config: &FlowConfiguration,
    resources: &ResourceRequirements,
    findings: &mut Findings,
) {
    for node in &config.nodes {
        if node.agent_id.is_some() && !node.is_security_validated() {
            findings.warning(format!("Agent node {} is not security-validated", node.id));
        }
    }

    if config.data_persistence {
        findings.warning("Data persistence enabled without storage encryption");
    }
    if !config.monitoring_enabled {
        findings.warning("Monitoring is disabled");
    }

    if resources.memory_mb > MEMORY_WARNING_MB {
        findings.warning(format!(
            "Estimated memory requirement ({}MB) exceeds {}MB",
            resources.memory_mb, MEMORY_WARNING_MB
        ));
    }
    if resources.cpu_cores > CPU_WARNING_CORES {
        findings.warning(format!(
            "Estimated CPU requirement ({} cores) exceeds {} cores",
            resources.cpu_cores, CPU_WARNING_CORES
        ));
    }
}
