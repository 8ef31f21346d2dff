//! Comprehensive-level performance characteristics.

use crate::domain::model::{FlowConfiguration, FlowType};

use super::types::Findings;

const CONCURRENCY_WARNING_THRESHOLD: usize = 50;

pub(crate) fn validate(config: &FlowConfiguration, findings: &mut Findings) {
    let global = config.global_timeout_seconds;

    let mut timeout_sum: u64 = 0;
    for node in &config.nodes {
        if let Some(timeout) = node.timeout_seconds {
            timeout_sum += timeout;
            if timeout > global {
                findings.warning(format!(
                    "Node {} timeout ({}s) exceeds global timeout ({}s)",
                    node.id, timeout, global
                ));
            }
        }
    }
    if timeout_sum > 2 * global {
        findings.warning(format!(
            "Sum of node timeouts ({}s) exceeds twice the global timeout ({}s)",
            timeout_sum, global
        ));
    }

    if config.max_concurrent_nodes < 1 {
        findings.issue("max_concurrent_nodes must be at least 1");
    } else if config.max_concurrent_nodes > CONCURRENCY_WARNING_THRESHOLD {
        findings.warning(format!(
            "max_concurrent_nodes ({}) above {} may exhaust resources",
            config.max_concurrent_nodes, CONCURRENCY_WARNING_THRESHOLD
        ));
    }

    if config.flow_type == FlowType::Parallel && config.max_concurrent_nodes == 1 {
        findings.suggestion(
            "Parallel flow with max_concurrent_nodes = 1 runs sequentially; raise the limit",
        );
    }
}
