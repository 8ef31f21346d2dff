//! Rule-based optimization suggestions.
//!
//! Suggestions are advisory; nothing here mutates the configuration. Rules
//! run in a fixed order so repeated calls over the same inputs produce the
//! same list.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::model::{FlowConfiguration, FlowType};
use crate::validation::FlowValidationResult;

/// Per-node timeout above which a reduction is suggested.
const TIMEOUT_SUGGESTION_THRESHOLD: u64 = 600;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    Concurrency,
    Timeout,
    FlowType,
    Monitoring,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionPriority {
    Low,
    Medium,
    High,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationEffort {
    Low,
    Medium,
    Manual,
}

/// A single advisory finding with expected per-metric improvement deltas.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OptimizationSuggestion {
    pub id: String,
    pub configuration_id: String,
    pub suggestion_type: SuggestionType,
    pub priority: SuggestionPriority,
    pub description: String,
    pub expected_improvement: HashMap<String, f64>,
    pub implementation_effort: ImplementationEffort,
    pub auto_applicable: bool,
}

/// Generate suggestions for a configuration given its validation result.
pub fn suggest(
    config: &FlowConfiguration,
    validation: &FlowValidationResult,
) -> Vec<OptimizationSuggestion> {
    let mut suggestions = Vec::new();

    // (a) Underprovisioned parallel flow.
    if config.flow_type == FlowType::Parallel
        && config.max_concurrent_nodes < config.nodes.len() / 2
    {
        let recommended = (config.nodes.len() / 2).max(1);
        suggestions.push(OptimizationSuggestion {
            id: Uuid::new_v4().to_string(),
            configuration_id: config.id.clone(),
            suggestion_type: SuggestionType::Concurrency,
            priority: SuggestionPriority::Medium,
            description: format!(
                "Raise max_concurrent_nodes from {} to {} to match the parallel node set",
                config.max_concurrent_nodes, recommended
            ),
            expected_improvement: HashMap::from([(
                "estimated_throughput".to_string(),
                validation.performance.estimated_throughput * 0.5,
            )]),
            implementation_effort: ImplementationEffort::Low,
            auto_applicable: true,
        });
    }

    // (b) Excessive per-node timeouts.
    for node in &config.nodes {
        if node.timeout_seconds.is_some_and(|t| t > TIMEOUT_SUGGESTION_THRESHOLD) {
            suggestions.push(OptimizationSuggestion {
                id: Uuid::new_v4().to_string(),
                configuration_id: config.id.clone(),
                suggestion_type: SuggestionType::Timeout,
                priority: SuggestionPriority::Low,
                description: format!(
                    "Reduce timeout of node {} below {}s to fail fast on stuck work",
                    node.id, TIMEOUT_SUGGESTION_THRESHOLD
                ),
                expected_improvement: HashMap::from([(
                    "resource_efficiency".to_string(),
                    5.0,
                )]),
                implementation_effort: ImplementationEffort::Low,
                auto_applicable: false,
            });
        }
    }

    // (c) Sequential flow with untapped parallelism.
    if config.flow_type == FlowType::Sequential
        && config.nodes.len() > 5
        && dependency_free_count(config) > 2
    {
        suggestions.push(OptimizationSuggestion {
            id: Uuid::new_v4().to_string(),
            configuration_id: config.id.clone(),
            suggestion_type: SuggestionType::FlowType,
            priority: SuggestionPriority::High,
            description: "Convert to a hybrid flow with a parallel section for the \
                          dependency-free nodes"
                .to_string(),
            expected_improvement: HashMap::from([(
                "estimated_duration".to_string(),
                -(validation.performance.estimated_duration * 0.3),
            )]),
            implementation_effort: ImplementationEffort::Manual,
            auto_applicable: false,
        });
    }

    // (d) Monitoring disabled.
    if !config.monitoring_enabled {
        suggestions.push(OptimizationSuggestion {
            id: Uuid::new_v4().to_string(),
            configuration_id: config.id.clone(),
            suggestion_type: SuggestionType::Monitoring,
            priority: SuggestionPriority::Medium,
            description: "Enable monitoring to capture execution metrics".to_string(),
            expected_improvement: HashMap::from([("resource_efficiency".to_string(), 10.0)]),
            implementation_effort: ImplementationEffort::Low,
            auto_applicable: true,
        });
    }

    suggestions
}

/// Non-boundary nodes with no declared dependencies and no incoming edge.
fn dependency_free_count(config: &FlowConfiguration) -> usize {
    let targets: HashSet<&str> = config.edges.iter().map(|e| e.to_node.as_str()).collect();
    config
        .nodes
        .iter()
        .filter(|n| {
            !n.node_type.is_boundary()
                && n.dependencies.is_empty()
                && !targets.contains(n.id.as_str())
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FlowEdge, FlowNode, NodeType};
    use crate::validation::{FlowValidator, ValidationLevel};

    fn validated(config: &FlowConfiguration) -> FlowValidationResult {
        FlowValidator::new().validate(config, ValidationLevel::Comprehensive)
    }

    #[test]
    fn test_concurrency_rule() {
        let mut config = FlowConfiguration::new("p", FlowType::Parallel, "ctx");
        for i in 0..8 {
            config.nodes.push(FlowNode::new(format!("n{}", i), NodeType::Agent));
        }
        for i in 1..8 {
            config.edges.push(FlowEdge::new("n0", format!("n{}", i)));
        }
        config.max_concurrent_nodes = 2;
        let suggestions = suggest(&config, &validated(&config));
        let concurrency: Vec<_> = suggestions
            .iter()
            .filter(|s| s.suggestion_type == SuggestionType::Concurrency)
            .collect();
        assert_eq!(concurrency.len(), 1);
        assert!(concurrency[0].auto_applicable);
        assert_eq!(concurrency[0].priority, SuggestionPriority::Medium);
        assert!(concurrency[0].description.contains("from 2 to 4"));
    }

    #[test]
    fn test_concurrency_rule_not_triggered_when_provisioned() {
        let mut config = FlowConfiguration::new("p", FlowType::Parallel, "ctx");
        for i in 0..4 {
            config.nodes.push(FlowNode::new(format!("n{}", i), NodeType::Agent));
        }
        config.max_concurrent_nodes = 4;
        let suggestions = suggest(&config, &validated(&config));
        assert!(suggestions
            .iter()
            .all(|s| s.suggestion_type != SuggestionType::Concurrency));
    }

    #[test]
    fn test_timeout_rule_per_node() {
        let mut config = FlowConfiguration::new("t", FlowType::Sequential, "ctx");
        let mut slow = FlowNode::new("slow", NodeType::Agent);
        slow.timeout_seconds = Some(900);
        let mut ok = FlowNode::new("ok", NodeType::Agent);
        ok.timeout_seconds = Some(60);
        config.nodes.push(slow);
        config.nodes.push(ok);
        config.edges.push(FlowEdge::new("slow", "ok"));
        let suggestions = suggest(&config, &validated(&config));
        let timeouts: Vec<_> = suggestions
            .iter()
            .filter(|s| s.suggestion_type == SuggestionType::Timeout)
            .collect();
        assert_eq!(timeouts.len(), 1);
        assert!(timeouts[0].description.contains("slow"));
        assert_eq!(timeouts[0].priority, SuggestionPriority::Low);
    }

    #[test]
    fn test_flow_type_rule() {
        let mut config = FlowConfiguration::new("s", FlowType::Sequential, "ctx");
        config.nodes.push(FlowNode::new("s0", NodeType::Start));
        for i in 0..6 {
            config.nodes.push(FlowNode::new(format!("n{}", i), NodeType::Agent));
        }
        // Only three nodes are wired; the rest are dependency-free.
        config.edges.push(FlowEdge::new("s0", "n0"));
        config.edges.push(FlowEdge::new("n0", "n1"));
        config.edges.push(FlowEdge::new("n1", "n2"));
        let suggestions = suggest(&config, &validated(&config));
        let flow_type: Vec<_> = suggestions
            .iter()
            .filter(|s| s.suggestion_type == SuggestionType::FlowType)
            .collect();
        assert_eq!(flow_type.len(), 1);
        assert_eq!(flow_type[0].priority, SuggestionPriority::High);
        assert_eq!(flow_type[0].implementation_effort, ImplementationEffort::Manual);
        assert!(!flow_type[0].auto_applicable);
    }

    #[test]
    fn test_monitoring_rule() {
        let mut config = FlowConfiguration::new("m", FlowType::Sequential, "ctx");
        config.nodes.push(FlowNode::new("a", NodeType::Agent));
        config.monitoring_enabled = false;
        let suggestions = suggest(&config, &validated(&config));
        assert!(suggestions
            .iter()
            .any(|s| s.suggestion_type == SuggestionType::Monitoring && s.auto_applicable));
    }

    #[test]
    fn test_rules_emit_in_fixed_order() {
        let mut config = FlowConfiguration::new("all", FlowType::Parallel, "ctx");
        for i in 0..8 {
            let mut node = FlowNode::new(format!("n{}", i), NodeType::Agent);
            node.timeout_seconds = Some(700);
            config.nodes.push(node);
        }
        config.max_concurrent_nodes = 1;
        config.monitoring_enabled = false;
        let first = suggest(&config, &validated(&config));
        let second = suggest(&config, &validated(&config));
        let kinds: Vec<_> = first.iter().map(|s| s.suggestion_type).collect();
        assert_eq!(kinds, second.iter().map(|s| s.suggestion_type).collect::<Vec<_>>());
        assert_eq!(kinds[0], SuggestionType::Concurrency);
        assert_eq!(*kinds.last().unwrap(), SuggestionType::Monitoring);
    }
}
