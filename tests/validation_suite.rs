//! Validator behavior across levels, plus caching guarantees.

use agentflow::{
    FlowConfiguration, FlowEdge, FlowNode, FlowType, FlowValidator, NodeType, TemplateCatalog,
    ValidationLevel,
};

fn node(id: &str, node_type: NodeType) -> FlowNode {
    FlowNode::new(id, node_type)
}

fn cyclic_sequential() -> FlowConfiguration {
    let mut config = FlowConfiguration::new("cyclic", FlowType::Sequential, "ctx");
    config.nodes.push(node("a", NodeType::Agent));
    config.nodes.push(node("b", NodeType::Agent));
    config.edges.push(FlowEdge::new("a", "b"));
    config.edges.push(FlowEdge::new("b", "a"));
    config
}

#[test]
fn cycle_reported_at_comprehensive() {
    let validator = FlowValidator::new();
    let result = validator.validate(&cyclic_sequential(), ValidationLevel::Comprehensive);
    assert!(!result.is_valid);
    assert!(result.issues.iter().any(|i| i.to_lowercase().contains("cycle")));
}

#[test]
fn acyclic_variant_valid_at_basic() {
    let mut config = cyclic_sequential();
    config.edges.pop();
    let validator = FlowValidator::new();
    let result = validator.validate(&config, ValidationLevel::Basic);
    assert!(result.is_valid, "{:?}", result.issues);
}

#[test]
fn unreachable_node_fixed_by_edge_from_start() {
    let mut config = FlowConfiguration::new("reach", FlowType::Sequential, "ctx");
    config.nodes.push(node("start", NodeType::Start));
    config.nodes.push(node("a", NodeType::Agent));
    config.nodes.push(node("island", NodeType::Agent));
    config.edges.push(FlowEdge::new("start", "a"));

    let validator = FlowValidator::new();
    let result = validator.validate(&config, ValidationLevel::Comprehensive);
    assert!(result
        .issues
        .iter()
        .any(|i| i.contains("Unreachable node: island")));

    config.edges.push(FlowEdge::new("start", "island"));
    validator.invalidate(&config.id);
    let result = validator.validate(&config, ValidationLevel::Comprehensive);
    assert!(!result.issues.iter().any(|i| i.contains("Unreachable")));
}

#[test]
fn repeated_validation_within_ttl_is_identical() {
    let validator = FlowValidator::new();
    let mut config = cyclic_sequential();
    config.monitoring_enabled = false;
    config.nodes[0].timeout_seconds = Some(10_000);

    let first = validator.validate(&config, ValidationLevel::Comprehensive);
    let second = validator.validate(&config, ValidationLevel::Comprehensive);
    assert_eq!(first.issues, second.issues);
    assert_eq!(first.warnings, second.warnings);
    assert_eq!(first.suggestions, second.suggestions);
    assert_eq!(first.validated_at, second.validated_at);
    assert_eq!(first.complexity_score, second.complexity_score);
}

#[test]
fn complexity_bounded_for_all_builtin_templates() {
    let catalog = TemplateCatalog::builtin();
    let validator = FlowValidator::new();
    for template in catalog.all() {
        for count in [template.min_agents, template.max_agents] {
            let agents: Vec<String> = (0..count).map(|i| format!("a{}", i)).collect();
            let config = catalog
                .instantiate(&template.id, "ctx", &agents, None)
                .unwrap();
            let result = validator.validate(&config, ValidationLevel::Strict);
            assert!(
                (0.0..=100.0).contains(&result.complexity_score),
                "template {} at {} agents scored {}",
                template.id,
                count,
                result.complexity_score
            );
        }
    }
}

#[test]
fn warnings_never_block() {
    let mut config = FlowConfiguration::new("warned", FlowType::Sequential, "ctx");
    // Agent-only graph: start/end warnings at basic, compliance warnings at
    // strict, but no issues.
    let mut worker = node("worker", NodeType::Agent);
    worker.agent_id = Some("w1".into());
    config.nodes.push(worker);
    config.data_persistence = true;
    config.monitoring_enabled = false;

    let validator = FlowValidator::new();
    let result = validator.validate(&config, ValidationLevel::Strict);
    assert!(result.is_valid);
    assert!(!result.warnings.is_empty());
}

#[test]
fn strict_adds_findings_over_comprehensive() {
    let mut config = FlowConfiguration::new("levels", FlowType::Sequential, "ctx");
    config.nodes.push(node("start", NodeType::Start));
    let mut worker = node("worker", NodeType::Agent);
    worker.agent_id = Some("w1".into());
    config.nodes.push(worker);
    config.nodes.push(node("end", NodeType::End));
    config.edges.push(FlowEdge::new("start", "worker"));
    config.edges.push(FlowEdge::new("worker", "end"));
    config.data_persistence = true;

    let validator = FlowValidator::new();
    let comprehensive = validator.validate(&config, ValidationLevel::Comprehensive);
    let strict = validator.validate(&config, ValidationLevel::Strict);
    assert!(strict.warnings.len() > comprehensive.warnings.len());
    assert!(comprehensive.is_valid && strict.is_valid);
}
