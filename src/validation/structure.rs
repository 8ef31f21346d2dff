//! Basic-level structural checks.

use std::collections::HashSet;

use crate::domain::model::{FlowConfiguration, NodeType};

use super::types::Findings;

pub(crate) fn validate(config: &FlowConfiguration, findings: &mut Findings) {
    if config.nodes.is_empty() {
        findings.issue("Configuration has no nodes");
        return;
    }

    if config.nodes.len() > 1 && config.edges.is_empty() {
        findings.issue("Configuration has multiple nodes but no edges");
    }

    let mut seen = HashSet::new();
    for node in &config.nodes {
        if !seen.insert(node.id.as_str()) {
            findings.issue(format!("Duplicate node id: {}", node.id));
        }
    }

    let node_ids: HashSet<&str> = config.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &config.edges {
        if !node_ids.contains(edge.from_node.as_str()) {
            findings.issue(format!(
                "Edge {} references unknown source node: {}",
                edge.id, edge.from_node
            ));
        }
        if !node_ids.contains(edge.to_node.as_str()) {
            findings.issue(format!(
                "Edge {} references unknown target node: {}",
                edge.id, edge.to_node
            ));
        }
    }

    if !config.nodes.iter().any(|n| n.node_type == NodeType::Start) {
        findings.warning("No start node defined");
    }
    if !config.nodes.iter().any(|n| n.node_type == NodeType::End) {
        findings.warning("No end node defined");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FlowEdge, FlowNode, FlowType};

    fn check(config: &FlowConfiguration) -> Findings {
        let mut findings = Findings::default();
        validate(config, &mut findings);
        findings
    }

    #[test]
    fn test_empty_configuration() {
        let config = FlowConfiguration::new("empty", FlowType::Sequential, "ctx");
        let findings = check(&config);
        assert_eq!(findings.issues, vec!["Configuration has no nodes"]);
    }

    #[test]
    fn test_multiple_nodes_without_edges() {
        let mut config = FlowConfiguration::new("c", FlowType::Sequential, "ctx");
        config.nodes.push(FlowNode::new("a", NodeType::Start));
        config.nodes.push(FlowNode::new("b", NodeType::End));
        let findings = check(&config);
        assert!(findings
            .issues
            .iter()
            .any(|i| i.contains("no edges")));
    }

    #[test]
    fn test_duplicate_node_ids() {
        let mut config = FlowConfiguration::new("c", FlowType::Sequential, "ctx");
        config.nodes.push(FlowNode::new("a", NodeType::Start));
        config.nodes.push(FlowNode::new("a", NodeType::End));
        config.edges.push(FlowEdge::new("a", "a"));
        let findings = check(&config);
        assert!(findings.issues.iter().any(|i| i.contains("Duplicate node id: a")));
    }

    #[test]
    fn test_unresolved_edge_endpoints() {
        let mut config = FlowConfiguration::new("c", FlowType::Sequential, "ctx");
        config.nodes.push(FlowNode::new("a", NodeType::Start));
        config.edges.push(FlowEdge::new("a", "ghost"));
        let findings = check(&config);
        assert!(findings
            .issues
            .iter()
            .any(|i| i.contains("unknown target node: ghost")));
    }

    #[test]
    fn test_missing_boundaries_warn_only() {
        let mut config = FlowConfiguration::new("c", FlowType::Sequential, "ctx");
        config.nodes.push(FlowNode::new("a", NodeType::Agent));
        let findings = check(&config);
        assert!(findings.issues.is_empty());
        assert_eq!(findings.warnings.len(), 2);
    }
}
