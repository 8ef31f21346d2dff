//! Comprehensive-level flow-logic checks: reachability, cycles,
//! dependency resolution, isolated nodes.
//!
//! This layer builds its own adjacency maps rather than going through the
//! runtime graph so that cycle diagnostics can carry the offending path.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::domain::model::{FlowConfiguration, NodeType};

use super::types::Findings;

pub(crate) fn validate(config: &FlowConfiguration, findings: &mut Findings) {
    let mut out_edges: HashMap<&str, Vec<&str>> = HashMap::new();
    for node in &config.nodes {
        out_edges.entry(node.id.as_str()).or_default();
    }
    for edge in &config.edges {
        out_edges
            .entry(edge.from_node.as_str())
            .or_default()
            .push(edge.to_node.as_str());
    }

    let starts: Vec<&str> = config
        .nodes
        .iter()
        .filter(|n| n.node_type == NodeType::Start)
        .map(|n| n.id.as_str())
        .collect();

    if !starts.is_empty() {
        let reachable = bfs_reachable(&starts, &out_edges);
        for node in &config.nodes {
            if !reachable.contains(node.id.as_str()) {
                findings.issue(format!("Unreachable node: {}", node.id));
            }
        }
    }

    if config.flow_type.requires_acyclic() {
        for cycle in detect_cycles(config, &out_edges) {
            findings.issue(format!("Cycle detected: {}", cycle.join(" -> ")));
        }
    }

    let node_ids: HashSet<&str> = config.nodes.iter().map(|n| n.id.as_str()).collect();
    for node in &config.nodes {
        for dep in &node.dependencies {
            if !node_ids.contains(dep.as_str()) {
                findings.issue(format!(
                    "Node {} depends on unknown node: {}",
                    node.id, dep
                ));
            }
        }
    }

    let mut touched: HashSet<&str> = HashSet::new();
    for edge in &config.edges {
        touched.insert(edge.from_node.as_str());
        touched.insert(edge.to_node.as_str());
    }
    // One edge-untouched node is tolerated (conventionally a boundary
    // marker); the slot goes to the first in declaration order.
    let mut tolerated = false;
    for node in &config.nodes {
        if !touched.contains(node.id.as_str()) {
            if !tolerated {
                tolerated = true;
                continue;
            }
            findings.warning(format!("Isolated node not touched by any edge: {}", node.id));
        }
    }
}

fn bfs_reachable<'a>(
    starts: &[&'a str],
    out_edges: &HashMap<&'a str, Vec<&'a str>>,
) -> HashSet<&'a str> {
    let mut reachable: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for &start in starts {
        if reachable.insert(start) {
            queue.push_back(start);
        }
    }
    while let Some(node) = queue.pop_front() {
        if let Some(nexts) = out_edges.get(node) {
            for &next in nexts {
                if reachable.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    reachable
}

/// Three-color DFS returning each detected cycle as a closed node path.
fn detect_cycles(
    config: &FlowConfiguration,
    out_edges: &HashMap<&str, Vec<&str>>,
) -> Vec<Vec<String>> {
    let mut cycles = Vec::new();
    let mut state: HashMap<&str, u8> = HashMap::new();
    let mut stack: Vec<&str> = Vec::new();

    for node in &config.nodes {
        if state.get(node.id.as_str()).copied().unwrap_or(0) == 0 {
            dfs(node.id.as_str(), out_edges, &mut state, &mut stack, &mut cycles);
        }
    }
    cycles
}

fn dfs<'a>(
    node: &'a str,
    out_edges: &HashMap<&'a str, Vec<&'a str>>,
    state: &mut HashMap<&'a str, u8>,
    stack: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) {
    state.insert(node, 1);
    stack.push(node);

    if let Some(nexts) = out_edges.get(node) {
        for &next in nexts {
            match state.get(next).copied().unwrap_or(0) {
                0 => dfs(next, out_edges, state, stack, cycles),
                1 => {
                    if let Some(pos) = stack.iter().position(|n| *n == next) {
                        let mut path: Vec<String> =
                            stack[pos..].iter().map(|s| s.to_string()).collect();
                        path.push(next.to_string());
                        cycles.push(path);
                    }
                }
                _ => {}
            }
        }
    }

    stack.pop();
    state.insert(node, 2);
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

    fn sequential(nodes: &[(&str, NodeType)], edges: &[(&str, &str)]) -> FlowConfiguration {
        let mut config = FlowConfiguration::new("fl", FlowType::Sequential, "ctx");
        for (id, node_type) in nodes {
            config.nodes.push(FlowNode::new(*id, *node_type));
        }
        for (from, to) in edges {
            config.edges.push(FlowEdge::new(*from, *to));
        }
        config
    }

    #[test]
    fn test_cycle_detected_with_path() {
        let config = sequential(
            &[("a", NodeType::Agent), ("b", NodeType::Agent)],
            &[("a", "b"), ("b", "a")],
        );
        let findings = check(&config);
        assert!(findings
            .issues
            .iter()
            .any(|i| i.contains("Cycle detected") && i.contains("->")));
    }

    #[test]
    fn test_acyclic_chain_passes() {
        let config = sequential(
            &[("s", NodeType::Start), ("a", NodeType::Agent), ("e", NodeType::End)],
            &[("s", "a"), ("a", "e")],
        );
        let findings = check(&config);
        assert!(findings.issues.is_empty(), "{:?}", findings.issues);
    }

    #[test]
    fn test_cycles_ignored_for_event_driven() {
        let mut config = sequential(
            &[("a", NodeType::Agent), ("b", NodeType::Agent)],
            &[("a", "b"), ("b", "a")],
        );
        config.flow_type = FlowType::EventDriven;
        let findings = check(&config);
        assert!(!findings.issues.iter().any(|i| i.contains("Cycle")));
    }

    #[test]
    fn test_unreachable_node_reported() {
        let config = sequential(
            &[
                ("s", NodeType::Start),
                ("a", NodeType::Agent),
                ("orphan", NodeType::Agent),
            ],
            &[("s", "a")],
        );
        let findings = check(&config);
        assert!(findings
            .issues
            .iter()
            .any(|i| i.contains("Unreachable node: orphan")));
    }

    #[test]
    fn test_edge_to_orphan_removes_issue() {
        let config = sequential(
            &[
                ("s", NodeType::Start),
                ("a", NodeType::Agent),
                ("orphan", NodeType::Agent),
            ],
            &[("s", "a"), ("s", "orphan")],
        );
        let findings = check(&config);
        assert!(!findings.issues.iter().any(|i| i.contains("Unreachable")));
    }

    #[test]
    fn test_no_start_skips_reachability() {
        let config = sequential(&[("a", NodeType::Agent), ("b", NodeType::Agent)], &[("a", "b")]);
        let findings = check(&config);
        assert!(!findings.issues.iter().any(|i| i.contains("Unreachable")));
    }

    #[test]
    fn test_unknown_dependency_reported() {
        let mut config = sequential(&[("s", NodeType::Start), ("a", NodeType::Agent)], &[("s", "a")]);
        config.nodes[1].dependencies.push("ghost".to_string());
        let findings = check(&config);
        assert!(findings
            .issues
            .iter()
            .any(|i| i.contains("depends on unknown node: ghost")));
    }

    #[test]
    fn test_single_isolated_node_tolerated() {
        let config = sequential(
            &[
                ("s", NodeType::Start),
                ("a", NodeType::Agent),
                ("lone", NodeType::End),
            ],
            &[("s", "a")],
        );
        let findings = check(&config);
        assert!(findings.warnings.iter().all(|w| !w.contains("Isolated")));
    }

    #[test]
    fn test_second_isolated_node_warned() {
        let config = sequential(
            &[
                ("s", NodeType::Start),
                ("a", NodeType::Agent),
                ("lone1", NodeType::Agent),
                ("lone2", NodeType::Agent),
            ],
            &[("s", "a")],
        );
        let findings = check(&config);
        let isolated: Vec<_> = findings
            .warnings
            .iter()
            .filter(|w| w.contains("Isolated"))
            .collect();
        assert_eq!(isolated.len(), 1);
        assert!(isolated[0].contains("lone2"));
    }
}
