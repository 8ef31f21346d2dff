use std::collections::HashSet;

use crate::domain::model::{FlowConfiguration, NodeType};

use super::types::FlowGraph;

/// Nodes whose predecessors (graph edges) have all completed and whose
/// declared `dependencies` are satisfied. Already-completed and
/// already-failed nodes are excluded.
pub fn ready_nodes(
    config: &FlowConfiguration,
    graph: &FlowGraph,
    completed: &HashSet<String>,
    failed: &HashSet<String>,
) -> Vec<String> {
    let mut ready = Vec::new();
    for node in &config.nodes {
        if completed.contains(&node.id) || failed.contains(&node.id) {
            continue;
        }
        let preds_done = graph
            .index_map
            .get(&node.id)
            .map(|idx| {
                graph
                    .graph
                    .neighbors_directed(*idx, petgraph::Direction::Incoming)
                    .all(|p| {
                        graph
                            .graph
                            .node_weight(p)
                            .map(|w| completed.contains(&w.id) || failed.contains(&w.id))
                            .unwrap_or(false)
                    })
            })
            .unwrap_or(false);
        let deps_done = node
            .dependencies
            .iter()
            .all(|d| completed.contains(d) || failed.contains(d));
        if preds_done && deps_done {
            ready.push(node.id.clone());
        }
    }
    ready
}

/// Non-start nodes with no incoming edge and no declared dependencies, in
/// declaration order. This is the work set of the parallel driver.
pub fn dependency_free_nodes(config: &FlowConfiguration, graph: &FlowGraph) -> Vec<String> {
    config
        .nodes
        .iter()
        .filter(|n| {
            n.node_type != NodeType::Start
                && n.dependencies.is_empty()
                && graph.in_degree(&n.id) == 0
        })
        .map(|n| n.id.clone())
        .collect()
}

/// Topological ordering of the graph, or `None` when it contains a cycle.
pub fn topological_order(graph: &FlowGraph) -> Option<Vec<String>> {
    let sorted = petgraph::algo::toposort(&graph.graph, None).ok()?;
    Some(
        sorted
            .into_iter()
            .filter_map(|idx| graph.graph.node_weight(idx).map(|w| w.id.clone()))
            .collect(),
    )
}
