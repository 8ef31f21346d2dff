//! Runtime graph built from a configuration.
//!
//! The engine works against a [`FlowGraph`] (a petgraph `StableDiGraph`
//! plus an id → index map) rather than the raw node/edge vectors. The
//! validator's flow-logic layer builds its own adjacency maps instead, so
//! its diagnostics can report the offending cycle path.

mod traversal;
mod types;

pub use traversal::{dependency_free_nodes, ready_nodes, topological_order};
pub use types::{FlowGraph, GraphNode, NodeIndexMap};

use petgraph::stable_graph::StableDiGraph;

use crate::domain::model::FlowConfiguration;
use crate::error::FlowError;

/// Materialize the runtime graph for a configuration.
///
/// Fails with [`FlowError::GraphBuildError`] when an edge references a node
/// id that does not exist in the configuration.
pub fn build_graph(config: &FlowConfiguration) -> Result<FlowGraph, FlowError> {
    let mut graph = StableDiGraph::new();
    let mut index_map = NodeIndexMap::new();

    for node in &config.nodes {
        let idx = graph.add_node(GraphNode {
            id: node.id.clone(),
            node_type: node.node_type,
        });
        index_map.insert(node.id.clone(), idx);
    }

    for edge in &config.edges {
        let from = index_map.get(&edge.from_node).ok_or_else(|| {
            FlowError::GraphBuildError(format!(
                "edge {} references unknown source node: {}",
                edge.id, edge.from_node
            ))
        })?;
        let to = index_map.get(&edge.to_node).ok_or_else(|| {
            FlowError::GraphBuildError(format!(
                "edge {} references unknown target node: {}",
                edge.id, edge.to_node
            ))
        })?;
        graph.add_edge(*from, *to, edge.id.clone());
    }

    Ok(FlowGraph { graph, index_map })
}
