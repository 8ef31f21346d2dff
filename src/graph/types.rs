use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};

use crate::domain::model::NodeType;

/// Node weight carried in the runtime graph. Edge weights are edge ids.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: String,
    pub node_type: NodeType,
}

/// Node id to petgraph `NodeIndex` mapping.
pub type NodeIndexMap = HashMap<String, NodeIndex>;

/// The runtime graph: structure only, no configuration payloads.
#[derive(Debug)]
pub struct FlowGraph {
    pub graph: StableDiGraph<GraphNode, String>,
    pub index_map: NodeIndexMap,
}

impl FlowGraph {
    /// Successor node ids of `node_id`. Order follows petgraph's internal
    /// edge ordering; callers needing declaration order should walk the
    /// configuration's edge list instead.
    pub fn successors(&self, node_id: &str) -> Vec<String> {
        let Some(idx) = self.index_map.get(node_id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(*idx, petgraph::Direction::Outgoing)
            .filter_map(|n| self.graph.node_weight(n).map(|w| w.id.clone()))
            .collect()
    }

    pub fn in_degree(&self, node_id: &str) -> usize {
        self.index_map
            .get(node_id)
            .map(|idx| {
                self.graph
                    .neighbors_directed(*idx, petgraph::Direction::Incoming)
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.index_map.contains_key(node_id)
    }

    pub fn is_cyclic(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }
}
