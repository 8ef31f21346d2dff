//! Flow graph model: nodes, edges, and the named configuration.
//!
//! These are value types with invariants only; all behavior lives in the
//! validator, estimator, and engine. A [`FlowConfiguration`] is read-only
//! input to validation and execution — the engine never mutates one.

mod condition;

pub use condition::{ComparisonOperator, NodeCondition};

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Coordination discipline governing how nodes are ordered and parallelized.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    Sequential,
    Parallel,
    Conditional,
    Pipeline,
    ScatterGather,
    RoundRobin,
    PriorityQueue,
    EventDriven,
    Hybrid,
}

impl FlowType {
    /// Disciplines whose node/edge graph must be acyclic.
    pub fn requires_acyclic(&self) -> bool {
        matches!(self, FlowType::Sequential | FlowType::Pipeline)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Sequential => "sequential",
            FlowType::Parallel => "parallel",
            FlowType::Conditional => "conditional",
            FlowType::Pipeline => "pipeline",
            FlowType::ScatterGather => "scatter_gather",
            FlowType::RoundRobin => "round_robin",
            FlowType::PriorityQueue => "priority_queue",
            FlowType::EventDriven => "event_driven",
            FlowType::Hybrid => "hybrid",
        }
    }
}

/// How the caller intends to drive the flow.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Synchronous,
    #[default]
    Asynchronous,
    Mixed,
}

/// Policy applied when a node fails.
///
/// `Continue` keeps the engine running remaining independent nodes. `Halt`
/// stops scheduling new nodes after the first failure and lets the in-flight
/// batch finish.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorHandlingStrategy {
    #[default]
    Continue,
    Halt,
}

/// Role of a node in the execution graph.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Agent,
    Start,
    End,
    Condition,
    Split,
    Merge,
    Scatter,
    Gather,
    EventListener,
    EventPublisher,
}

impl NodeType {
    /// Boundary markers tolerated as edge-isolated nodes.
    pub fn is_boundary(&self) -> bool {
        matches!(self, NodeType::Start | NodeType::End)
    }
}

/// Diagram coordinates. Decorative; preserved through template
/// instantiation but never read by validation or execution.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
}

/// A unit of the execution graph: bound work (agent), control structure,
/// or a boundary marker.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FlowNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub node_type: NodeType,
    /// Work-unit reference; required for execution of agent-typed nodes.
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub retry_count: u32,
    /// Node ids that must complete before this node is attempted.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Predicates evaluated against flow-wide data; all must hold.
    #[serde(default)]
    pub conditions: Vec<NodeCondition>,
    #[serde(default)]
    pub configuration: Value,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    #[serde(default)]
    pub position: Option<NodePosition>,
}

impl FlowNode {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        FlowNode {
            id: id.into(),
            title: String::new(),
            node_type,
            agent_id: None,
            timeout_seconds: None,
            retry_count: 0,
            dependencies: Vec::new(),
            conditions: Vec::new(),
            configuration: Value::Null,
            metadata: HashMap::new(),
            position: None,
        }
    }

    pub fn is_agent(&self) -> bool {
        self.node_type == NodeType::Agent
    }

    /// Strict-level compliance flag, carried in node metadata.
    pub fn is_security_validated(&self) -> bool {
        self.metadata
            .get("security_validated")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

fn default_weight() -> f64 {
    1.0
}

/// A directed, optionally conditional precedence relation between two nodes.
/// Multiple edges between the same pair are permitted (conditional
/// branching), but both endpoints must resolve to existing nodes.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FlowEdge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    #[serde(default)]
    pub condition: Option<NodeCondition>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Fallback routing when no conditional sibling edge matches.
    #[serde(default)]
    pub is_default: bool,
}

impl FlowEdge {
    pub fn new(from_node: impl Into<String>, to_node: impl Into<String>) -> Self {
        FlowEdge {
            id: Uuid::new_v4().to_string(),
            from_node: from_node.into(),
            to_node: to_node.into(),
            condition: None,
            weight: 1.0,
            is_default: false,
        }
    }
}

fn default_global_timeout() -> u64 {
    300
}

fn default_max_concurrent() -> usize {
    4
}

fn default_monitoring() -> bool {
    true
}

/// A named flow graph plus execution metadata. Node ids are unique within a
/// configuration and every edge endpoint must resolve.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FlowConfiguration {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub flow_type: FlowType,
    #[serde(default)]
    pub execution_mode: ExecutionMode,
    /// Owning coordination-context id.
    pub context_id: String,
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    #[serde(default = "default_global_timeout")]
    pub global_timeout_seconds: u64,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_nodes: usize,
    #[serde(default)]
    pub error_handling_strategy: ErrorHandlingStrategy,
    #[serde(default)]
    pub data_persistence: bool,
    #[serde(default = "default_monitoring")]
    pub monitoring_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FlowConfiguration {
    pub fn new(
        name: impl Into<String>,
        flow_type: FlowType,
        context_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        FlowConfiguration {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            flow_type,
            execution_mode: ExecutionMode::default(),
            context_id: context_id.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            global_timeout_seconds: default_global_timeout(),
            max_concurrent_nodes: default_max_concurrent(),
            error_handling_strategy: ErrorHandlingStrategy::default(),
            data_persistence: false,
            monitoring_enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn node(&self, node_id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn agent_node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_agent()).count()
    }

    /// Outgoing edges of a node, in declaration order.
    pub fn outgoing_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a FlowEdge> + 'a {
        self.edges.iter().filter(move |e| e.from_node == node_id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_type_requires_acyclic() {
        assert!(FlowType::Sequential.requires_acyclic());
        assert!(FlowType::Pipeline.requires_acyclic());
        assert!(!FlowType::Parallel.requires_acyclic());
        assert!(!FlowType::Hybrid.requires_acyclic());
    }

    #[test]
    fn test_flow_type_serde() {
        let json = serde_json::to_string(&FlowType::ScatterGather).unwrap();
        assert_eq!(json, "\"scatter_gather\"");
        let back: FlowType = serde_json::from_str("\"event_driven\"").unwrap();
        assert_eq!(back, FlowType::EventDriven);
    }

    #[test]
    fn test_node_defaults() {
        let node = FlowNode::new("n1", NodeType::Agent);
        assert!(node.is_agent());
        assert!(!node.is_security_validated());
        assert_eq!(node.retry_count, 0);
        assert!(node.dependencies.is_empty());
    }

    #[test]
    fn test_security_validated_from_metadata() {
        let mut node = FlowNode::new("n1", NodeType::Agent);
        node.metadata
            .insert("security_validated".into(), Value::Bool(true));
        assert!(node.is_security_validated());
    }

    #[test]
    fn test_configuration_lookups() {
        let mut config = FlowConfiguration::new("test", FlowType::Sequential, "ctx");
        config.nodes.push(FlowNode::new("a", NodeType::Start));
        config.nodes.push(FlowNode::new("b", NodeType::Agent));
        config.edges.push(FlowEdge::new("a", "b"));

        assert!(config.node("a").is_some());
        assert!(config.node("missing").is_none());
        assert_eq!(config.agent_node_count(), 1);
        assert_eq!(config.outgoing_edges("a").count(), 1);
        assert_eq!(config.outgoing_edges("b").count(), 0);
    }

    #[test]
    fn test_configuration_serde_roundtrip() {
        let mut config = FlowConfiguration::new("rt", FlowType::Parallel, "ctx");
        config.nodes.push(FlowNode::new("a", NodeType::Agent));
        let json = serde_json::to_string(&config).unwrap();
        let back: FlowConfiguration = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, config.id);
        assert_eq!(back.flow_type, FlowType::Parallel);
        assert_eq!(back.nodes.len(), 1);
        assert_eq!(back.max_concurrent_nodes, 4);
    }

    #[test]
    fn test_edge_defaults_on_deserialize() {
        let json = r#"{"id":"e1","from_node":"a","to_node":"b"}"#;
        let edge: FlowEdge = serde_json::from_str(json).unwrap();
        assert_eq!(edge.weight, 1.0);
        assert!(!edge.is_default);
        assert!(edge.condition.is_none());
    }
}
