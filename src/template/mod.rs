//! Reusable graph skeletons and their instantiation.
//!
//! A [`FlowTemplate`] is immutable reference data: a node/edge skeleton
//! using placeholder references, tagged with a compatible discipline and an
//! inclusive agent-count range. [`TemplateCatalog::instantiate`] binds
//! concrete agent ids to the skeleton and returns a new, unsaved
//! [`FlowConfiguration`]; persistence is the caller's responsibility.

mod catalog;

pub use catalog::TemplateCatalog;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::model::{
    ExecutionMode, FlowConfiguration, FlowEdge, FlowNode, FlowType, NodeCondition, NodePosition,
    NodeType,
};
use crate::error::{FlowError, FlowResult};

/// Qualitative complexity of a template.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

/// A node skeleton. `ref_id` is local to the template; instantiation maps
/// it to a freshly generated node id.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TemplateNode {
    pub ref_id: String,
    pub node_type: NodeType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub position: Option<NodePosition>,
}

impl TemplateNode {
    fn new(ref_id: &str, node_type: NodeType, title: &str, x: f64, y: f64) -> Self {
        TemplateNode {
            ref_id: ref_id.to_string(),
            node_type,
            title: title.to_string(),
            position: Some(NodePosition { x, y }),
        }
    }
}

/// An edge skeleton over template-local references.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TemplateEdge {
    pub from_ref: String,
    pub to_ref: String,
    #[serde(default)]
    pub condition: Option<NodeCondition>,
    #[serde(default)]
    pub is_default: bool,
}

impl TemplateEdge {
    fn new(from_ref: &str, to_ref: &str) -> Self {
        TemplateEdge {
            from_ref: from_ref.to_string(),
            to_ref: to_ref.to_string(),
            condition: None,
            is_default: false,
        }
    }
}

/// A reusable graph skeleton. Never mutated by execution.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FlowTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub flow_type: FlowType,
    pub execution_mode: ExecutionMode,
    pub min_agents: usize,
    pub max_agents: usize,
    pub nodes: Vec<TemplateNode>,
    pub edges: Vec<TemplateEdge>,
    pub use_cases: Vec<String>,
    pub complexity: ComplexityLevel,
}

/// Optional overrides applied during instantiation.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Customization {
    pub execution_mode: Option<ExecutionMode>,
    pub max_concurrent_nodes: Option<usize>,
    pub global_timeout_seconds: Option<u64>,
}

impl FlowTemplate {
    /// Bind `agent_ids` to this skeleton and produce a configuration.
    ///
    /// Agent ids are bound to agent-typed placeholders in declaration
    /// order. When more ids are supplied than the skeleton has
    /// placeholders, extra agent nodes are derived from the last
    /// placeholder: chained after it for acyclic-chain disciplines
    /// (sequential, pipeline), wired like it everywhere else.
    pub fn instantiate(
        &self,
        context_id: &str,
        agent_ids: &[String],
        customization: Option<&Customization>,
    ) -> FlowResult<FlowConfiguration> {
        if agent_ids.len() < self.min_agents || agent_ids.len() > self.max_agents {
            return Err(FlowError::AgentCountOutOfRange {
                template_id: self.id.clone(),
                min: self.min_agents,
                max: self.max_agents,
                actual: agent_ids.len(),
            });
        }

        let mut config = FlowConfiguration::new(self.name.clone(), self.flow_type, context_id);
        config.description = self.description.clone();
        config.execution_mode = self.execution_mode;

        let mut ref_to_id: HashMap<String, String> = HashMap::new();
        let mut agent_refs: Vec<String> = Vec::new();

        for template_node in &self.nodes {
            let node_id = Uuid::new_v4().to_string();
            ref_to_id.insert(template_node.ref_id.clone(), node_id.clone());

            let mut node = FlowNode::new(node_id, template_node.node_type);
            node.title = template_node.title.clone();
            node.position = template_node.position;
            if template_node.node_type == NodeType::Agent {
                node.agent_id = agent_ids.get(agent_refs.len()).cloned();
                agent_refs.push(template_node.ref_id.clone());
            }
            config.nodes.push(node);
        }

        for template_edge in &self.edges {
            let from = ref_to_id.get(&template_edge.from_ref).ok_or_else(|| {
                FlowError::InternalError(format!(
                    "template {} edge references unknown placeholder: {}",
                    self.id, template_edge.from_ref
                ))
            })?;
            let to = ref_to_id.get(&template_edge.to_ref).ok_or_else(|| {
                FlowError::InternalError(format!(
                    "template {} edge references unknown placeholder: {}",
                    self.id, template_edge.to_ref
                ))
            })?;
            let mut edge = FlowEdge::new(from.clone(), to.clone());
            edge.condition = template_edge.condition.clone();
            edge.is_default = template_edge.is_default;
            config.edges.push(edge);
        }

        if agent_ids.len() > agent_refs.len() {
            self.expand_extra_agents(&mut config, &ref_to_id, &agent_refs, agent_ids)?;
        }

        if let Some(custom) = customization {
            if let Some(mode) = custom.execution_mode {
                config.execution_mode = mode;
            }
            if let Some(concurrency) = custom.max_concurrent_nodes {
                config.max_concurrent_nodes = concurrency;
            }
            if let Some(timeout) = custom.global_timeout_seconds {
                config.global_timeout_seconds = timeout;
            }
        }

        Ok(config)
    }

    fn expand_extra_agents(
        &self,
        config: &mut FlowConfiguration,
        ref_to_id: &HashMap<String, String>,
        agent_refs: &[String],
        agent_ids: &[String],
    ) -> FlowResult<()> {
        let last_ref = agent_refs.last().ok_or_else(|| {
            FlowError::InternalError(format!("template {} has no agent placeholder", self.id))
        })?;
        let last_id = ref_to_id[last_ref].clone();
        let last_position = self
            .nodes
            .iter()
            .find(|n| &n.ref_id == last_ref)
            .and_then(|n| n.position);

        let chain = self.flow_type.requires_acyclic();
        let mut tail_id = last_id.clone();

        for (offset, agent_id) in agent_ids[agent_refs.len()..].iter().enumerate() {
            let node_id = Uuid::new_v4().to_string();
            let mut node = FlowNode::new(node_id.clone(), NodeType::Agent);
            node.agent_id = Some(agent_id.clone());
            node.title = format!("Agent {}", agent_refs.len() + offset + 1);
            node.position = last_position.map(|p| NodePosition {
                x: p.x + 160.0 * (offset + 1) as f64,
                y: p.y,
            });
            config.nodes.push(node);

            if chain {
                // Splice into the chain after the current tail.
                match config.edges.iter().position(|e| e.from_node == tail_id) {
                    Some(pos) => {
                        let old_target =
                            std::mem::replace(&mut config.edges[pos].to_node, node_id.clone());
                        config.edges.push(FlowEdge::new(node_id.clone(), old_target));
                    }
                    None => {
                        config
                            .edges
                            .push(FlowEdge::new(tail_id.clone(), node_id.clone()));
                    }
                }
                tail_id = node_id;
            } else {
                // Replicate the last placeholder's wiring.
                let mut cloned = Vec::new();
                for edge in &config.edges {
                    if edge.from_node == last_id {
                        cloned.push(FlowEdge::new(node_id.clone(), edge.to_node.clone()));
                    }
                    if edge.to_node == last_id {
                        cloned.push(FlowEdge::new(edge.from_node.clone(), node_id.clone()));
                    }
                }
                config.edges.extend(cloned);
            }
        }
        Ok(())
    }
}
