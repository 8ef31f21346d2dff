//! The fixed built-in template catalog.

use crate::domain::model::{ExecutionMode, FlowType, NodeType};
use crate::error::{FlowError, FlowResult};

use super::{
    ComplexityLevel, Customization, FlowTemplate, TemplateEdge, TemplateNode,
};
use crate::domain::model::FlowConfiguration;

/// Catalog of the built-in graph skeletons. Loaded once at construction;
/// templates are immutable reference data.
pub struct TemplateCatalog {
    templates: Vec<FlowTemplate>,
}

impl TemplateCatalog {
    pub fn builtin() -> Self {
        TemplateCatalog {
            templates: vec![
                sequential_basic(),
                parallel_fanout(),
                conditional_branch(),
                pipeline_stages(),
                scatter_gather(),
                event_driven(),
            ],
        }
    }

    pub fn get(&self, template_id: &str) -> Option<&FlowTemplate> {
        self.templates.iter().find(|t| t.id == template_id)
    }

    pub fn all(&self) -> &[FlowTemplate] {
        &self.templates
    }

    /// Instantiate `template_id` for a coordination context, binding
    /// `agent_ids` to the skeleton's agent placeholders.
    pub fn instantiate(
        &self,
        template_id: &str,
        context_id: &str,
        agent_ids: &[String],
        customization: Option<&Customization>,
    ) -> FlowResult<FlowConfiguration> {
        let template = self
            .get(template_id)
            .ok_or_else(|| FlowError::TemplateNotFound(template_id.to_string()))?;
        template.instantiate(context_id, agent_ids, customization)
    }
}

fn sequential_basic() -> FlowTemplate {
    FlowTemplate {
        id: "sequential_basic".into(),
        name: "Sequential Basic".into(),
        description: "Agents run one after another along a single chain".into(),
        flow_type: FlowType::Sequential,
        execution_mode: ExecutionMode::Synchronous,
        min_agents: 2,
        max_agents: 10,
        nodes: vec![
            TemplateNode::new("start", NodeType::Start, "Start", 0.0, 100.0),
            TemplateNode::new("agent_1", NodeType::Agent, "Agent 1", 160.0, 100.0),
            TemplateNode::new("agent_2", NodeType::Agent, "Agent 2", 320.0, 100.0),
            TemplateNode::new("end", NodeType::End, "End", 480.0, 100.0),
        ],
        edges: vec![
            TemplateEdge::new("start", "agent_1"),
            TemplateEdge::new("agent_1", "agent_2"),
            TemplateEdge::new("agent_2", "end"),
        ],
        use_cases: vec![
            "step-by-step processing".into(),
            "approval chains".into(),
            "staged handoffs".into(),
        ],
        complexity: ComplexityLevel::Low,
    }
}

fn parallel_fanout() -> FlowTemplate {
    FlowTemplate {
        id: "parallel_fanout".into(),
        name: "Parallel Fanout".into(),
        description: "Independent agents run concurrently and merge their results".into(),
        flow_type: FlowType::Parallel,
        execution_mode: ExecutionMode::Asynchronous,
        min_agents: 2,
        max_agents: 20,
        nodes: vec![
            TemplateNode::new("agent_1", NodeType::Agent, "Agent 1", 0.0, 40.0),
            TemplateNode::new("agent_2", NodeType::Agent, "Agent 2", 0.0, 160.0),
            TemplateNode::new("merge", NodeType::Merge, "Merge", 200.0, 100.0),
            TemplateNode::new("end", NodeType::End, "End", 360.0, 100.0),
        ],
        edges: vec![
            TemplateEdge::new("agent_1", "merge"),
            TemplateEdge::new("agent_2", "merge"),
            TemplateEdge::new("merge", "end"),
        ],
        use_cases: vec![
            "independent research tasks".into(),
            "bulk enrichment".into(),
        ],
        complexity: ComplexityLevel::Medium,
    }
}

fn conditional_branch() -> FlowTemplate {
    let mut default_edge = TemplateEdge::new("condition", "agent_2");
    default_edge.is_default = true;
    FlowTemplate {
        id: "conditional_branch".into(),
        name: "Conditional Branch".into(),
        description: "A condition node routes work to one of several agents".into(),
        flow_type: FlowType::Conditional,
        execution_mode: ExecutionMode::Mixed,
        min_agents: 2,
        max_agents: 6,
        nodes: vec![
            TemplateNode::new("start", NodeType::Start, "Start", 0.0, 100.0),
            TemplateNode::new("condition", NodeType::Condition, "Route", 160.0, 100.0),
            TemplateNode::new("agent_1", NodeType::Agent, "Primary", 320.0, 40.0),
            TemplateNode::new("agent_2", NodeType::Agent, "Fallback", 320.0, 160.0),
            TemplateNode::new("end", NodeType::End, "End", 480.0, 100.0),
        ],
        edges: vec![
            TemplateEdge::new("start", "condition"),
            TemplateEdge::new("condition", "agent_1"),
            default_edge,
            TemplateEdge::new("agent_1", "end"),
            TemplateEdge::new("agent_2", "end"),
        ],
        use_cases: vec![
            "triage and escalation".into(),
            "quality-gated routing".into(),
        ],
        complexity: ComplexityLevel::Medium,
    }
}

fn pipeline_stages() -> FlowTemplate {
    FlowTemplate {
        id: "pipeline_stages".into(),
        name: "Pipeline Stages".into(),
        description: "Each agent is a stage transforming the previous stage's output".into(),
        flow_type: FlowType::Pipeline,
        execution_mode: ExecutionMode::Asynchronous,
        min_agents: 3,
        max_agents: 8,
        nodes: vec![
            TemplateNode::new("start", NodeType::Start, "Start", 0.0, 100.0),
            TemplateNode::new("agent_1", NodeType::Agent, "Stage 1", 160.0, 100.0),
            TemplateNode::new("agent_2", NodeType::Agent, "Stage 2", 320.0, 100.0),
            TemplateNode::new("agent_3", NodeType::Agent, "Stage 3", 480.0, 100.0),
            TemplateNode::new("end", NodeType::End, "End", 640.0, 100.0),
        ],
        edges: vec![
            TemplateEdge::new("start", "agent_1"),
            TemplateEdge::new("agent_1", "agent_2"),
            TemplateEdge::new("agent_2", "agent_3"),
            TemplateEdge::new("agent_3", "end"),
        ],
        use_cases: vec![
            "extract-transform-load chains".into(),
            "draft-review-publish".into(),
        ],
        complexity: ComplexityLevel::Medium,
    }
}

fn scatter_gather() -> FlowTemplate {
    FlowTemplate {
        id: "scatter_gather".into(),
        name: "Scatter Gather".into(),
        description: "Work is scattered across agents and gathered into one result".into(),
        flow_type: FlowType::ScatterGather,
        execution_mode: ExecutionMode::Asynchronous,
        min_agents: 2,
        max_agents: 12,
        nodes: vec![
            TemplateNode::new("start", NodeType::Start, "Start", 0.0, 100.0),
            TemplateNode::new("scatter", NodeType::Scatter, "Scatter", 160.0, 100.0),
            TemplateNode::new("agent_1", NodeType::Agent, "Worker 1", 320.0, 40.0),
            TemplateNode::new("agent_2", NodeType::Agent, "Worker 2", 320.0, 160.0),
            TemplateNode::new("gather", NodeType::Gather, "Gather", 480.0, 100.0),
            TemplateNode::new("end", NodeType::End, "End", 640.0, 100.0),
        ],
        edges: vec![
            TemplateEdge::new("start", "scatter"),
            TemplateEdge::new("scatter", "agent_1"),
            TemplateEdge::new("scatter", "agent_2"),
            TemplateEdge::new("agent_1", "gather"),
            TemplateEdge::new("agent_2", "gather"),
            TemplateEdge::new("gather", "end"),
        ],
        use_cases: vec![
            "map-reduce style aggregation".into(),
            "multi-source lookups".into(),
        ],
        complexity: ComplexityLevel::High,
    }
}

fn event_driven() -> FlowTemplate {
    FlowTemplate {
        id: "event_driven".into(),
        name: "Event Driven".into(),
        description: "A listener triggers agents that publish follow-up events".into(),
        flow_type: FlowType::EventDriven,
        execution_mode: ExecutionMode::Asynchronous,
        min_agents: 1,
        max_agents: 5,
        nodes: vec![
            TemplateNode::new("listener", NodeType::EventListener, "Listener", 0.0, 100.0),
            TemplateNode::new("agent_1", NodeType::Agent, "Handler", 160.0, 100.0),
            TemplateNode::new("publisher", NodeType::EventPublisher, "Publisher", 320.0, 100.0),
        ],
        edges: vec![
            TemplateEdge::new("listener", "agent_1"),
            TemplateEdge::new("agent_1", "publisher"),
        ],
        use_cases: vec![
            "reactive notification handling".into(),
            "webhook-triggered work".into(),
        ],
        complexity: ComplexityLevel::High,
    }
}
