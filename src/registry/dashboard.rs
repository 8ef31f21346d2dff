//! Read-only reporting types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::execution::FlowStatus;
use crate::domain::model::FlowType;
use crate::template::ComplexityLevel;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct DashboardOverview {
    pub total_configurations: usize,
    pub total_executions: usize,
    pub active_executions: usize,
    pub completed_executions: usize,
    pub failed_executions: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ExecutionSummary {
    pub id: String,
    pub configuration_id: String,
    pub status: FlowStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub completed_nodes: usize,
    pub failed_nodes: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ConfigurationSummary {
    pub id: String,
    pub name: String,
    pub flow_type: FlowType,
    pub node_count: usize,
    pub edge_count: usize,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub flow_type: FlowType,
    pub min_agents: usize,
    pub max_agents: usize,
    pub complexity: ComplexityLevel,
}

/// Aggregation over stored configurations and execution records, optionally
/// filtered by coordination context.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub overview: DashboardOverview,
    pub flow_type_distribution: HashMap<String, usize>,
    pub recent_executions: Vec<ExecutionSummary>,
    pub configurations: Vec<ConfigurationSummary>,
    pub templates: Vec<TemplateSummary>,
}
