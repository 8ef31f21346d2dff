//! Execution records — the mutable, append-only record of a single run.
//!
//! A [`FlowExecution`] is created when execution starts, mutated by the
//! engine as nodes complete, and frozen once it reaches a terminal status.
//! The engine exclusively owns the instances it creates.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{FlowError, NodeError};

/// Lifecycle status of a flow execution.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    Draft,
    Active,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

impl FlowStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlowStatus::Completed | FlowStatus::Failed | FlowStatus::Cancelled
        )
    }

    /// Allowed transitions: draft → active; active → {paused, completed,
    /// failed, cancelled}; paused → {active, cancelled}. Terminal states
    /// admit none.
    pub fn can_transition_to(&self, next: FlowStatus) -> bool {
        match self {
            FlowStatus::Draft => next == FlowStatus::Active,
            FlowStatus::Active => matches!(
                next,
                FlowStatus::Paused
                    | FlowStatus::Completed
                    | FlowStatus::Failed
                    | FlowStatus::Cancelled
            ),
            FlowStatus::Paused => matches!(next, FlowStatus::Active | FlowStatus::Cancelled),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStatus::Draft => "draft",
            FlowStatus::Active => "active",
            FlowStatus::Paused => "paused",
            FlowStatus::Completed => "completed",
            FlowStatus::Failed => "failed",
            FlowStatus::Cancelled => "cancelled",
        }
    }
}

/// Result of one completed node execution.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct NodeResult {
    pub output: Value,
    pub elapsed_ms: u64,
    pub completed_at: DateTime<Utc>,
}

/// One entry in the ordered error log.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ExecutionErrorEntry {
    pub node_id: Option<String>,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

/// Aggregate figures computed on the terminal transition.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ExecutionMetrics {
    pub total_nodes: usize,
    pub completed_nodes: usize,
    pub failed_nodes: usize,
    pub duration_ms: u64,
    pub success_rate: f64,
}

/// The record of a single run of a configuration.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FlowExecution {
    pub id: String,
    pub configuration_id: String,
    pub context_id: String,
    pub status: FlowStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub current_nodes: HashSet<String>,
    pub completed_nodes: HashSet<String>,
    pub failed_nodes: HashSet<String>,
    pub node_results: HashMap<String, NodeResult>,
    /// Flow-wide data context mutated by node execution. Writes are
    /// serialized by the engine (sequentially, or at batch-join points).
    pub flow_data: Map<String, Value>,
    pub metrics: ExecutionMetrics,
    pub error_log: Vec<ExecutionErrorEntry>,
}

impl FlowExecution {
    /// Create a new execution in `active` state with the given input as the
    /// initial flow data.
    pub fn start(
        configuration_id: impl Into<String>,
        context_id: impl Into<String>,
        input: Map<String, Value>,
    ) -> Self {
        FlowExecution {
            id: Uuid::new_v4().to_string(),
            configuration_id: configuration_id.into(),
            context_id: context_id.into(),
            status: FlowStatus::Active,
            started_at: Utc::now(),
            ended_at: None,
            current_nodes: HashSet::new(),
            completed_nodes: HashSet::new(),
            failed_nodes: HashSet::new(),
            node_results: HashMap::new(),
            flow_data: input,
            metrics: ExecutionMetrics::default(),
            error_log: Vec::new(),
        }
    }

    /// Record a successful node: store the result, mark completion, and
    /// merge the output into the flow data under the node id.
    pub fn record_success(&mut self, node_id: &str, output: Value, elapsed_ms: u64) {
        self.current_nodes.remove(node_id);
        self.completed_nodes.insert(node_id.to_string());
        if !output.is_null() {
            self.flow_data.insert(node_id.to_string(), output.clone());
        }
        self.node_results.insert(
            node_id.to_string(),
            NodeResult {
                output,
                elapsed_ms,
                completed_at: Utc::now(),
            },
        );
    }

    /// Record a failed node and append to the error log.
    pub fn record_failure(&mut self, node_id: &str, error: &NodeError) {
        self.current_nodes.remove(node_id);
        self.failed_nodes.insert(node_id.to_string());
        self.error_log.push(ExecutionErrorEntry {
            node_id: Some(node_id.to_string()),
            message: error.to_string(),
            occurred_at: Utc::now(),
        });
    }

    /// Append a run-level (non-node) error to the log.
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.error_log.push(ExecutionErrorEntry {
            node_id: None,
            message: message.into(),
            occurred_at: Utc::now(),
        });
    }

    /// Validated non-terminal transition (pause, resume, cancel).
    pub fn transition_to(&mut self, next: FlowStatus) -> Result<(), FlowError> {
        if !self.status.can_transition_to(next) {
            return Err(FlowError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.status = next;
        if next.is_terminal() {
            self.ended_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Terminal transition: stamp `ended_at` and freeze the metrics.
    pub fn finalize(&mut self, status: FlowStatus, total_nodes: usize) {
        debug_assert!(status.is_terminal());
        self.status = status;
        let ended = Utc::now();
        self.ended_at = Some(ended);
        self.current_nodes.clear();
        let completed = self.completed_nodes.len();
        let failed = self.failed_nodes.len();
        let attempted = completed + failed;
        self.metrics = ExecutionMetrics {
            total_nodes,
            completed_nodes: completed,
            failed_nodes: failed,
            duration_ms: (ended - self.started_at).num_milliseconds().max(0) as u64,
            success_rate: if attempted == 0 {
                0.0
            } else {
                completed as f64 / attempted as f64
            },
        };
    }
}
