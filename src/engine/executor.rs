//! The external work contract.
//!
//! [`AgentExecutor`] is the single seam through which agents are invoked:
//! given a node specification and the current flow data, produce a result
//! or fail. No assumption is made about the implementation behind it.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::domain::model::FlowNode;
use crate::error::NodeError;

#[async_trait]
pub trait AgentExecutor: Send + Sync {
    async fn execute(
        &self,
        node: &FlowNode,
        flow_data: &Map<String, Value>,
    ) -> Result<Value, NodeError>;
}

/// Deterministic test double: instant success by default, per-node injected
/// failures, optional fixed delay. Use with tokio's paused clock instead of
/// wall-clock sleeps.
#[derive(Debug, Default)]
pub struct FakeAgentExecutor {
    delay: Option<Duration>,
    failing_nodes: HashSet<String>,
}

impl FakeAgentExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every execution of the given node id.
    pub fn fail_on(mut self, node_id: impl Into<String>) -> Self {
        self.failing_nodes.insert(node_id.into());
        self
    }

    /// Sleep this long before every result.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl AgentExecutor for FakeAgentExecutor {
    async fn execute(
        &self,
        node: &FlowNode,
        _flow_data: &Map<String, Value>,
    ) -> Result<Value, NodeError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_nodes.contains(&node.id) {
            return Err(NodeError::ExecutionFailed(format!(
                "injected failure for node {}",
                node.id
            )));
        }
        Ok(json!({
            "node_id": node.id,
            "agent_id": node.agent_id,
            "status": "ok",
        }))
    }
}
