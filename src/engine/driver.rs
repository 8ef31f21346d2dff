//! Per-discipline execution drivers.
//!
//! The engine dispatches through a [`DriverRegistry`] keyed by discipline.
//! Disciplines without a dedicated driver (pipeline, scatter-gather,
//! round-robin, priority-queue, event-driven, hybrid) fall back to the
//! sequential driver; this is a deliberate extension point, and callers may
//! register their own drivers.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::task::JoinSet;

use crate::domain::execution::FlowExecution;
use crate::domain::model::{
    ErrorHandlingStrategy, FlowConfiguration, FlowNode, FlowType,
};
use crate::error::{FlowError, FlowResult, NodeError};
use crate::evaluator::ConditionEvaluator;
use crate::graph::{dependency_free_nodes, FlowGraph};

use super::executor::AgentExecutor;
use super::EngineConfig;

/// Everything a driver needs besides the execution record it mutates.
pub struct DriverContext<'a> {
    pub config: &'a FlowConfiguration,
    pub graph: &'a FlowGraph,
    pub executor: Arc<dyn AgentExecutor>,
    pub evaluator: Arc<dyn ConditionEvaluator>,
    pub engine: &'a EngineConfig,
}

/// Interprets a validated configuration under one coordination discipline.
///
/// A driver records node results and failures on the execution as it goes;
/// an `Err` return is a fatal driver-level failure that fails the whole run.
#[async_trait]
pub trait FlowDriver: Send + Sync {
    async fn drive(
        &self,
        ctx: &DriverContext<'_>,
        execution: &mut FlowExecution,
    ) -> FlowResult<()>;
}

/// Discipline → driver mapping with a sequential fallback.
pub struct DriverRegistry {
    drivers: HashMap<FlowType, Arc<dyn FlowDriver>>,
    fallback: Arc<dyn FlowDriver>,
}

impl DriverRegistry {
    /// The standard mapping: dedicated drivers for sequential, parallel,
    /// and conditional; everything else resolves to sequential.
    pub fn standard() -> Self {
        let mut drivers: HashMap<FlowType, Arc<dyn FlowDriver>> = HashMap::new();
        drivers.insert(FlowType::Sequential, Arc::new(SequentialDriver));
        drivers.insert(FlowType::Parallel, Arc::new(ParallelDriver));
        drivers.insert(FlowType::Conditional, Arc::new(ConditionalDriver));
        DriverRegistry {
            drivers,
            fallback: Arc::new(SequentialDriver),
        }
    }

    pub fn register(&mut self, flow_type: FlowType, driver: Arc<dyn FlowDriver>) {
        self.drivers.insert(flow_type, driver);
    }

    pub fn get(&self, flow_type: FlowType) -> Arc<dyn FlowDriver> {
        self.drivers
            .get(&flow_type)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Execute one node against the work contract, with per-node timeout and
/// unconditional retries up to `retry_count`. Returns the output and the
/// elapsed milliseconds of the successful attempt.
async fn execute_with_retry(
    executor: &dyn AgentExecutor,
    node: &FlowNode,
    flow_data: &Map<String, Value>,
) -> Result<(Value, u64), NodeError> {
    let attempts = node.retry_count + 1;
    let mut last_error = None;

    for attempt in 0..attempts {
        let started = tokio::time::Instant::now();
        let work = executor.execute(node, flow_data);
        let result = match node.timeout_seconds {
            Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), work).await {
                Ok(inner) => inner,
                Err(_) => Err(NodeError::Timeout(secs)),
            },
            None => work.await,
        };
        match result {
            Ok(value) => return Ok((value, started.elapsed().as_millis() as u64)),
            Err(error) => {
                if attempt + 1 < attempts {
                    tracing::debug!(node_id = %node.id, attempt, %error, "retrying node");
                }
                last_error = Some(error);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| NodeError::ExecutionFailed("no attempt was made".to_string())))
}

/// Run one node and record the outcome. Non-agent nodes (boundaries,
/// control structure) complete trivially with a null result.
async fn run_node(
    ctx: &DriverContext<'_>,
    execution: &mut FlowExecution,
    node: &FlowNode,
) -> bool {
    execution.current_nodes.insert(node.id.clone());

    if !node.is_agent() {
        execution.record_success(&node.id, Value::Null, 0);
        return true;
    }
    if node.agent_id.is_none() {
        let error = NodeError::MissingAgent(node.id.clone());
        execution.record_failure(&node.id, &error);
        return false;
    }

    match execute_with_retry(ctx.executor.as_ref(), node, &execution.flow_data).await {
        Ok((value, elapsed_ms)) => {
            execution.record_success(&node.id, value, elapsed_ms);
            true
        }
        Err(error) => {
            tracing::warn!(node_id = %node.id, %error, "node execution failed");
            execution.record_failure(&node.id, &error);
            false
        }
    }
}

/// Walks the chain from the first start-typed node (or the first node),
/// following the first outgoing edge in declaration order after each node.
pub struct SequentialDriver;

#[async_trait]
impl FlowDriver for SequentialDriver {
    async fn drive(
        &self,
        ctx: &DriverContext<'_>,
        execution: &mut FlowExecution,
    ) -> FlowResult<()> {
        let Some(first) = ctx
            .config
            .nodes
            .iter()
            .find(|n| n.node_type == crate::domain::model::NodeType::Start)
            .or_else(|| ctx.config.nodes.first())
        else {
            return Ok(());
        };

        let mut current = first.id.clone();
        let mut steps: u32 = 0;
        loop {
            steps += 1;
            if steps > ctx.engine.max_steps {
                return Err(FlowError::MaxStepsExceeded(ctx.engine.max_steps));
            }

            let node = ctx
                .config
                .node(&current)
                .ok_or_else(|| FlowError::NodeNotFound(current.clone()))?;
            let succeeded = run_node(ctx, execution, node).await;
            if !succeeded
                && ctx.config.error_handling_strategy == ErrorHandlingStrategy::Halt
            {
                return Ok(());
            }

            let next = ctx
                .config
                .outgoing_edges(&current)
                .next()
                .map(|edge| edge.to_node.clone());
            match next {
                Some(next_id) => current = next_id,
                None => return Ok(()),
            }
        }
    }
}

/// Executes all dependency-free, non-start nodes concurrently, bounded by
/// `max_concurrent_nodes`, and waits for the whole batch to finish. The
/// batch observes the input flow data; results are applied serially at the
/// join point, so no two writers ever race on the data context.
pub struct ParallelDriver;

#[async_trait]
impl FlowDriver for ParallelDriver {
    async fn drive(
        &self,
        ctx: &DriverContext<'_>,
        execution: &mut FlowExecution,
    ) -> FlowResult<()> {
        let mut pending: VecDeque<String> =
            dependency_free_nodes(ctx.config, ctx.graph).into();
        let cap = ctx.config.max_concurrent_nodes.max(1);
        let snapshot = Arc::new(execution.flow_data.clone());

        type NodeOutcome = (String, Result<(Value, u64), NodeError>);
        let mut join_set: JoinSet<NodeOutcome> = JoinSet::new();
        let mut halted = false;

        let spawn_next = |join_set: &mut JoinSet<NodeOutcome>, pending: &mut VecDeque<String>| {
            let Some(node_id) = pending.pop_front() else {
                return;
            };
            let Some(node) = ctx.config.node(&node_id).cloned() else {
                return;
            };
            let executor = ctx.executor.clone();
            let data = snapshot.clone();
            join_set.spawn(async move {
                if !node.is_agent() {
                    return (node.id.clone(), Ok((Value::Null, 0)));
                }
                if node.agent_id.is_none() {
                    let id = node.id.clone();
                    return (id.clone(), Err(NodeError::MissingAgent(id)));
                }
                let outcome = execute_with_retry(executor.as_ref(), &node, &data).await;
                (node.id, outcome)
            });
        };

        for _ in 0..cap {
            spawn_next(&mut join_set, &mut pending);
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((node_id, Ok((value, elapsed_ms)))) => {
                    execution.record_success(&node_id, value, elapsed_ms);
                }
                Ok((node_id, Err(error))) => {
                    tracing::warn!(node_id = %node_id, %error, "node execution failed");
                    execution.record_failure(&node_id, &error);
                    if ctx.config.error_handling_strategy == ErrorHandlingStrategy::Halt {
                        halted = true;
                    }
                }
                Err(join_error) => {
                    execution.log_error(format!("node task aborted: {}", join_error));
                    if ctx.config.error_handling_strategy == ErrorHandlingStrategy::Halt {
                        halted = true;
                    }
                }
            }
            if !halted {
                spawn_next(&mut join_set, &mut pending);
            }
        }

        Ok(())
    }
}

/// Visits nodes in declaration order; nodes carrying conditions are skipped
/// when the predicate evaluator reports them unmet, nodes without
/// conditions always execute. Conditions see the flow data as mutated by
/// earlier nodes.
pub struct ConditionalDriver;

#[async_trait]
impl FlowDriver for ConditionalDriver {
    async fn drive(
        &self,
        ctx: &DriverContext<'_>,
        execution: &mut FlowExecution,
    ) -> FlowResult<()> {
        for node in &ctx.config.nodes {
            if !node.conditions.is_empty()
                && !ctx
                    .evaluator
                    .evaluate_all(&node.conditions, &execution.flow_data)
            {
                tracing::debug!(node_id = %node.id, "conditions unmet, skipping node");
                continue;
            }
            let succeeded = run_node(ctx, execution, node).await;
            if !succeeded
                && ctx.config.error_handling_strategy == ErrorHandlingStrategy::Halt
            {
                return Ok(());
            }
        }
        Ok(())
    }
}
