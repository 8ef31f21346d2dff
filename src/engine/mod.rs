//! The execution engine: interprets a validated configuration under its
//! declared discipline and produces an execution record.
//!
//! Fatal failures (global timeout, driver-level errors) never surface as
//! `Err` from [`FlowEngine::execute`]; they are recorded on the returned
//! [`FlowExecution`] as a terminal `failed` status plus an error-log entry,
//! so callers always get the full record of what happened.

mod driver;
mod executor;

pub use driver::{
    ConditionalDriver, DriverContext, DriverRegistry, FlowDriver, ParallelDriver,
    SequentialDriver,
};
pub use executor::{AgentExecutor, FakeAgentExecutor};

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::domain::execution::{FlowExecution, FlowStatus};
use crate::domain::model::{ErrorHandlingStrategy, FlowConfiguration};
use crate::evaluator::{ConditionEvaluator, DefaultConditionEvaluator};
use crate::graph::build_graph;

/// Engine-level limits independent of any one configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on sequential-walk steps, guarding malformed graphs.
    pub max_steps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { max_steps: 500 }
    }
}

/// Drives flow executions through the external work contract.
///
/// The engine exclusively owns the [`FlowExecution`] records it creates and
/// never mutates the configurations it executes.
pub struct FlowEngine {
    executor: Arc<dyn AgentExecutor>,
    evaluator: Arc<dyn ConditionEvaluator>,
    drivers: DriverRegistry,
    config: EngineConfig,
}

impl FlowEngine {
    pub fn new(executor: Arc<dyn AgentExecutor>) -> Self {
        FlowEngine {
            executor,
            evaluator: Arc::new(DefaultConditionEvaluator),
            drivers: DriverRegistry::standard(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn ConditionEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace or extend the discipline → driver mapping.
    pub fn register_driver(
        &mut self,
        flow_type: crate::domain::model::FlowType,
        driver: Arc<dyn FlowDriver>,
    ) {
        self.drivers.register(flow_type, driver);
    }

    /// Execute `configuration` with `input` as the initial flow data.
    ///
    /// Always returns the execution record in a terminal state.
    pub async fn execute(
        &self,
        configuration: &FlowConfiguration,
        input: Map<String, Value>,
    ) -> FlowExecution {
        let mut execution =
            FlowExecution::start(&configuration.id, &configuration.context_id, input);
        let total_nodes = configuration.nodes.len();

        let graph = match build_graph(configuration) {
            Ok(graph) => graph,
            Err(error) => {
                execution.log_error(error.to_string());
                execution.finalize(FlowStatus::Failed, total_nodes);
                return execution;
            }
        };

        let driver = self.drivers.get(configuration.flow_type);
        let ctx = DriverContext {
            config: configuration,
            graph: &graph,
            executor: self.executor.clone(),
            evaluator: self.evaluator.clone(),
            engine: &self.config,
        };

        tracing::debug!(
            configuration_id = %configuration.id,
            flow_type = configuration.flow_type.as_str(),
            "starting flow execution"
        );

        let global = Duration::from_secs(configuration.global_timeout_seconds);
        let outcome = tokio::time::timeout(global, driver.drive(&ctx, &mut execution)).await;

        match outcome {
            Ok(Ok(())) => {
                let halted_on_failure = configuration.error_handling_strategy
                    == ErrorHandlingStrategy::Halt
                    && !execution.failed_nodes.is_empty();
                let status = if halted_on_failure {
                    FlowStatus::Failed
                } else {
                    FlowStatus::Completed
                };
                execution.finalize(status, total_nodes);
            }
            Ok(Err(error)) => {
                execution.log_error(error.to_string());
                execution.finalize(FlowStatus::Failed, total_nodes);
            }
            Err(_) => {
                execution.log_error(format!(
                    "Global timeout exceeded after {}s",
                    configuration.global_timeout_seconds
                ));
                execution.finalize(FlowStatus::Failed, total_nodes);
            }
        }

        tracing::debug!(
            execution_id = %execution.id,
            status = execution.status.as_str(),
            completed = execution.completed_nodes.len(),
            failed = execution.failed_nodes.len(),
            "flow execution finished"
        );

        execution
    }
}
