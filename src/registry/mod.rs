//! The owned, process-scoped repository of configurations and executions.
//!
//! [`FlowRegistry`] is constructed once per process/service instance with
//! the external work contract; construction loads the fixed template
//! catalog, and teardown is a no-op (no external resources held). It wires
//! together the catalog, validator, optimizer, and engine behind the
//! `instantiate` / `validate` / `suggest` / `execute` surface plus the
//! read-only dashboard snapshot.

mod dashboard;

pub use dashboard::{
    ConfigurationSummary, DashboardOverview, DashboardSnapshot, ExecutionSummary,
    TemplateSummary,
};

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::domain::execution::{FlowExecution, FlowStatus};
use crate::domain::model::FlowConfiguration;
use crate::engine::{AgentExecutor, FlowEngine};
use crate::error::{FlowError, FlowResult};
use crate::optimizer::{self, OptimizationSuggestion};
use crate::template::{Customization, TemplateCatalog};
use crate::validation::{FlowValidationResult, FlowValidator, ValidationLevel};

const RECENT_EXECUTIONS: usize = 10;

pub struct FlowRegistry {
    templates: TemplateCatalog,
    configurations: RwLock<HashMap<String, Arc<FlowConfiguration>>>,
    executions: RwLock<HashMap<String, Arc<FlowExecution>>>,
    validator: FlowValidator,
    engine: FlowEngine,
}

impl FlowRegistry {
    pub fn new(executor: Arc<dyn AgentExecutor>) -> Self {
        FlowRegistry {
            templates: TemplateCatalog::builtin(),
            configurations: RwLock::new(HashMap::new()),
            executions: RwLock::new(HashMap::new()),
            validator: FlowValidator::new(),
            engine: FlowEngine::new(executor),
        }
    }

    pub fn templates(&self) -> &TemplateCatalog {
        &self.templates
    }

    /// Instantiate a template into a new, unsaved configuration.
    /// Persisting it is the caller's responsibility via
    /// [`save_configuration`](Self::save_configuration).
    pub fn instantiate(
        &self,
        template_id: &str,
        context_id: &str,
        agent_ids: &[String],
        customization: Option<&Customization>,
    ) -> FlowResult<FlowConfiguration> {
        self.templates
            .instantiate(template_id, context_id, agent_ids, customization)
    }

    /// Store (or replace) a configuration, dropping any cached validation
    /// results for its id.
    pub fn save_configuration(&self, mut config: FlowConfiguration) -> Arc<FlowConfiguration> {
        config.touch();
        self.validator.invalidate(&config.id);
        let stored = Arc::new(config);
        self.configurations
            .write()
            .insert(stored.id.clone(), stored.clone());
        stored
    }

    pub fn configuration(&self, configuration_id: &str) -> FlowResult<Arc<FlowConfiguration>> {
        self.configurations
            .read()
            .get(configuration_id)
            .cloned()
            .ok_or_else(|| FlowError::ConfigurationNotFound(configuration_id.to_string()))
    }

    pub fn validate(
        &self,
        configuration_id: &str,
        level: ValidationLevel,
    ) -> FlowResult<FlowValidationResult> {
        let config = self.configuration(configuration_id)?;
        Ok(self.validator.validate(&config, level))
    }

    pub fn suggest(&self, configuration_id: &str) -> FlowResult<Vec<OptimizationSuggestion>> {
        let config = self.configuration(configuration_id)?;
        let validation = self.validator.validate(&config, ValidationLevel::Comprehensive);
        Ok(optimizer::suggest(&config, &validation))
    }

    /// Execute a stored configuration and keep the resulting record.
    pub async fn execute(
        &self,
        configuration_id: &str,
        input: Map<String, Value>,
    ) -> FlowResult<Arc<FlowExecution>> {
        let config = self.configuration(configuration_id)?;
        let execution = Arc::new(self.engine.execute(&config, input).await);
        self.executions
            .write()
            .insert(execution.id.clone(), execution.clone());
        Ok(execution)
    }

    pub fn execution(&self, execution_id: &str) -> FlowResult<Arc<FlowExecution>> {
        self.executions
            .read()
            .get(execution_id)
            .cloned()
            .ok_or_else(|| FlowError::ExecutionNotFound(execution_id.to_string()))
    }

    /// Read-only aggregation over stored state, optionally filtered to one
    /// coordination context.
    pub fn dashboard_snapshot(&self, context_id: Option<&str>) -> DashboardSnapshot {
        let configurations = self.configurations.read();
        let executions = self.executions.read();

        let configs: Vec<&Arc<FlowConfiguration>> = configurations
            .values()
            .filter(|c| context_id.map_or(true, |ctx| c.context_id == ctx))
            .collect();
        let execs: Vec<&Arc<FlowExecution>> = executions
            .values()
            .filter(|e| context_id.map_or(true, |ctx| e.context_id == ctx))
            .collect();

        let mut flow_type_distribution: HashMap<String, usize> = HashMap::new();
        for config in &configs {
            *flow_type_distribution
                .entry(config.flow_type.as_str().to_string())
                .or_default() += 1;
        }

        let mut recent: Vec<ExecutionSummary> = execs
            .iter()
            .map(|e| ExecutionSummary {
                id: e.id.clone(),
                configuration_id: e.configuration_id.clone(),
                status: e.status,
                started_at: e.started_at,
                ended_at: e.ended_at,
                completed_nodes: e.completed_nodes.len(),
                failed_nodes: e.failed_nodes.len(),
            })
            .collect();
        recent.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        recent.truncate(RECENT_EXECUTIONS);

        let mut configuration_summaries: Vec<ConfigurationSummary> = configs
            .iter()
            .map(|c| ConfigurationSummary {
                id: c.id.clone(),
                name: c.name.clone(),
                flow_type: c.flow_type,
                node_count: c.nodes.len(),
                edge_count: c.edges.len(),
                updated_at: c.updated_at,
            })
            .collect();
        configuration_summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        DashboardSnapshot {
            overview: DashboardOverview {
                total_configurations: configs.len(),
                total_executions: execs.len(),
                active_executions: execs
                    .iter()
                    .filter(|e| e.status == FlowStatus::Active)
                    .count(),
                completed_executions: execs
                    .iter()
                    .filter(|e| e.status == FlowStatus::Completed)
                    .count(),
                failed_executions: execs
                    .iter()
                    .filter(|e| e.status == FlowStatus::Failed)
                    .count(),
            },
            flow_type_distribution,
            recent_executions: recent,
            configurations: configuration_summaries,
            templates: self
                .templates
                .all()
                .iter()
                .map(|t| TemplateSummary {
                    id: t.id.clone(),
                    name: t.name.clone(),
                    flow_type: t.flow_type,
                    min_agents: t.min_agents,
                    max_agents: t.max_agents,
                    complexity: t.complexity,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FakeAgentExecutor;

    fn registry() -> FlowRegistry {
        FlowRegistry::new(Arc::new(FakeAgentExecutor::new()))
    }

    fn agent_ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("agent-{}", i)).collect()
    }

    #[test]
    fn test_instantiate_does_not_store() {
        let registry = registry();
        let config = registry
            .instantiate("sequential_basic", "ctx", &agent_ids(2), None)
            .unwrap();
        assert!(registry.configuration(&config.id).is_err());
    }

    #[test]
    fn test_save_and_lookup() {
        let registry = registry();
        let config = registry
            .instantiate("sequential_basic", "ctx", &agent_ids(2), None)
            .unwrap();
        let stored = registry.save_configuration(config);
        assert!(registry.configuration(&stored.id).is_ok());
    }

    #[test]
    fn test_validate_missing_configuration() {
        let registry = registry();
        let err = registry
            .validate("missing", ValidationLevel::Basic)
            .unwrap_err();
        assert!(matches!(err, FlowError::ConfigurationNotFound(_)));
    }

    #[tokio::test]
    async fn test_execute_stores_record() {
        let registry = registry();
        let config = registry
            .instantiate("sequential_basic", "ctx", &agent_ids(2), None)
            .unwrap();
        let stored = registry.save_configuration(config);
        let execution = registry.execute(&stored.id, Map::new()).await.unwrap();
        assert_eq!(execution.status, FlowStatus::Completed);
        assert!(registry.execution(&execution.id).is_ok());
    }

    #[tokio::test]
    async fn test_dashboard_counts_and_context_filter() {
        let registry = registry();
        for ctx in ["ctx-a", "ctx-a", "ctx-b"] {
            let config = registry
                .instantiate("sequential_basic", ctx, &agent_ids(2), None)
                .unwrap();
            let stored = registry.save_configuration(config);
            registry.execute(&stored.id, Map::new()).await.unwrap();
        }

        let all = registry.dashboard_snapshot(None);
        assert_eq!(all.overview.total_configurations, 3);
        assert_eq!(all.overview.total_executions, 3);
        assert_eq!(all.overview.completed_executions, 3);
        assert_eq!(all.flow_type_distribution.get("sequential"), Some(&3));
        assert_eq!(all.templates.len(), 6);

        let filtered = registry.dashboard_snapshot(Some("ctx-a"));
        assert_eq!(filtered.overview.total_configurations, 2);
        assert_eq!(filtered.overview.total_executions, 2);
    }

    #[test]
    fn test_suggest_round_trip() {
        let registry = registry();
        let mut config = registry
            .instantiate("parallel_fanout", "ctx", &agent_ids(3), None)
            .unwrap();
        config.monitoring_enabled = false;
        let stored = registry.save_configuration(config);
        let suggestions = registry.suggest(&stored.id).unwrap();
        assert!(!suggestions.is_empty());
    }
}
