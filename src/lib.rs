//! # agentflow — Flow Configuration & Execution Engine
//!
//! `agentflow` models multi-step coordination work as a directed graph of
//! typed nodes and edges, validates that graph at increasing strictness,
//! estimates its cost, suggests optimizations, and drives its execution
//! under one of several coordination disciplines (sequential, parallel,
//! conditional, pipeline, scatter-gather, event-driven, hybrid).
//!
//! The unit of work performed at a node — an agent invocation — is an
//! external collaborator reached through the [`AgentExecutor`] contract;
//! this crate never assumes anything about its implementation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use agentflow::{FakeAgentExecutor, FlowRegistry, ValidationLevel};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = FlowRegistry::new(Arc::new(FakeAgentExecutor::new()));
//!     let agents = vec!["researcher".to_string(), "writer".to_string()];
//!     let config = registry
//!         .instantiate("sequential_basic", "ctx-1", &agents, None)
//!         .unwrap();
//!     let stored = registry.save_configuration(config);
//!
//!     let report = registry
//!         .validate(&stored.id, ValidationLevel::Comprehensive)
//!         .unwrap();
//!     assert!(report.is_valid);
//!
//!     let execution = registry
//!         .execute(&stored.id, serde_json::Map::new())
//!         .await
//!         .unwrap();
//!     println!("{:?}", execution.status);
//! }
//! ```

pub mod domain;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod evaluator;
pub mod graph;
pub mod optimizer;
pub mod registry;
pub mod template;
pub mod validation;

pub use crate::domain::execution::{
    ExecutionErrorEntry, ExecutionMetrics, FlowExecution, FlowStatus, NodeResult,
};
pub use crate::domain::model::{
    ComparisonOperator, ErrorHandlingStrategy, ExecutionMode, FlowConfiguration, FlowEdge,
    FlowNode, FlowType, NodeCondition, NodePosition, NodeType,
};
pub use crate::engine::{
    AgentExecutor, DriverRegistry, EngineConfig, FakeAgentExecutor, FlowDriver, FlowEngine,
};
pub use crate::error::{FlowError, FlowResult, NodeError};
pub use crate::estimator::{EstimatorConfig, PerformanceEstimate, ResourceRequirements};
pub use crate::evaluator::{ConditionEvaluator, DefaultConditionEvaluator};
pub use crate::optimizer::{
    ImplementationEffort, OptimizationSuggestion, SuggestionPriority, SuggestionType,
};
pub use crate::registry::{DashboardSnapshot, FlowRegistry};
pub use crate::template::{
    ComplexityLevel, Customization, FlowTemplate, TemplateCatalog, TemplateEdge, TemplateNode,
};
pub use crate::validation::{FlowValidationResult, FlowValidator, ValidationLevel};
