//! Flow-level error types.

use thiserror::Error;

/// Errors raised synchronously by configuration, template, and registry
/// operations. Validation findings are never raised as errors; they are
/// collected on the validation result instead.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
    #[error("Agent count out of range for template '{template_id}': expected {min}..={max}, got {actual}")]
    AgentCountOutOfRange {
        template_id: String,
        min: usize,
        max: usize,
        actual: usize,
    },
    #[error("Configuration not found: {0}")]
    ConfigurationNotFound(String),
    #[error("Execution not found: {0}")]
    ExecutionNotFound(String),
    #[error("Node not found: {0}")]
    NodeNotFound(String),
    #[error("Graph build error: {0}")]
    GraphBuildError(String),
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    #[error("Max steps exceeded: {0}")]
    MaxStepsExceeded(u32),
    #[error("Internal error: {0}")]
    InternalError(String),
}
