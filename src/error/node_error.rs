//! Node-level error types.

use thiserror::Error;

/// Errors produced by a single node execution. These are recorded in the
/// execution's failed set and error log; whether they halt the run is
/// decided by the configuration's error-handling strategy, not here.
#[derive(Debug, Clone, Error)]
pub enum NodeError {
    #[error("Node execution timed out after {0}s")]
    Timeout(u64),
    #[error("Agent execution failed: {0}")]
    ExecutionFailed(String),
    #[error("No agent bound to node: {0}")]
    MissingAgent(String),
}
