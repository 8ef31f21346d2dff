//! Error types, split by layer.
//!
//! [`FlowError`] covers configuration-level failures that are raised
//! synchronously to the caller (unknown template, agent count out of range,
//! missing records). [`NodeError`] covers per-node execution failures, which
//! are recorded on the execution rather than raised.

mod flow_error;
mod node_error;

pub use flow_error::FlowError;
pub use node_error::NodeError;

/// Result alias for flow-level operations.
pub type FlowResult<T> = Result<T, FlowError>;
