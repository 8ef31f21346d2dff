//! Structured predicates attached to nodes and edges.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single predicate evaluated against the flow-wide data context.
///
/// `field` names a top-level key in the flow data; nested access uses
/// dot-separated segments (`"research.score"`).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NodeCondition {
    pub field: String,
    pub comparison_operator: ComparisonOperator,
    #[serde(default)]
    pub value: Value,
}

impl NodeCondition {
    pub fn new(field: impl Into<String>, operator: ComparisonOperator, value: Value) -> Self {
        NodeCondition {
            field: field.into(),
            comparison_operator: operator,
            value,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    // String
    Is,
    IsNot,
    Contains,
    NotContains,
    Empty,
    NotEmpty,
    // Membership
    In,
    NotIn,
    // Numeric
    #[serde(alias = "=")]
    Equal,
    #[serde(alias = "!=")]
    NotEqual,
    #[serde(alias = ">")]
    GreaterThan,
    #[serde(alias = "<")]
    LessThan,
    #[serde(alias = ">=")]
    GreaterOrEqual,
    #[serde(alias = "<=")]
    LessOrEqual,
}
