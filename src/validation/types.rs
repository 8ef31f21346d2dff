//! Validation result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::estimator::{PerformanceEstimate, ResourceRequirements};

/// Strictness of a validation pass. Each level includes everything below it.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ValidationLevel {
    /// Structural checks only.
    Basic,
    /// Structure plus flow logic and performance characteristics.
    Comprehensive,
    /// Comprehensive plus security compliance and resource requirements.
    Strict,
}

/// Outcome of validating one configuration at one strictness level.
///
/// Issues block (`is_valid` is true iff the issue list is empty); warnings
/// and suggestions never do. The complexity score and performance estimate
/// are attached at every level.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FlowValidationResult {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    /// Heuristic score in `[0, 100]`.
    pub complexity_score: f64,
    pub performance: PerformanceEstimate,
    pub resources: ResourceRequirements,
    pub validated_at: DateTime<Utc>,
}

/// Internal accumulator threaded through the validation layers.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Findings {
    pub fn issue(&mut self, message: impl Into<String>) {
        self.issues.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn suggestion(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }
}
