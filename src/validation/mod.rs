//! Layered configuration validation with a short-TTL result cache.
//!
//! [`FlowValidator::validate`] inspects a configuration at increasing
//! strictness ([`ValidationLevel`]) and produces a [`FlowValidationResult`]
//! of blocking issues, non-blocking warnings/suggestions, a complexity
//! score, and performance/resource estimates. Results are cached for five
//! minutes keyed by (configuration id, level); saving a configuration again
//! must go through [`FlowValidator::invalidate`].

mod compliance;
mod flow_logic;
mod performance;
mod structure;
mod types;

pub use types::{FlowValidationResult, ValidationLevel};

use std::time::{Duration, Instant};

use chrono::Utc;
use dashmap::DashMap;

use crate::domain::model::FlowConfiguration;
use crate::estimator::{self, EstimatorConfig};

const CACHE_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    result: FlowValidationResult,
    created_at: Instant,
}

/// Validator with a process-scoped result cache. Cheap to share behind an
/// `Arc`; cache slots are replaced atomically and never locked per entry.
pub struct FlowValidator {
    cache: DashMap<(String, ValidationLevel), CacheEntry>,
    ttl: Duration,
    estimator: EstimatorConfig,
}

impl FlowValidator {
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        FlowValidator {
            cache: DashMap::new(),
            ttl,
            estimator: EstimatorConfig::default(),
        }
    }

    /// Validate `config` at `level`, returning a cached result when one is
    /// still fresh. Repeated calls within the TTL return identical lists.
    pub fn validate(
        &self,
        config: &FlowConfiguration,
        level: ValidationLevel,
    ) -> FlowValidationResult {
        let key = (config.id.clone(), level);
        if let Some(entry) = self.cache.get(&key) {
            if entry.created_at.elapsed() < self.ttl {
                return entry.result.clone();
            }
        }

        let result = self.run(config, level);
        self.cache.insert(
            key,
            CacheEntry {
                result: result.clone(),
                created_at: Instant::now(),
            },
        );
        result
    }

    /// Drop every cached level for a configuration id. Called whenever a
    /// configuration is (re)saved.
    pub fn invalidate(&self, configuration_id: &str) {
        self.cache.retain(|(id, _), _| id != configuration_id);
    }

    fn run(&self, config: &FlowConfiguration, level: ValidationLevel) -> FlowValidationResult {
        let mut findings = types::Findings::default();

        structure::validate(config, &mut findings);

        // Flow-logic and performance checks assume a structurally sound
        // node set; an empty configuration already failed above.
        let structurally_sound = !config.nodes.is_empty();

        let resources = estimator::resource_requirements(config);

        if structurally_sound && level != ValidationLevel::Basic {
            flow_logic::validate(config, &mut findings);
            performance::validate(config, &mut findings);
        }
        if structurally_sound && level == ValidationLevel::Strict {
            compliance::validate(config, &resources, &mut findings);
        }

        let complexity = estimator::complexity_score(config);
        let performance_estimate =
            estimator::estimate_performance(config, complexity, &self.estimator);

        tracing::debug!(
            configuration_id = %config.id,
            ?level,
            issues = findings.issues.len(),
            warnings = findings.warnings.len(),
            "validated configuration"
        );

        FlowValidationResult {
            is_valid: findings.issues.is_empty(),
            issues: findings.issues,
            warnings: findings.warnings,
            suggestions: findings.suggestions,
            complexity_score: complexity,
            performance: performance_estimate,
            resources,
            validated_at: Utc::now(),
        }
    }
}

impl Default for FlowValidator {
    fn default() -> Self {
        Self::new()
    }
}
