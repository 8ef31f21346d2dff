//! Cost estimation: complexity scoring, performance estimates, and
//! resource-requirement figures derived from graph shape and discipline.

use serde::{Deserialize, Serialize};

use crate::domain::model::{FlowConfiguration, FlowType};

/// Assumed per-node processing time, in abstract time units.
const NODE_PROCESSING_TIME: f64 = 2.0;
/// Assumed per-edge network overhead, in abstract time units.
const EDGE_OVERHEAD: f64 = 0.1;

const NODE_SCORE_CAP: f64 = 30.0;
const EDGE_SCORE_CAP: f64 = 20.0;
const DEPENDENCY_SCORE_CAP: f64 = 15.0;
const CONDITION_SCORE_CAP: f64 = 10.0;

/// Tunables for the estimator.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Floor applied to the resource-efficiency figure.
    pub min_resource_efficiency: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        EstimatorConfig {
            min_resource_efficiency: 10.0,
        }
    }
}

/// Expected runtime characteristics of a configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct PerformanceEstimate {
    pub estimated_duration: f64,
    pub estimated_throughput: f64,
    pub resource_efficiency: f64,
    pub scalability_factor: f64,
}

/// Estimated resource footprint of a configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ResourceRequirements {
    pub memory_mb: f64,
    pub cpu_cores: f64,
    pub storage_mb: f64,
    pub network_mbps: f64,
}

/// Fixed per-discipline complexity weight.
pub fn flow_type_weight(flow_type: FlowType) -> f64 {
    match flow_type {
        FlowType::Sequential => 5.0,
        FlowType::Pipeline => 10.0,
        FlowType::RoundRobin => 12.0,
        FlowType::Conditional => 15.0,
        FlowType::Parallel => 20.0,
        FlowType::PriorityQueue => 22.0,
        FlowType::ScatterGather => 25.0,
        FlowType::EventDriven => 30.0,
        FlowType::Hybrid => 40.0,
    }
}

/// Bounded heuristic complexity summary in `[0, 100]`: capped contributions
/// from node count, edge count, discipline weight, dependency count, and
/// condition count.
pub fn complexity_score(config: &FlowConfiguration) -> f64 {
    let node_score = (config.nodes.len() as f64 * 5.0).min(NODE_SCORE_CAP);
    let edge_score = (config.edges.len() as f64 * 3.0).min(EDGE_SCORE_CAP);
    let dependency_count: usize = config.nodes.iter().map(|n| n.dependencies.len()).sum();
    let dependency_score = (dependency_count as f64 * 2.0).min(DEPENDENCY_SCORE_CAP);
    let condition_count: usize = config.nodes.iter().map(|n| n.conditions.len()).sum();
    let condition_score = (condition_count as f64 * 3.0).min(CONDITION_SCORE_CAP);

    (node_score + edge_score + flow_type_weight(config.flow_type) + dependency_score
        + condition_score)
        .min(100.0)
}

/// Derive duration/throughput/efficiency figures from graph shape and
/// discipline. Disciplines without a dedicated formula use the blended one.
pub fn estimate_performance(
    config: &FlowConfiguration,
    complexity: f64,
    estimator: &EstimatorConfig,
) -> PerformanceEstimate {
    let nodes = config.nodes.len() as f64;
    let edges = config.edges.len() as f64;
    let concurrency = config.max_concurrent_nodes as f64;

    let (duration, throughput) = match config.flow_type {
        FlowType::Sequential => {
            let duration = nodes * NODE_PROCESSING_TIME;
            let throughput = if duration > 0.0 { 1.0 / duration } else { 0.0 };
            (duration, throughput)
        }
        FlowType::Parallel => {
            let duration = NODE_PROCESSING_TIME + edges * EDGE_OVERHEAD;
            (duration, concurrency / duration)
        }
        _ => {
            let duration = 0.7 * nodes * NODE_PROCESSING_TIME + edges * EDGE_OVERHEAD;
            let throughput = if duration > 0.0 {
                0.8 * concurrency / duration
            } else {
                0.0
            };
            (duration, throughput)
        }
    };

    PerformanceEstimate {
        estimated_duration: duration,
        estimated_throughput: throughput,
        resource_efficiency: (100.0 - 0.3 * complexity).max(estimator.min_resource_efficiency),
        scalability_factor: (concurrency / 2.0).min(5.0),
    }
}

/// Per-configuration resource footprint used by strict-level validation.
pub fn resource_requirements(config: &FlowConfiguration) -> ResourceRequirements {
    ResourceRequirements {
        memory_mb: config.nodes.len() as f64 * 100.0,
        cpu_cores: config.max_concurrent_nodes as f64 * 0.5,
        storage_mb: if config.data_persistence { 50.0 } else { 10.0 },
        network_mbps: config.max_concurrent_nodes as f64 * 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ComparisonOperator, FlowEdge, FlowNode, NodeCondition, NodeType};
    use serde_json::json;

    fn config(flow_type: FlowType, nodes: usize, edges: usize) -> FlowConfiguration {
        let mut c = FlowConfiguration::new("est", flow_type, "ctx");
        for i in 0..nodes {
            c.nodes.push(FlowNode::new(format!("n{}", i), NodeType::Agent));
        }
        for i in 0..edges {
            c.edges.push(FlowEdge::new(
                format!("n{}", i % nodes.max(1)),
                format!("n{}", (i + 1) % nodes.max(1)),
            ));
        }
        c
    }

    #[test]
    fn test_complexity_bounds() {
        for flow_type in [
            FlowType::Sequential,
            FlowType::Parallel,
            FlowType::Conditional,
            FlowType::Pipeline,
            FlowType::ScatterGather,
            FlowType::RoundRobin,
            FlowType::PriorityQueue,
            FlowType::EventDriven,
            FlowType::Hybrid,
        ] {
            for (n, e) in [(0, 0), (1, 0), (5, 4), (50, 100), (1000, 1000)] {
                let score = complexity_score(&config(flow_type, n, e));
                assert!((0.0..=100.0).contains(&score), "{:?} n={} e={}", flow_type, n, e);
            }
        }
    }

    #[test]
    fn test_complexity_contributions_capped() {
        // 1000 nodes still contribute only the 30-point cap.
        let score = complexity_score(&config(FlowType::Sequential, 1000, 0));
        assert_eq!(score, 30.0 + 5.0);
    }

    #[test]
    fn test_complexity_counts_dependencies_and_conditions() {
        let mut c = config(FlowType::Sequential, 2, 0);
        c.nodes[1].dependencies.push("n0".into());
        c.nodes[1].conditions.push(NodeCondition::new(
            "x",
            ComparisonOperator::Equal,
            json!(1),
        ));
        // nodes 10 + type 5 + deps 2 + conditions 3
        assert_eq!(complexity_score(&c), 20.0);
    }

    #[test]
    fn test_sequential_performance() {
        let c = config(FlowType::Sequential, 4, 3);
        let est = estimate_performance(&c, complexity_score(&c), &EstimatorConfig::default());
        assert_eq!(est.estimated_duration, 8.0);
        assert!((est.estimated_throughput - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_performance_scales_with_concurrency() {
        let mut c = config(FlowType::Parallel, 6, 0);
        c.max_concurrent_nodes = 3;
        let est = estimate_performance(&c, 0.0, &EstimatorConfig::default());
        assert_eq!(est.estimated_duration, 2.0);
        assert_eq!(est.estimated_throughput, 1.5);
        assert_eq!(est.scalability_factor, 1.5);
    }

    #[test]
    fn test_scalability_capped_at_five() {
        let mut c = config(FlowType::Hybrid, 2, 0);
        c.max_concurrent_nodes = 100;
        let est = estimate_performance(&c, 0.0, &EstimatorConfig::default());
        assert_eq!(est.scalability_factor, 5.0);
    }

    #[test]
    fn test_resource_efficiency_floor() {
        let c = config(FlowType::Hybrid, 50, 100);
        let est = estimate_performance(&c, 100.0, &EstimatorConfig::default());
        assert_eq!(est.resource_efficiency, 70.0);
        let floored = estimate_performance(
            &c,
            100.0,
            &EstimatorConfig {
                min_resource_efficiency: 80.0,
            },
        );
        assert_eq!(floored.resource_efficiency, 80.0);
    }

    #[test]
    fn test_resource_requirements() {
        let mut c = config(FlowType::Parallel, 3, 0);
        c.max_concurrent_nodes = 8;
        let req = resource_requirements(&c);
        assert_eq!(req.memory_mb, 300.0);
        assert_eq!(req.cpu_cores, 4.0);
        assert_eq!(req.storage_mb, 10.0);
        assert_eq!(req.network_mbps, 80.0);

        c.data_persistence = true;
        assert_eq!(resource_requirements(&c).storage_mb, 50.0);
    }
}
