use polars::df;
use polars::prelude::*;
use tradetune::config::{BacktestConfig, OptimizerConfig};
use tradetune::engines::evaluation::{EwmaCrossoverEvaluator, FitnessEvaluator};
use tradetune::engines::generation::{EvolutionEngine, NoopProgress, RangeTable};
use tradetune::engines::metrics::ObjectivePolicy;

/// Trending market with a slow cycle on top.
fn cyclical_market() -> DataFrame {
    let close: Vec<f64> = (0..400)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.1 * t + 8.0 * (t / 15.0).sin() + 2.0 * (t / 3.0).cos()
        })
        .collect();
    df! { "close" => close }.unwrap()
}

fn optimizer_config(objective: ObjectivePolicy) -> OptimizerConfig {
    OptimizerConfig {
        population_size: 12,
        parameters_count: 2,
        range_table: RangeTable::from(vec![(2, 15), (16, 60)]),
        elitist_percentage: 20,
        stochastic_percentage: 30,
        mutation_rate: 0.1,
        objective_policy: objective,
        max_generations: 4,
        commission: 0.001,
        seed: Some(7),
        parallel_evaluation: true,
    }
}

#[test]
fn test_optimizes_ewma_spans_for_each_objective() {
    let market = cyclical_market();

    for objective in [
        ObjectivePolicy::NetProfit,
        ObjectivePolicy::SharpeRatio,
        ObjectivePolicy::DrawdownInverse,
    ] {
        let config = optimizer_config(objective);
        let evaluator = EwmaCrossoverEvaluator::new(BacktestConfig::default());
        let mut engine = EvolutionEngine::new(config.clone(), evaluator).unwrap();

        let outcome = engine.run(&market, NoopProgress).unwrap();

        assert_eq!(outcome.generations.len(), 5);
        assert!(config.range_table.admits(&outcome.best_individual));
        assert!(outcome.best_fitness.is_finite());

        // The reported fitness is reproducible from the returned mapping.
        let rescored = engine
            .evaluator()
            .evaluate(&market, &outcome.parameters, config.commission, objective)
            .unwrap();
        assert_eq!(rescored, outcome.best_fitness, "objective {}", objective);
    }
}

#[test]
fn test_drawdown_inverse_bounded_by_100() {
    let market = cyclical_market();
    let evaluator = EwmaCrossoverEvaluator::new(BacktestConfig::default());
    let mut engine =
        EvolutionEngine::new(optimizer_config(ObjectivePolicy::DrawdownInverse), evaluator).unwrap();

    let outcome = engine.run(&market, NoopProgress).unwrap();
    assert!(outcome.best_fitness <= 100.0);
    assert!(outcome.best_fitness > 0.0);
}
