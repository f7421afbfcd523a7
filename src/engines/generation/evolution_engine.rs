use crate::config::{ConfigSection, OptimizerConfig};
use crate::engines::evaluation::{FitnessEvaluator, FitnessRecord};
use crate::engines::generation::{
    best_tracker::BestTracker,
    genome::{to_parameter_map, Individual, ParameterMap},
    operators::{initialize_population, mutate_population},
    selection::{mean_fitness, select_next_generation},
};
use crate::error::{Result, TradetuneError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

/// Summary of one evaluated generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub best_individual: Individual,
    pub best_fitness: f64,
    pub global_best_fitness: f64,
    pub mean_fitness: Option<f64>,
    pub failed_evaluations: usize,
    pub population_size: usize,
    /// Individuals mutated while building the next generation.
    pub mutations: usize,
}

/// Result of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationOutcome {
    /// Winning genes as `param0 … param{n-1}`.
    pub parameters: ParameterMap,
    pub best_individual: Individual,
    pub best_fitness: f64,
    pub generations: Vec<GenerationReport>,
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_individual_evaluated(&mut self, index: usize, total: usize);
    fn on_generation_complete(&mut self, report: &GenerationReport);

    /// Polled before each generation; returning true abandons the run.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Generational loop: evaluate, select, recombine, mutate, track the best.
///
/// Runs generations `0..=max_generations` with no early exit. The global best
/// is the return value; intermediate populations are discarded.
pub struct EvolutionEngine<E: FitnessEvaluator> {
    config: OptimizerConfig,
    evaluator: E,
    rng: StdRng,
}

impl<E: FitnessEvaluator> EvolutionEngine<E> {
    /// Validates `config`; every configuration problem surfaces here rather
    /// than inside a generation.
    pub fn new(config: OptimizerConfig, evaluator: E) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            evaluator,
            rng,
        })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(
        &mut self,
        market: &E::Market,
        mut callback: C,
    ) -> Result<OptimizationOutcome> {
        let mut population =
            initialize_population(self.config.population_size, &self.config.range_table, &mut self.rng)?;
        let mut tracker = BestTracker::new();
        let mut reports = Vec::new();

        for generation in 0..=self.config.max_generations {
            if callback.is_cancelled() {
                log::info!("Optimization cancelled before generation {}", generation);
                return Err(TradetuneError::Cancelled { generation });
            }
            callback.on_generation_start(generation);

            let records = self.evaluate_population(&population, market, &mut callback);

            let mut next_population =
                select_next_generation(&records, &self.config, &mut self.rng)?.into_population();
            let mutations = mutate_population(
                &mut next_population,
                self.config.mutation_rate,
                &self.config.range_table,
                &mut self.rng,
            );

            tracker.track(&records);
            let report = self.report(generation, &records, &tracker, mutations);
            log::info!(
                "Generation {}: best {:.4} {:?}, global best {:.4}, {} failed",
                generation,
                report.best_fitness,
                report.best_individual,
                report.global_best_fitness,
                report.failed_evaluations
            );
            callback.on_generation_complete(&report);
            reports.push(report);

            population = next_population;
        }

        let champion = tracker
            .into_global_best()
            .filter(|c| c.fitness.is_finite())
            .ok_or_else(|| {
                TradetuneError::Evaluation("Every individual failed evaluation".to_string())
            })?;

        Ok(OptimizationOutcome {
            parameters: to_parameter_map(&champion.individual),
            best_individual: champion.individual,
            best_fitness: champion.fitness,
            generations: reports,
        })
    }

    /// Score every individual, keeping population order in the result.
    ///
    /// A failed evaluation is logged and recorded with the failure sentinel
    /// instead of aborting the run.
    pub fn evaluate_population<C: ProgressCallback>(
        &self,
        population: &[Individual],
        market: &E::Market,
        callback: &mut C,
    ) -> Vec<FitnessRecord> {
        let total = population.len();

        if self.config.parallel_evaluation {
            let records: Vec<FitnessRecord> = population
                .par_iter()
                .map(|individual| self.evaluate_individual(individual, market))
                .collect();
            for index in 1..=total {
                callback.on_individual_evaluated(index, total);
            }
            records
        } else {
            population
                .iter()
                .enumerate()
                .map(|(i, individual)| {
                    let record = self.evaluate_individual(individual, market);
                    callback.on_individual_evaluated(i + 1, total);
                    record
                })
                .collect()
        }
    }

    fn evaluate_individual(&self, individual: &Individual, market: &E::Market) -> FitnessRecord {
        let parameters = to_parameter_map(individual);
        let outcome = self.evaluator.evaluate(
            market,
            &parameters,
            self.config.commission,
            self.config.objective_policy,
        );

        match outcome {
            Ok(fitness) if fitness.is_finite() => FitnessRecord::new(individual.clone(), fitness),
            Ok(fitness) => {
                log::warn!("Evaluation of {:?} returned non-finite fitness {}", parameters, fitness);
                FitnessRecord::failed(individual.clone())
            }
            Err(e) => {
                log::warn!("Evaluation of {:?} failed: {}", parameters, e);
                FitnessRecord::failed(individual.clone())
            }
        }
    }

    fn report(
        &self,
        generation: usize,
        records: &[FitnessRecord],
        tracker: &BestTracker,
        mutations: usize,
    ) -> GenerationReport {
        let (best_individual, best_fitness) = tracker
            .generation_best()
            .map(|c| (c.individual.clone(), c.fitness))
            .unwrap_or_default();

        GenerationReport {
            generation,
            best_individual,
            best_fitness,
            global_best_fitness: tracker.global_best().map_or(best_fitness, |c| c.fitness),
            mean_fitness: mean_fitness(records),
            failed_evaluations: records.iter().filter(|r| r.is_failed()).count(),
            population_size: records.len(),
            mutations,
        }
    }
}
