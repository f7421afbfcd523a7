use super::traits::ConfigSection;
use crate::engines::generation::range_table::{GeneRange, RangeTable};
use crate::engines::metrics::ObjectivePolicy;
use crate::error::TradetuneError;
use serde::{Deserialize, Serialize};

/// Settings for one genetic optimization run.
///
/// Validated once before the first generation; the engine never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub parameters_count: usize,
    pub range_table: RangeTable,
    /// Share of the population kept as elites, 0-100.
    pub elitist_percentage: u32,
    /// Share of the population drawn by roulette wheel, 0-100.
    pub stochastic_percentage: u32,
    /// Probability in [0, 1] that an individual gets one gene mutated.
    pub mutation_rate: f64,
    pub objective_policy: ObjectivePolicy,
    /// Last generation index; the loop runs `max_generations + 1` rounds.
    pub max_generations: usize,
    /// Forwarded untouched to the fitness evaluator.
    pub commission: f64,
    pub seed: Option<u64>,
    pub parallel_evaluation: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            parameters_count: 2,
            range_table: RangeTable::new(vec![GeneRange::new(2, 30), GeneRange::new(20, 200)]),
            elitist_percentage: 20,
            stochastic_percentage: 30,
            mutation_rate: 0.05,
            objective_policy: ObjectivePolicy::NetProfit,
            max_generations: 10,
            commission: 0.002,
            seed: None,
            parallel_evaluation: false,
        }
    }
}

impl OptimizerConfig {
    /// Configured elite quota before the above-mean cap is applied.
    pub fn elitist_count(&self) -> usize {
        self.population_size * self.elitist_percentage as usize / 100
    }

    pub fn stochastic_count(&self) -> usize {
        self.population_size * self.stochastic_percentage as usize / 100
    }

    /// Upper bound on crossover offspring per generation.
    ///
    /// Elites can come out below quota, so the real count is computed per
    /// generation; this is only zero when crossover can never happen.
    pub fn max_offspring(&self) -> usize {
        self.population_size.saturating_sub(self.stochastic_count())
    }
}

impl ConfigSection for OptimizerConfig {
    fn section_name() -> &'static str {
        "optimizer"
    }

    fn validate(&self) -> Result<(), TradetuneError> {
        if self.population_size == 0 {
            return Err(TradetuneError::Configuration(
                "Population size must be greater than 0".to_string(),
            ));
        }
        if self.parameters_count == 0 {
            return Err(TradetuneError::Configuration(
                "Parameters count must be greater than 0".to_string(),
            ));
        }
        if self.range_table.len() != self.parameters_count {
            return Err(TradetuneError::Configuration(format!(
                "Range table has {} entries but parameters count is {}",
                self.range_table.len(),
                self.parameters_count
            )));
        }
        self.range_table.validate()?;

        if self.elitist_percentage > 100 || self.stochastic_percentage > 100 {
            return Err(TradetuneError::Configuration(
                "Selection percentages must be between 0 and 100".to_string(),
            ));
        }
        if self.elitist_percentage + self.stochastic_percentage > 100 {
            return Err(TradetuneError::Configuration(format!(
                "Elitist ({}%) and stochastic ({}%) percentages exceed 100",
                self.elitist_percentage, self.stochastic_percentage
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(TradetuneError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if !self.commission.is_finite() {
            return Err(TradetuneError::Configuration(
                "Commission must be a finite number".to_string(),
            ));
        }

        if self.max_offspring() > 0 {
            if self.population_size < 2 {
                return Err(TradetuneError::Configuration(
                    "Crossover needs a population of at least 2 individuals".to_string(),
                ));
            }
            if self.parameters_count < 2 {
                return Err(TradetuneError::Configuration(
                    "Two-point crossover needs at least 2 parameters".to_string(),
                ));
            }
        }

        Ok(())
    }
}
