use crate::engines::generation::genome::{Individual, ParameterMap};
use crate::engines::metrics::ObjectivePolicy;
use crate::error::Result;

/// Fitness carried by an individual whose evaluation failed.
///
/// Failed records are never elite, weigh zero on the roulette wheel and lose
/// every comparison against a successful evaluation.
pub const FAILED_FITNESS: f64 = f64::NEG_INFINITY;

/// Scores one parameter set against market data.
///
/// The implementing value plays the role of the strategy template: it knows
/// how to turn named parameters into a backtest. Implementations must be
/// deterministic for identical inputs and free of visible side effects, since
/// a generation may be evaluated from several threads at once.
pub trait FitnessEvaluator: Send + Sync {
    type Market: ?Sized + Sync;

    fn evaluate(
        &self,
        market: &Self::Market,
        parameters: &ParameterMap,
        commission: f64,
        objective: ObjectivePolicy,
    ) -> Result<f64>;
}

/// An individual paired with the fitness it scored in one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessRecord {
    pub individual: Individual,
    pub fitness: f64,
}

impl FitnessRecord {
    pub fn new(individual: Individual, fitness: f64) -> Self {
        Self { individual, fitness }
    }

    pub fn failed(individual: Individual) -> Self {
        Self::new(individual, FAILED_FITNESS)
    }

    pub fn is_failed(&self) -> bool {
        !self.fitness.is_finite()
    }
}
