pub mod backtester;
pub mod ewma_crossover;
pub mod fitness;
pub mod portfolio;

pub use backtester::Backtester;
pub use ewma_crossover::EwmaCrossoverEvaluator;
pub use fitness::{FitnessEvaluator, FitnessRecord, FAILED_FITNESS};
pub use portfolio::Portfolio;
