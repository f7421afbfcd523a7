pub mod config;
pub mod data;
/// Genetic parameter search: an `EvolutionEngine` evolves integer parameter
/// vectors bounded by a `RangeTable` against any `FitnessEvaluator`, such as
/// the bundled `EwmaCrossoverEvaluator`.
pub mod engines;
pub mod error;
pub mod types;

pub use error::{Result, TradetuneError};
