pub mod best_tracker;
pub mod evolution_engine;
pub mod genome;
pub mod operators;
pub mod progress;
pub mod range_table;
pub mod selection;

pub use best_tracker::{BestTracker, Champion};
pub use evolution_engine::{EvolutionEngine, GenerationReport, OptimizationOutcome, ProgressCallback};
pub use genome::{Gene, Individual, ParameterMap};
pub use progress::{ChannelProgressCallback, LogProgressCallback, NoopProgress, ProgressMessage};
pub use range_table::{GeneRange, RangeTable};
pub use selection::SelectionOutcome;
