pub mod engine;
pub mod objective;
pub mod profitability;
pub mod risk;

pub use engine::MetricsEngine;
pub use objective::ObjectivePolicy;
pub use profitability::ProfitabilityMetrics;
pub use risk::RiskMetrics;
