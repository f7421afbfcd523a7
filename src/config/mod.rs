pub mod traits;
pub mod optimizer;
pub mod backtesting;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use optimizer::OptimizerConfig;
pub use backtesting::BacktestConfig;
pub use traits::ConfigSection;
