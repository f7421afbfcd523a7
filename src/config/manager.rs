use super::{backtesting::BacktestConfig, optimizer::OptimizerConfig, traits::ConfigSection};
use crate::error::TradetuneError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Environment prefix for overrides, e.g. `TRADETUNE__OPTIMIZER__MAX_GENERATIONS=50`.
pub const ENV_PREFIX: &str = "TRADETUNE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub optimizer: OptimizerConfig,
    pub backtesting: BacktestConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), TradetuneError> {
        self.optimizer.validate()?;
        self.backtesting.validate()?;
        Ok(())
    }

    /// Reads a TOML or JSON file, then applies environment overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TradetuneError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        log::debug!(
            "Loaded [{}] and [{}] from {}",
            OptimizerConfig::section_name(),
            BacktestConfig::section_name(),
            path.as_ref().display()
        );
        Ok(config)
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TradetuneError> {
        let config = AppConfig::from_file(path)?;
        *self.write_lock()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TradetuneError> {
        let toml_str = toml::to_string_pretty(&self.get()?)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, TradetuneError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| TradetuneError::Configuration("Config lock poisoned".to_string()))
    }

    /// Applies `f` and keeps the result only if it still validates.
    pub fn update<F>(&self, f: F) -> Result<(), TradetuneError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut guard = self.write_lock()?;
        let mut candidate = guard.clone();
        f(&mut candidate);
        candidate.validate()?;
        *guard = candidate;
        Ok(())
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>, TradetuneError> {
        self.config
            .write()
            .map_err(|_| TradetuneError::Configuration("Config lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::metrics::ObjectivePolicy;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tradetune-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_path("roundtrip.toml");
        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.optimizer.max_generations = 7;
                c.optimizer.objective_policy = ObjectivePolicy::SharpeRatio;
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let loaded = ConfigManager::new();
        loaded.load_from_file(&path).unwrap();
        let config = loaded.get().unwrap();
        assert_eq!(config.optimizer.max_generations, 7);
        assert_eq!(config.optimizer.objective_policy, ObjectivePolicy::SharpeRatio);
        assert_eq!(config.optimizer.range_table.len(), 2);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_invalid_update_is_rejected() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.optimizer.population_size = 0);
        assert!(result.is_err());
        assert_eq!(manager.get().unwrap().optimizer.population_size, 20);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = temp_path("invalid.toml");
        std::fs::write(
            &path,
            r#"
[optimizer]
population_size = 10
parameters_count = 2
elitist_percentage = 80
stochastic_percentage = 40

[[optimizer.range_table]]
min = 1
max = 50

[[optimizer.range_table]]
min = 1
max = 50
"#,
        )
        .unwrap();

        let result = AppConfig::from_file(&path);
        assert!(matches!(result, Err(TradetuneError::Configuration(_))));

        std::fs::remove_file(path).ok();
    }
}
