use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tradetune::config::ConfigManager;
use tradetune::data::CsvConnector;
use tradetune::engines::evaluation::EwmaCrossoverEvaluator;
use tradetune::engines::generation::{EvolutionEngine, LogProgressCallback};

/// Tune EWMA crossover spans with a genetic algorithm
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML or JSON configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// CSV file with at least a close price column
    #[arg(long, short, required_unless_present = "write_default_config")]
    data: Option<PathBuf>,

    /// Override the optimizer seed
    #[arg(long)]
    seed: Option<u64>,

    /// Evaluate each generation on all cores
    #[arg(long)]
    parallel: bool,

    /// Minimum number of bars the data file must contain
    #[arg(long, default_value_t = 100)]
    min_rows: usize,

    /// Write the effective configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let manager = ConfigManager::new();
    if let Some(path) = &cli.config {
        manager
            .load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?;
    }
    manager.update(|c| {
        if let Some(seed) = cli.seed {
            c.optimizer.seed = Some(seed);
        }
        if cli.parallel {
            c.optimizer.parallel_evaluation = true;
        }
    })?;

    if let Some(path) = &cli.write_default_config {
        manager.save_to_file(path)?;
        log::info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let config = manager.get()?;
    let data_path = cli.data.context("--data is required")?;
    let market = CsvConnector::load_and_validate(&data_path, Some(cli.min_rows))
        .with_context(|| format!("loading market data {}", data_path.display()))?;

    let evaluator = EwmaCrossoverEvaluator::new(config.backtesting.clone());
    let mut engine = EvolutionEngine::new(config.optimizer.clone(), evaluator)?;

    log::info!(
        "Optimizing {} over {} generations of {} individuals",
        config.optimizer.objective_policy,
        config.optimizer.max_generations.saturating_add(1),
        config.optimizer.population_size
    );
    let outcome = engine.run(&market, LogProgressCallback::new(config.optimizer.max_generations))?;

    let result = engine
        .evaluator()
        .backtest(&market, &outcome.parameters, config.optimizer.commission)?;
    log::info!(
        "Best fitness {:.4} with {} trades, net profit {:.2}",
        outcome.best_fitness,
        result.trades.len(),
        result.metrics.get("net_profit").copied().unwrap_or_default()
    );

    println!("{}", serde_json::to_string_pretty(&outcome.parameters)?);
    Ok(())
}
