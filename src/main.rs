use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use q_snake::game::GameConfig;
use q_snake::metrics::TrainingLogger;
use q_snake::modes::{HumanMode, PlayConfig, PlayMode, TrainConfig, TrainMode, TrainReport};
use q_snake::rl::{QConfig, SnakeEnvironment};

#[derive(Parser)]
#[command(name = "q_snake")]
#[command(version, about = "Snake game with a tabular Q-learning agent")]
struct Cli {
    /// What to run
    #[arg(long, value_enum, default_value = "demo")]
    mode: Mode,

    /// Number of training episodes
    #[arg(long, default_value = "200")]
    episodes: usize,

    /// Grid width
    #[arg(long, default_value = "40")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "30")]
    height: usize,

    /// Where the value table is saved and loaded
    #[arg(long, default_value = "snake_ai.json")]
    table: PathBuf,

    /// Directory for logs, statistics and charts
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Milliseconds between agent moves during playback
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
    frame_ms: u64,

    /// Seed for food placement and exploration
    #[arg(long)]
    seed: Option<u64>,

    /// Learning rate (alpha)
    #[arg(long, default_value = "0.05")]
    learning_rate: f64,

    /// Discount factor (gamma)
    #[arg(long, default_value = "0.95")]
    discount: f64,

    /// Per-episode epsilon decay factor
    #[arg(long, default_value = "0.998")]
    epsilon_decay: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Train a new table, then watch it play
    Demo,
    /// Train and save a table
    Train,
    /// Watch a saved table play one game
    Play,
    /// Play snake with keyboard controls
    Human,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(&cli.log_dir) {
        eprintln!("Failed to initialize logging: {:#}", err);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr and to a timestamped file in the log directory
fn init_tracing(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("training_{}.log", stamp));
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("Failed to create log file {:?}", log_path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(log_file)))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut game_config = GameConfig::new(cli.width, cli.height);
    if let Some(seed) = cli.seed {
        game_config = game_config.with_seed(seed);
    }
    game_config
        .validate()
        .map_err(|msg| anyhow!(msg))
        .context("Invalid game configuration")?;

    let q_config = QConfig {
        learning_rate: cli.learning_rate,
        discount_factor: cli.discount,
        epsilon_decay: cli.epsilon_decay,
        seed: cli.seed,
        ..QConfig::default()
    };
    q_config
        .validate()
        .map_err(|msg| anyhow!(msg))
        .context("Invalid learning configuration")?;

    match cli.mode {
        Mode::Train => {
            train(&cli, game_config, q_config).await?;
        }
        Mode::Demo => {
            let report = train(&cli, game_config.clone(), q_config.clone()).await?;
            if report.interrupted {
                tracing::info!("Skipping playback after interrupted training");
            } else {
                play(&cli, game_config, q_config).await?;
            }
        }
        Mode::Play => play(&cli, game_config, q_config).await?,
        Mode::Human => HumanMode::new(game_config).run().await?,
    }

    Ok(())
}

/// Train on a blocking thread; Ctrl+C stops at the next tick and still saves
async fn train(cli: &Cli, game_config: GameConfig, q_config: QConfig) -> Result<TrainReport> {
    let cancel = Arc::new(AtomicBool::new(false));

    let signal_flag = Arc::clone(&cancel);
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping training");
            signal_flag.store(true, Ordering::SeqCst);
        }
    });

    let mut config = TrainConfig::new(cli.episodes, cli.table.clone());
    config.game_config = game_config.clone();
    config.q_config = q_config;

    let logger = TrainingLogger::new(&cli.log_dir)?;
    let env = SnakeEnvironment::new(game_config);

    let result = tokio::task::spawn_blocking(move || {
        TrainMode::new(config, env, logger)
            .with_cancel_flag(cancel)
            .run()
    })
    .await
    .context("Training task failed");

    signal_task.abort();
    result?
}

async fn play(cli: &Cli, game_config: GameConfig, q_config: QConfig) -> Result<()> {
    let config = PlayConfig::new(game_config).with_frame_interval(Duration::from_millis(cli.frame_ms));
    let mut play_mode = PlayMode::load(&cli.table, config, q_config, TrainingLogger::new(&cli.log_dir)?)?;
    play_mode.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["q_snake"]).unwrap();
        assert!(matches!(cli.mode, Mode::Demo));
        assert_eq!(cli.frame_ms, 100);
        assert_eq!((cli.width, cli.height), (40, 30));
        assert_eq!(cli.episodes, 200);
    }

    #[test]
    fn test_zero_frame_ms_rejected() {
        assert!(Cli::try_parse_from(["q_snake", "--frame-ms", "0"]).is_err());
        let cli = Cli::try_parse_from(["q_snake", "--mode", "play", "--frame-ms", "1"]).unwrap();
        assert_eq!(cli.frame_ms, 1);
    }
}
