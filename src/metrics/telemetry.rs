//! Telemetry sinks for training and playback.
//!
//! - `Telemetry`: trait the trainer and playback report through
//! - `NoopTelemetry`: discards everything
//! - `TrainingLogger`: tracing events, a JSON stats file and a progress chart

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::chart::plot_training_progress;
use super::training_stats::{TrainingStats, TrainingSummary};

/// Games between periodic progress lines and rolling averages
pub const REPORT_EVERY: usize = 10;

/// Receiver of training and playback events
pub trait Telemetry {
    /// A training run of `total_episodes` is starting
    fn training_started(&mut self, total_episodes: usize);

    /// Episode `episode` (1-based) ended
    fn episode_finished(&mut self, episode: usize, score: u32, table_size: usize, epsilon: f64);

    /// Training ended; compute the summary and emit artifacts
    fn training_finished(&mut self) -> Result<()>;

    /// A playback game ended
    fn play_finished(&mut self, score: u32, moves: usize);
}

/// Telemetry that discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn training_started(&mut self, _total_episodes: usize) {}

    fn episode_finished(&mut self, _episode: usize, _score: u32, _table_size: usize, _epsilon: f64) {}

    fn training_finished(&mut self) -> Result<()> {
        Ok(())
    }

    fn play_finished(&mut self, _score: u32, _moves: usize) {}
}

#[derive(Serialize)]
struct StatsFile<'a> {
    start_time: String,
    duration_secs: f64,
    total_games: usize,
    summary: TrainingSummary,
    scores_history: &'a [u32],
    average_scores: &'a [f64],
    q_table_sizes: &'a [usize],
}

/// Logs training progress and writes statistics to a log directory
pub struct TrainingLogger {
    stats: TrainingStats,
    stats_file: PathBuf,
    chart_file: PathBuf,
    started_at: DateTime<Local>,
    started: Instant,
    planned_episodes: usize,
}

impl TrainingLogger {
    /// Create a logger writing into `log_dir` (created if missing)
    pub fn new(log_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;

        let started_at = Local::now();
        let stamp = started_at.format("%Y%m%d_%H%M%S");

        Ok(Self {
            stats: TrainingStats::new(REPORT_EVERY),
            stats_file: log_dir.join(format!("stats_{}.json", stamp)),
            chart_file: log_dir.join("training_progress.svg"),
            started_at,
            started: Instant::now(),
            planned_episodes: 0,
        })
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn stats_file(&self) -> &Path {
        &self.stats_file
    }

    pub fn chart_file(&self) -> &Path {
        &self.chart_file
    }

    fn write_stats(&self) -> Result<()> {
        let file = StatsFile {
            start_time: self.started_at.to_rfc3339(),
            duration_secs: self.started.elapsed().as_secs_f64(),
            total_games: self.planned_episodes,
            summary: self.stats.summary(),
            scores_history: self.stats.scores(),
            average_scores: self.stats.average_scores(),
            q_table_sizes: self.stats.table_sizes(),
        };

        let json = serde_json::to_string_pretty(&file).context("Failed to serialize training stats")?;
        std::fs::write(&self.stats_file, json)
            .with_context(|| format!("Failed to write training stats to {:?}", self.stats_file))
    }
}

impl Telemetry for TrainingLogger {
    fn training_started(&mut self, total_episodes: usize) {
        self.planned_episodes = total_episodes;
        self.started = Instant::now();
        tracing::info!("Starting new training session with {} games", total_episodes);
    }

    fn episode_finished(&mut self, episode: usize, score: u32, table_size: usize, epsilon: f64) {
        if self.stats.record_episode(score, table_size, epsilon) {
            tracing::info!("New best score achieved: {} (Game {})", score, episode);
        }

        if episode % REPORT_EVERY == 0 {
            tracing::info!(
                game = episode,
                score,
                recent_average = format_args!("{:.2}", self.stats.recent_mean()),
                table_size,
                epsilon = format_args!("{:.3}", epsilon),
                "Game completed"
            );
        }
    }

    fn training_finished(&mut self) -> Result<()> {
        let summary = self.stats.summary();
        tracing::info!(
            duration_secs = format_args!("{:.1}", self.started.elapsed().as_secs_f64()),
            games_played = summary.total_episodes,
            best_score = summary.best_score,
            average_score = format_args!("{:.2}", summary.average_score),
            final_table_size = summary.final_table_size,
            "Training summary"
        );

        self.write_stats()?;
        tracing::info!("Training statistics saved to {:?}", self.stats_file);

        match plot_training_progress(&self.stats, &self.chart_file) {
            Ok(()) => tracing::info!("Training progress plot saved to {:?}", self.chart_file),
            Err(err) => tracing::warn!("Unable to generate plots: {:#}", err),
        }

        Ok(())
    }

    fn play_finished(&mut self, score: u32, moves: usize) {
        tracing::info!(final_score = score, total_moves = moves, "Game finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_logger_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");

        let logger = TrainingLogger::new(&log_dir).unwrap();

        assert!(log_dir.is_dir());
        assert!(logger.stats_file().starts_with(&log_dir));
        assert!(logger
            .stats_file()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("stats_"));
    }

    #[test]
    fn test_training_finished_writes_stats() {
        let temp_dir = TempDir::new().unwrap();
        let mut logger = TrainingLogger::new(temp_dir.path()).unwrap();

        logger.training_started(20);
        for episode in 1..=20 {
            logger.episode_finished(episode, (episode % 4) as u32, episode * 2, 0.5);
        }
        logger.training_finished().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(logger.stats_file()).unwrap()).unwrap();
        assert_eq!(raw["total_games"], 20);
        assert_eq!(raw["summary"]["best_score"], 3);
        assert_eq!(raw["summary"]["final_table_size"], 40);
        assert_eq!(raw["scores_history"].as_array().unwrap().len(), 20);
        assert_eq!(raw["average_scores"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_training_finished_with_no_games() {
        let temp_dir = TempDir::new().unwrap();
        let mut logger = TrainingLogger::new(temp_dir.path()).unwrap();

        logger.training_started(0);
        assert!(logger.training_finished().is_ok());
        assert_eq!(logger.stats().summary().average_score, 0.0);
    }

    #[test]
    fn test_noop_telemetry() {
        let mut sink = NoopTelemetry;
        sink.training_started(3);
        sink.episode_finished(1, 2, 3, 0.5);
        sink.play_finished(1, 10);
        assert!(sink.training_finished().is_ok());
    }
}
