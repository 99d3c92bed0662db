//! Training statistics tracking for Q-learning
//!
//! Keeps the full per-episode history (scores, table sizes) needed for the
//! end-of-training summary and chart, plus a rolling window for progress
//! lines.

use serde::Serialize;
use std::collections::VecDeque;

/// Aggregate view of a finished (or interrupted) training run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub total_episodes: usize,
    pub best_score: u32,
    pub average_score: f64,
    pub final_table_size: usize,
}

/// Per-episode training history with rolling averages
///
/// # Example
///
/// ```rust
/// use q_snake::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(10);
/// stats.record_episode(3, 42, 0.99);
///
/// assert_eq!(stats.best_score(), 3);
/// assert_eq!(stats.summary().final_table_size, 42);
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Score of every episode, in order
    scores: Vec<u32>,

    /// Table size after every episode
    table_sizes: Vec<usize>,

    /// Mean of the last `window_size` scores, recorded every `window_size` episodes
    average_scores: Vec<f64>,

    /// Most recent scores for the rolling mean
    recent_scores: VecDeque<u32>,

    best_score: u32,

    last_epsilon: f64,

    window_size: usize,
}

impl TrainingStats {
    /// Create a tracker whose rolling window spans `window_size` episodes
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            scores: Vec::new(),
            table_sizes: Vec::new(),
            average_scores: Vec::new(),
            recent_scores: VecDeque::with_capacity(window_size),
            best_score: 0,
            last_epsilon: 1.0,
            window_size,
        }
    }

    /// Record the end of an episode.
    ///
    /// Returns true if the score is a new best.
    pub fn record_episode(&mut self, score: u32, table_size: usize, epsilon: f64) -> bool {
        self.scores.push(score);
        self.table_sizes.push(table_size);
        self.last_epsilon = epsilon;

        if self.recent_scores.len() >= self.window_size {
            self.recent_scores.pop_front();
        }
        self.recent_scores.push_back(score);

        if self.scores.len() % self.window_size == 0 {
            self.average_scores.push(self.recent_mean());
        }

        if score > self.best_score {
            self.best_score = score;
            return true;
        }
        false
    }

    /// Mean score over the rolling window
    pub fn recent_mean(&self) -> f64 {
        if self.recent_scores.is_empty() {
            0.0
        } else {
            self.recent_scores.iter().map(|&s| s as f64).sum::<f64>()
                / self.recent_scores.len() as f64
        }
    }

    /// Mean score over every recorded episode
    pub fn overall_mean(&self) -> f64 {
        if self.scores.is_empty() {
            0.0
        } else {
            self.scores.iter().map(|&s| s as f64).sum::<f64>() / self.scores.len() as f64
        }
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn total_episodes(&self) -> usize {
        self.scores.len()
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn table_sizes(&self) -> &[usize] {
        &self.table_sizes
    }

    pub fn average_scores(&self) -> &[f64] {
        &self.average_scores
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn last_epsilon(&self) -> f64 {
        self.last_epsilon
    }

    pub fn summary(&self) -> TrainingSummary {
        TrainingSummary {
            total_episodes: self.total_episodes(),
            best_score: self.best_score,
            average_score: self.overall_mean(),
            final_table_size: self.table_sizes.last().copied().unwrap_or(0),
        }
    }

    /// One-line progress summary
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Best: {} | Recent avg: {:.2} | States: {} | Epsilon: {:.3}",
            self.total_episodes(),
            self.best_score,
            self.recent_mean(),
            self.table_sizes.last().copied().unwrap_or(0),
            self.last_epsilon,
        )
    }
}
