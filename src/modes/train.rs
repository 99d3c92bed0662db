//! Training mode for the Q-learning agent
//!
//! Runs episodes of self-play against any [`Simulation`], shapes rewards from
//! score changes and collisions, applies one Bellman update per tick, decays
//! exploration between episodes and finally persists the value table.
//!
//! # Example
//!
//! ```rust,no_run
//! use q_snake::game::GameConfig;
//! use q_snake::metrics::TrainingLogger;
//! use q_snake::modes::{TrainConfig, TrainMode};
//! use q_snake::rl::SnakeEnvironment;
//! use std::path::{Path, PathBuf};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = TrainConfig::new(200, PathBuf::from("snake_ai.json"));
//! let env = SnakeEnvironment::new(config.game_config.clone());
//! let logger = TrainingLogger::new(Path::new("logs"))?;
//! let mut train_mode = TrainMode::new(config, env, logger);
//! train_mode.run()?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::game::{Action, GameConfig};
use crate::metrics::Telemetry;
use crate::rl::{encode_state, save_table, QAgent, QConfig, Simulation, Transition};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of episodes to train
    pub num_episodes: usize,

    /// Path to save the trained table
    pub save_path: PathBuf,

    /// Game configuration (grid size, spawn rules)
    pub game_config: GameConfig,

    /// Q-learning hyperparameters and reward shaping
    pub q_config: QConfig,
}

impl TrainConfig {
    /// Create a new training configuration with defaults
    pub fn new(num_episodes: usize, save_path: PathBuf) -> Self {
        Self {
            num_episodes,
            save_path,
            game_config: GameConfig::default(),
            q_config: QConfig::default(),
        }
    }
}

/// What happened during one episode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeOutcome {
    /// Final score (food eaten)
    pub score: u32,
    /// Ticks played
    pub steps: usize,
    /// Sum of shaped rewards
    pub total_reward: f64,
    /// Reward of the last transition
    pub final_reward: f64,
    /// Cut short by the stagnation guard
    pub forced_termination: bool,
    /// Stopped by the cancel flag before reaching a terminal state
    pub interrupted: bool,
}

/// Result of a whole training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// Episodes that ran to completion
    pub episodes_completed: usize,
    /// Whether the run was cancelled early
    pub interrupted: bool,
    /// Known states at the end of the run
    pub table_size: usize,
    /// Exploration rate at the end of the run
    pub epsilon: f64,
}

/// Training mode for the Q-learning agent
pub struct TrainMode<S: Simulation, T: Telemetry> {
    agent: QAgent,
    sim: S,
    telemetry: T,
    config: TrainConfig,
    cancel: Arc<AtomicBool>,
}

impl<S: Simulation, T: Telemetry> TrainMode<S, T> {
    pub fn new(config: TrainConfig, sim: S, telemetry: T) -> Self {
        Self {
            agent: QAgent::new(config.q_config.clone()),
            sim,
            telemetry,
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a cancel flag; setting it stops training at the next tick
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn agent(&self) -> &QAgent {
        &self.agent
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    /// Consume the mode, keeping the trained agent
    pub fn into_agent(self) -> QAgent {
        self.agent
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Run the training loop, then summarize and save the table.
    ///
    /// An interrupted run still summarizes and saves what was learned.
    pub fn run(&mut self) -> Result<TrainReport> {
        self.print_header();
        self.telemetry.training_started(self.config.num_episodes);

        let mut episodes_completed = 0;
        let mut interrupted = false;

        for episode in 1..=self.config.num_episodes {
            if self.is_cancelled() {
                interrupted = true;
                break;
            }

            let outcome = self.run_episode();
            if outcome.interrupted {
                interrupted = true;
                break;
            }

            self.telemetry.episode_finished(
                episode,
                outcome.score,
                self.agent.table().len(),
                self.agent.epsilon(),
            );
            self.agent.finish_episode();
            episodes_completed = episode;
        }

        if interrupted {
            tracing::info!(
                "Training interrupted after {} of {} episodes",
                episodes_completed,
                self.config.num_episodes
            );
        }

        self.telemetry.training_finished()?;
        self.save_table()?;

        Ok(TrainReport {
            episodes_completed,
            interrupted,
            table_size: self.agent.table().len(),
            epsilon: self.agent.epsilon(),
        })
    }

    /// Play one episode, learning from every transition
    pub fn run_episode(&mut self) -> EpisodeOutcome {
        let q = &self.config.q_config;
        let mut outcome = EpisodeOutcome::default();
        let mut steps_without_food = 0;

        self.sim.reset();

        while !self.sim.is_terminal() {
            if self.is_cancelled() {
                outcome.interrupted = true;
                break;
            }

            let state = encode_state(&self.sim);
            let old_score = self.sim.score();

            let action_idx = self.agent.select_action(state);
            let heading = Action::from_index(action_idx).apply(self.sim.heading());
            self.sim.set_heading(heading);
            self.sim.advance();
            outcome.steps += 1;

            let next_state = encode_state(&self.sim);
            let new_score = self.sim.score();

            let mut terminal = self.sim.is_terminal();
            let reward = if terminal {
                q.death_penalty
            } else if new_score > old_score {
                steps_without_food = 0;
                q.food_reward
            } else {
                steps_without_food += 1;
                if steps_without_food > q.stagnation_limit {
                    terminal = true;
                    outcome.forced_termination = true;
                    q.stagnation_penalty
                } else {
                    0.0
                }
            };

            self.agent.learn(&Transition {
                state,
                action: action_idx,
                reward,
                next_state,
                terminal,
            });

            outcome.total_reward += reward;
            outcome.final_reward = reward;

            if terminal {
                break;
            }
        }

        outcome.score = self.sim.score();
        outcome
    }

    /// Save the table next to the grid size it was trained on
    fn save_table(&self) -> Result<()> {
        let (width, height) = self.sim.bounds();
        let cell = self.sim.cell_size().max(1);

        save_table(
            &self.agent,
            (width / cell) as usize,
            (height / cell) as usize,
            &self.config.save_path,
        )
        .with_context(|| format!("Failed to save value table to {:?}", self.config.save_path))?;

        tracing::info!("Value table saved to {:?}", self.config.save_path);
        Ok(())
    }

    fn print_header(&self) {
        let q = &self.config.q_config;
        tracing::info!(
            episodes = self.config.num_episodes,
            grid = format_args!(
                "{}x{}",
                self.config.game_config.grid_width, self.config.game_config.grid_height
            ),
            learning_rate = q.learning_rate,
            discount_factor = q.discount_factor,
            epsilon_decay = q.epsilon_decay,
            epsilon_min = q.epsilon_min,
            stagnation_limit = q.stagnation_limit,
            save_path = ?self.config.save_path,
            "Q-learning training"
        );
    }
}
