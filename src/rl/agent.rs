//! Q-learning agent
//!
//! Owns the value table together with the policy and learner that read and
//! write it. Nothing else holds a reference to the table during a run.

use super::config::QConfig;
use super::learner::{QLearner, Transition};
use super::policy::EpsilonGreedy;
use super::state::EncodedState;
use super::table::ValueTable;

/// Tabular Q-learning agent
#[derive(Debug, Clone)]
pub struct QAgent {
    table: ValueTable,
    policy: EpsilonGreedy,
    learner: QLearner,
    config: QConfig,
    training_step: usize,
    episodes_trained: usize,
}

impl QAgent {
    /// Create an untrained agent
    pub fn new(config: QConfig) -> Self {
        Self::with_table(config, ValueTable::new())
    }

    /// Create an agent around an existing table
    pub fn with_table(config: QConfig, table: ValueTable) -> Self {
        Self {
            table,
            policy: EpsilonGreedy::from_config(&config),
            learner: QLearner::from_config(&config),
            config,
            training_step: 0,
            episodes_trained: 0,
        }
    }

    /// Agent for playback: exploration pinned to its floor
    pub fn for_playback(config: QConfig, table: ValueTable) -> Self {
        let mut agent = Self::with_table(config, table);
        let floor = agent.policy.epsilon_min();
        agent.policy.set_epsilon(floor);
        agent
    }

    /// Epsilon-greedy action index for `state`
    pub fn select_action(&mut self, state: EncodedState) -> usize {
        self.policy.choose(&mut self.table, state)
    }

    /// Feed one transition to the learner
    pub fn learn(&mut self, transition: &Transition) -> f64 {
        self.training_step += 1;
        self.learner.learn(&mut self.table, transition)
    }

    /// Close an episode: count it and decay exploration
    pub fn finish_episode(&mut self) {
        self.episodes_trained += 1;
        self.policy.decay();
    }

    pub fn epsilon(&self) -> f64 {
        self.policy.epsilon()
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn config(&self) -> &QConfig {
        &self.config
    }

    /// Total learner updates applied
    pub fn training_step(&self) -> usize {
        self.training_step
    }

    pub fn episodes_trained(&self) -> usize {
        self.episodes_trained
    }
}
