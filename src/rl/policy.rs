//! Epsilon-greedy action selection over the value table

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::config::QConfig;
use super::state::EncodedState;
use super::table::ValueTable;
use crate::game::Action;

/// Epsilon-greedy policy with a multiplicative per-episode decay schedule
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    epsilon_min: f64,
    decay: f64,
    rng: StdRng,
}

impl EpsilonGreedy {
    pub fn new(epsilon_start: f64, epsilon_min: f64, decay: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            epsilon: epsilon_start,
            epsilon_min,
            decay,
            rng,
        }
    }

    pub fn from_config(config: &QConfig) -> Self {
        Self::new(
            config.epsilon_start,
            config.epsilon_min,
            config.epsilon_decay,
            config.seed,
        )
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Pin epsilon to a fixed value (used for playback)
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Exploration floor
    pub fn epsilon_min(&self) -> f64 {
        self.epsilon_min
    }

    /// Pick an action index for `state`.
    ///
    /// Explores uniformly with probability epsilon, otherwise returns the
    /// greedy action (inserting the state if unseen).
    pub fn choose(&mut self, table: &mut ValueTable, state: EncodedState) -> usize {
        if self.rng.gen::<f64>() < self.epsilon {
            return self.rng.gen_range(0..Action::COUNT);
        }
        table.best_action(state)
    }

    /// Apply one episode's worth of decay, never going below the floor
    pub fn decay(&mut self) {
        self.epsilon = (self.epsilon * self.decay).max(self.epsilon_min);
    }
}
