//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Configuration for tabular Q-learning and its reward shaping
///
/// # Example
///
/// ```rust
/// use q_snake::rl::QConfig;
///
/// let config = QConfig {
///     learning_rate: 0.1,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QConfig {
    /// Step size α of the Bellman update
    ///
    /// Default: 0.05
    pub learning_rate: f64,

    /// Discount factor γ for the estimated future value
    ///
    /// Default: 0.95
    pub discount_factor: f64,

    /// Exploration rate at the start of training
    ///
    /// Default: 1.0
    pub epsilon_start: f64,

    /// Multiplicative decay applied after every completed episode
    ///
    /// Default: 0.998
    pub epsilon_decay: f64,

    /// Exploration floor
    ///
    /// Default: 0.01
    pub epsilon_min: f64,

    /// Reward when the score increases
    ///
    /// Default: 10.0
    pub food_reward: f64,

    /// Reward on collision
    ///
    /// Default: -10.0
    pub death_penalty: f64,

    /// Reward when an episode is cut short for stalling
    ///
    /// Default: -10.0
    pub stagnation_penalty: f64,

    /// Ticks without a score increase tolerated before an episode is cut
    /// short; termination happens once the counter exceeds this value
    ///
    /// Default: 100
    pub stagnation_limit: usize,

    /// Seed for the exploration RNG (random if None)
    pub seed: Option<u64>,
}

impl Default for QConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            discount_factor: 0.95,
            epsilon_start: 1.0,
            epsilon_decay: 0.998,
            epsilon_min: 0.01,
            food_reward: 10.0,
            death_penalty: -10.0,
            stagnation_penalty: -10.0,
            stagnation_limit: 100,
            seed: None,
        }
    }
}

impl QConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// # Example
    ///
    /// ```rust
    /// use q_snake::rl::QConfig;
    ///
    /// let mut config = QConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.discount_factor = 1.5;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            ));
        }

        if !(0.0..=1.0).contains(&self.epsilon_start) {
            return Err(format!(
                "epsilon_start must be in [0, 1], got {}",
                self.epsilon_start
            ));
        }

        if !(0.0..=1.0).contains(&self.epsilon_min) {
            return Err(format!(
                "epsilon_min must be in [0, 1], got {}",
                self.epsilon_min
            ));
        }

        if self.epsilon_min > self.epsilon_start {
            return Err(format!(
                "epsilon_min ({}) must not exceed epsilon_start ({})",
                self.epsilon_min, self.epsilon_start
            ));
        }

        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(format!(
                "epsilon_decay must be in (0, 1], got {}",
                self.epsilon_decay
            ));
        }

        if self.stagnation_limit == 0 {
            return Err("stagnation_limit must be positive".to_string());
        }

        Ok(())
    }
}
