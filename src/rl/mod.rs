//! Tabular Q-learning for the Snake game
//!
//! Provides:
//! - The `Simulation` contract the learner drives the game through
//! - An 11-flag discrete state encoding
//! - A sparse value table with lazy zero initialization
//! - Epsilon-greedy action selection and the one-step Bellman update
//! - JSON persistence of trained tables

pub mod agent;
pub mod config;
pub mod environment;
pub mod learner;
pub mod persistence;
pub mod policy;
pub mod state;
pub mod table;

pub use agent::QAgent;
pub use config::QConfig;
pub use environment::{Simulation, SnakeEnvironment};
pub use learner::{QLearner, Transition};
pub use persistence::{load_table, save_table, write_table, TableMetadata};
pub use policy::EpsilonGreedy;
pub use state::{encode_state, EncodedState, STATE_FEATURES};
pub use table::{ActionValues, ValueTable};
