//! Q Snake - the Snake game played by a tabular Q-learning agent
//!
//! This library provides:
//! - Core game logic (game module)
//! - Q-learning: state encoding, value table, policy, learner, persistence (rl module)
//! - Training statistics, telemetry and charts (metrics module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Execution modes: train, play and human (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
