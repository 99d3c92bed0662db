pub mod chart;
pub mod game_metrics;
pub mod telemetry;
pub mod training_stats;

pub use game_metrics::GameMetrics;
pub use telemetry::{NoopTelemetry, Telemetry, TrainingLogger};
pub use training_stats::{TrainingStats, TrainingSummary};
