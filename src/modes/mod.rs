pub mod human;
pub mod play;
mod terminal;
pub mod train;

pub use human::HumanMode;
pub use play::{PlayConfig, PlayMode, PlayOutcome};
pub use train::{EpisodeOutcome, TrainConfig, TrainMode, TrainReport};
