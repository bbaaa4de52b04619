pub mod classify;
pub mod episode;

pub use classify::{classify, PostureCategory, Thresholds};
pub use episode::{EpisodeTracker, EpisodeUpdate};
