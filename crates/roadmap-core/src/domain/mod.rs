//! Domain Layer
//!
//! Roadmap entities and the pure computations over them.
//! No I/O happens here.

mod path;
mod progress;
mod roadmap;

pub use path::{toggled, updated_at, SubtopicPath};
pub use progress::{compute_progress, ProgressStats, TopicProgress};
pub use roadmap::{RoadmapData, RoadmapId, RoadmapItem, SubTopic, Topic};
