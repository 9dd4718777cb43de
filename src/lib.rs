pub mod annotate;
pub mod camera;
pub mod config;
pub mod coord_log;
pub mod detection;
pub mod error;
pub mod mapping;
pub mod models;
pub mod pipeline;
pub mod session;

pub use detection::{
    DetectionMode, DetectorParams, TargetDetector, detect_single_target, detect_targets,
};
pub use error::{ConfigError, MappingError, TrackerError};
pub use mapping::{CoordinateMapper, map_coordinates};
pub use models::{Blob, MappedPoint, Target};
pub use pipeline::{FramePipeline, FrameReport};
pub use session::{RetryPolicy, SessionStats, TrackingSession};
