mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from irtrack for tests
pub use irtrack::{
    DetectionMode, DetectorParams, FramePipeline, MappedPoint, Target, TargetDetector,
    detect_single_target, detect_targets, map_coordinates,
};
