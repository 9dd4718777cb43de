use std::path::PathBuf;

/// Rejected input to the coordinate mapper.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    #[error("{axis} must be positive and finite, got {value}")]
    InvalidDimension { axis: &'static str, value: f64 },
}

/// Failures of the capture / detect / log loop.
#[derive(thiserror::Error, Debug)]
pub enum TrackerError {
    #[error("no cameras detected, connect a camera and try again")]
    NoCameras,
    #[error("unable to open camera with index {0}")]
    DeviceUnavailable(i32),
    #[error("failed to capture a frame after {attempts} consecutive attempts")]
    CaptureFailed { attempts: u32 },
    #[error("this build has no camera support, rebuild with `--features camera` or use `--image`")]
    CameraSupportDisabled,
    #[error("camera backend error: {0}")]
    Backend(String),
    #[error("debug directory is not empty: {}", .0.display())]
    DebugDirNotEmpty(PathBuf),
    #[error("failed to save image {}: {source}", path.display())]
    SaveImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to format log timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Problems loading or validating a [`crate::config::TrackerConfig`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid font file {}", .0.display())]
    Font(PathBuf),
    #[error("built-in label font could not be parsed")]
    BundledFont,
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
