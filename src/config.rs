//! Run configuration: built-in defaults, optionally overridden by a JSON file
//! and then by command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::annotate::MarkerStyle;
use crate::camera::DEFAULT_SCAN_COUNT;
use crate::detection::{DetectionMode, DetectorParams};
use crate::error::ConfigError;
use crate::session::RetryPolicy;

/// Everything a tracking run needs besides the camera itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Device index; `None` picks one from the scanned devices.
    pub camera_index: Option<i32>,
    pub scan_count: i32,
    pub mode: DetectionMode,
    pub detector: DetectorParams,
    pub output_width: f64,
    pub output_height: f64,
    pub log_coordinates: bool,
    pub log_dir: PathBuf,
    pub retry_delay_ms: u64,
    pub max_capture_retries: u32,
    pub marker: MarkerStyle,
    pub font_path: Option<PathBuf>,
    pub window_title: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            camera_index: None,
            scan_count: DEFAULT_SCAN_COUNT,
            mode: DetectionMode::default(),
            detector: DetectorParams::default(),
            output_width: 1000.0,
            output_height: 1000.0,
            log_coordinates: true,
            log_dir: PathBuf::from("."),
            retry_delay_ms: 1000,
            max_capture_retries: 5,
            marker: MarkerStyle::default(),
            font_path: None,
            window_title: "IR Target Detection".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Load a JSON config from disk. Missing fields keep their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [("output_width", self.output_width), ("output_height", self.output_height)];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                let message = format!("{name} must be positive, got {value}");
                return Err(ConfigError::Invalid(message));
            }
        }
        if !self.detector.min_area.is_finite() {
            return Err(ConfigError::Invalid("min_area must be finite".to_string()));
        }
        if self.scan_count <= 0 && self.camera_index.is_none() {
            return Err(ConfigError::Invalid(
                "scan_count must be positive when no camera index is given".to_string(),
            ));
        }
        if self.marker.radius < 0 {
            return Err(ConfigError::Invalid("marker radius must not be negative".to_string()));
        }
        Ok(())
    }

    pub fn output_size(&self) -> (f64, f64) {
        (self.output_width, self.output_height)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            delay: Duration::from_millis(self.retry_delay_ms),
            max_retries: self.max_capture_retries,
        }
    }
}
