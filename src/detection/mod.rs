pub mod contours;
pub mod moments;
pub mod preprocessing;

use image::{DynamicImage, GrayImage};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{Blob, Target};

/// Radius of the square structuring element used to close the mask (5 x 5).
pub const CLOSE_RADIUS: u8 = 2;

/// Tunables shared by both detector variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Intensity cut, pixels at or above it are "on".
    pub threshold: u8,
    /// A blob must enclose strictly more than this area to qualify.
    pub min_area: f64,
    /// Cap on the number of targets returned in multi-target mode.
    pub max_targets: usize,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            threshold: 200,
            min_area: 50.0,
            max_targets: 5,
        }
    }
}

/// Which detector variant to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// Largest blob only, after morphological closing.
    #[default]
    Single,
    /// Up to `max_targets` blobs, largest first.
    Multi,
}

/// Every intermediate image of one detection, for debug output.
pub struct Detection {
    pub binary: GrayImage,
    pub closed: Option<GrayImage>,
    pub targets: Vec<Target>,
}

/// Bright-target detector orchestrator
#[derive(Debug, Clone, Default)]
pub struct TargetDetector {
    pub params: DetectorParams,
    pub mode: DetectionMode,
}

impl TargetDetector {
    pub fn new(params: DetectorParams, mode: DetectionMode) -> Self {
        Self { params, mode }
    }

    /// Run the configured variant on a grayscale frame.
    ///
    /// Single mode yields at most one target.
    pub fn detect(&self, gray: &GrayImage) -> Detection {
        let Segmentation { binary, closed, blobs } = segment(gray, &self.params, self.mode);
        let targets = match self.mode {
            DetectionMode::Multi => rank_targets(&blobs, &self.params),
            DetectionMode::Single => largest_target(&blobs, &self.params).into_iter().collect(),
        };
        Detection {
            binary,
            closed,
            targets,
        }
    }
}

/// Multi-target detection on any image; color input is reduced to grayscale first.
pub fn detect_targets(img: &DynamicImage, params: &DetectorParams) -> Vec<Target> {
    detect_targets_in(&preprocessing::to_grayscale(img), params)
}

/// Multi-target detection on a grayscale frame.
pub fn detect_targets_in(gray: &GrayImage, params: &DetectorParams) -> Vec<Target> {
    rank_targets(&segment(gray, params, DetectionMode::Multi).blobs, params)
}

/// Single-target detection on any image.
pub fn detect_single_target(img: &DynamicImage, params: &DetectorParams) -> Option<Target> {
    detect_single_target_in(&preprocessing::to_grayscale(img), params)
}

/// Single-target detection on a grayscale frame.
pub fn detect_single_target_in(gray: &GrayImage, params: &DetectorParams) -> Option<Target> {
    largest_target(&segment(gray, params, DetectionMode::Single).blobs, params)
}

struct Segmentation {
    binary: GrayImage,
    closed: Option<GrayImage>,
    blobs: Vec<Blob>,
}

/// Threshold, close in single mode, then trace outer contours.
fn segment(gray: &GrayImage, params: &DetectorParams, mode: DetectionMode) -> Segmentation {
    let binary = preprocessing::binarize(gray, params.threshold);
    let closed = match mode {
        DetectionMode::Single => Some(preprocessing::close(&binary, CLOSE_RADIUS)),
        DetectionMode::Multi => None,
    };
    let blobs = contours::find_outer_blobs(closed.as_ref().unwrap_or(&binary));
    debug!("Found {} outer contours", blobs.len());
    Segmentation { binary, closed, blobs }
}

/// Qualifying blobs as targets, largest first, at most `max_targets`.
///
/// The sort is stable so equal areas keep raster-scan order.
fn rank_targets(blobs: &[Blob], params: &DetectorParams) -> Vec<Target> {
    let mut targets: Vec<Target> = blobs
        .iter()
        .filter(|b| b.area() > params.min_area)
        .filter_map(Blob::to_target)
        .collect();
    targets.sort_by(|a, b| b.area.total_cmp(&a.area));
    targets.truncate(params.max_targets);
    targets
}

/// The strictly largest qualifying blob; the first one wins a tie.
fn largest_target(blobs: &[Blob], params: &DetectorParams) -> Option<Target> {
    let mut best: Option<&Blob> = None;
    for blob in blobs.iter().filter(|b| b.area() > params.min_area) {
        if best.is_none_or(|current| blob.area() > current.area()) {
            best = Some(blob);
        }
    }
    best.and_then(Blob::to_target)
}
