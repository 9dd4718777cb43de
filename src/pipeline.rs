use std::path::PathBuf;

use ab_glyph::FontArc;
use image::{DynamicImage, RgbImage};
use log::debug;

use crate::annotate::{self, MarkerStyle};
use crate::detection::{DetectionMode, TargetDetector, preprocessing};
use crate::error::TrackerError;
use crate::mapping::CoordinateMapper;
use crate::models::{MappedPoint, Target};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    fn save(
        &self,
        step: &str,
        frame_index: u64,
        image: &DynamicImage,
    ) -> Result<(), TrackerError> {
        let step_dir = self.output_dir.join(step);
        std::fs::create_dir_all(&step_dir)?;
        let path = step_dir.join(format!("frame_{:06}.png", frame_index));
        image
            .save(&path)
            .map_err(|source| TrackerError::SaveImage { path: path.clone(), source })?;
        debug!("Debug: saved {}", path.display());
        Ok(())
    }
}

/// Everything one frame produced.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub frame_index: u64,
    pub targets: Vec<Target>,
    /// Output-space positions, index-aligned with `targets`.
    pub mapped: Vec<MappedPoint>,
    /// The input frame with markers drawn on it.
    pub annotated: RgbImage,
}

impl FrameReport {
    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }
}

/// Grayscale → detect → map → annotate, one frame at a time.
pub struct FramePipeline {
    detector: TargetDetector,
    output_size: (f64, f64),
    marker: MarkerStyle,
    font: FontArc,
    debug: Option<DebugConfig>,
}

impl FramePipeline {
    /// Labels use the built-in font until [`FramePipeline::with_font`] replaces it.
    pub fn new(detector: TargetDetector, output_size: (f64, f64)) -> Result<Self, TrackerError> {
        Ok(Self {
            detector,
            output_size,
            marker: MarkerStyle::default(),
            font: annotate::bundled_font()?,
            debug: None,
        })
    }

    pub fn with_marker(mut self, marker: MarkerStyle) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = font;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self, TrackerError> {
        if output_dir.exists() {
            if std::fs::read_dir(&output_dir)?.next().is_some() {
                return Err(TrackerError::DebugDirNotEmpty(output_dir));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }
        self.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    pub fn mode(&self) -> DetectionMode {
        self.detector.mode
    }

    /// Run every stage on one color frame.
    pub fn process(
        &self,
        frame_index: u64,
        frame: &RgbImage,
    ) -> Result<FrameReport, TrackerError> {
        let (width, height) = frame.dimensions();
        let mapper = CoordinateMapper::for_frame(width, height, self.output_size)?;
        let input = DynamicImage::ImageRgb8(frame.clone());
        let gray = preprocessing::to_grayscale(&input);
        let detection = self.detector.detect(&gray);

        let mapped = detection
            .targets
            .iter()
            .map(|t| mapper.map_target(t))
            .collect();

        let mut annotated = frame.clone();
        annotate::draw_targets(&mut annotated, &detection.targets, &self.marker, &self.font);

        if let Some(debug) = &self.debug {
            debug.save("00_input", frame_index, &input)?;
            debug.save("01_grayscale", frame_index, &DynamicImage::ImageLuma8(gray))?;
            let binary = DynamicImage::ImageLuma8(detection.binary);
            debug.save("02_threshold", frame_index, &binary)?;
            if let Some(closed) = detection.closed {
                debug.save("03_closing", frame_index, &DynamicImage::ImageLuma8(closed))?;
            }
            let marked = DynamicImage::ImageRgb8(annotated.clone());
            debug.save("04_annotated", frame_index, &marked)?;
        }

        Ok(FrameReport {
            frame_index,
            targets: detection.targets,
            mapped,
            annotated,
        })
    }
}
