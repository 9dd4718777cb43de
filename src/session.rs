use std::time::Duration;

use log::{debug, info, warn};

use crate::camera::{FrameSource, Preview};
use crate::coord_log::{self, CoordinateLog};
use crate::detection::DetectionMode;
use crate::error::TrackerError;
use crate::pipeline::{FramePipeline, FrameReport};

/// Retry policy for frames that fail to arrive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub delay: Duration,
    /// Consecutive misses tolerated before the run fails.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            max_retries: 5,
        }
    }
}

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u64,
    pub frames_with_targets: u64,
    pub capture_failures: u64,
    pub logged_points: u64,
}

/// Capture → detect → log → display loop over one frame source.
pub struct TrackingSession<S, P> {
    source: S,
    preview: P,
    pipeline: FramePipeline,
    log: Option<CoordinateLog>,
    retry: RetryPolicy,
}

impl<S: FrameSource, P: Preview> TrackingSession<S, P> {
    pub fn new(source: S, preview: P, pipeline: FramePipeline) -> Self {
        Self {
            source,
            preview,
            pipeline,
            log: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_log(mut self, log: CoordinateLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Hand back the source and preview, releasing nothing.
    pub fn into_parts(self) -> (S, P) {
        (self.source, self.preview)
    }

    /// Run until the preview asks to quit or capture keeps failing.
    pub fn run(&mut self) -> Result<SessionStats, TrackerError> {
        let mut stats = SessionStats::default();
        let mut consecutive_misses = 0u32;

        loop {
            let Some(frame) = self.source.read_frame()? else {
                stats.capture_failures += 1;
                consecutive_misses += 1;
                if consecutive_misses > self.retry.max_retries {
                    return Err(TrackerError::CaptureFailed { attempts: consecutive_misses });
                }
                warn!(
                    "Failed to capture frame. Retrying ({}/{})...",
                    consecutive_misses, self.retry.max_retries
                );
                std::thread::sleep(self.retry.delay);
                continue;
            };
            consecutive_misses = 0;

            let report = self.pipeline.process(stats.frames, &frame)?;
            stats.frames += 1;

            if report.has_targets() {
                stats.frames_with_targets += 1;
                stats.logged_points += self.record(&report)?;
                self.preview.show(&report.annotated)?;
            } else {
                debug!("No target detected");
                self.preview.show(&frame)?;
            }

            if self.preview.poll_quit()? {
                info!("Quitting after {} frames", stats.frames);
                return Ok(stats);
            }
        }
    }

    /// Log the frame's targets; single mode records only the best one.
    fn record(&mut self, report: &FrameReport) -> Result<u64, TrackerError> {
        let count = match self.pipeline.mode() {
            DetectionMode::Single => 1,
            DetectionMode::Multi => report.targets.len(),
        };
        let at = coord_log::now();
        let mut written = 0;
        for (target, point) in report.targets.iter().zip(&report.mapped).take(count) {
            info!(
                "Target at ({}, {}) mapped to ({:.2}, {:.2})",
                target.x, target.y, point.x, point.y
            );
            if let Some(log) = self.log.as_mut() {
                log.append(*point, at)?;
                written += 1;
            }
        }
        Ok(written)
    }
}
