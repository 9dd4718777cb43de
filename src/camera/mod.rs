#[cfg(feature = "camera")]
pub mod opencv;

use image::RgbImage;

use crate::error::TrackerError;

/// Number of device indices tried when enumerating cameras.
pub const DEFAULT_SCAN_COUNT: i32 = 10;

/// Index used when it is among the available devices (typically an external USB camera).
pub const PREFERRED_INDEX: i32 = 1;

/// Anything that yields successive color frames.
pub trait FrameSource {
    /// Grab the next frame. `Ok(None)` is a transient miss, the caller may retry.
    fn read_frame(&mut self) -> Result<Option<RgbImage>, TrackerError>;
}

/// Where annotated frames are shown and quit requests come from.
pub trait Preview {
    fn show(&mut self, frame: &RgbImage) -> Result<(), TrackerError>;

    /// Poll the user input once; `true` means stop the loop.
    fn poll_quit(&mut self) -> Result<bool, TrackerError>;
}

/// Index 1 if present, otherwise the lowest available index.
pub fn preferred_camera_index(available: &[i32]) -> Option<i32> {
    if available.contains(&PREFERRED_INDEX) {
        Some(PREFERRED_INDEX)
    } else {
        available.iter().copied().min()
    }
}
