//! OpenCV-backed camera capture and preview window.

use image::RgbImage;
use log::{debug, info, warn};
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::{highgui, imgproc, videoio};

use super::{FrameSource, Preview};
use crate::error::TrackerError;

impl From<opencv::Error> for TrackerError {
    fn from(e: opencv::Error) -> Self {
        TrackerError::Backend(e.to_string())
    }
}

/// Try to open each of the first `scan_count` device indices and report which succeed.
///
/// Every opened device is released immediately after the check.
pub fn list_available_cameras(scan_count: i32) -> Vec<i32> {
    let mut available = Vec::new();
    for index in 0..scan_count {
        match videoio::VideoCapture::new(index, videoio::CAP_ANY) {
            Ok(mut capture) => {
                if capture.is_opened().unwrap_or(false) {
                    available.push(index);
                }
                if let Err(e) = capture.release() {
                    warn!("Failed to release camera {}: {}", index, e);
                }
            }
            Err(e) => debug!("Camera {} did not open: {}", index, e),
        }
    }
    available
}

/// Exclusively owned capture device, released exactly once.
pub struct OpenCvCamera {
    index: i32,
    capture: videoio::VideoCapture,
    released: bool,
}

impl OpenCvCamera {
    pub fn open(index: i32) -> Result<Self, TrackerError> {
        let capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(TrackerError::DeviceUnavailable(index));
        }
        info!("Opened camera {}", index);
        Ok(Self {
            index,
            capture,
            released: false,
        })
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    /// Release the device. Calling it again is a no-op.
    pub fn release(&mut self) -> Result<(), TrackerError> {
        if !self.released {
            self.released = true;
            self.capture.release()?;
            debug!("Released camera {}", self.index);
        }
        Ok(())
    }
}

impl FrameSource for OpenCvCamera {
    fn read_frame(&mut self) -> Result<Option<RgbImage>, TrackerError> {
        if self.released {
            return Err(TrackerError::DeviceUnavailable(self.index));
        }
        let mut bgr = Mat::default();
        if !self.capture.read(&mut bgr)? || bgr.rows() <= 0 || bgr.cols() <= 0 {
            return Ok(None);
        }
        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB)?;

        let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
        let bytes = rgb.data_bytes()?.to_vec();
        RgbImage::from_raw(width, height, bytes).map(Some).ok_or_else(|| {
            TrackerError::Backend(format!("unexpected frame layout {}x{}", width, height))
        })
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to release camera {}: {}", self.index, e);
        }
    }
}

/// highgui window that quits on the `q` key.
pub struct HighGuiPreview {
    title: String,
}

impl HighGuiPreview {
    pub fn new(title: &str) -> Result<Self, TrackerError> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            title: title.to_string(),
        })
    }
}

impl Preview for HighGuiPreview {
    fn show(&mut self, frame: &RgbImage) -> Result<(), TrackerError> {
        let flat = Mat::from_slice(frame.as_raw())?;
        let rgb = flat.reshape(3, frame.height() as i32)?;
        let mut bgr = Mat::default();
        imgproc::cvt_color_def(&*rgb, &mut bgr, imgproc::COLOR_RGB2BGR)?;
        highgui::imshow(&self.title, &bgr)?;
        Ok(())
    }

    fn poll_quit(&mut self) -> Result<bool, TrackerError> {
        let key = highgui::wait_key(1)?;
        Ok(key & 0xFF == 'q' as i32)
    }
}

impl Drop for HighGuiPreview {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_all_windows() {
            warn!("Failed to close preview windows: {}", e);
        }
    }
}
