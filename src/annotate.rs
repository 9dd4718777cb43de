use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_text_mut};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::Target;

/// DejaVu Sans, see `assets/LICENSE-DejaVu.txt`.
static BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// How target markers are drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub color: [u8; 3],
    pub radius: i32,
    /// Ring thickness in pixels; zero or negative draws a filled disk.
    pub thickness: i32,
    /// Horizontal distance from the centroid to the start of the label.
    pub label_offset: i32,
    pub label_scale: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: [0, 255, 0],
            radius: 5,
            thickness: 2,
            label_offset: 10,
            label_scale: 14.0,
        }
    }
}

/// The label font compiled into the binary.
pub fn bundled_font() -> Result<FontArc, ConfigError> {
    FontArc::try_from_slice(BUNDLED_FONT).map_err(|_| ConfigError::BundledFont)
}

/// Load a TrueType/OpenType font for target labels.
pub fn load_font(path: &Path) -> Result<FontArc, ConfigError> {
    let bytes = std::fs::read(path)?;
    FontArc::try_from_vec(bytes).map_err(|_| ConfigError::Font(path.to_path_buf()))
}

/// Text drawn next to each marker.
pub fn target_label(target: &Target) -> String {
    format!("({}, {})", target.x, target.y)
}

/// Draw a ring and a coordinate label for every target, in place.
///
/// Anything outside the frame is clipped.
pub fn draw_targets(
    frame: &mut RgbImage,
    targets: &[Target],
    style: &MarkerStyle,
    font: &FontArc,
) {
    let color = Rgb(style.color);
    for target in targets {
        let center = (target.x, target.y);
        if style.thickness <= 0 {
            draw_filled_circle_mut(frame, center, style.radius, color);
        } else {
            // ring centred on the nominal radius
            let inner = style.radius - style.thickness / 2;
            for r in inner.max(0)..inner + style.thickness {
                draw_hollow_circle_mut(frame, center, r, color);
            }
        }

        draw_text_mut(
            frame,
            color,
            target.x + style.label_offset,
            target.y - (style.label_scale / 2.0) as i32,
            PxScale::from(style.label_scale),
            font,
            &target_label(target),
        );
    }
    debug!("Annotated {} targets", targets.len());
}
