use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

/// All-black grayscale frame.
pub fn dark_frame(width: u32, height: u32) -> GrayImage {
    GrayImage::new(width, height)
}

/// Black grayscale frame with full-intensity disks at the given `(center, radius)`.
pub fn frame_with_disks(width: u32, height: u32, disks: &[((i32, i32), i32)]) -> GrayImage {
    let mut img = dark_frame(width, height);
    for &(center, radius) in disks {
        draw_filled_circle_mut(&mut img, center, radius, Luma([255u8]));
    }
    img
}

/// The same disks on a color frame, as a camera would deliver them.
pub fn color_frame_with_disks(width: u32, height: u32, disks: &[((i32, i32), i32)]) -> RgbImage {
    let mut img = RgbImage::new(width, height);
    for &(center, radius) in disks {
        draw_filled_circle_mut(&mut img, center, radius, Rgb([255u8, 255, 255]));
    }
    img
}

pub fn gray(img: GrayImage) -> DynamicImage {
    DynamicImage::ImageLuma8(img)
}

/// Deterministic noisy frame for property checks.
pub fn noise_frame(width: u32, height: u32, seed: u32) -> GrayImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    GrayImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        Luma([(state >> 24) as u8])
    })
}

pub fn within(actual: i32, expected: i32, tolerance: i32) -> bool {
    (actual - expected).abs() <= tolerance
}
