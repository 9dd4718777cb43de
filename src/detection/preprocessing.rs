use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology;

/// Value written for "on" pixels of a binary mask.
pub const ON: u8 = 255;

/// Convert image to grayscale. Single-channel input is passed through.
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    match img {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        other => other.to_luma8(),
    }
}

/// Binarize: pixels at or above `threshold` become [`ON`], the rest 0.
pub fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] >= threshold {
            Luma([ON])
        } else {
            Luma([0])
        }
    })
}

/// Morphological closing with a square structuring element of side `2 * radius + 1`.
pub fn close(mask: &GrayImage, radius: u8) -> GrayImage {
    morphology::close(mask, Norm::LInf, radius)
}

/// Number of "on" pixels in a binary mask.
pub fn count_on(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] != 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]))
    }

    #[test]
    fn grayscale_keeps_dimensions() {
        let rgb = RgbImage::from_pixel(32, 24, Rgb([200, 10, 10]));
        let gray = to_grayscale(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(gray.dimensions(), (32, 24));
    }

    #[test]
    fn white_stays_white_and_black_stays_black() {
        let mut rgb = RgbImage::new(2, 1);
        rgb.put_pixel(0, 0, Rgb([255, 255, 255]));
        let gray = to_grayscale(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(gray.get_pixel(0, 0)[0], 255);
        assert_eq!(gray.get_pixel(1, 0)[0], 0);
    }

    #[test]
    fn binarize_is_inclusive_at_threshold() {
        let gray = GrayImage::from_fn(3, 1, |x, _| Luma([199 + x as u8]));
        let mask = binarize(&gray, 200);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
        assert_eq!(mask.get_pixel(1, 0)[0], ON);
        assert_eq!(mask.get_pixel(2, 0)[0], ON);
    }

    #[test]
    fn raising_threshold_never_adds_pixels() {
        let gray = gradient(64, 48);
        let mut previous = usize::MAX;
        for threshold in 0..=255u8 {
            let on = count_on(&binarize(&gray, threshold));
            assert!(on <= previous, "threshold {threshold} grew the mask");
            previous = on;
        }
        assert_eq!(count_on(&binarize(&gray, 0)), 64 * 48);
    }

    #[test]
    fn closing_bridges_a_narrow_gap() {
        let mut mask = GrayImage::new(30, 20);
        for y in 5..10 {
            for x in (5..10).chain(12..17) {
                mask.put_pixel(x, y, Luma([ON]));
            }
        }
        let closed = close(&mask, 2);
        assert_eq!(closed.get_pixel(10, 7)[0], ON);
        assert_eq!(closed.get_pixel(11, 7)[0], ON);
        // the outline of the merged bar is preserved
        assert_eq!(closed.get_pixel(5, 5)[0], ON);
        assert_eq!(closed.get_pixel(4, 7)[0], 0);
        assert_eq!(closed.get_pixel(10, 12)[0], 0);
    }
}
