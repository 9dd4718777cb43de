use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use crate::models::Blob;

/// Find the outer contours of "on" regions in a binary mask.
///
/// Only top-level outer borders are kept; holes and regions nested inside
/// holes are ignored. Blobs come back in raster-scan discovery order.
pub fn find_outer_blobs(mask: &GrayImage) -> Vec<Blob> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| Blob::new(c.points))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
    use imageproc::rect::Rect;

    #[test]
    fn empty_mask_has_no_blobs() {
        assert!(find_outer_blobs(&GrayImage::new(40, 40)).is_empty());
    }

    #[test]
    fn square_contour_runs_through_pixel_centres() {
        let mut mask = GrayImage::new(40, 40);
        draw_filled_rect_mut(&mut mask, Rect::at(10, 10).of_size(5, 5), Luma([255]));
        let blobs = find_outer_blobs(&mask);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].area(), 16.0);
        assert_eq!(blobs[0].centroid(), Some((12, 12)));
    }

    #[test]
    fn holes_and_nested_islands_are_ignored() {
        let mut mask = GrayImage::new(80, 80);
        draw_filled_circle_mut(&mut mask, (40, 40), 30, Luma([255]));
        draw_filled_circle_mut(&mut mask, (40, 40), 20, Luma([0]));
        draw_filled_circle_mut(&mut mask, (40, 40), 5, Luma([255]));
        let blobs = find_outer_blobs(&mask);
        assert_eq!(blobs.len(), 1);
        assert!(blobs[0].area() > 2000.0);
    }

    #[test]
    fn blobs_follow_raster_order() {
        let mut mask = GrayImage::new(100, 100);
        draw_filled_rect_mut(&mut mask, Rect::at(10, 60).of_size(5, 5), Luma([255]));
        draw_filled_rect_mut(&mut mask, Rect::at(70, 10).of_size(5, 5), Luma([255]));
        let centroids: Vec<_> = find_outer_blobs(&mask)
            .iter()
            .filter_map(|b| b.centroid())
            .collect();
        assert_eq!(centroids, vec![(72, 12), (12, 62)]);
    }
}
