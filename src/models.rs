use imageproc::point::Point;
use serde::{Deserialize, Serialize};

use crate::detection::moments::Moments;

/// A detected bright target: integer centroid plus blob area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub x: i32,
    pub y: i32,
    pub area: f64,
}

impl Target {
    pub fn position(&self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

/// A target position rescaled into the output coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MappedPoint {
    pub x: f64,
    pub y: f64,
}

/// Outer contour of one connected bright region.
#[derive(Debug, Clone)]
pub struct Blob {
    pub points: Vec<Point<i32>>,
    pub moments: Moments,
}

impl Blob {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        let moments = Moments::from_polygon(&points);
        Self { points, moments }
    }

    /// Enclosed polygon area of the contour.
    pub fn area(&self) -> f64 {
        self.moments.m00
    }

    /// Centroid truncated toward zero, `None` for a zero-area contour.
    pub fn centroid(&self) -> Option<(i32, i32)> {
        self.moments
            .centroid()
            .map(|(cx, cy)| (cx as i32, cy as i32))
    }

    pub fn to_target(&self) -> Option<Target> {
        let (x, y) = self.centroid()?;
        Some(Target {
            x,
            y,
            area: self.area(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: i32, y0: i32, side: i32) -> Vec<Point<i32>> {
        let x1 = x0 + side;
        let y1 = y0 + side;
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    #[test]
    fn blob_reports_area_and_centroid() {
        let blob = Blob::new(square(10, 20, 4));
        assert_eq!(blob.area(), 16.0);
        assert_eq!(blob.centroid(), Some((12, 22)));
        let target = blob.to_target().unwrap();
        assert_eq!(target, Target { x: 12, y: 22, area: 16.0 });
    }

    #[test]
    fn degenerate_blob_has_no_target() {
        let blob = Blob::new(vec![Point::new(3, 3), Point::new(4, 3)]);
        assert_eq!(blob.area(), 0.0);
        assert!(blob.to_target().is_none());
    }
}
