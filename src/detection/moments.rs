use imageproc::point::Point;

/// Spatial moments of a closed polygon, up to first order.
///
/// Computed with Green's theorem over the contour edges, so the area is the
/// polygon area through the boundary pixel centres rather than a pixel count.
/// Orientation is normalised: `m00` is never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    pub fn from_polygon(points: &[Point<i32>]) -> Self {
        if points.len() < 3 {
            return Self::default();
        }

        let mut a00 = 0.0;
        let mut a10 = 0.0;
        let mut a01 = 0.0;

        let mut prev = points[points.len() - 1];
        for &curr in points {
            let (xp, yp) = (prev.x as f64, prev.y as f64);
            let (xc, yc) = (curr.x as f64, curr.y as f64);
            let cross = xp * yc - xc * yp;
            a00 += cross;
            a10 += cross * (xp + xc);
            a01 += cross * (yp + yc);
            prev = curr;
        }

        let sign = if a00 < 0.0 { -1.0 } else { 1.0 };
        Self {
            m00: sign * a00 / 2.0,
            m10: sign * a10 / 6.0,
            m01: sign * a01 / 6.0,
        }
    }

    /// `(M10/M00, M01/M00)`, or `None` when the zeroth moment is exactly zero.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 == 0.0 {
            return None;
        }
        Some((self.m10 / self.m00, self.m01 / self.m00))
    }
}
