use crate::error::MappingError;
use crate::models::{MappedPoint, Target};

/// Rescale a frame-space pixel position into an output coordinate system.
///
/// Each axis is scaled independently; there is no aspect correction and no
/// clamping, so positions outside the frame map outside the output range.
pub fn map_coordinates(
    x: f64,
    y: f64,
    frame_width: f64,
    frame_height: f64,
    out_width: f64,
    out_height: f64,
) -> Result<MappedPoint, MappingError> {
    CoordinateMapper::new((frame_width, frame_height), (out_width, out_height))
        .map(|mapper| mapper.map(x, y))
}

/// A validated pair of frame and output sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    frame: (f64, f64),
    output: (f64, f64),
}

impl CoordinateMapper {
    pub fn new(frame: (f64, f64), output: (f64, f64)) -> Result<Self, MappingError> {
        check_dimension("frame width", frame.0)?;
        check_dimension("frame height", frame.1)?;
        check_dimension("output width", output.0)?;
        check_dimension("output height", output.1)?;
        Ok(Self { frame, output })
    }

    /// Mapper for a frame given in integer pixels.
    pub fn for_frame(width: u32, height: u32, output: (f64, f64)) -> Result<Self, MappingError> {
        Self::new((width as f64, height as f64), output)
    }

    pub fn map(&self, x: f64, y: f64) -> MappedPoint {
        MappedPoint {
            x: x / self.frame.0 * self.output.0,
            y: y / self.frame.1 * self.output.1,
        }
    }

    pub fn map_target(&self, target: &Target) -> MappedPoint {
        let (x, y) = target.position();
        self.map(x, y)
    }

    /// Output-space position back to frame space.
    pub fn unmap(&self, point: MappedPoint) -> (f64, f64) {
        (
            point.x / self.output.0 * self.frame.0,
            point.y / self.output.1 * self.frame.1,
        )
    }
}

fn check_dimension(axis: &'static str, value: f64) -> Result<(), MappingError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MappingError::InvalidDimension { axis, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn maps_frame_centre_to_output_centre() {
        let p = map_coordinates(100.0, 100.0, 200.0, 200.0, 1000.0, 1000.0).unwrap();
        assert_eq!(p, MappedPoint { x: 500.0, y: 500.0 });
    }

    #[test]
    fn unit_scale_is_identity() {
        for &(w, h) in &[(640.0, 480.0), (1.0, 1.0), (1920.0, 1080.0)] {
            for &(x, y) in &[(0.0, 0.0), (17.0, 3.0), (639.0, 479.0)] {
                let p = map_coordinates(x, y, w, h, w, h).unwrap();
                assert_relative_eq!(p.x, x, epsilon = 1e-9);
                assert_relative_eq!(p.y, y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn output_scale_scales_linearly() {
        let (w, h) = (640.0, 480.0);
        for &k in &[0.5, 2.0, 3.75] {
            let p = map_coordinates(123.0, 45.0, w, h, k * w, k * h).unwrap();
            assert_relative_eq!(p.x, k * 123.0, max_relative = 1e-12);
            assert_relative_eq!(p.y, k * 45.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn axes_are_scaled_independently() {
        let p = map_coordinates(320.0, 120.0, 640.0, 480.0, 100.0, 1000.0).unwrap();
        assert_relative_eq!(p.x, 50.0);
        assert_relative_eq!(p.y, 250.0);
    }

    #[test]
    fn unmap_inverts_map() {
        let mapper = CoordinateMapper::new((640.0, 480.0), (1000.0, 1000.0)).unwrap();
        for &(x, y) in &[(0.0, 0.0), (321.0, 17.0), (639.0, 479.0)] {
            let (bx, by) = mapper.unmap(mapper.map(x, y));
            assert_relative_eq!(bx, x, epsilon = 1e-9);
            assert_relative_eq!(by, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn swapped_sizes_map_back() {
        let there = map_coordinates(37.0, 211.0, 640.0, 480.0, 1000.0, 750.0).unwrap();
        let back = map_coordinates(there.x, there.y, 1000.0, 750.0, 640.0, 480.0).unwrap();
        assert_relative_eq!(back.x, 37.0, epsilon = 1e-9);
        assert_relative_eq!(back.y, 211.0, epsilon = 1e-9);
    }

    #[test]
    fn out_of_frame_positions_are_not_clamped() {
        let p = map_coordinates(300.0, -10.0, 200.0, 200.0, 1000.0, 1000.0).unwrap();
        assert_eq!(p, MappedPoint { x: 1500.0, y: -50.0 });
    }

    #[test]
    fn rejects_degenerate_sizes() {
        assert_eq!(
            map_coordinates(1.0, 1.0, 0.0, 10.0, 10.0, 10.0),
            Err(MappingError::InvalidDimension { axis: "frame width", value: 0.0 })
        );
        assert!(CoordinateMapper::new((10.0, 10.0), (10.0, f64::NAN)).is_err());
        assert!(CoordinateMapper::new((10.0, -1.0), (10.0, 10.0)).is_err());
    }
}
