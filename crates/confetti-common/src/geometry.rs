//! 2D geometry shared by the kernel and its hosts.
//!
//! Coordinates follow the canvas convention: the origin is the top-left
//! corner and `y` grows downwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Visible rectangle of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Bounds {
    /// Creates bounds from two corners, normalising their order.
    #[must_use]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Bounds of a `width` x `height` surface anchored at the origin.
    #[must_use]
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    /// Surface width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Surface height.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Whether `point` lies inside (edges included).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Whether a body at `position` moving with `velocity` under constant
    /// `acceleration` has left the bounds for good.
    ///
    /// A body outside an edge is only considered gone when neither its
    /// velocity nor its acceleration points back towards the inside.
    #[must_use]
    pub fn has_escaped(&self, position: Vec2, velocity: Vec2, acceleration: Vec2) -> bool {
        let escaped = |pos: f32, min: f32, max: f32, vel: f32, acc: f32| {
            (pos < min && vel <= 0.0 && acc <= 0.0) || (pos > max && vel >= 0.0 && acc >= 0.0)
        };

        escaped(
            position.x,
            self.min.x,
            self.max.x,
            velocity.x,
            acceleration.x,
        ) || escaped(
            position.y,
            self.min.y,
            self.max.y,
            velocity.y,
            acceleration.y,
        )
    }
}

/// Converts an angle in degrees to radians.
#[must_use]
pub fn to_radians(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Wraps an angle in degrees into `[0, 360)`.
#[must_use]
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bounds_from_size() {
        let bounds = Bounds::from_size(800.0, 600.0);
        assert_eq!(bounds.min, Vec2::ZERO);
        assert!((bounds.width() - 800.0).abs() < f32::EPSILON);
        assert!((bounds.height() - 600.0).abs() < f32::EPSILON);
        assert!(bounds.contains(Vec2::new(800.0, 600.0)));
        assert!(!bounds.contains(Vec2::new(-1.0, 10.0)));
    }

    #[test]
    fn test_bounds_normalises_corners() {
        let bounds = Bounds::new(Vec2::new(10.0, 5.0), Vec2::new(0.0, 20.0));
        assert_eq!(bounds.min, Vec2::new(0.0, 5.0));
        assert_eq!(bounds.max, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_falling_below_bottom_escapes() {
        let bounds = Bounds::from_size(100.0, 100.0);
        let below = Vec2::new(50.0, 120.0);
        assert!(bounds.has_escaped(below, Vec2::new(0.0, 5.0), Vec2::new(0.0, 1.0)));
        // Still rising back up
        assert!(!bounds.has_escaped(below, Vec2::new(0.0, -5.0), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_dropped_from_above_is_kept() {
        let bounds = Bounds::from_size(100.0, 100.0);
        let above = Vec2::new(50.0, -50.0);
        // Gravity pulls it into view
        assert!(!bounds.has_escaped(above, Vec2::ZERO, Vec2::new(0.0, 9.8)));
        // Nothing will ever bring it back
        assert!(bounds.has_escaped(above, Vec2::new(0.0, -1.0), Vec2::ZERO));
    }

    #[test]
    fn test_inside_never_escapes() {
        let bounds = Bounds::from_size(100.0, 100.0);
        assert!(!bounds.has_escaped(
            Vec2::new(50.0, 50.0),
            Vec2::new(-100.0, 100.0),
            Vec2::ZERO
        ));
    }

    #[test]
    fn test_wrap_degrees() {
        assert!((wrap_degrees(370.0) - 10.0).abs() < 1e-4);
        assert!((wrap_degrees(-90.0) - 270.0).abs() < 1e-4);
        assert!(wrap_degrees(360.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn wrapped_degrees_stay_in_range(degrees in -1.0e5f32..1.0e5) {
            let wrapped = wrap_degrees(degrees);
            prop_assert!((0.0..360.0).contains(&wrapped));
        }
    }
}
