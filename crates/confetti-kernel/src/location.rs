//! Spawn location sampling.

use confetti_common::{ensure_finite, ConfettiResult, Vec2};
use serde::{Deserialize, Serialize};

use crate::random::{RandomSource, ScalarRange};

/// Where particles are spawned: a fixed point or a rectangle.
///
/// Each axis is an independent [`ScalarRange`]; an axis without an upper
/// bound is pinned to its minimum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationModule {
    /// Horizontal spawn range.
    pub x: ScalarRange,
    /// Vertical spawn range.
    pub y: ScalarRange,
}

impl LocationModule {
    /// Spawns every particle at `(x, y)`.
    pub fn set_point(&mut self, x: f32, y: f32) -> ConfettiResult<()> {
        let x = ensure_finite("location.x", x)?;
        let y = ensure_finite("location.y", y)?;
        self.x = ScalarRange::fixed(x);
        self.y = ScalarRange::fixed(y);
        Ok(())
    }

    /// Sets the horizontal range. On error the previous range is kept.
    pub fn set_range_x(&mut self, min: f32, max: Option<f32>) -> ConfettiResult<()> {
        let range = ScalarRange { min, max };
        range.validate("location.x")?;
        self.x = range;
        Ok(())
    }

    /// Sets the vertical range. On error the previous range is kept.
    pub fn set_range_y(&mut self, min: f32, max: Option<f32>) -> ConfettiResult<()> {
        let range = ScalarRange { min, max };
        range.validate("location.y")?;
        self.y = range;
        Ok(())
    }

    /// Checks both axes.
    pub fn validate(&self) -> ConfettiResult<()> {
        self.x.validate("location.x")?;
        self.y.validate("location.y")
    }

    /// Samples one spawn coordinate, each axis independently.
    pub fn next_location<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let x = self.x.sample(rng);
        let y = self.y.sample(rng);
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceSource;

    #[test]
    fn test_point_is_exact() {
        let mut location = LocationModule::default();
        location.set_point(100.0, 50.0).expect("finite point");
        let mut rng = fastrand::Rng::with_seed(1);
        for _ in 0..8 {
            assert_eq!(location.next_location(&mut rng), Vec2::new(100.0, 50.0));
        }
    }

    #[test]
    fn test_ranges_sample_per_axis() {
        let mut location = LocationModule::default();
        location.set_range_x(0.0, Some(100.0)).expect("x range");
        location.set_range_y(-50.0, None).expect("y range");
        let mut rng = SequenceSource::new([0.25, 0.75]);
        assert_eq!(location.next_location(&mut rng), Vec2::new(25.0, -50.0));
        // The pinned axis consumes no randomness
        assert_eq!(location.next_location(&mut rng), Vec2::new(75.0, -50.0));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut location = LocationModule::default();
        location.set_point(3.0, 4.0).expect("finite point");
        assert!(location.set_range_x(10.0, Some(0.0)).is_err());
        assert!(location.set_point(f32::NAN, 0.0).is_err());
        assert_eq!(location.x, ScalarRange::fixed(3.0));
    }
}
