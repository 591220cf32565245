//! Launch velocity sampling.

use confetti_common::{to_radians, ConfettiResult, Vec2};

use crate::random::{RandomSource, ScalarRange};

/// Direction and speed ranges particles are launched with.
///
/// Angles are stored in radians and measured from the positive x axis
/// towards positive y. On a y-down canvas 90 degrees therefore points
/// straight down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityModule {
    angle: ScalarRange,
    speed: ScalarRange,
}

impl VelocityModule {
    /// Builds a module from angle (degrees) and speed ranges.
    pub fn from_degrees(direction: ScalarRange, speed: ScalarRange) -> ConfettiResult<Self> {
        let mut module = Self::default();
        module.set_direction_range(direction)?;
        module.set_speed_range(speed)?;
        Ok(module)
    }

    /// Sets the launch direction range in degrees.
    pub fn set_direction_range(&mut self, degrees: ScalarRange) -> ConfettiResult<()> {
        degrees.validate("direction")?;
        self.angle = degrees.map(to_radians);
        Ok(())
    }

    /// Sets the launch speed range. Negative bounds are clamped to zero.
    pub fn set_speed_range(&mut self, speed: ScalarRange) -> ConfettiResult<()> {
        speed.validate("speed")?;
        self.speed = speed.map(|s| s.max(0.0));
        Ok(())
    }

    /// Angle range in radians.
    #[must_use]
    pub fn angle(&self) -> ScalarRange {
        self.angle
    }

    /// Speed range, already clamped.
    #[must_use]
    pub fn speed(&self) -> ScalarRange {
        self.speed
    }

    /// Samples an angle and a speed and returns the velocity vector.
    pub fn next_velocity<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let angle = self.angle.sample(rng);
        let speed = self.speed.sample(rng).max(0.0);
        Vec2::new(speed * angle.cos(), speed * angle.sin())
    }
}
