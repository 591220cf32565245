//! Serialisable emission settings.
//!
//! [`EmissionConfig`] is the declarative form of everything the
//! [`ParticleSystem`](crate::ParticleSystem) setters configure, so effects
//! can be described in a file and applied in one call.

use std::time::Duration;

use confetti_common::{ensure_finite, ConfettiResult, Vec2};
use serde::{Deserialize, Serialize};

use crate::location::LocationModule;
use crate::models::{Color, Palette, Shape, Size};
use crate::random::ScalarRange;
use crate::velocity::VelocityModule;

/// Default time to live of a particle.
pub const DEFAULT_TIME_TO_LIVE: Duration = Duration::from_millis(2000);

/// Default gravity force, pointing down the y-down canvas.
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, 36.0);

/// Per-particle behaviour shared by every particle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleStyle {
    /// Lifetime of each particle in milliseconds.
    pub time_to_live_ms: u64,
    /// Ramp alpha down before expiry.
    pub fade_out: bool,
    /// Force applied to every particle; divided by the particle's mass.
    pub gravity: Vec2,
    /// Rotation speed range in degrees per second.
    pub rotation_speed: ScalarRange,
}

impl Default for ParticleStyle {
    fn default() -> Self {
        Self {
            time_to_live_ms: DEFAULT_TIME_TO_LIVE.as_millis() as u64,
            fade_out: true,
            gravity: DEFAULT_GRAVITY,
            rotation_speed: ScalarRange::between(17.4, 69.6),
        }
    }
}

impl ParticleStyle {
    /// Lifetime as a [`Duration`].
    #[must_use]
    pub fn time_to_live(&self) -> Duration {
        Duration::from_millis(self.time_to_live_ms)
    }

    /// Checks the gravity vector and rotation range.
    pub fn validate(&self) -> ConfettiResult<()> {
        ensure_finite("gravity.x", self.gravity.x)?;
        ensure_finite("gravity.y", self.gravity.y)?;
        self.rotation_speed.validate("rotation_speed")
    }
}

/// Complete description of an effect's spawn parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionConfig {
    /// Spawn point or rectangle.
    pub location: LocationModule,
    /// Launch direction range in degrees.
    pub direction: ScalarRange,
    /// Launch speed range; negative values are clamped to zero.
    pub speed: ScalarRange,
    /// Colors particles pick from.
    pub colors: Vec<Color>,
    /// Sizes particles pick from.
    pub sizes: Vec<Size>,
    /// Shapes particles pick from.
    pub shapes: Vec<Shape>,
    /// Lifetime, fade, gravity and rotation.
    pub style: ParticleStyle,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        let palette = Palette::default();
        Self {
            location: LocationModule::default(),
            direction: ScalarRange::fixed(0.0),
            speed: ScalarRange::fixed(0.0),
            colors: palette.colors().to_vec(),
            sizes: palette.sizes().to_vec(),
            shapes: palette.shapes().to_vec(),
            style: ParticleStyle::default(),
        }
    }
}

impl EmissionConfig {
    /// Validates every field and builds the runtime modules.
    pub fn build(&self) -> ConfettiResult<(LocationModule, VelocityModule, Palette, ParticleStyle)> {
        self.location.validate()?;
        let velocity = VelocityModule::from_degrees(self.direction, self.speed)?;
        let palette = Palette::new(
            self.colors.iter().copied(),
            self.sizes.iter().copied(),
            self.shapes.iter().copied(),
        )?;
        self.style.validate()?;
        Ok((self.location, velocity, palette, self.style))
    }
}

/// How an effect emits its particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Trigger {
    /// Spawn `amount` particles at once.
    Burst {
        /// Number of particles.
        amount: usize,
    },
    /// Spawn `rate` particles per second, optionally bounded.
    Stream {
        /// Particles per second; negative rates are treated as zero.
        rate: f32,
        /// Stop spawning after this many milliseconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
        /// Stop spawning after this many particles.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_particles: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use confetti_common::ConfettiError;

    #[test]
    fn test_default_builds() {
        let (location, velocity, palette, style) =
            EmissionConfig::default().build().expect("defaults are valid");
        assert_eq!(location, LocationModule::default());
        assert_eq!(velocity.speed(), ScalarRange::fixed(0.0));
        assert_eq!(palette, Palette::default());
        assert_eq!(style.time_to_live(), DEFAULT_TIME_TO_LIVE);
    }

    #[test]
    fn test_empty_palette_rejected() {
        let config = EmissionConfig {
            shapes: Vec::new(),
            ..EmissionConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(ConfettiError::InvalidConfiguration { field: "shapes", .. })
        ));
    }

    #[test]
    fn test_inverted_direction_rejected() {
        let config = EmissionConfig {
            direction: ScalarRange::between(90.0, 0.0),
            ..EmissionConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(ConfettiError::InvalidRange { field: "direction", .. })
        ));
    }

    #[test]
    fn test_parse_partial_toml() {
        let text = r##"
            colors = ["#FF0000", "#00FF00"]
            shapes = ["circle"]

            [location.x]
            min = 0.0
            max = 800.0

            [location.y]
            min = -50.0

            [speed]
            min = 100.0
            max = 300.0

            [style]
            time_to_live_ms = 3000
        "##;
        let config: EmissionConfig = toml::from_str(text).expect("parse config");
        assert_eq!(config.colors, vec![Color::RED, Color::GREEN]);
        assert_eq!(config.shapes, vec![Shape::Circle]);
        assert_eq!(config.sizes, vec![Size::SMALL]);
        assert_eq!(config.location.x, ScalarRange::between(0.0, 800.0));
        assert_eq!(config.location.y, ScalarRange::fixed(-50.0));
        assert_eq!(config.style.time_to_live_ms, 3000);
        assert!(config.style.fade_out);
        assert!(config.build().is_ok());
    }

    #[test]
    fn test_trigger_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            trigger: Trigger,
        }
        let burst: Wrapper =
            toml::from_str("[trigger]\nmode = \"burst\"\namount = 40").expect("burst");
        assert_eq!(burst.trigger, Trigger::Burst { amount: 40 });

        let stream: Wrapper = toml::from_str("[trigger]\nmode = \"stream\"\nrate = 12.5\nduration_ms = 500")
            .expect("stream");
        assert_eq!(
            stream.trigger,
            Trigger::Stream {
                rate: 12.5,
                duration_ms: Some(500),
                max_particles: None
            }
        );
    }
}
