//! The particle system facade.
//!
//! Collects configuration through chained setters (or an
//! [`EmissionConfig`]), starts exactly one [`Emitter`] per trigger and
//! forwards the host's per-frame `render` call to it.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use confetti_kernel::{Color, ParticleSystem, RecordingCanvas};
//!
//! # fn main() -> confetti_kernel::ConfettiResult<()> {
//! let mut system = ParticleSystem::with_seed(42);
//! system
//!     .set_position(100.0, 100.0)?
//!     .add_colors([Color::RED, Color::YELLOW])?
//!     .set_direction_range(0.0, 180.0)?
//!     .set_speed_range(50.0, 120.0)?
//!     .burst(40);
//!
//! let mut canvas = RecordingCanvas::default();
//! system.render(&mut canvas, Duration::from_millis(16));
//! assert_eq!(canvas.sprites().len(), 40);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use confetti_common::{ensure_finite, Bounds, ConfettiResult, Vec2};
use tracing::debug;

use crate::canvas::Canvas;
use crate::config::{EmissionConfig, ParticleStyle, Trigger};
use crate::emitter::{BurstEmitter, Emitter, Spawner, StreamEmitter};
use crate::location::LocationModule;
use crate::models::{Color, Palette, Shape, Size};
use crate::particle::Particle;
use crate::random::{RandomSource, ScalarRange};
use crate::velocity::VelocityModule;

/// Declarative confetti effect.
///
/// Setters validate eagerly; a rejected value leaves the previous setting
/// in place. Triggers never fail: a degenerate trigger just produces an
/// emitter with nothing to do.
#[derive(Debug)]
pub struct ParticleSystem<R: RandomSource = fastrand::Rng> {
    rng: R,
    location: LocationModule,
    velocity: VelocityModule,
    palette: Palette,
    style: ParticleStyle,
    emitter: Option<Emitter>,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleSystem {
    /// Creates a system with an entropy-seeded generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    /// Creates a system with a reproducible generator.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }
}

impl<R: RandomSource> ParticleSystem<R> {
    /// Creates a system with default settings drawing from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            location: LocationModule::default(),
            velocity: VelocityModule::default(),
            palette: Palette::default(),
            style: ParticleStyle::default(),
            emitter: None,
        }
    }

    /// Creates a system from a declarative configuration.
    pub fn from_config(config: &EmissionConfig, rng: R) -> ConfettiResult<Self> {
        let mut system = Self::with_rng(rng);
        system.apply_config(config)?;
        Ok(system)
    }

    /// Replaces every setting at once. Nothing changes on error.
    pub fn apply_config(&mut self, config: &EmissionConfig) -> ConfettiResult<&mut Self> {
        let (location, velocity, palette, style) = config.build()?;
        self.location = location;
        self.velocity = velocity;
        self.palette = palette;
        self.style = style;
        Ok(self)
    }

    /// Spawns particles at a single point.
    pub fn set_position(&mut self, x: f32, y: f32) -> ConfettiResult<&mut Self> {
        self.location.set_point(x, y)?;
        Ok(self)
    }

    /// Spawns particles inside a rectangle. An absent maximum pins that axis
    /// to its minimum.
    pub fn set_position_range(
        &mut self,
        min_x: f32,
        max_x: Option<f32>,
        min_y: f32,
        max_y: Option<f32>,
    ) -> ConfettiResult<&mut Self> {
        let mut location = self.location;
        location.set_range_x(min_x, max_x)?;
        location.set_range_y(min_y, max_y)?;
        self.location = location;
        Ok(self)
    }

    /// Replaces the color palette.
    pub fn add_colors(&mut self, colors: impl IntoIterator<Item = Color>) -> ConfettiResult<&mut Self> {
        self.palette.set_colors(colors)?;
        Ok(self)
    }

    /// Replaces the size palette.
    pub fn add_sizes(&mut self, sizes: impl IntoIterator<Item = Size>) -> ConfettiResult<&mut Self> {
        self.palette.set_sizes(sizes)?;
        Ok(self)
    }

    /// Replaces the shape palette.
    pub fn add_shapes(&mut self, shapes: impl IntoIterator<Item = Shape>) -> ConfettiResult<&mut Self> {
        self.palette.set_shapes(shapes)?;
        Ok(self)
    }

    /// Launches every particle in one direction, in degrees.
    pub fn set_direction(&mut self, degrees: f32) -> ConfettiResult<&mut Self> {
        self.velocity.set_direction_range(ScalarRange::fixed(degrees))?;
        Ok(self)
    }

    /// Launches particles anywhere between two directions, in degrees.
    pub fn set_direction_range(&mut self, min_degrees: f32, max_degrees: f32) -> ConfettiResult<&mut Self> {
        self.velocity
            .set_direction_range(ScalarRange::between(min_degrees, max_degrees))?;
        Ok(self)
    }

    /// Launches every particle at one speed. Negative speeds become zero.
    pub fn set_speed(&mut self, speed: f32) -> ConfettiResult<&mut Self> {
        self.velocity.set_speed_range(ScalarRange::fixed(speed))?;
        Ok(self)
    }

    /// Launches particles at a speed between `min` and `max`. Negative
    /// bounds become zero.
    pub fn set_speed_range(&mut self, min: f32, max: f32) -> ConfettiResult<&mut Self> {
        self.velocity
            .set_speed_range(ScalarRange::between(min, max))?;
        Ok(self)
    }

    /// Sets the rotation speed range in degrees per second.
    pub fn set_rotation_speed_range(&mut self, min: f32, max: f32) -> ConfettiResult<&mut Self> {
        let range = ScalarRange::between(min, max);
        range.validate("rotation_speed")?;
        self.style.rotation_speed = range;
        Ok(self)
    }

    /// Sets the gravity force (divided by each particle's mass).
    pub fn set_gravity(&mut self, gravity: Vec2) -> ConfettiResult<&mut Self> {
        ensure_finite("gravity.x", gravity.x)?;
        ensure_finite("gravity.y", gravity.y)?;
        self.style.gravity = gravity;
        Ok(self)
    }

    /// Sets how long each particle lives.
    pub fn set_time_to_live(&mut self, time_to_live: Duration) -> &mut Self {
        self.style.time_to_live_ms = time_to_live.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Enables or disables the fade towards the end of life.
    pub fn enable_fade_out(&mut self, fade_out: bool) -> &mut Self {
        self.style.fade_out = fade_out;
        self
    }

    fn spawner(&self) -> Spawner {
        Spawner::new(self.location, self.velocity, self.palette.clone(), self.style)
    }

    fn replace_emitter(&mut self, emitter: Emitter) {
        if let Some(previous) = self.emitter.as_ref().filter(|e| !e.is_finished()) {
            debug!(
                "Replacing emitter with {} live particles",
                previous.particles().len()
            );
        }
        self.emitter = Some(emitter);
    }

    /// Spawns `amount` particles at once, replacing any running emitter.
    pub fn burst(&mut self, amount: usize) {
        let emitter = BurstEmitter::new(&self.spawner(), amount, &mut self.rng);
        self.replace_emitter(Emitter::Burst(emitter));
    }

    /// Emits `rate` particles per second until stopped.
    pub fn emit(&mut self, rate: f32) {
        self.start_stream(rate, None, None);
    }

    /// Emits `rate` particles per second for `duration_ms` milliseconds.
    pub fn emit_for(&mut self, rate: f32, duration_ms: u64) {
        self.start_stream(rate, Some(Duration::from_millis(duration_ms)), None);
    }

    /// Emits `rate` particles per second for `duration_ms` milliseconds or
    /// until `max_particles` were spawned, whichever comes first.
    pub fn emit_capped(&mut self, rate: f32, duration_ms: u64, max_particles: usize) {
        self.start_stream(
            rate,
            Some(Duration::from_millis(duration_ms)),
            Some(max_particles),
        );
    }

    /// Starts the emission described by `trigger`.
    pub fn start(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::Burst { amount } => self.burst(amount),
            Trigger::Stream {
                rate,
                duration_ms,
                max_particles,
            } => self.start_stream(rate, duration_ms.map(Duration::from_millis), max_particles),
        }
    }

    fn start_stream(&mut self, rate: f32, duration: Option<Duration>, max_particles: Option<usize>) {
        let emitter = StreamEmitter::new(self.spawner(), rate, duration, max_particles);
        self.replace_emitter(Emitter::Stream(emitter));
    }

    /// Stops spawning; particles already in flight live out their lives.
    pub fn stop_gracefully(&mut self) {
        if let Some(emitter) = self.emitter.as_mut() {
            emitter.stop();
        }
    }

    /// Drops the emitter and every particle immediately.
    pub fn reset(&mut self) {
        self.emitter = None;
    }

    /// Advances the active emitter without drawing.
    pub fn advance(&mut self, delta: Duration, bounds: Option<&Bounds>) {
        if let Some(emitter) = self.emitter.as_mut() {
            emitter.advance(delta, &mut self.rng, bounds);
        }
    }

    /// Per-frame entry point: advance by `delta`, then draw every survivor.
    pub fn render<C: Canvas + ?Sized>(&mut self, canvas: &mut C, delta: Duration) {
        if let Some(emitter) = self.emitter.as_mut() {
            emitter.render(canvas, delta, &mut self.rng);
        }
    }

    /// Live particles of the active emitter.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        self.emitter
            .as_ref()
            .map(Emitter::particles)
            .unwrap_or_default()
    }

    /// Number of live particles.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.particles().len()
    }

    /// Particles spawned by the active emitter so far.
    #[must_use]
    pub fn spawned_count(&self) -> usize {
        self.emitter.as_ref().map_or(0, Emitter::spawned)
    }

    /// The active emitter, if any.
    #[must_use]
    pub fn emitter(&self) -> Option<&Emitter> {
        self.emitter.as_ref()
    }

    /// Whether an emitter has been started and still has work.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.emitter.as_ref().is_some_and(|e| !e.is_finished())
    }

    /// Whether there is nothing left to spawn or draw.
    #[must_use]
    pub fn is_done(&self) -> bool {
        !self.is_active()
    }

    /// Current spawn location settings.
    #[must_use]
    pub fn location(&self) -> &LocationModule {
        &self.location
    }

    /// Current velocity settings.
    #[must_use]
    pub fn velocity(&self) -> &VelocityModule {
        &self.velocity
    }

    /// Current palette.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Current particle style.
    #[must_use]
    pub fn style(&self) -> &ParticleStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::emitter::StreamStop;
    use confetti_common::ConfettiError;

    const FRAME: Duration = Duration::from_millis(100);

    #[test]
    fn test_single_particle_scenario() {
        let mut system = ParticleSystem::with_seed(1);
        system
            .set_position(100.0, 100.0)
            .and_then(|s| s.add_colors([Color::RED]))
            .and_then(|s| s.set_direction(90.0))
            .and_then(|s| s.set_speed(5.0))
            .expect("valid settings")
            .burst(1);

        let particles = system.particles();
        assert_eq!(particles.len(), 1);
        let particle = &particles[0];
        assert_eq!(particle.position(), Vec2::new(100.0, 100.0));
        assert!(particle.velocity().x.abs() < 1e-4);
        assert!((particle.velocity().y - 5.0).abs() < 1e-4);
        assert_eq!(particle.color(), Color::RED);
    }

    #[test]
    fn test_stream_scenario() {
        let mut system = ParticleSystem::with_seed(2);
        system.emit_for(10.0, 1000);
        let mut canvas = RecordingCanvas::default();
        for _ in 0..10 {
            system.render(&mut canvas, FRAME);
        }
        assert_eq!(system.spawned_count(), 10);
        system.render(&mut canvas, FRAME);
        assert_eq!(system.spawned_count(), 10);
    }

    #[test]
    fn test_burst_draws_every_particle() {
        let mut system = ParticleSystem::with_seed(3);
        system.burst(12);
        let mut canvas = RecordingCanvas::default();
        system.render(&mut canvas, Duration::ZERO);
        assert_eq!(canvas.sprites().len(), 12);
    }

    #[test]
    fn test_zero_burst_is_done() {
        let mut system = ParticleSystem::with_seed(4);
        system.burst(0);
        assert_eq!(system.particle_count(), 0);
        assert!(system.is_done());
    }

    #[test]
    fn test_new_trigger_replaces_emitter() {
        let mut system = ParticleSystem::with_seed(5);
        system.burst(30);
        system.burst(3);
        assert_eq!(system.particle_count(), 3);
        assert_eq!(system.spawned_count(), 3);

        system.emit(10.0);
        assert_eq!(system.particle_count(), 0);
        assert!(matches!(system.emitter(), Some(Emitter::Stream(_))));
    }

    #[test]
    fn test_settings_frozen_per_run() {
        let mut system = ParticleSystem::with_seed(6);
        system.set_position(1.0, 1.0).expect("point");
        system.emit(10.0);
        system.set_position(500.0, 500.0).expect("point");
        system.advance(FRAME, None);
        assert_eq!(system.particles()[0].position(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut system = ParticleSystem::with_seed(7);
        assert!(matches!(
            system.add_colors(Vec::new()),
            Err(ConfettiError::InvalidConfiguration { field: "colors", .. })
        ));
        assert!(matches!(
            system.set_speed_range(10.0, 1.0),
            Err(ConfettiError::InvalidRange { field: "speed", .. })
        ));
        assert!(system
            .set_position_range(0.0, Some(10.0), 5.0, Some(1.0))
            .is_err());
        // The valid x axis of the rejected call was not applied either
        assert_eq!(system.location().x, ScalarRange::fixed(0.0));
        assert!(system.set_gravity(Vec2::new(f32::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_negative_speed_clamped() {
        let mut system = ParticleSystem::with_seed(8);
        system
            .set_speed_range(-10.0, -2.0)
            .expect("ordered range")
            .burst(20);
        assert!(system.particles().iter().all(|p| p.velocity().length() == 0.0));
    }

    #[test]
    fn test_stop_gracefully() {
        let mut system = ParticleSystem::with_seed(9);
        system.set_time_to_live(Duration::from_millis(300)).emit(10.0);
        system.advance(FRAME, None);
        system.stop_gracefully();
        assert!(matches!(
            system.emitter(),
            Some(Emitter::Stream(s)) if s.stop_reason() == Some(StreamStop::Stopped)
        ));
        assert!(system.is_active());
        for _ in 0..4 {
            system.advance(FRAME, None);
        }
        assert_eq!(system.spawned_count(), 1);
        assert!(system.is_done());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut system = ParticleSystem::with_seed(10);
        system.burst(5);
        system.reset();
        assert!(system.emitter().is_none());
        assert_eq!(system.particle_count(), 0);
        assert!(system.is_done());
    }

    #[test]
    fn test_render_retires_out_of_bounds() {
        let mut system = ParticleSystem::with_seed(11);
        system
            .set_position(50.0, 90.0)
            .and_then(|s| s.set_direction(90.0))
            .and_then(|s| s.set_speed(100.0))
            .expect("valid settings")
            .burst(4);
        let mut canvas = RecordingCanvas::new(Some(Bounds::from_size(100.0, 100.0)));
        system.render(&mut canvas, FRAME);
        assert!(canvas.sprites().is_empty());
        assert!(system.is_done());
    }

    #[test]
    fn test_apply_config_is_atomic() {
        let mut system = ParticleSystem::with_seed(12);
        let config = EmissionConfig {
            colors: vec![Color::BLUE],
            speed: ScalarRange::between(5.0, 1.0),
            ..EmissionConfig::default()
        };
        assert!(system.apply_config(&config).is_err());
        assert_eq!(system.palette().colors(), &[Color::RED]);

        let config = EmissionConfig {
            colors: vec![Color::BLUE],
            ..EmissionConfig::default()
        };
        system.apply_config(&config).expect("valid config");
        assert_eq!(system.palette().colors(), &[Color::BLUE]);
    }

    #[test]
    fn test_start_trigger() {
        let mut system = ParticleSystem::with_seed(13);
        system.start(Trigger::Stream {
            rate: 50.0,
            duration_ms: None,
            max_particles: Some(3),
        });
        system.advance(FRAME, None);
        assert_eq!(system.spawned_count(), 3);
        system.start(Trigger::Burst { amount: 7 });
        assert_eq!(system.particle_count(), 7);
    }

    #[test]
    fn test_expired_absent_after_advance() {
        let mut system = ParticleSystem::with_seed(14);
        system.set_time_to_live(Duration::from_millis(100)).burst(6);
        system.advance(FRAME, None);
        assert_eq!(system.particle_count(), 0);
    }
}
