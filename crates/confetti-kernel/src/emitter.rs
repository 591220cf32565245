//! Burst and stream emitters.
//!
//! An emitter owns the live particle population of one run. [`Emitter`]
//! is a sum type over the two emission strategies:
//!
//! | Variant | Behaviour |
//! |---------|-----------|
//! | [`Emitter::Burst`] | Spawns a fixed amount at once, then only ages them |
//! | [`Emitter::Stream`] | Spawns at a target rate, optionally bounded by time and count |
//!
//! Both share the same per-frame step: age every live particle, drop the
//! expired ones, then (streams only) spawn what the emission credit allows.

use std::time::Duration;

use confetti_common::Bounds;
use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::config::ParticleStyle;
use crate::location::LocationModule;
use crate::models::Palette;
use crate::particle::{Particle, ParticleSeed};
use crate::random::RandomSource;
use crate::velocity::VelocityModule;

/// Frozen spawn parameters of one run.
///
/// Configuration changes made after an emitter starts do not reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    location: LocationModule,
    velocity: VelocityModule,
    palette: Palette,
    style: ParticleStyle,
}

impl Spawner {
    /// Bundles already validated modules.
    #[must_use]
    pub fn new(
        location: LocationModule,
        velocity: VelocityModule,
        palette: Palette,
        style: ParticleStyle,
    ) -> Self {
        Self {
            location,
            velocity,
            palette,
            style,
        }
    }

    /// Samples one new particle.
    pub fn spawn<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Particle {
        let position = self.location.next_location(rng);
        let velocity = self.velocity.next_velocity(rng);
        let (color, size, shape) = self.palette.pick(rng);
        let rotation_speed = self.style.rotation_speed.sample(rng);

        Particle::new(ParticleSeed {
            position,
            velocity,
            acceleration: self.style.gravity / size.mass,
            rotation_speed,
            color,
            size,
            shape,
            time_to_live: self.style.time_to_live().as_secs_f32(),
            fade_out: self.style.fade_out,
        })
    }
}

/// Ages every particle and drops the expired ones.
fn age(particles: &mut Vec<Particle>, dt: f32, bounds: Option<&Bounds>) {
    for particle in particles.iter_mut() {
        particle.update(dt, bounds);
    }
    particles.retain(Particle::is_alive);
}

/// One-shot emitter.
#[derive(Debug, Clone)]
pub struct BurstEmitter {
    particles: Vec<Particle>,
    spawned: usize,
}

impl BurstEmitter {
    /// Spawns `amount` particles immediately.
    pub fn new<R: RandomSource + ?Sized>(spawner: &Spawner, amount: usize, rng: &mut R) -> Self {
        let particles: Vec<Particle> = (0..amount).map(|_| spawner.spawn(rng)).collect();
        debug!("Burst of {} particles", amount);
        Self {
            particles,
            spawned: amount,
        }
    }

    /// Ages the population by `delta`.
    pub fn advance(&mut self, delta: Duration, bounds: Option<&Bounds>) {
        let had_particles = !self.particles.is_empty();
        age(&mut self.particles, delta.as_secs_f32(), bounds);
        if had_particles && self.particles.is_empty() {
            debug!("Burst finished");
        }
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles the burst created.
    #[must_use]
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Whether every particle has expired.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Why a stream stopped spawning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStop {
    /// The emitting duration elapsed.
    TimeElapsed,
    /// The particle cap was reached.
    CapReached,
    /// Stopped by the caller.
    Stopped,
    /// Nothing to emit (zero or excessive rate, zero duration or cap).
    Inert,
}

/// Highest accepted stream rate in particles per second. Faster streams are
/// treated as misconfigured and emit nothing.
pub const MAX_RATE: f32 = 10_000.0;

/// Most particles a stream spawns in one frame. Credit beyond that after a
/// long frame gap is dropped instead of caught up.
pub const MAX_SPAWN_PER_FRAME: usize = 10_000;

/// Rate-based emitter.
///
/// The emission credit is derived from totals: `rate * emitting time` minus
/// what was already spawned or dropped. The whole part is spawned each frame
/// and the fraction carries over, so the long-run rate matches `rate`
/// whatever the frame cadence.
#[derive(Debug, Clone)]
pub struct StreamEmitter {
    spawner: Spawner,
    particles: Vec<Particle>,
    rate: f64,
    duration: Option<Duration>,
    max_particles: Option<usize>,
    elapsed: Duration,
    emitted: Duration,
    spawned: usize,
    dropped: usize,
    stopped: Option<StreamStop>,
}

impl StreamEmitter {
    /// Creates a stream. Spawning starts on the first [`advance`](Self::advance).
    ///
    /// A negative or non-finite `rate` is treated as zero. A zero rate,
    /// duration or cap yields an inert emitter, and so does a rate above
    /// [`MAX_RATE`].
    #[must_use]
    pub fn new(
        spawner: Spawner,
        rate: f32,
        duration: Option<Duration>,
        max_particles: Option<usize>,
    ) -> Self {
        let rate = if rate.is_finite() { f64::from(rate.max(0.0)) } else { 0.0 };
        let too_fast = rate > f64::from(MAX_RATE);
        let inert = rate == 0.0
            || too_fast
            || duration.is_some_and(|d| d.is_zero())
            || max_particles == Some(0);
        if too_fast {
            warn!("Stream rate {rate}/s exceeds {MAX_RATE}/s, emitting nothing");
        } else if inert {
            debug!("Stream has nothing to emit");
        } else {
            debug!(
                "Stream at {} particles/s, duration {:?}, max {:?}",
                rate, duration, max_particles
            );
        }

        Self {
            spawner,
            particles: Vec::new(),
            rate,
            duration,
            max_particles,
            elapsed: Duration::ZERO,
            emitted: Duration::ZERO,
            spawned: 0,
            dropped: 0,
            stopped: inert.then_some(StreamStop::Inert),
        }
    }

    /// Ages the population, then spawns what the credit allows.
    pub fn advance<R: RandomSource + ?Sized>(
        &mut self,
        delta: Duration,
        rng: &mut R,
        bounds: Option<&Bounds>,
    ) {
        age(&mut self.particles, delta.as_secs_f32(), bounds);

        if self.stopped.is_some() {
            return;
        }

        // Only the part of the frame inside the emitting window earns credit
        let window = match self.duration {
            Some(duration) => delta.min(duration.saturating_sub(self.elapsed)),
            None => delta,
        };
        self.elapsed = self.elapsed.saturating_add(delta);
        self.emitted = self.emitted.saturating_add(window);

        // Recomputed from totals so rounding never accumulates across frames
        let target = (self.rate * self.emitted.as_secs_f64() + 1e-9).floor() as usize;
        let mut count = target.saturating_sub(self.spawned + self.dropped);
        if count > MAX_SPAWN_PER_FRAME {
            warn!(
                "Stream dropped {} particles after a {:?} frame",
                count - MAX_SPAWN_PER_FRAME,
                delta
            );
            self.dropped += count - MAX_SPAWN_PER_FRAME;
            count = MAX_SPAWN_PER_FRAME;
        }
        if let Some(max) = self.max_particles {
            count = count.min(max.saturating_sub(self.spawned));
        }

        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(self.spawner.spawn(rng));
        }
        self.spawned += count;

        if self.max_particles.is_some_and(|max| self.spawned >= max) {
            self.stop_with(StreamStop::CapReached);
        } else if self.duration.is_some_and(|d| self.elapsed >= d) {
            self.stop_with(StreamStop::TimeElapsed);
        }
    }

    fn stop_with(&mut self, reason: StreamStop) {
        if self.stopped.is_none() {
            debug!(
                "Stream stopped spawning ({:?}) after {} particles",
                reason, self.spawned
            );
            self.stopped = Some(reason);
        }
    }

    /// Stops spawning; live particles keep going.
    pub fn stop(&mut self) {
        self.stop_with(StreamStop::Stopped);
    }

    /// Why spawning stopped, if it has.
    #[must_use]
    pub fn stop_reason(&self) -> Option<StreamStop> {
        self.stopped
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particles spawned so far.
    #[must_use]
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Emission time elapsed so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whether spawning stopped and every particle expired.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.stopped.is_some() && self.particles.is_empty()
    }
}

/// The emitter of one run.
#[derive(Debug, Clone)]
pub enum Emitter {
    /// One-shot emission.
    Burst(BurstEmitter),
    /// Rate-based emission.
    Stream(StreamEmitter),
}

impl Emitter {
    /// Per-frame step: age, reap, and spawn for streams.
    pub fn advance<R: RandomSource + ?Sized>(
        &mut self,
        delta: Duration,
        rng: &mut R,
        bounds: Option<&Bounds>,
    ) {
        match self {
            Self::Burst(burst) => burst.advance(delta, bounds),
            Self::Stream(stream) => stream.advance(delta, rng, bounds),
        }
    }

    /// Advances by `delta` against the canvas bounds, then draws every survivor.
    pub fn render<R, C>(&mut self, canvas: &mut C, delta: Duration, rng: &mut R)
    where
        R: RandomSource + ?Sized,
        C: Canvas + ?Sized,
    {
        let bounds = canvas.bounds();
        self.advance(delta, rng, bounds.as_ref());
        for particle in self.particles() {
            canvas.draw(&particle.sprite());
        }
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        match self {
            Self::Burst(burst) => burst.particles(),
            Self::Stream(stream) => stream.particles(),
        }
    }

    /// Total particles spawned by this run.
    #[must_use]
    pub fn spawned(&self) -> usize {
        match self {
            Self::Burst(burst) => burst.spawned(),
            Self::Stream(stream) => stream.spawned(),
        }
    }

    /// Stops spawning. A burst has nothing left to stop.
    pub fn stop(&mut self) {
        if let Self::Stream(stream) = self {
            stream.stop();
        }
    }

    /// Whether the run produces no more work.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match self {
            Self::Burst(burst) => burst.is_finished(),
            Self::Stream(stream) => stream.is_finished(),
        }
    }
}
