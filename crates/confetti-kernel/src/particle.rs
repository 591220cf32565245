//! Per-particle state and kinematics.

use confetti_common::{wrap_degrees, Bounds, Vec2};

use crate::models::{Color, Shape, Size};

/// How long a fading particle takes to go from opaque to invisible.
pub const FADE_DURATION: f32 = 0.85;

/// Lifecycle of a single particle. `Expired` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleState {
    /// Created but not yet integrated.
    #[default]
    Spawned,
    /// Integrated at least once and still visible.
    Alive,
    /// Out of time or out of bounds.
    Expired,
}

/// Everything the host needs to draw one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSprite {
    /// Center on the surface.
    pub position: Vec2,
    /// Rotation in degrees, `[0, 360)`.
    pub rotation: f32,
    /// Edge length or diameter.
    pub size: f32,
    /// Outline.
    pub shape: Shape,
    /// Base color.
    pub color: Color,
    /// Opacity multiplier in `[0, 1]`.
    pub alpha: f32,
}

/// Initial state of a particle, as sampled by an emitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSeed {
    /// Spawn position.
    pub position: Vec2,
    /// Launch velocity.
    pub velocity: Vec2,
    /// Constant acceleration (gravity over mass).
    pub acceleration: Vec2,
    /// Rotation speed in degrees per second.
    pub rotation_speed: f32,
    /// Color, fixed for life.
    pub color: Color,
    /// Size, fixed for life.
    pub size: Size,
    /// Shape, fixed for life.
    pub shape: Shape,
    /// Lifetime in seconds.
    pub time_to_live: f32,
    /// Whether alpha ramps down towards the end of life.
    pub fade_out: bool,
}

/// A single confetti particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    rotation: f32,
    rotation_speed: f32,
    color: Color,
    size: Size,
    shape: Shape,
    time_to_live: f32,
    elapsed: f32,
    fade_out: bool,
    state: ParticleState,
}

impl Particle {
    /// Creates a freshly spawned particle.
    #[must_use]
    pub fn new(seed: ParticleSeed) -> Self {
        Self {
            position: seed.position,
            velocity: seed.velocity,
            acceleration: seed.acceleration,
            rotation: 0.0,
            rotation_speed: seed.rotation_speed,
            color: seed.color,
            size: seed.size,
            shape: seed.shape,
            time_to_live: seed.time_to_live.max(0.0),
            elapsed: 0.0,
            fade_out: seed.fade_out,
            state: ParticleState::Spawned,
        }
    }

    /// Integrates the particle over `dt` seconds and returns its new state.
    ///
    /// Position follows constant-acceleration kinematics. The particle
    /// expires once its time to live is used up, or when `bounds` is given
    /// and it has left them with nothing to bring it back.
    pub fn update(&mut self, dt: f32, bounds: Option<&Bounds>) -> ParticleState {
        if self.state == ParticleState::Expired {
            return self.state;
        }
        let dt = dt.max(0.0);

        self.position += self.velocity * dt + 0.5 * self.acceleration * dt * dt;
        self.velocity += self.acceleration * dt;
        self.rotation = wrap_degrees(self.rotation + self.rotation_speed * dt);
        self.elapsed += dt;

        let escaped =
            bounds.is_some_and(|b| b.has_escaped(self.position, self.velocity, self.acceleration));
        self.state = if self.remaining() <= 0.0 || escaped {
            ParticleState::Expired
        } else {
            ParticleState::Alive
        };
        self.state
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ParticleState {
        self.state
    }

    /// Whether the particle has not expired yet.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state != ParticleState::Expired
    }

    /// Whether the particle has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.state == ParticleState::Expired
    }

    /// Seconds of life left.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        (self.time_to_live - self.elapsed).max(0.0)
    }

    /// Seconds since spawn.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Opacity in `[0, 1]`.
    ///
    /// With fade-out the ramp covers the last [`FADE_DURATION`] seconds of
    /// life (or all of it, for shorter lives), so alpha hits zero exactly
    /// when the lifetime does.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        let remaining = self.remaining();
        if remaining <= 0.0 || self.is_expired() {
            return 0.0;
        }
        if !self.fade_out {
            return 1.0;
        }
        let window = FADE_DURATION.min(self.time_to_live);
        (remaining / window).clamp(0.0, 1.0)
    }

    /// Position on the surface.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Rotation in degrees.
    #[must_use]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Spawn color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Spawn size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Spawn shape.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Read-only snapshot for drawing.
    #[must_use]
    pub fn sprite(&self) -> ParticleSprite {
        ParticleSprite {
            position: self.position,
            rotation: self.rotation,
            size: self.size.size,
            shape: self.shape,
            color: self.color,
            alpha: self.alpha(),
        }
    }
}
