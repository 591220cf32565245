//! The seam between the kernel and the surface it draws on.

use confetti_common::Bounds;

use crate::particle::ParticleSprite;

/// A drawing surface owned by the host.
///
/// The kernel never rasterises: it asks for the visible bounds once per
/// frame and hands over one [`ParticleSprite`] per live particle.
pub trait Canvas {
    /// Visible area. `None` disables out-of-bounds retirement.
    fn bounds(&self) -> Option<Bounds>;

    /// Draws one particle.
    fn draw(&mut self, sprite: &ParticleSprite);
}

/// Canvas that keeps every sprite drawn since the last [`clear`](Self::clear).
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    bounds: Option<Bounds>,
    sprites: Vec<ParticleSprite>,
}

impl RecordingCanvas {
    /// Creates a canvas with the given visible bounds.
    #[must_use]
    pub fn new(bounds: Option<Bounds>) -> Self {
        Self {
            bounds,
            sprites: Vec::new(),
        }
    }

    /// Sprites drawn so far.
    #[must_use]
    pub fn sprites(&self) -> &[ParticleSprite] {
        &self.sprites
    }

    /// Forgets recorded sprites, typically at the start of a frame.
    pub fn clear(&mut self) {
        self.sprites.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    fn draw(&mut self, sprite: &ParticleSprite) {
        self.sprites.push(*sprite);
    }
}
