//! In-memory drawing surface.
//!
//! Stands in for a real view: it reports its visible bounds and tallies
//! the draw calls it receives instead of rasterising them.

use confetti_common::Bounds;
use confetti_kernel::{Canvas, ParticleSprite, Shape};

/// Draw statistics of a headless surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceStats {
    /// Draw calls in the current frame
    pub frame_draws: usize,
    /// Draw calls across all frames
    pub total_draws: u64,
    /// Most draw calls seen in a single frame
    pub peak_draws: usize,
    /// Rectangles drawn in the current frame
    pub rects: usize,
    /// Circles drawn in the current frame
    pub circles: usize,
    /// Sum of alpha over the current frame
    alpha_sum: f32,
}

impl SurfaceStats {
    /// Mean opacity of the current frame's sprites.
    #[must_use]
    pub fn mean_alpha(&self) -> f32 {
        if self.frame_draws == 0 {
            0.0
        } else {
            self.alpha_sum / self.frame_draws as f32
        }
    }
}

/// Headless canvas.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    bounds: Bounds,
    clip: bool,
    stats: SurfaceStats,
}

impl HeadlessSurface {
    /// Create a `width` x `height` surface. With `clip` unset particles are
    /// never retired for leaving it.
    #[must_use]
    pub fn new(width: u32, height: u32, clip: bool) -> Self {
        Self {
            bounds: Bounds::from_size(width as f32, height as f32),
            clip,
            stats: SurfaceStats::default(),
        }
    }

    /// Reset per-frame counters.
    pub fn begin_frame(&mut self) {
        self.stats.frame_draws = 0;
        self.stats.rects = 0;
        self.stats.circles = 0;
        self.stats.alpha_sum = 0.0;
    }

    /// Close the frame and fold it into the running totals.
    pub fn end_frame(&mut self) {
        self.stats.peak_draws = self.stats.peak_draws.max(self.stats.frame_draws);
    }

    /// Current statistics.
    #[must_use]
    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }
}

impl Canvas for HeadlessSurface {
    fn bounds(&self) -> Option<Bounds> {
        self.clip.then_some(self.bounds)
    }

    fn draw(&mut self, sprite: &ParticleSprite) {
        self.stats.frame_draws += 1;
        self.stats.total_draws += 1;
        self.stats.alpha_sum += sprite.alpha;
        match sprite.shape {
            Shape::Rect => self.stats.rects += 1,
            Shape::Circle => self.stats.circles += 1,
        }
    }
}
