//! Frame pacing for the headless host.
//!
//! The headless surface has no display to wait on, so frame deltas are
//! simulated: a fixed budget derived from the target frame rate, optionally
//! perturbed by random jitter to mimic an irregular render loop.

use std::collections::VecDeque;
use std::time::Duration;

/// Maximum delta handed to the simulation (prevents huge catch-up steps).
const MAX_DELTA: Duration = Duration::from_millis(250);

/// Simulated frame clock.
#[derive(Debug)]
pub struct FrameClock {
    /// Target frames per second
    target_fps: u32,
    /// Time budget per frame
    frame_budget: Duration,
    /// Jitter as a fraction of the budget
    jitter: f32,
    /// Source of jitter
    rng: fastrand::Rng,
    /// Total simulated time
    elapsed: Duration,
    /// Frames produced so far
    frame: u64,
    /// Recent frame times for averaging
    frame_times: VecDeque<Duration>,
    /// Maximum samples for averaging
    max_samples: usize,
}

impl FrameClock {
    /// Create a clock ticking at `target_fps` without jitter.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            target_fps,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            jitter: 0.0,
            rng: fastrand::Rng::with_seed(0),
            elapsed: Duration::ZERO,
            frame: 0,
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
        }
    }

    /// Perturb every frame by up to `jitter` of the budget, either way.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f32, seed: u64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Produce the next frame delta.
    pub fn tick(&mut self) -> Duration {
        let factor = 1.0 + f64::from(self.jitter) * (self.rng.f64() * 2.0 - 1.0);
        let delta = self.frame_budget.mul_f64(factor.max(0.0)).min(MAX_DELTA);

        self.elapsed += delta;
        self.frame += 1;

        // Store for averaging
        self.frame_times.push_back(delta);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }

        delta
    }

    /// Total simulated time.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Frames produced so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Get the target FPS.
    #[must_use]
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Get the average frame time in milliseconds.
    #[must_use]
    pub fn average_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        let total: Duration = self.frame_times.iter().sum();
        total.as_secs_f32() * 1000.0 / self.frame_times.len() as f32
    }
}
