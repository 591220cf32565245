//! Random sources and uniform range sampling.
//!
//! Every sampler in the kernel takes its randomness from an explicit
//! [`RandomSource`] handle. Production code uses a seeded [`fastrand::Rng`];
//! tests can substitute a [`SequenceSource`] to script exact draws.

use confetti_common::{ensure_range, ConfettiResult};
use serde::{Deserialize, Serialize};

/// A source of uniformly distributed numbers.
pub trait RandomSource {
    /// Returns a value in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Returns an index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot pick from an empty set");
        ((self.next_f32() * len as f32) as usize).min(len.saturating_sub(1))
    }
}

impl RandomSource for fastrand::Rng {
    fn next_f32(&mut self) -> f32 {
        self.f32()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.usize(..len)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }

    fn next_index(&mut self, len: usize) -> usize {
        (**self).next_index(len)
    }
}

/// Scripted source that replays a fixed list of unit values in a loop.
///
/// Values are clamped into `[0, 1)` when the source is built.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSource {
    /// Creates a source replaying `values`. An empty list always yields `0.0`.
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f32::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// A source that always returns the same value.
    pub fn constant(value: f32) -> Self {
        Self::new([value])
    }
}

impl RandomSource for SequenceSource {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value
    }
}

/// A `[min, max]` range. An absent `max` pins every sample to `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarRange {
    /// Lower bound, or the fixed value when `max` is unset.
    pub min: f32,
    /// Optional upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f32>,
}

impl Default for ScalarRange {
    fn default() -> Self {
        Self::fixed(0.0)
    }
}

impl From<f32> for ScalarRange {
    fn from(value: f32) -> Self {
        Self::fixed(value)
    }
}

impl ScalarRange {
    /// A degenerate range that always samples `value`.
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: None,
        }
    }

    /// A range between `min` and `max`.
    #[must_use]
    pub const fn between(min: f32, max: f32) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// Upper bound, falling back to `min` when unset.
    #[must_use]
    pub fn upper(&self) -> f32 {
        self.max.unwrap_or(self.min)
    }

    /// Checks the range is finite and not inverted.
    pub fn validate(&self, field: &'static str) -> ConfettiResult<()> {
        ensure_range(field, self.min, self.max)
    }

    /// Applies `f` to both bounds.
    #[must_use]
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            min: f(self.min),
            max: self.max.map(f),
        }
    }

    /// Draws one value uniformly from the range.
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> f32 {
        sample(rng, self.min, self.max)
    }
}

/// Draws a value uniformly from `[min, max)`, or returns `min` when `max`
/// is unset or equal to `min`.
pub fn sample<R: RandomSource + ?Sized>(rng: &mut R, min: f32, max: Option<f32>) -> f32 {
    match max {
        Some(max) if max != min => min + rng.next_f32() * (max - min),
        _ => min,
    }
}
