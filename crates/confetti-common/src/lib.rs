//! # Confetti Common
//!
//! Shared types for the confetti particle engine:
//! - Error taxonomy for configuration failures
//! - Surface bounds and angle helpers
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod geometry;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::geometry::*;
}

pub use prelude::*;

/// Re-exported so downstream crates agree on one vector type.
pub use glam::Vec2;
