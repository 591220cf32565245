//! # Confetti Kernel
//!
//! Particle generation, integration and lifecycle for confetti effects.
//!
//! This crate provides the simulation core:
//! - Uniform range sampling from an injected random source
//! - Spawn location and launch velocity modules
//! - Per-particle kinematics, rotation and fade
//! - Burst and stream emitters with frame-rate independent scheduling
//! - The `ParticleSystem` facade a host drives once per frame
//!
//! ## Frame contract
//!
//! The host owns the render loop. Once per displayed frame it calls
//! [`ParticleSystem::render`] with its [`Canvas`] and the time since the
//! previous frame. The system ages every live particle, drops the expired
//! ones, spawns new ones for streams, and hands one sprite per survivor to
//! the canvas.
//!
//! ## Threading
//!
//! Everything here is single-threaded and non-blocking. Hosts that render
//! from several threads must serialise their calls into a system.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod canvas;
pub mod config;
pub mod emitter;
pub mod location;
pub mod models;
pub mod particle;
pub mod random;
pub mod system;
pub mod velocity;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::canvas::*;
    pub use crate::config::*;
    pub use crate::emitter::*;
    pub use crate::location::*;
    pub use crate::models::*;
    pub use crate::particle::*;
    pub use crate::random::*;
    pub use crate::system::*;
    pub use crate::velocity::*;
}

pub use confetti_common::{Bounds, ConfettiError, ConfettiResult, Vec2};
pub use prelude::*;
