//! # Confetti Engine
//!
//! Headless host for the confetti particle system.
//!
//! Loads a scene from TOML, plays every effect on an in-memory surface
//! with a simulated frame clock and reports what was drawn.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod stage;
mod surface;
mod timing;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("confetti=info".parse()?))
        .init();

    info!("Confetti engine starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args_os().nth(1);
    app::run(config_path.as_deref().map(std::path::Path::new))?;

    info!("Confetti engine shutdown complete");
    Ok(())
}
