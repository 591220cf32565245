//! Main loop.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::stage::Stage;
use crate::surface::{HeadlessSurface, SurfaceStats};
use crate::timing::FrameClock;

/// Outcome of a run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Frames rendered
    pub frames: u64,
    /// Simulated time
    pub elapsed: Duration,
    /// Effects that played to the end
    pub finished_effects: usize,
    /// Whether the run hit the time limit before the stage went idle
    pub timed_out: bool,
    /// Final surface statistics
    pub stats: SurfaceStats,
}

/// Loads the configuration and plays the scene.
pub fn run(config_path: Option<&Path>) -> Result<RunSummary> {
    let mut config = match config_path {
        Some(path) => EngineConfig::load_or_create(path),
        None => EngineConfig::load(),
    };
    config.validate();

    let summary = play(&config)?;
    info!(
        "Played {} effects in {} frames ({:.2}s simulated), {} draws total, peak {} per frame{}",
        summary.finished_effects,
        summary.frames,
        summary.elapsed.as_secs_f32(),
        summary.stats.total_draws,
        summary.stats.peak_draws,
        if summary.timed_out { ", stopped at time limit" } else { "" },
    );
    Ok(summary)
}

/// Plays a validated configuration until the stage is idle or time runs out.
pub fn play(config: &EngineConfig) -> Result<RunSummary> {
    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    debug!("Using seed {seed}");

    let mut stage = Stage::from_effects(&config.effects, seed).context("invalid effect configuration")?;
    let mut surface = HeadlessSurface::new(
        config.surface_width,
        config.surface_height,
        config.clip_to_surface,
    );
    let mut clock = FrameClock::new(config.target_fps).with_jitter(config.frame_jitter, seed);
    let limit = Duration::try_from_secs_f32(config.max_run_seconds).context("invalid max_run_seconds")?;

    info!(
        "Playing {} effects on a {}x{} surface at {} fps",
        stage.active_effects(),
        config.surface_width,
        config.surface_height,
        clock.target_fps()
    );

    while !stage.is_idle() && clock.elapsed() < limit {
        let delta = clock.tick();
        surface.begin_frame();
        stage.render(&mut surface, delta);
        surface.end_frame();

        if config.log_interval_frames > 0 && clock.frame() % u64::from(config.log_interval_frames) == 0 {
            let stats = surface.stats();
            info!(
                "Frame {} at {:.2}s: {} particles, {} effects, {} draws ({} rects, {} circles), mean alpha {:.2}, avg frame {:.1}ms",
                clock.frame(),
                stage.clock().as_secs_f32(),
                stage.particle_count(),
                stage.active_effects(),
                stats.frame_draws,
                stats.rects,
                stats.circles,
                stats.mean_alpha(),
                clock.average_frame_time_ms()
            );
        }
    }

    Ok(RunSummary {
        frames: clock.frame(),
        elapsed: clock.elapsed(),
        finished_effects: stage.finished_effects(),
        timed_out: !stage.is_idle(),
        stats: surface.stats(),
    })
}
