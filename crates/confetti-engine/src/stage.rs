//! The host view: owns several particle systems and drives them per frame.

use std::time::Duration;

use confetti_common::ConfettiResult;
use confetti_kernel::{Canvas, ParticleSystem, Trigger};
use tracing::{debug, info};

use crate::config::EffectConfig;

/// One configured effect waiting for, or playing on, the stage.
#[derive(Debug)]
struct ScheduledEffect {
    name: String,
    start_at: Duration,
    trigger: Trigger,
    system: ParticleSystem,
    started: bool,
}

/// A set of effects sharing one surface.
///
/// Effects start once their delay has passed and are dropped as soon as
/// their system reports done.
#[derive(Debug, Default)]
pub struct Stage {
    effects: Vec<ScheduledEffect>,
    clock: Duration,
    finished: usize,
}

impl Stage {
    /// Builds a stage, validating every effect up front.
    ///
    /// Each effect gets its own generator seeded from `seed`.
    pub fn from_effects(effects: &[EffectConfig], seed: u64) -> ConfettiResult<Self> {
        let mut stage = Self::default();
        for (index, effect) in effects.iter().enumerate() {
            let rng = fastrand::Rng::with_seed(seed.wrapping_add(index as u64));
            let system = ParticleSystem::from_config(&effect.emission, rng)?;
            stage.effects.push(ScheduledEffect {
                name: effect.name.clone(),
                start_at: Duration::from_millis(effect.start_delay_ms),
                trigger: effect.trigger,
                system,
                started: false,
            });
        }
        Ok(stage)
    }

    /// Advances every effect by `delta` and draws it onto `canvas`.
    pub fn render<C: Canvas + ?Sized>(&mut self, canvas: &mut C, delta: Duration) {
        self.clock += delta;
        let clock = self.clock;

        for effect in &mut self.effects {
            if !effect.started {
                if clock < effect.start_at {
                    continue;
                }
                effect.system.start(effect.trigger);
                effect.started = true;
                info!("Started effect {} at {:?}", effect.name, clock);
                // Only the part of the frame after the start time counts
                effect.system.render(canvas, clock.saturating_sub(effect.start_at));
                continue;
            }
            effect.system.render(canvas, delta);
        }

        let before = self.effects.len();
        self.effects.retain(|effect| {
            let done = effect.started && effect.system.is_done();
            if done {
                debug!("Effect {} finished after {} particles", effect.name, effect.system.spawned_count());
            }
            !done
        });
        self.finished += before - self.effects.len();
    }

    /// Live particles across all effects.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.effects.iter().map(|e| e.system.particle_count()).sum()
    }

    /// Effects still pending or playing.
    #[must_use]
    pub fn active_effects(&self) -> usize {
        self.effects.len()
    }

    /// Effects that played out and were removed.
    #[must_use]
    pub fn finished_effects(&self) -> usize {
        self.finished
    }

    /// Whether nothing is left to play.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.effects.is_empty()
    }

    /// Time since the stage started.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }
}
