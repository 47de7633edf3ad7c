//! The `Stage` struct and its frame loop.

use qg_behavior::{Activation, BehaviorRegistry, BehaviorScheduler};
use qg_core::{FrameState, FrameTimer, Options};
use qg_scene::EntityManager;
use qg_state::StateChannel;

use crate::{ControlBridge, NoopObserver, StageConfig, StageObserver, StageResult};

/// One scene runtime: the entity manager, the behavior scheduler and
/// registry, and the State Channel they share.
///
/// Each frame the host either hands over a ready [`FrameState`]
/// ([`advance`][Self::advance]) or a raw timestamp ([`frame`][Self::frame]).
/// Entities are stepped first, then behaviors run with the same `dt`.
///
/// Create via [`StageBuilder`][crate::StageBuilder].
pub struct Stage {
    /// Settings the stage was built with.
    pub config: StageConfig,

    pub(crate) entities:   EntityManager,
    pub(crate) scheduler:  BehaviorScheduler,
    pub(crate) registry:   BehaviorRegistry,
    pub(crate) channel:    StateChannel,
    pub(crate) timer:      FrameTimer,
    pub(crate) last_frame: Option<FrameState>,
    pub(crate) frames:     u64,
}

impl Stage {
    // ── Frame loop ────────────────────────────────────────────────────────

    /// Step entities with `state`, then update behaviors with `state.dt`.
    ///
    /// A failing entity tick is returned before behaviors run.
    pub fn advance(&mut self, state: FrameState) -> StageResult<()> {
        self.entities.step(state)?;
        self.scheduler.update(state.dt, &mut self.entities);
        self.last_frame = Some(state);
        self.frames += 1;
        Ok(())
    }

    /// Sample the frame timer at `host_time_secs` and advance.
    pub fn frame(&mut self, host_time_secs: f64) -> StageResult<FrameState> {
        let state = self.timer.sample(host_time_secs);
        self.advance(state)?;
        Ok(state)
    }

    /// Drive `n` synthetic frames spaced `1 / refresh_hz` apart, continuing
    /// from the last sampled time, including that of a failed frame.
    pub fn run_frames<O: StageObserver>(&mut self, n: u64, observer: &mut O) -> StageResult<()> {
        let dt = self.config.frame_dt();
        for _ in 0..n {
            let host_time = self.timer.last_time().map_or(0.0, |t| t + dt);
            let state = self.timer.sample(host_time);
            observer.on_frame_start(&state);
            self.advance(state)?;
            observer.on_frame_end(&state, &self.entities);
        }
        Ok(())
    }

    /// Deactivate every behavior, clear the scheduler, then dispose every
    /// entity.
    pub fn shutdown(&mut self) {
        self.shutdown_with(&mut NoopObserver);
    }

    pub fn shutdown_with<O: StageObserver>(&mut self, observer: &mut O) {
        let behaviors = self.registry.deactivate_all(&mut self.scheduler);
        self.scheduler.clear();
        let entities = self.entities.clear();
        self.timer.reset();
        self.last_frame = None;
        tracing::info!(behaviors, entities, frames = self.frames, "stage shutdown");
        observer.on_shutdown(self.frames);
    }

    // ── Behaviors ─────────────────────────────────────────────────────────

    /// Console façade over the channel and behavior lifecycle.
    pub fn bridge(&mut self) -> ControlBridge<'_> {
        ControlBridge::new(&self.channel, &mut self.registry, &mut self.scheduler)
    }

    pub fn activate(&mut self, name: &str, options: &Options) -> StageResult<Activation> {
        Ok(self.registry.activate(&mut self.scheduler, name, options)?)
    }

    /// Undo one activation; see [`BehaviorRegistry::release`].
    pub fn release(&mut self, activation: &Activation) -> bool {
        self.registry.release(&mut self.scheduler, activation)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn scheduler(&self) -> &BehaviorScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut BehaviorScheduler {
        &mut self.scheduler
    }

    pub fn registry(&self) -> &BehaviorRegistry {
        &self.registry
    }

    pub fn channel(&self) -> &StateChannel {
        &self.channel
    }

    /// Frames advanced since the stage was built.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<FrameState> {
        self.last_frame
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("entities", &self.entities)
            .field("scheduler", &self.scheduler)
            .field("registry", &self.registry)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}
