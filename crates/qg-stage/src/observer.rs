//! Stage observer trait for progress reporting.

use qg_core::FrameState;
use qg_scene::EntityManager;

/// Callbacks invoked by [`Stage::run_frames`][crate::Stage::run_frames] and
/// [`Stage::shutdown_with`][crate::Stage::shutdown_with].
///
/// All methods default to no-ops.
pub trait StageObserver {
    /// Before entities are stepped.
    fn on_frame_start(&mut self, _state: &FrameState) {}

    /// After entities and behaviors have both run for the frame.
    fn on_frame_end(&mut self, _state: &FrameState, _entities: &EntityManager) {}

    /// Once, after everything has been torn down.
    fn on_shutdown(&mut self, _frames: u64) {}
}

/// A [`StageObserver`] that does nothing.
pub struct NoopObserver;

impl StageObserver for NoopObserver {}

/// Logs a summary line every `every` frames at `info` level.
#[derive(Clone, Debug)]
pub struct LoggingObserver {
    every: u64,
}

impl LoggingObserver {
    /// `every == 0` never logs frames.
    pub fn new(every: u64) -> Self {
        Self { every }
    }
}

impl StageObserver for LoggingObserver {
    fn on_frame_end(&mut self, state: &FrameState, entities: &EntityManager) {
        if self.every > 0 && state.frame.is_multiple_of(self.every) {
            tracing::info!(
                frame = state.frame,
                time = state.time,
                entities = entities.len(),
                store_keys = entities.store().len(),
                "frame"
            );
        }
    }

    fn on_shutdown(&mut self, frames: u64) {
        tracing::info!(frames, "stage shut down");
    }
}
