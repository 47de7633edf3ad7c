//! Frame timing model.
//!
//! # Two clocks
//!
//! The rendering host owns the frame loop and describes each frame with a
//! [`FrameState`]: elapsed host time, delta since the previous frame, and a
//! frame counter.  The behavior scheduler keeps a *separate* elapsed clock
//! measured against a monotonic [`TimeSource`].  The two are never
//! reconciled; callers must not assume they agree.
//!
//! [`FrameTimer`] is the host-side helper that turns raw host timestamps into
//! well-formed `FrameState`s (non-decreasing time, non-negative delta,
//! incrementing counter).

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// ── FrameState ───────────────────────────────────────────────────────────────

/// Viewport dimensions in physical pixels.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width:  u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width / height, or `None` for a degenerate (zero-height) viewport.
    pub fn aspect(self) -> Option<f64> {
        (self.height > 0).then(|| self.width as f64 / self.height as f64)
    }
}

/// Immutable per-frame timing snapshot passed to every entity callback.
///
/// Built anew by the caller each frame and never mutated by consumers.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    /// Elapsed host time since start, in seconds.
    pub time: f64,
    /// Seconds since the previous frame.
    pub dt: f64,
    /// Monotonically increasing frame counter.
    pub frame: u64,
    pub viewport: Option<Viewport>,
}

impl FrameState {
    /// The zeroed state used for `init` and `dispose` callbacks.
    pub const ZERO: FrameState = FrameState { time: 0.0, dt: 0.0, frame: 0, viewport: None };

    pub fn new(time: f64, dt: f64, frame: u64) -> Self {
        Self { time, dt, frame, viewport: None }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }
}

impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame {} (t={:.3}s, dt={:.4}s)", self.frame, self.time, self.dt)
    }
}

// ── FrameTimer ───────────────────────────────────────────────────────────────

/// Host-side frame bookkeeping.
///
/// Feed it the host's timestamp once per display refresh and it returns the
/// `FrameState` to hand to the stage.  The first sample has `dt = 0`; later
/// samples never move time backwards even if the host clock does.
#[derive(Clone, Debug, Default)]
pub struct FrameTimer {
    last_time: Option<f64>,
    frame:     u64,
    viewport:  Option<Viewport>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `viewport` to every subsequent frame (or detach with `None`).
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    /// Produce the state for a frame observed at `host_time_secs`.
    pub fn sample(&mut self, host_time_secs: f64) -> FrameState {
        let (time, dt) = match self.last_time {
            None => (host_time_secs.max(0.0), 0.0),
            Some(last) => {
                let time = host_time_secs.max(last);
                (time, time - last)
            }
        };
        self.last_time = Some(time);
        self.frame += 1;
        FrameState { time, dt, frame: self.frame, viewport: self.viewport }
    }

    /// Number of frames sampled so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Time of the most recent sample, if any.
    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    /// Forget all history; the next sample is treated as the first.
    pub fn reset(&mut self) {
        self.last_time = None;
        self.frame = 0;
    }
}

// ── Time sources ─────────────────────────────────────────────────────────────

/// A monotonic time source.
///
/// `now` returns the time since an arbitrary fixed origin; only differences
/// between two readings are meaningful.
pub trait TimeSource: Send + Sync + 'static {
    fn now(&self) -> Duration;
}

/// Production time source backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A hand-driven time source.  Clones share the same reading, so a test can
/// keep one clone and hand the other to the component under test.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }

    /// Set the absolute reading.  Moving it backwards breaks the monotonic
    /// contract; tests that do so get what they asked for.
    pub fn set(&self, to: Duration) {
        self.nanos.store(to.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}
