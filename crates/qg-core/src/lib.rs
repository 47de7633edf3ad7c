//! `qg-core` — foundational types for the quantum-gallery scene runtime.
//!
//! This crate is a dependency of every other `qg-*` crate.  It intentionally
//! has no `qg-*` dependencies and minimal external ones (`rand`, `tracing`,
//! `parking_lot`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `EntityId`, `BehaviorId`                                  |
//! | [`value`]       | `Value`, `Options`                                        |
//! | [`time`]        | `FrameState`, `Viewport`, `FrameTimer`, time sources      |
//! | [`rng`]         | `IdRng` for generated identifiers                         |
//! | [`diagnostics`] | `Diagnostic`, `DiagnosticSink`, `TracingSink`, `CollectingSink` |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                              |
//! |---------|---------------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on ids, values and frames (for `qg-stage`) |

pub mod diagnostics;
pub mod ids;
pub mod rng;
pub mod time;
pub mod value;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticSink, DiagnosticSource, SharedSink, TracingSink,
};
pub use ids::{BehaviorId, EntityId};
pub use rng::IdRng;
pub use time::{FrameState, FrameTimer, ManualClock, MonotonicClock, TimeSource, Viewport};
pub use value::{Options, Value};
