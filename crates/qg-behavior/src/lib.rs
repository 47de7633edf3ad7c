//! `qg-behavior` — per-frame behaviors and the named-activation policy layer.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                         |
//! |---------------|------------------------------------------------------------------|
//! | [`behavior`]  | `Behavior` record and the `BehaviorTick` trait                   |
//! | [`scheduler`] | `BehaviorScheduler` with its own elapsed clock, `Registration`   |
//! | [`registry`]  | `BehaviorRegistry` — factories by name, one active instance each |
//! | [`builtin`]   | `torusPulse.oscillator`, `torusPulse.aiOverrides`                |
//! | [`error`]     | `BehaviorError`, `BehaviorResult<T>`                             |
//!
//! # Design notes
//!
//! There are two layers of bookkeeping.  The scheduler maps behavior ids to
//! ticks; the registry maps logical names to the scheduler [`Registration`]
//! it created.  A `Registration` carries a serial as well as the id, so a
//! handle kept from an older activation can never detach a newer behavior
//! that happens to reuse the same fixed id.
//!
//! Behaviors see only `&mut EntityManager` while they run.  They cannot reach
//! the scheduler mid-pass, so `update` iterates a registration set that
//! cannot change underneath it.

pub mod behavior;
pub mod builtin;
pub mod error;
pub mod registry;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use behavior::{Behavior, BehaviorTick};
pub use error::{BehaviorError, BehaviorResult};
pub use registry::{Activation, BehaviorRegistry, Factory};
pub use scheduler::{BehaviorScheduler, Registration};
