//! `qg-state` — the State Channel: a key/value store with per-key
//! subscription, used by external control signals (e.g. a debug console) to
//! influence running behaviors.
//!
//! # Crate layout
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`channel`] | `StateChannel`, `Subscription`, `Listener`            |
//! | [`error`]   | `ListenerError`, `ListenerResult<T>`                  |
//!
//! # Delivery model
//!
//! `set` stores the value, then calls every listener subscribed to that key
//! synchronously, in subscription order.  A listener that returns an error is
//! isolated: the remaining listeners still run, the writer never sees the
//! failure, and the failure is reported to the channel's
//! [`DiagnosticSink`][qg_core::DiagnosticSink].

pub mod channel;
pub mod error;

#[cfg(test)]
mod tests;

pub use channel::{Listener, StateChannel, Subscription};
pub use error::{ListenerError, ListenerResult};
