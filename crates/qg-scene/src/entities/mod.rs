//! Concrete scene entities.

pub mod torus_pulse;

pub use torus_pulse::TorusPulse;
