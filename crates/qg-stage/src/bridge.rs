//! `ControlBridge` — console façade over the State Channel and the registry.

use std::collections::BTreeMap;

use qg_behavior::{Activation, BehaviorRegistry, BehaviorResult, BehaviorScheduler};
use qg_core::{Options, Value};
use qg_state::StateChannel;

const HELP: &str = "\
Quantum Gallery control bridge:
  set(\"torusPulse.amplitude\", 0.8)
  set(\"torusPulse.speed\", 1.2)
  get(\"torusPulse.amplitude\")
  snapshot()
  factories()
  list()
  activate(\"torusPulse.oscillator\", { amplitude: 0.6 })
  deactivate(\"torusPulse.oscillator\")
  release(activation)";

/// Read/write access to named state and to behavior lifecycle for an
/// external caller such as a developer console.
///
/// Borrowed from a [`Stage`][crate::Stage] via
/// [`Stage::bridge`][crate::Stage::bridge].  Adds no state and no
/// validation of its own.
pub struct ControlBridge<'a> {
    channel:   &'a StateChannel,
    registry:  &'a mut BehaviorRegistry,
    scheduler: &'a mut BehaviorScheduler,
}

impl<'a> ControlBridge<'a> {
    pub fn new(
        channel:   &'a StateChannel,
        registry:  &'a mut BehaviorRegistry,
        scheduler: &'a mut BehaviorScheduler,
    ) -> Self {
        Self { channel, registry, scheduler }
    }

    // ── State ─────────────────────────────────────────────────────────────

    /// Returns how many listeners accepted the value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> usize {
        self.channel.set(key, value)
    }

    /// Like [`set`][Self::set], parsing console text with
    /// [`Value::parse_literal`].
    pub fn set_literal(&self, key: impl Into<String>, text: &str) -> usize {
        self.channel.set(key, Value::parse_literal(text))
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.channel.get(key)
    }

    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.channel.snapshot()
    }

    pub fn help(&self) -> &'static str {
        HELP
    }

    // ── Behaviors ─────────────────────────────────────────────────────────

    pub fn factories(&self) -> Vec<String> {
        self.registry.list_factories()
    }

    /// Names of active behaviors.
    pub fn list(&self) -> Vec<String> {
        self.registry.list_active()
    }

    pub fn activate(&mut self, name: &str, options: &Options) -> BehaviorResult<Activation> {
        self.registry.activate(self.scheduler, name, options)
    }

    pub fn deactivate(&mut self, name: &str) -> bool {
        self.registry.deactivate(self.scheduler, name)
    }

    /// Undo one earlier activation; a newer one under the same name survives.
    pub fn release(&mut self, activation: &Activation) -> bool {
        self.registry.release(self.scheduler, activation)
    }
}
