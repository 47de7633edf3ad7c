//! `BehaviorScheduler` — runs registered behaviors once per frame.

use std::time::Duration;

use qg_core::{BehaviorId, IdRng, MonotonicClock, TimeSource};
use qg_scene::EntityManager;

use crate::{Behavior, BehaviorTick};

/// Proof of one specific registration.
///
/// Returned by [`BehaviorScheduler::register`] and consumed by
/// [`unregister`][BehaviorScheduler::unregister].  Two registrations under
/// the same id are distinguished by their serial, so unregistering with an
/// old handle after the id was overwritten is a no-op.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Registration {
    id:     BehaviorId,
    serial: u64,
}

impl Registration {
    pub fn id(&self) -> &BehaviorId {
        &self.id
    }
}

struct Slot {
    id:      BehaviorId,
    serial:  u64,
    enabled: bool,
    tick:    Box<dyn BehaviorTick>,
}

/// Holds behaviors keyed by id and ticks the enabled ones on `update`.
///
/// # Clock
///
/// The scheduler measures its own elapsed time against a [`TimeSource`],
/// starting when it is constructed.  That is the `time` every behavior
/// receives.  It is independent of the `FrameState` the entity manager is
/// stepped with and the two are not expected to agree.
///
/// # Ordering
///
/// Behaviors run in first-registration order.  Re-registering an id replaces
/// the behavior in place and keeps its position.
pub struct BehaviorScheduler {
    slots:       Vec<Slot>,
    clock:       Box<dyn TimeSource>,
    started_at:  Duration,
    time:        f64,
    ids:         IdRng,
    next_serial: u64,
}

impl BehaviorScheduler {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }

    pub fn with_clock(clock: impl TimeSource) -> Self {
        Self::with_boxed_clock(Box::new(clock))
    }

    pub fn with_boxed_clock(clock: Box<dyn TimeSource>) -> Self {
        let started_at = clock.now();
        Self {
            slots: Vec::new(),
            clock,
            started_at,
            time: 0.0,
            ids: IdRng::from_entropy(),
            next_serial: 0,
        }
    }

    /// Seed the generator used for behaviors registered without an id.
    pub fn with_id_seed(mut self, seed: u64) -> Self {
        self.ids = IdRng::seeded(seed);
        self
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Store `behavior`, generating an id if it has none.
    ///
    /// An existing registration under the same id is silently replaced.
    pub fn register(&mut self, behavior: Behavior) -> Registration {
        let (id, enabled, tick) = behavior.into_parts();
        let id = match id {
            Some(id) => id,
            None => self.generate_id(),
        };
        self.next_serial += 1;
        let serial = self.next_serial;

        match self.position(id.as_str()) {
            Some(pos) => {
                tracing::debug!(behavior = %id, "behavior replaced");
                self.slots[pos] = Slot { id: id.clone(), serial, enabled, tick };
            }
            None => {
                tracing::debug!(behavior = %id, enabled, "behavior registered");
                self.slots.push(Slot { id: id.clone(), serial, enabled, tick });
            }
        }
        Registration { id, serial }
    }

    /// Remove the behavior `registration` refers to.
    ///
    /// Returns `false` if it is already gone or the id has since been
    /// re-registered; calling this twice is harmless.
    pub fn unregister(&mut self, registration: &Registration) -> bool {
        let found = self
            .slots
            .iter()
            .position(|s| s.id == registration.id && s.serial == registration.serial);
        match found {
            Some(pos) => {
                self.slots.remove(pos);
                tracing::debug!(behavior = %registration.id, "behavior unregistered");
                true
            }
            None => false,
        }
    }

    /// Whether `registration` is still the live one for its id.
    pub fn is_registered(&self, registration: &Registration) -> bool {
        self.slots.iter().any(|s| s.id == registration.id && s.serial == registration.serial)
    }

    fn generate_id(&mut self) -> BehaviorId {
        loop {
            let candidate = self.ids.prefixed("bhv");
            if !self.contains(&candidate) {
                return BehaviorId::new(candidate);
            }
        }
    }

    // ── Frame ─────────────────────────────────────────────────────────────

    /// Refresh the elapsed clock, then tick every enabled behavior.
    pub fn update(&mut self, dt: f64, entities: &mut EntityManager) {
        let elapsed = self.clock.now().saturating_sub(self.started_at);
        self.time = elapsed.as_secs_f64();

        for slot in self.slots.iter_mut().filter(|s| s.enabled) {
            slot.tick.tick(dt, self.time, entities);
        }
    }

    /// Elapsed seconds as of the last `update`.
    pub fn time(&self) -> f64 {
        self.time
    }

    // ── Enable / disable ──────────────────────────────────────────────────

    /// Returns `false` if `id` isn't registered.
    pub fn enable(&mut self, id: &str) -> bool {
        self.set_enabled(id, true)
    }

    /// Returns `false` if `id` isn't registered.
    pub fn disable(&mut self, id: &str) -> bool {
        self.set_enabled(id, false)
    }

    fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.position(id) {
            Some(pos) => {
                self.slots[pos].enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self, id: &str) -> Option<bool> {
        self.position(id).map(|pos| self.slots[pos].enabled)
    }

    /// Drop every registration.  Behaviors have no dispose hook.
    pub fn clear(&mut self) {
        let count = self.slots.len();
        self.slots.clear();
        tracing::debug!(count, "behavior scheduler cleared");
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Registered ids in tick order.
    pub fn ids(&self) -> Vec<BehaviorId> {
        self.slots.iter().map(|s| s.id.clone()).collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.id.as_str() == id)
    }
}

impl Default for BehaviorScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BehaviorScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorScheduler")
            .field("behaviors", &self.ids())
            .field("time", &self.time)
            .finish()
    }
}
