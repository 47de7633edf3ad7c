//! The `Behavior` record — one independently schedulable per-frame callback.

use std::fmt;

use qg_core::BehaviorId;
use qg_scene::EntityManager;

/// The per-frame body of a behavior.
///
/// Receives the frame delta, the scheduler's own elapsed time (not the
/// host's frame time), and the entity manager.  Implemented for every
/// matching `FnMut` closure, so most behaviors never name this trait.
pub trait BehaviorTick: Send + 'static {
    fn tick(&mut self, dt: f64, time: f64, entities: &mut EntityManager);
}

impl<F> BehaviorTick for F
where
    F: FnMut(f64, f64, &mut EntityManager) + Send + 'static,
{
    #[inline]
    fn tick(&mut self, dt: f64, time: f64, entities: &mut EntityManager) {
        self(dt, time, entities)
    }
}

/// A behavior as produced by a factory and handed to the scheduler.
///
/// Without an id the scheduler generates one (`bhv_<token>`).  Behaviors
/// start enabled unless built with `.enabled(false)`.
pub struct Behavior {
    id:      Option<BehaviorId>,
    enabled: bool,
    tick:    Box<dyn BehaviorTick>,
}

impl Behavior {
    pub fn new(tick: impl BehaviorTick) -> Self {
        Self { id: None, enabled: true, tick: Box::new(tick) }
    }

    /// Like [`new`][Self::new], but pins the closure signature so argument
    /// types are inferred at the call site.
    pub fn from_fn<F>(tick: F) -> Self
    where
        F: FnMut(f64, f64, &mut EntityManager) + Send + 'static,
    {
        Self::new(tick)
    }

    pub fn with_id(mut self, id: impl Into<BehaviorId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn id(&self) -> Option<&BehaviorId> {
        self.id.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn into_parts(self) -> (Option<BehaviorId>, bool, Box<dyn BehaviorTick>) {
        (self.id, self.enabled, self.tick)
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("id", &self.id)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
