//! `BehaviorRegistry` — named factories with at most one active instance per
//! name.

use std::collections::BTreeMap;

use qg_core::{Diagnostic, DiagnosticSource, Options, SharedSink, TracingSink};

use crate::{Behavior, BehaviorError, BehaviorResult, BehaviorScheduler, Registration};

/// Builds a behavior from activation options.
pub type Factory = Box<dyn Fn(&Options) -> Behavior + Send + Sync>;

/// What [`BehaviorRegistry::activate`] hands back to the caller.
///
/// Pass it to [`BehaviorRegistry::release`] to undo exactly this activation.
/// Releasing is idempotent and safe after the name has been re-activated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activation {
    name:         String,
    registration: Registration,
}

impl Activation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registration(&self) -> &Registration {
        &self.registration
    }
}

/// Policy layer over [`BehaviorScheduler`]: activates behaviors by name and
/// guarantees a single live instance per name.
///
/// The registry does not own the scheduler.  Every operation that touches
/// scheduler state takes it as an argument, so both can be created fresh per
/// test and shared by whatever drives the frame loop.
pub struct BehaviorRegistry {
    factories: BTreeMap<String, Factory>,
    active:    BTreeMap<String, Registration>,
    sink:      SharedSink,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            active:    BTreeMap::new(),
            sink:      TracingSink::shared(),
        }
    }

    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    // ── Factories ─────────────────────────────────────────────────────────

    /// Store or replace the factory for `name`.
    ///
    /// Returns `true` if the name was new.  Replacing a factory leaves any
    /// instance it already produced running.
    pub fn register_factory<F>(&mut self, name: impl Into<String>, factory: F) -> bool
    where
        F: Fn(&Options) -> Behavior + Send + Sync + 'static,
    {
        self.register_boxed_factory(name, Box::new(factory))
    }

    pub fn register_boxed_factory(&mut self, name: impl Into<String>, factory: Factory) -> bool {
        let name = name.into();
        let added = self.factories.insert(name.clone(), factory).is_none();
        tracing::debug!(factory = %name, added, "behavior factory registered");
        added
    }

    /// Remove the factory only; an active instance keeps running.
    pub fn remove_factory(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    pub fn has_factory(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Factory names in lexical order.
    pub fn list_factories(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    // ── Activation ────────────────────────────────────────────────────────

    /// Build the behavior `name` with `options` and register it.
    ///
    /// Fails with [`BehaviorError::FactoryNotFound`] before changing anything
    /// if no factory is registered.  An instance already active under `name`
    /// is detached first, so the scheduler never holds two at once.
    pub fn activate(
        &mut self,
        scheduler: &mut BehaviorScheduler,
        name:      &str,
        options:   &Options,
    ) -> BehaviorResult<Activation> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| BehaviorError::FactoryNotFound(name.to_owned()))?;

        if let Some(previous) = self.active.remove(name) {
            scheduler.unregister(&previous);
            tracing::debug!(behavior = name, id = %previous.id(), "superseded active instance");
        }

        let registration = scheduler.register(factory(options));
        tracing::info!(behavior = name, id = %registration.id(), "behavior activated");
        self.active.insert(name.to_owned(), registration.clone());

        Ok(Activation { name: name.to_owned(), registration })
    }

    /// Undo `activation`.
    ///
    /// Detaches its scheduler registration if that is still live, and clears
    /// the bookkeeping for its name only if the name still points at this
    /// activation.  A newer activation of the same name is left untouched.
    /// Returns whether a scheduler registration was detached.
    pub fn release(&mut self, scheduler: &mut BehaviorScheduler, activation: &Activation) -> bool {
        if self.active.get(&activation.name) == Some(&activation.registration) {
            self.active.remove(&activation.name);
        }
        scheduler.unregister(&activation.registration)
    }

    /// Deactivate whatever is active under `name`.  Returns whether
    /// anything was.
    pub fn deactivate(&mut self, scheduler: &mut BehaviorScheduler, name: &str) -> bool {
        match self.active.remove(name) {
            Some(registration) => {
                scheduler.unregister(&registration);
                tracing::info!(behavior = name, "behavior deactivated");
                true
            }
            None => false,
        }
    }

    /// Deactivate every active name and return how many there were.
    ///
    /// Each name is handled independently.  A name whose registration is no
    /// longer live in the scheduler (because something else replaced that
    /// behavior id) is reported to the diagnostic sink and the rest carry
    /// on.
    pub fn deactivate_all(&mut self, scheduler: &mut BehaviorScheduler) -> usize {
        let active = std::mem::take(&mut self.active);
        let count = active.len();

        for (name, registration) in active {
            if !scheduler.unregister(&registration) {
                let behavior = registration.id().clone();
                self.sink.report(Diagnostic::new(
                    DiagnosticSource::Deactivation { name, behavior },
                    "registration was no longer live in the scheduler",
                ));
            }
        }
        tracing::info!(count, "all behaviors deactivated");
        count
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Active names in lexical order.
    pub fn list_active(&self) -> Vec<String> {
        self.active.keys().cloned().collect()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains_key(name)
    }

    /// The scheduler registration currently recorded for `name`.
    pub fn active_registration(&self, name: &str) -> Option<&Registration> {
        self.active.get(name)
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorRegistry")
            .field("factories", &self.list_factories())
            .field("active", &self.active)
            .finish()
    }
}
