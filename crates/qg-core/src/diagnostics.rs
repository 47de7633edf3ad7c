//! Diagnostic sink for failures isolated at a fan-out boundary.
//!
//! Listener delivery, bulk disposal and bulk deactivation must not let one
//! failing consumer stop the others.  Instead of swallowing the failure, each
//! of those loops builds a [`Diagnostic`] and hands it to a
//! [`DiagnosticSink`].  The default sink logs through `tracing`; tests use
//! [`CollectingSink`] to assert on what was reported.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{BehaviorId, EntityId};

/// Where an isolated failure happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticSource {
    /// A State Channel listener failed while `key` was being delivered.
    Listener { key: String },
    /// An entity's `dispose` failed during a manager-wide clear.
    Dispose { entity: EntityId },
    /// An entity queued by a tick callback could not be added.
    DeferredSpawn { entity: EntityId },
    /// Deactivating the active behavior under `name` found nothing to detach.
    Deactivation { name: String, behavior: BehaviorId },
}

impl fmt::Display for DiagnosticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSource::Listener { key } => write!(f, "listener on '{key}'"),
            DiagnosticSource::Dispose { entity } => write!(f, "dispose of entity '{entity}'"),
            DiagnosticSource::DeferredSpawn { entity } => write!(f, "deferred spawn of entity '{entity}'"),
            DiagnosticSource::Deactivation { name, behavior } => {
                write!(f, "deactivation of '{name}' ({behavior})")
            }
        }
    }
}

/// One isolated failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub source:  DiagnosticSource,
    pub message: String,
}

impl Diagnostic {
    pub fn new(source: DiagnosticSource, message: impl Into<String>) -> Self {
        Self { source, message: message.into() }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// Receiver of isolated failures.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Shared handle to a sink; cloned into every component that reports.
pub type SharedSink = Arc<dyn DiagnosticSink>;

/// Logs every diagnostic as a `tracing` warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn shared() -> SharedSink {
        Arc::new(TracingSink)
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(source = %diagnostic.source, "{}", diagnostic.message);
    }
}

/// Keeps every diagnostic in memory.  Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct CollectingSink {
    inner: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// This sink as a [`SharedSink`]; the returned handle shares the buffer.
    pub fn shared(&self) -> SharedSink {
        Arc::new(self.clone())
    }

    /// Drain everything reported so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.inner.lock())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.inner.lock().push(diagnostic);
    }
}
