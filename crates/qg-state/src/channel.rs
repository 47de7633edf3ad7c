//! `StateChannel` — key/value pub/sub bus.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use qg_core::{Diagnostic, DiagnosticSource, SharedSink, TracingSink, Value};

use crate::ListenerResult;

/// A subscriber callback.  Receives the newly written value.
pub type Listener = Arc<dyn Fn(&Value) -> ListenerResult<()> + Send + Sync>;

struct ListenerSlot {
    /// Unique per subscription, so subscribing the same function twice
    /// yields two independently removable slots.
    token:    u64,
    listener: Listener,
}

#[derive(Default)]
struct ChannelInner {
    values:     BTreeMap<String, Value>,
    listeners:  BTreeMap<String, Vec<ListenerSlot>>,
    next_token: u64,
}

/// Process-wide key/value store with per-key subscription.
///
/// `StateChannel` is a cheap handle: clones share the same store, which is
/// how one instance built at startup is injected into every component (and
/// every behavior factory) that needs it.
///
/// The internal lock is never held while a listener runs, so a listener may
/// itself read, write or (un)subscribe on the same channel.
#[derive(Clone)]
pub struct StateChannel {
    inner: Arc<Mutex<ChannelInner>>,
    sink:  SharedSink,
}

impl StateChannel {
    /// A fresh channel reporting listener failures through `tracing`.
    pub fn new() -> Self {
        Self::with_sink(TracingSink::shared())
    }

    /// A fresh channel reporting listener failures to `sink`.
    pub fn with_sink(sink: SharedSink) -> Self {
        Self { inner: Arc::new(Mutex::new(ChannelInner::default())), sink }
    }

    /// Store `value` under `key`, then notify every listener currently
    /// subscribed to `key`, in subscription order.
    ///
    /// The listener list is captured when the value is stored; subscriptions
    /// added or removed by a listener take effect from the next `set`.
    /// Returns the number of listeners that completed without error.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> usize {
        let key = key.into();
        let value = value.into();

        let listeners: Vec<Listener> = {
            let mut inner = self.inner.lock();
            let listeners = inner
                .listeners
                .get(&key)
                .map(|slots| slots.iter().map(|s| Arc::clone(&s.listener)).collect())
                .unwrap_or_default();
            inner.values.insert(key.clone(), value.clone());
            listeners
        };

        let mut delivered = 0;
        for listener in listeners {
            match listener(&value) {
                Ok(()) => delivered += 1,
                Err(e) => self.sink.report(Diagnostic::new(
                    DiagnosticSource::Listener { key: key.clone() },
                    e.to_string(),
                )),
            }
        }
        delivered
    }

    /// The current value for `key`, or `None` if it was never set.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().values.get(key).cloned()
    }

    /// Shorthand for `get(key)` narrowed to a number.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.inner.lock().values.get(key).and_then(Value::as_f64)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.lock().values.contains_key(key)
    }

    /// Register `listener` for `key`.
    ///
    /// The returned [`Subscription`] removes exactly this registration.
    /// Dropping it without calling [`Subscription::unsubscribe`] leaves the
    /// listener installed.
    pub fn subscribe<F>(&self, key: impl Into<String>, listener: F) -> Subscription
    where
        F: Fn(&Value) -> ListenerResult<()> + Send + Sync + 'static,
    {
        self.subscribe_shared(key, Arc::new(listener))
    }

    /// Like [`subscribe`][Self::subscribe] for an already shared listener.
    /// Subscribing the same `Arc` twice fires it twice per `set`.
    pub fn subscribe_shared(&self, key: impl Into<String>, listener: Listener) -> Subscription {
        let key = key.into();
        let mut inner = self.inner.lock();
        let token = inner.next_token;
        inner.next_token += 1;
        inner
            .listeners
            .entry(key.clone())
            .or_default()
            .push(ListenerSlot { token, listener });
        Subscription { key, token, channel: Arc::downgrade(&self.inner) }
    }

    /// Number of live subscriptions on `key`.
    pub fn listener_count(&self, key: &str) -> usize {
        self.inner.lock().listeners.get(key).map_or(0, Vec::len)
    }

    /// Copy of every key/value pair.  Later writes to the channel do not show
    /// up in the copy and edits to the copy do not reach the channel.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.inner.lock().values.clone()
    }

    /// Drop the value stored under `key`, keeping its listeners.
    ///
    /// Keys are otherwise only reclaimed by [`clear`][Self::clear]; long-lived
    /// channels with churning keys call this explicitly.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.lock().values.remove(key)
    }

    /// Drop all values and all subscriptions.  Emits no notifications.
    ///
    /// Outstanding [`Subscription`] handles become no-ops.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.values.clear();
        inner.listeners.clear();
        tracing::debug!("state channel cleared");
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.inner.lock().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().values.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().values.keys().cloned().collect()
    }
}

impl Default for StateChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("StateChannel")
            .field("values", &inner.values)
            .field("subscribed_keys", &inner.listeners.len())
            .finish()
    }
}

// ── Subscription ──────────────────────────────────────────────────────────────

/// Handle to one listener registration.
///
/// Holds only a weak reference to the channel: it never keeps a channel
/// alive, and unsubscribing after the channel is gone is a no-op.
#[derive(Clone, Debug)]
pub struct Subscription {
    key:     String,
    token:   u64,
    channel: Weak<Mutex<ChannelInner>>,
}

impl Subscription {
    /// The key this subscription listens on.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Remove exactly the listener this handle was created for.
    ///
    /// Idempotent.  Returns `true` if the listener was still installed.  When
    /// the last listener for the key goes, the key's listener list is dropped
    /// (its value is kept).
    pub fn unsubscribe(&self) -> bool {
        let Some(inner) = self.channel.upgrade() else {
            return false;
        };
        let mut inner = inner.lock();
        let Some(slots) = inner.listeners.get_mut(&self.key) else {
            return false;
        };
        let before = slots.len();
        slots.retain(|s| s.token != self.token);
        let removed = slots.len() != before;
        if slots.is_empty() {
            inner.listeners.remove(&self.key);
        }
        removed
    }
}
