//! Unit tests for qg-state.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use qg_core::{CollectingSink, DiagnosticSource, Value};

use crate::{ListenerError, StateChannel};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

// ── get / set ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod store_tests {
    use super::*;

    #[test]
    fn get_absent_is_none() {
        let ch = StateChannel::new();
        assert_eq!(ch.get("torusPulse.amplitude"), None);
        assert!(!ch.contains_key("torusPulse.amplitude"));
    }

    #[test]
    fn last_write_wins() {
        let ch = StateChannel::new();
        ch.set("k", 1.0);
        ch.set("k", 2.0);
        assert_eq!(ch.get("k"), Some(Value::Number(2.0)));
        assert_eq!(ch.get_f64("k"), Some(2.0));
        assert_eq!(ch.len(), 1);
    }

    #[test]
    fn clones_share_state() {
        let a = StateChannel::new();
        let b = a.clone();
        a.set("k", "v");
        assert_eq!(b.get("k"), Some(Value::Text("v".into())));
    }

    #[test]
    fn snapshot_is_a_copy() {
        let ch = StateChannel::new();
        ch.set("a", 1.0);
        let mut snap = ch.snapshot();
        ch.set("a", 2.0);
        ch.set("b", true);
        assert_eq!(snap.get("a"), Some(&Value::Number(1.0)));
        assert!(!snap.contains_key("b"));

        snap.insert("c".into(), Value::Null);
        assert!(!ch.contains_key("c"));
    }

    #[test]
    fn remove_drops_value_keeps_listeners() {
        let ch = StateChannel::new();
        let hits = counter();
        let h = Arc::clone(&hits);
        ch.subscribe("k", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        ch.set("k", 1.0);
        assert_eq!(ch.remove("k"), Some(Value::Number(1.0)));
        assert_eq!(ch.get("k"), None);
        assert_eq!(ch.listener_count("k"), 1);
        ch.set("k", 2.0);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}

// ── subscribe / unsubscribe ───────────────────────────────────────────────────

#[cfg(test)]
mod subscription_tests {
    use super::*;

    #[test]
    fn subscriber_sees_value_exactly_once() {
        let ch = StateChannel::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        ch.subscribe("k", move |v| {
            s.lock().push(v.clone());
            Ok(())
        });
        assert_eq!(ch.set("k", 0.8), 1);
        assert_eq!(*seen.lock(), vec![Value::Number(0.8)]);
    }

    #[test]
    fn other_keys_do_not_notify() {
        let ch = StateChannel::new();
        let hits = counter();
        let h = Arc::clone(&hits);
        ch.subscribe("a", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        ch.set("b", 1.0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribed_listener_is_silent() {
        let ch = StateChannel::new();
        let hits = counter();
        let h = Arc::clone(&hits);
        let sub = ch.subscribe("k", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        ch.set("k", 1.0);
        assert!(sub.unsubscribe());
        ch.set("k", 2.0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        // key's listener list is dropped, value kept
        assert_eq!(ch.listener_count("k"), 0);
        assert_eq!(ch.get_f64("k"), Some(2.0));
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let ch = StateChannel::new();
        let sub = ch.subscribe("k", |_| Ok(()));
        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn same_listener_twice_fires_twice() {
        let ch = StateChannel::new();
        let hits = counter();
        let h = Arc::clone(&hits);
        let listener: crate::Listener = Arc::new(move |_: &Value| -> crate::ListenerResult<()> {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let first = ch.subscribe_shared("k", Arc::clone(&listener));
        let _second = ch.subscribe_shared("k", listener);
        ch.set("k", 1.0);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        // removing one leaves the other
        first.unsubscribe();
        ch.set("k", 2.0);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(ch.listener_count("k"), 1);
    }

    #[test]
    fn delivery_follows_subscription_order() {
        let ch = StateChannel::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let o = Arc::clone(&order);
            ch.subscribe("k", move |_| {
                o.lock().push(n);
                Ok(())
            });
        }
        ch.set("k", 0.0);
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn listener_may_write_to_the_channel() {
        let ch = StateChannel::new();
        let inner = ch.clone();
        ch.subscribe("in", move |v| {
            inner.set("out", v.clone());
            Ok(())
        });
        ch.set("in", 4.0);
        assert_eq!(ch.get_f64("out"), Some(4.0));
    }

    #[test]
    fn unsubscribe_after_channel_dropped() {
        let sub = {
            let ch = StateChannel::new();
            ch.subscribe("k", |_| Ok(()))
        };
        assert!(!sub.unsubscribe());
        assert_eq!(sub.key(), "k");
    }
}

// ── failure isolation ─────────────────────────────────────────────────────────

#[cfg(test)]
mod isolation_tests {
    use super::*;

    #[test]
    fn failing_listener_does_not_block_others() {
        let sink = CollectingSink::new();
        let ch = StateChannel::with_sink(sink.shared());
        let before = counter();
        let after = counter();

        let b = Arc::clone(&before);
        ch.subscribe("k", move |_| {
            b.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        ch.subscribe("k", |_| Err(ListenerError::failed("boom")));
        let a = Arc::clone(&after);
        ch.subscribe("k", move |_| {
            a.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let delivered = ch.set("k", 1.0);
        assert_eq!(delivered, 2);
        assert_eq!(before.load(Ordering::SeqCst), 1);
        assert_eq!(after.load(Ordering::SeqCst), 1);
        // the value is stored regardless
        assert_eq!(ch.get_f64("k"), Some(1.0));

        let diags = sink.take();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].source, DiagnosticSource::Listener { key: "k".into() });
        assert_eq!(diags[0].message, "boom");
    }
}

// ── clear ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod clear_tests {
    use super::*;

    #[test]
    fn clear_drops_values_and_listeners_silently() {
        let ch = StateChannel::new();
        let hits = counter();
        let h = Arc::clone(&hits);
        let sub = ch.subscribe("k", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        ch.set("k", 1.0);
        ch.clear();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(ch.is_empty());
        assert_eq!(ch.listener_count("k"), 0);

        ch.set("k", 2.0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn tokens_survive_clear() {
        let ch = StateChannel::new();
        let stale = ch.subscribe("k", |_| Ok(()));
        ch.clear();
        let fresh = ch.subscribe("k", |_| Ok(()));
        // the stale handle must not remove the new registration
        assert!(!stale.unsubscribe());
        assert_eq!(ch.listener_count("k"), 1);
        assert!(fresh.unsubscribe());
    }
}
