//! Unit tests for qg-behavior.

use std::sync::Arc;

use parking_lot::Mutex;
use qg_core::{BehaviorId, ManualClock, Options, Value};
use qg_scene::{EntityManager, TorusPulse};
use qg_state::StateChannel;

use crate::{Behavior, BehaviorRegistry, BehaviorScheduler};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn scheduler(clock: &ManualClock) -> BehaviorScheduler {
    BehaviorScheduler::with_clock(clock.clone()).with_id_seed(7)
}

/// A behavior that appends `(tag, dt, time)` to `log` on every tick.
fn recording(tag: &'static str, log: &Arc<Mutex<Vec<(&'static str, f64, f64)>>>) -> Behavior {
    let log = Arc::clone(log);
    Behavior::from_fn(move |dt, t, _entities| log.lock().push((tag, dt, t)))
}

fn torus_param(mgr: &mut EntityManager, name: &str) -> Option<f64> {
    mgr.entity_mut(TorusPulse::DEFAULT_ID)
        .and_then(|e| e.tunable())
        .and_then(|t| t.param(name))
}

// ── BehaviorScheduler ─────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler_tests {
    use super::*;

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let a = s.register(Behavior::from_fn(|_, _, _| {}));
        let b = s.register(Behavior::from_fn(|_, _, _| {}));
        assert!(a.id().as_str().starts_with("bhv_"));
        assert_ne!(a.id(), b.id());
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn seeded_ids_are_deterministic() {
        let clock = ManualClock::new();
        let a = scheduler(&clock).register(Behavior::from_fn(|_, _, _| {}));
        let b = scheduler(&clock).register(Behavior::from_fn(|_, _, _| {}));
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn update_passes_dt_and_scheduler_time() {
        let clock = ManualClock::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut s = scheduler(&clock);
        let mut mgr = EntityManager::new();
        s.register(recording("a", &log));

        clock.advance_secs(2.5);
        s.update(0.016, &mut mgr);
        assert_eq!(*log.lock(), vec![("a", 0.016, 2.5)]);
        assert_eq!(s.time(), 2.5);
    }

    #[test]
    fn clock_starts_at_construction() {
        let clock = ManualClock::new();
        clock.advance_secs(100.0);
        let mut s = scheduler(&clock);
        clock.advance_secs(1.0);
        s.update(0.0, &mut EntityManager::new());
        assert_eq!(s.time(), 1.0);
    }

    #[test]
    fn disabled_behaviors_are_skipped() {
        let clock = ManualClock::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut s = scheduler(&clock);
        let mut mgr = EntityManager::new();
        s.register(recording("a", &log).with_id("a"));
        s.register(recording("b", &log).with_id("b").enabled(false));

        s.update(0.1, &mut mgr);
        assert_eq!(log.lock().len(), 1);
        assert_eq!(s.is_enabled("b"), Some(false));

        assert!(s.enable("b"));
        assert!(s.disable("a"));
        assert!(!s.enable("ghost"));
        assert_eq!(s.is_enabled("ghost"), None);

        log.lock().clear();
        s.update(0.1, &mut mgr);
        let tags: Vec<_> = log.lock().iter().map(|e| e.0).collect();
        assert_eq!(tags, vec!["b"]);
    }

    #[test]
    fn same_id_replaces_in_place() {
        let clock = ManualClock::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut s = scheduler(&clock);
        let mut mgr = EntityManager::new();
        let first = s.register(recording("first", &log).with_id("x"));
        s.register(recording("other", &log).with_id("y"));
        let second = s.register(recording("second", &log).with_id("x"));

        assert_eq!(s.len(), 2);
        assert_eq!(s.ids(), vec![BehaviorId::from("x"), BehaviorId::from("y")]);
        s.update(0.0, &mut mgr);
        let tags: Vec<_> = log.lock().iter().map(|e| e.0).collect();
        assert_eq!(tags, vec!["second", "other"]);

        // the overwritten registration can no longer remove "x"
        assert!(!s.is_registered(&first));
        assert!(!s.unregister(&first));
        assert!(s.contains("x"));
        assert!(s.unregister(&second));
        assert!(!s.contains("x"));
    }

    #[test]
    fn unregister_is_idempotent() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let reg = s.register(Behavior::from_fn(|_, _, _| {}));
        assert!(s.unregister(&reg));
        assert!(!s.unregister(&reg));
        assert!(s.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        s.register(Behavior::from_fn(|_, _, _| {}));
        s.register(Behavior::from_fn(|_, _, _| {}));
        s.clear();
        assert!(s.is_empty());
        s.update(0.1, &mut EntityManager::new());
    }

    #[test]
    fn behaviors_reach_entities() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut mgr = EntityManager::new();
        mgr.add(TorusPulse::default()).unwrap();
        s.register(Behavior::from_fn(|_, _, entities| {
            for t in entities.tunables_mut(TorusPulse::KIND) {
                t.set_param("speed", 4.0);
            }
        }));
        s.update(0.0, &mut mgr);
        assert_eq!(torus_param(&mut mgr, "speed"), Some(4.0));
    }
}

// ── BehaviorRegistry ──────────────────────────────────────────────────────────

#[cfg(test)]
mod registry_tests {
    use qg_core::{CollectingSink, DiagnosticSource};

    use super::*;
    use crate::BehaviorError;

    fn noop(_: &Options) -> Behavior {
        Behavior::from_fn(|_, _, _| {})
    }

    fn fixed(_: &Options) -> Behavior {
        Behavior::from_fn(|_, _, _| {}).with_id("bhv_fixed")
    }

    #[test]
    fn register_factory_reports_new_names() {
        let mut r = BehaviorRegistry::new();
        assert!(r.register_factory("x", noop));
        assert!(!r.register_factory("x", fixed));
        assert!(r.has_factory("x"));
        assert_eq!(r.list_factories(), vec!["x".to_string()]);
    }

    #[test]
    fn activate_unknown_is_not_found() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut r = BehaviorRegistry::new();
        r.register_factory("x", noop);
        r.activate(&mut s, "x", &Options::new()).unwrap();

        let err = r.activate(&mut s, "missing", &Options::new()).unwrap_err();
        assert_eq!(err, BehaviorError::FactoryNotFound("missing".into()));
        assert_eq!(r.list_active(), vec!["x".to_string()]);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn reactivation_keeps_one_instance() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut r = BehaviorRegistry::new();
        // generated ids, so two live instances would show up as two slots
        r.register_factory("x", noop);

        let a = r.activate(&mut s, "x", &Options::new().with("v", 1.0)).unwrap();
        assert_eq!(s.len(), 1);
        let b = r.activate(&mut s, "x", &Options::new().with("v", 2.0)).unwrap();
        assert_eq!(s.len(), 1);
        assert!(!s.is_registered(a.registration()));
        assert!(s.is_registered(b.registration()));
        assert_eq!(r.active_registration("x"), Some(b.registration()));
    }

    #[test]
    fn stale_release_leaves_newer_activation() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut r = BehaviorRegistry::new();
        // same fixed id for both activations
        r.register_factory("x", fixed);

        let a = r.activate(&mut s, "x", &Options::new()).unwrap();
        let b = r.activate(&mut s, "x", &Options::new()).unwrap();

        assert!(!r.release(&mut s, &a));
        assert!(s.is_registered(b.registration()));
        assert!(r.is_active("x"));
        assert!(!r.release(&mut s, &a));
    }

    #[test]
    fn release_current_clears_bookkeeping() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut r = BehaviorRegistry::new();
        r.register_factory("x", fixed);

        let a = r.activate(&mut s, "x", &Options::new()).unwrap();
        assert_eq!(a.name(), "x");
        assert!(r.release(&mut s, &a));
        assert!(!r.is_active("x"));
        assert!(s.is_empty());
        assert!(!r.release(&mut s, &a));
    }

    #[test]
    fn deactivate_by_name() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut r = BehaviorRegistry::new();
        r.register_factory("x", noop);
        r.activate(&mut s, "x", &Options::new()).unwrap();

        assert!(r.deactivate(&mut s, "x"));
        assert!(!r.deactivate(&mut s, "x"));
        assert!(s.is_empty());
    }

    #[test]
    fn factory_changes_leave_active_instance() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut r = BehaviorRegistry::new();
        r.register_factory("x", fixed);
        r.activate(&mut s, "x", &Options::new()).unwrap();

        r.register_factory("x", noop);
        assert!(s.contains("bhv_fixed"));
        assert!(r.remove_factory("x"));
        assert!(!r.remove_factory("x"));
        assert!(r.is_active("x"));
        assert!(s.contains("bhv_fixed"));
    }

    #[test]
    fn deactivate_all_isolates_stale_names() {
        let clock = ManualClock::new();
        let sink = CollectingSink::new();
        let mut s = scheduler(&clock);
        let mut r = BehaviorRegistry::new().with_sink(sink.shared());
        // both names produce the same fixed id, so "b" overwrites "a"
        r.register_factory("a", fixed);
        r.register_factory("b", fixed);
        r.register_factory("c", noop);
        for name in ["a", "b", "c"] {
            r.activate(&mut s, name, &Options::new()).unwrap();
        }

        assert_eq!(r.deactivate_all(&mut s), 3);
        assert!(r.list_active().is_empty());
        assert!(s.is_empty());

        let diags = sink.take();
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].source,
            DiagnosticSource::Deactivation { name: "a".into(), behavior: "bhv_fixed".into() }
        );
    }

    #[test]
    fn behavior_sees_scheduler_clock_not_dt() {
        let clock = ManualClock::new();
        let channel = StateChannel::new();
        let mut s = scheduler(&clock);
        let mut r = BehaviorRegistry::new();
        let mut mgr = EntityManager::new();

        let out = channel.clone();
        r.register_factory("osc", move |_: &Options| {
            let out = out.clone();
            Behavior::from_fn(move |_dt, t, _| {
                out.set("channelValue", t);
            })
        });
        r.activate(&mut s, "osc", &Options::new()).unwrap();

        clock.advance_secs(3.0);
        s.update(0.016, &mut mgr);
        assert_eq!(channel.get("channelValue"), Some(Value::Number(3.0)));
    }
}

// ── Built-in behaviors ────────────────────────────────────────────────────────

#[cfg(test)]
mod builtin_tests {
    use super::*;
    use crate::builtin::oscillator::OscillatorParams;
    use crate::builtin::{ai_overrides, oscillator, register_builtins};

    fn torus_manager() -> EntityManager {
        let mut mgr = EntityManager::new();
        mgr.add(TorusPulse::default()).unwrap();
        mgr
    }

    #[test]
    fn oscillator_defaults() {
        let p = OscillatorParams::default();
        assert_eq!(p.amplitude, 0.4);
        assert_eq!(p.speed, 1.2);
        assert_eq!(p.param, "amplitude");
        assert_eq!(p.kind, TorusPulse::KIND);
        assert_eq!(p.value_at(0.0), 0.2);
    }

    #[test]
    fn oscillator_drives_torus_amplitude() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut mgr = torus_manager();
        let behavior = oscillator::oscillator(&Options::new());
        assert_eq!(behavior.id().map(|id| id.as_str()), Some(oscillator::ID));
        s.register(behavior);

        // sin(t · 1.2) = 1
        clock.advance_secs(std::f64::consts::FRAC_PI_2 / 1.2);
        s.update(0.016, &mut mgr);
        let amp = torus_param(&mut mgr, "amplitude").unwrap();
        assert!((amp - 0.4).abs() < 1e-6);
    }

    #[test]
    fn oscillator_options_pick_param() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut mgr = torus_manager();
        let options = Options::new().with("param", "speed").with("amplitude", 2.0);
        s.register(oscillator::oscillator(&options));

        s.update(0.016, &mut mgr);
        assert_eq!(torus_param(&mut mgr, "speed"), Some(1.0));
        assert_eq!(torus_param(&mut mgr, "amplitude"), Some(0.15));
    }

    #[test]
    fn oscillator_prop_option_picks_param() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut mgr = torus_manager();
        let options = Options::new().with("prop", "speed").with("amplitude", 0.6);
        s.register(oscillator::oscillator(&options));

        clock.advance_secs(1.0);
        s.update(0.016, &mut mgr);
        let speed = torus_param(&mut mgr, "speed").unwrap();
        assert!((speed - ((1.2f64).sin() * 0.5 + 0.5) * 0.6).abs() < 1e-9);
        assert_eq!(torus_param(&mut mgr, "amplitude"), Some(0.15));
    }

    #[test]
    fn prop_wins_over_param_alias() {
        let options = Options::new().with("prop", "speed").with("param", "amplitude");
        assert_eq!(OscillatorParams::from_options(&options).param, "speed");
    }

    #[test]
    fn ai_overrides_copy_numbers_only() {
        let clock = ManualClock::new();
        let channel = StateChannel::new();
        let mut s = scheduler(&clock);
        let mut mgr = torus_manager();
        s.register(ai_overrides::factory(channel.clone())(&Options::new()));

        s.update(0.016, &mut mgr);
        assert_eq!(torus_param(&mut mgr, "amplitude"), Some(0.15));

        channel.set("torusPulse.amplitude", 0.8);
        channel.set("torusPulse.speed", "fast");
        s.update(0.016, &mut mgr);
        assert_eq!(torus_param(&mut mgr, "amplitude"), Some(0.8));
        assert_eq!(torus_param(&mut mgr, "speed"), Some(1.0));
    }

    #[test]
    fn builtins_register_both_factories() {
        let channel = StateChannel::new();
        let mut r = BehaviorRegistry::new();
        register_builtins(&mut r, &channel);
        assert_eq!(
            r.list_factories(),
            vec![ai_overrides::NAME.to_string(), oscillator::NAME.to_string()]
        );
    }

    #[test]
    fn overrides_and_oscillator_together() {
        let clock = ManualClock::new();
        let channel = StateChannel::new();
        let mut s = scheduler(&clock);
        let mut r = BehaviorRegistry::new();
        let mut mgr = torus_manager();
        register_builtins(&mut r, &channel);

        r.activate(&mut s, oscillator::NAME, &Options::new().with("prop", "speed")).unwrap();
        r.activate(&mut s, ai_overrides::NAME, &Options::new()).unwrap();
        channel.set("torusPulse.speed", 9.0);

        // overrides registered last, so they win
        s.update(0.016, &mut mgr);
        assert_eq!(torus_param(&mut mgr, "speed"), Some(9.0));
        assert_eq!(
            s.ids(),
            vec![BehaviorId::from(oscillator::ID), BehaviorId::from(ai_overrides::ID)]
        );
    }
}
