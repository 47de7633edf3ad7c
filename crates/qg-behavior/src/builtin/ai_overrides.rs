//! `torusPulse.aiOverrides` — applies console overrides to every torus.

use qg_core::Options;
use qg_scene::{EntityManager, TorusPulse};
use qg_state::StateChannel;

use crate::Behavior;

pub const NAME: &str = "torusPulse.aiOverrides";
pub const ID: &str = "bhv_torus_pulse_ai_overrides";

/// State Channel key → `TorusPulse` parameter.
pub const OVERRIDES: [(&str, &str); 2] = [
    ("torusPulse.amplitude", "amplitude"),
    ("torusPulse.speed", "speed"),
];

/// Factory for `torusPulse.aiOverrides` reading from `channel`.
///
/// Keys that are absent or hold a non-number are skipped.
pub fn factory(channel: StateChannel) -> impl Fn(&Options) -> Behavior + Send + Sync + 'static {
    move |_options: &Options| {
        let channel = channel.clone();
        Behavior::from_fn(move |_dt, _t, entities| apply_overrides(&channel, entities)).with_id(ID)
    }
}

fn apply_overrides(channel: &StateChannel, entities: &mut EntityManager) {
    for (key, param) in OVERRIDES {
        let Some(value) = channel.get_f64(key) else {
            continue;
        };
        for tunable in entities.tunables_mut(TorusPulse::KIND) {
            tunable.set_param(param, value);
        }
    }
}
