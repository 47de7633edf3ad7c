//! Behaviors shipped with the runtime.
//!
//! | Name                     | Fixed id                        | Effect                                  |
//! |--------------------------|---------------------------------|-----------------------------------------|
//! | `torusPulse.oscillator`  | `bhv_torus_pulse_osc`           | sweeps a `Tunable` param with a sine    |
//! | `torusPulse.aiOverrides` | `bhv_torus_pulse_ai_overrides`  | copies State Channel values onto torus  |

pub mod ai_overrides;
pub mod oscillator;

use qg_state::StateChannel;

use crate::BehaviorRegistry;

/// Register every built-in factory on `registry`.
///
/// `channel` is captured by the factories that read console state.
pub fn register_builtins(registry: &mut BehaviorRegistry, channel: &StateChannel) {
    registry.register_factory(oscillator::NAME, oscillator::oscillator);
    registry.register_factory(ai_overrides::NAME, ai_overrides::factory(channel.clone()));
}
