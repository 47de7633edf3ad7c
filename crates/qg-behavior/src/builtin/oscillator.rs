//! `torusPulse.oscillator` — drives one tunable parameter with a sine wave.

use qg_core::Options;
use qg_scene::{EntityManager, TorusPulse};

use crate::Behavior;

pub const NAME: &str = "torusPulse.oscillator";
pub const ID: &str = "bhv_torus_pulse_osc";

/// Resolved options of one oscillator instance.
#[derive(Clone, Debug, PartialEq)]
pub struct OscillatorParams {
    /// Peak value written to the parameter.
    pub amplitude: f64,
    /// Angular speed multiplier applied to scheduler time.
    pub speed:     f64,
    /// Parameter to drive.
    pub param:     String,
    /// Entity kind to drive.
    pub kind:      String,
}

impl OscillatorParams {
    pub fn from_options(options: &Options) -> Self {
        Self {
            amplitude: options.f64_or("amplitude", 0.4),
            speed:     options.f64_or("speed", 1.2),
            param:     Self::param_option(options).to_owned(),
            kind:      options.str_or("kind", TorusPulse::KIND).to_owned(),
        }
    }

    /// `prop` names the driven parameter; `param` is accepted as an alias.
    fn param_option(options: &Options) -> &str {
        match options.get("prop").and_then(|v| v.as_str()) {
            Some(prop) => prop,
            None => options.str_or("param", "amplitude"),
        }
    }

    /// Value written at scheduler time `t`, in `[0, amplitude]`.
    pub fn value_at(&self, t: f64) -> f64 {
        ((t * self.speed).sin() * 0.5 + 0.5) * self.amplitude
    }

    fn apply(&self, t: f64, entities: &mut EntityManager) {
        let value = self.value_at(t);
        for tunable in entities.tunables_mut(&self.kind) {
            tunable.set_param(&self.param, value);
        }
    }
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self::from_options(&Options::new())
    }
}

/// Factory for `torusPulse.oscillator`.
pub fn oscillator(options: &Options) -> Behavior {
    let params = OscillatorParams::from_options(options);
    Behavior::from_fn(move |_dt, t, entities| params.apply(t, entities)).with_id(ID)
}
