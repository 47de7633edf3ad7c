//! `TorusPulse` — publishes rotation and breathing offsets for the hero torus.

use qg_core::EntityId;

use crate::{Entity, EntityResult, SceneContext, Tunable};

/// Publishes the torus transform into the Shared Store every frame.
///
/// The rendering side reads:
///
/// | Key             | Value                                   |
/// |-----------------|-----------------------------------------|
/// | `torus.rotX`    | `t · 0.3`                               |
/// | `torus.rotY`    | `t · 0.5`                               |
/// | `torus.breathZ` | `−1 + sin(t · 0.6 · speed) · amplitude` |
///
/// `amplitude` and `speed` are exposed through [`Tunable`] so behaviors
/// (the oscillator, console overrides) can drive them.
#[derive(Clone, Debug)]
pub struct TorusPulse {
    id:        EntityId,
    amplitude: f64,
    speed:     f64,
    last_log:  f64,
}

impl TorusPulse {
    pub const KIND: &'static str = "TorusPulse";
    pub const DEFAULT_ID: &'static str = "torus-pulse";

    pub const KEY_ROT_X: &'static str = "torus.rotX";
    pub const KEY_ROT_Y: &'static str = "torus.rotY";
    pub const KEY_BREATH_Z: &'static str = "torus.breathZ";

    const PARAMS: [&'static str; 2] = ["amplitude", "speed"];

    pub fn new(id: impl Into<EntityId>) -> Self {
        Self { id: id.into(), amplitude: 0.15, speed: 1.0, last_log: 0.0 }
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// `(rotX, rotY, breathZ)` at time `t`.
    pub fn pose_at(&self, t: f64) -> (f64, f64, f64) {
        let rot_x = t * 0.3;
        let rot_y = t * 0.5;
        let breath_z = -1.0 + (t * 0.6 * self.speed).sin() * self.amplitude;
        (rot_x, rot_y, breath_z)
    }
}

impl Default for TorusPulse {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ID)
    }
}

impl Entity for TorusPulse {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn tick(&mut self, ctx: &mut SceneContext<'_>) -> EntityResult<()> {
        let t = ctx.state.time;
        let (rot_x, rot_y, breath_z) = self.pose_at(t);

        ctx.set(Self::KEY_ROT_X, rot_x);
        ctx.set(Self::KEY_ROT_Y, rot_y);
        ctx.set(Self::KEY_BREATH_Z, breath_z);

        // ~1/s
        if t - self.last_log >= 1.0 {
            tracing::debug!(
                entity = %self.id,
                "rotX {:.2} rotY {:.2} z {:.2}",
                rot_x,
                rot_y,
                breath_z
            );
            self.last_log = t;
        }
        Ok(())
    }

    fn tunable(&mut self) -> Option<&mut dyn Tunable> {
        Some(self)
    }
}

impl Tunable for TorusPulse {
    fn params(&self) -> &[&'static str] {
        &Self::PARAMS
    }

    fn param(&self, name: &str) -> Option<f64> {
        match name {
            "amplitude" => Some(self.amplitude),
            "speed" => Some(self.speed),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f64) -> bool {
        match name {
            "amplitude" => self.amplitude = value,
            "speed" => self.speed = value,
            _ => return false,
        }
        true
    }
}
