//! The `Entity` trait — the unit of per-frame scene behavior.

use qg_core::EntityId;

use crate::{EntityResult, SceneContext};

/// A registered unit with optional lifecycle callbacks.
///
/// Only [`id`][Self::id] is required.  `init` runs once when the entity is
/// added, `tick` once per `EntityManager::step`, and `dispose` once when the
/// entity is removed or the manager is cleared.  `init` and `dispose` see
/// [`FrameState::ZERO`][qg_core::FrameState::ZERO].
///
/// # Example
///
/// ```rust,ignore
/// struct Spinner { id: EntityId }
///
/// impl Entity for Spinner {
///     fn id(&self) -> &EntityId { &self.id }
///
///     fn tick(&mut self, ctx: &mut SceneContext<'_>) -> EntityResult<()> {
///         ctx.set("spinner.angle", ctx.state.time * 0.5);
///         Ok(())
///     }
/// }
/// ```
pub trait Entity: Send + 'static {
    fn id(&self) -> &EntityId;

    /// Kind name used by behaviors to pick the entities they drive.
    fn kind(&self) -> &'static str {
        "entity"
    }

    fn init(&mut self, _ctx: &mut SceneContext<'_>) -> EntityResult<()> {
        Ok(())
    }

    fn tick(&mut self, _ctx: &mut SceneContext<'_>) -> EntityResult<()> {
        Ok(())
    }

    fn dispose(&mut self, _ctx: &mut SceneContext<'_>) -> EntityResult<()> {
        Ok(())
    }

    /// The entity's [`Tunable`] capability, if it exposes one.
    fn tunable(&mut self) -> Option<&mut dyn Tunable> {
        None
    }
}

/// Named numeric parameters a behavior may read and drive.
///
/// This is the only way behaviors influence entities whose concrete type
/// they don't know.
pub trait Tunable {
    /// Names of the parameters this entity exposes.
    fn params(&self) -> &[&'static str];

    fn param(&self, name: &str) -> Option<f64>;

    /// Set `name` to `value`.  Returns `false` if the parameter doesn't exist.
    fn set_param(&mut self, name: &str, value: f64) -> bool;
}
