//! Per-callback view handed to entity lifecycle hooks.

use std::any::Any;
use std::sync::Arc;

use qg_core::{EntityId, FrameState, Value};

use crate::{Entity, SharedStore};

/// Opaque reference to the host's scene graph, if one was supplied.
pub type SceneRef = Arc<dyn Any + Send + Sync>;

/// A structural change requested from inside a callback.
///
/// Queued on the [`SceneContext`] and applied by the manager once the
/// current callback (or, during `step`, the whole pass) has finished.
pub enum SceneCommand {
    Spawn(Box<dyn Entity>),
    Despawn(EntityId),
}

impl std::fmt::Debug for SceneCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneCommand::Spawn(e) => f.debug_tuple("Spawn").field(e.id()).finish(),
            SceneCommand::Despawn(id) => f.debug_tuple("Despawn").field(id).finish(),
        }
    }
}

/// What an entity sees during `init`, `tick` or `dispose`.
///
/// Bundles the frame timing, the manager's [`SharedStore`], the optional
/// external scene reference, and the command queue.
pub struct SceneContext<'a> {
    /// Timing for this frame (`FrameState::ZERO` in `init`/`dispose`).
    pub state: FrameState,
    scene:     Option<&'a SceneRef>,
    store:     &'a mut SharedStore,
    commands:  &'a mut Vec<SceneCommand>,
}

impl<'a> SceneContext<'a> {
    #[inline]
    pub fn new(
        state:    FrameState,
        scene:    Option<&'a SceneRef>,
        store:    &'a mut SharedStore,
        commands: &'a mut Vec<SceneCommand>,
    ) -> Self {
        Self { state, scene, store, commands }
    }

    /// Read from the Shared Store.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.store.get_f64(key)
    }

    /// Write to the Shared Store.
    #[inline]
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.store.set(key, value);
    }

    /// The host scene graph downcast to `T`, if present and of that type.
    pub fn scene<T: Any>(&self) -> Option<&T> {
        self.scene.and_then(|s| (**s).downcast_ref::<T>())
    }

    pub fn has_scene(&self) -> bool {
        self.scene.is_some()
    }

    /// Queue `entity` for registration.
    pub fn spawn<E: Entity>(&mut self, entity: E) {
        self.commands.push(SceneCommand::Spawn(Box::new(entity)));
    }

    pub fn spawn_boxed(&mut self, entity: Box<dyn Entity>) {
        self.commands.push(SceneCommand::Spawn(entity));
    }

    /// Queue removal of the entity registered under `id`.
    pub fn despawn(&mut self, id: impl Into<EntityId>) {
        self.commands.push(SceneCommand::Despawn(id.into()));
    }

    /// Number of commands queued so far in this pass.
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }
}
