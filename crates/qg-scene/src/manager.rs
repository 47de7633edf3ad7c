//! `EntityManager` — owns entities and drives their lifecycle.

use std::fmt;

use qg_core::{Diagnostic, DiagnosticSource, EntityId, FrameState, SharedSink, TracingSink};

use crate::{
    Entity, Phase, SceneCommand, SceneContext, SceneError, SceneRef, SceneResult, SharedStore,
    Tunable,
};

/// Owns every registered entity and the Shared Store they communicate
/// through.
///
/// Entities are kept in registration order; `step` ticks them in that order.
///
/// # Structural changes during a frame
///
/// `step` ticks the set of entities registered when it was called.
/// Entities spawned or despawned from a tick callback go through the
/// context's command queue, which is applied after the pass, so they are
/// neither visited nor skipped in the current call and take effect from the
/// next one.
///
/// # Failures
///
/// A failing `tick` aborts the remainder of that pass and is returned to the
/// caller; entities later in the order are not ticked that frame.  Disposal
/// during [`clear`][Self::clear] is isolated per entity instead, with
/// failures going to the diagnostic sink.
pub struct EntityManager {
    entities: Vec<Box<dyn Entity>>,
    store:    SharedStore,
    scene:    Option<SceneRef>,
    sink:     SharedSink,
}

impl EntityManager {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            store:    SharedStore::new(),
            scene:    None,
            sink:     TracingSink::shared(),
        }
    }

    /// Attach the host's scene graph; exposed to callbacks via
    /// [`SceneContext::scene`].
    pub fn with_scene(mut self, scene: SceneRef) -> Self {
        self.scene = Some(scene);
        self
    }

    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Register `entity` and run its `init`.
    ///
    /// Returns `Ok(false)` without touching anything if the id is already
    /// registered (first registration wins).  If `init` fails the entity
    /// stays registered and the error is returned.
    pub fn add<E: Entity>(&mut self, entity: E) -> SceneResult<bool> {
        self.add_boxed(Box::new(entity))
    }

    pub fn add_boxed(&mut self, entity: Box<dyn Entity>) -> SceneResult<bool> {
        let mut pending = Vec::new();
        let result = self.insert(entity, &mut pending);
        self.drain(pending);
        result
    }

    /// Run the entity's `dispose`, then unregister it.
    ///
    /// Returns `Ok(false)` if `id` isn't registered.  The entity is removed
    /// even when `dispose` fails; the failure is returned.
    pub fn remove(&mut self, id: &str) -> SceneResult<bool> {
        let mut pending = Vec::new();
        let result = self.dispose_and_remove(id, &mut pending);
        self.drain(pending);
        result
    }

    /// Advance one frame: tick every registered entity with `state`.
    pub fn step(&mut self, state: FrameState) -> SceneResult<()> {
        let mut commands = Vec::new();
        let mut result = Ok(());

        for entity in self.entities.iter_mut() {
            let ticked = run_hook(
                entity.as_mut(),
                Phase::Tick,
                state,
                self.scene.as_ref(),
                &mut self.store,
                &mut commands,
            );
            if let Err(e) = ticked {
                result = Err(e);
                break;
            }
        }

        // Commands queued before a failure still apply.
        self.apply(commands);
        result
    }

    /// Dispose every entity, then empty the manager and its Shared Store.
    ///
    /// Each entity is disposed exactly once; a failing `dispose` is reported
    /// to the diagnostic sink and does not stop the others.  Commands queued
    /// by `dispose` callbacks are discarded.  Returns the number of entities
    /// disposed.
    pub fn clear(&mut self) -> usize {
        let entities = std::mem::take(&mut self.entities);
        let count = entities.len();
        let mut discarded = Vec::new();

        for mut entity in entities {
            let disposed = run_hook(
                entity.as_mut(),
                Phase::Dispose,
                FrameState::ZERO,
                self.scene.as_ref(),
                &mut self.store,
                &mut discarded,
            );
            if let Err(e) = disposed {
                self.sink.report(Diagnostic::new(
                    DiagnosticSource::Dispose { entity: e.entity().clone() },
                    e.to_string(),
                ));
            }
        }

        if !discarded.is_empty() {
            tracing::debug!(count = discarded.len(), "commands queued during clear discarded");
        }
        self.store.clear();
        tracing::debug!(count, "entity manager cleared");
        count
    }

    fn apply(&mut self, commands: Vec<SceneCommand>) {
        let mut pending = Vec::new();
        defer(&mut pending, commands);
        self.drain(pending);
    }

    /// Work through `pending` (a stack, next command on top) until empty.
    ///
    /// Commands queued by the hooks these run are pushed on top, so they
    /// apply before the rest of the outer batch without recursing.
    fn drain(&mut self, mut pending: Vec<SceneCommand>) {
        while let Some(command) = pending.pop() {
            match command {
                SceneCommand::Spawn(entity) => {
                    let id = entity.id().clone();
                    if let Err(e) = self.insert(entity, &mut pending) {
                        self.sink.report(Diagnostic::new(
                            DiagnosticSource::DeferredSpawn { entity: id },
                            e.to_string(),
                        ));
                    }
                }
                SceneCommand::Despawn(id) => {
                    if let Err(e) = self.dispose_and_remove(id.as_str(), &mut pending) {
                        self.sink.report(Diagnostic::new(
                            DiagnosticSource::Dispose { entity: id },
                            e.to_string(),
                        ));
                    }
                }
            }
        }
    }

    fn insert(
        &mut self,
        mut entity: Box<dyn Entity>,
        pending: &mut Vec<SceneCommand>,
    ) -> SceneResult<bool> {
        if self.contains(entity.id().as_str()) {
            tracing::debug!(entity = %entity.id(), "duplicate entity ignored");
            return Ok(false);
        }

        let mut commands = Vec::new();
        let result = run_hook(
            entity.as_mut(),
            Phase::Init,
            FrameState::ZERO,
            self.scene.as_ref(),
            &mut self.store,
            &mut commands,
        );
        tracing::debug!(entity = %entity.id(), kind = entity.kind(), "entity added");
        self.entities.push(entity);
        defer(pending, commands);
        result.map(|()| true)
    }

    fn dispose_and_remove(
        &mut self,
        id: &str,
        pending: &mut Vec<SceneCommand>,
    ) -> SceneResult<bool> {
        let Some(pos) = self.position(id) else {
            return Ok(false);
        };

        let mut commands = Vec::new();
        let result = run_hook(
            self.entities[pos].as_mut(),
            Phase::Dispose,
            FrameState::ZERO,
            self.scene.as_ref(),
            &mut self.store,
            &mut commands,
        );
        self.entities.remove(pos);
        tracing::debug!(entity = id, "entity removed");
        defer(pending, commands);
        result.map(|()| true)
    }

    // ── Shared Store ──────────────────────────────────────────────────────

    pub fn get(&self, key: &str) -> Option<&qg_core::Value> {
        self.store.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<qg_core::Value>) {
        self.store.set(key, value);
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SharedStore {
        &mut self.store
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Registered ids in tick order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id().clone()).collect()
    }

    pub fn entity(&self, id: &str) -> Option<&dyn Entity> {
        let pos = self.position(id)?;
        Some(self.entities[pos].as_ref())
    }

    pub fn entity_mut(&mut self, id: &str) -> Option<&mut dyn Entity> {
        let pos = self.position(id)?;
        Some(self.entities[pos].as_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Entity + 'static)> {
        self.entities.iter().map(|e| e.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn Entity + 'static)> {
        self.entities.iter_mut().map(|e| e.as_mut())
    }

    /// The [`Tunable`] capability of every entity of `kind` that exposes one.
    pub fn tunables_mut<'s>(
        &'s mut self,
        kind: &'s str,
    ) -> impl Iterator<Item = &'s mut dyn Tunable> + 's {
        self.entities
            .iter_mut()
            .filter(move |e| e.kind() == kind)
            .filter_map(|e| e.tunable())
    }

    pub fn scene(&self) -> Option<&SceneRef> {
        self.scene.as_ref()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entities.iter().position(|e| e.id().as_str() == id)
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityManager")
            .field("entities", &self.ids())
            .field("store", &self.store)
            .field("has_scene", &self.scene.is_some())
            .finish()
    }
}

/// Push `batch` onto the `pending` stack so its first command pops first.
fn defer(pending: &mut Vec<SceneCommand>, batch: Vec<SceneCommand>) {
    pending.extend(batch.into_iter().rev());
}

/// Run one lifecycle hook with a freshly built context.
fn run_hook(
    entity:   &mut dyn Entity,
    phase:    Phase,
    state:    FrameState,
    scene:    Option<&SceneRef>,
    store:    &mut SharedStore,
    commands: &mut Vec<SceneCommand>,
) -> SceneResult<()> {
    let mut ctx = SceneContext::new(state, scene, store, commands);
    let outcome = match phase {
        Phase::Init => entity.init(&mut ctx),
        Phase::Tick => entity.tick(&mut ctx),
        Phase::Dispose => entity.dispose(&mut ctx),
    };
    outcome.map_err(|source| SceneError::Lifecycle { entity: entity.id().clone(), phase, source })
}
