//! Fluent builder for constructing a [`Stage`].

use qg_behavior::builtin::register_builtins;
use qg_behavior::{Behavior, BehaviorRegistry, BehaviorScheduler, Factory};
use qg_core::{FrameTimer, Options, SharedSink, TimeSource, TracingSink};
use qg_scene::{Entity, EntityManager, SceneRef};
use qg_state::StateChannel;

use crate::{Stage, StageConfig, StageResult};

/// Fluent builder for [`Stage`].
///
/// Every input is optional:
///
/// | Method                        | Default                               |
/// |-------------------------------|---------------------------------------|
/// | `.config(c)`                  | `StageConfig::default()`              |
/// | `.scene(s)`                   | no scene reference                    |
/// | `.clock(c)`                   | `MonotonicClock`                      |
/// | `.sink(s)`                    | `TracingSink`                         |
/// | `.channel(c)`                 | a fresh `StateChannel` on the sink    |
/// | `.factory(name, f)`           | none                                  |
/// | `.with_builtin_behaviors()`   | built-ins not registered              |
/// | `.entity(e)`                  | no entities                           |
///
/// # Example
///
/// ```rust,ignore
/// let mut stage = StageBuilder::new()
///     .config(StageConfig::load("stage.toml")?)
///     .with_builtin_behaviors()
///     .entity(TorusPulse::default())
///     .build()?;
/// ```
pub struct StageBuilder {
    config:    StageConfig,
    scene:     Option<SceneRef>,
    clock:     Option<Box<dyn TimeSource>>,
    sink:      Option<SharedSink>,
    channel:   Option<StateChannel>,
    factories: Vec<(String, Factory)>,
    builtins:  bool,
    entities:  Vec<Box<dyn Entity>>,
}

impl StageBuilder {
    pub fn new() -> Self {
        Self {
            config:    StageConfig::default(),
            scene:     None,
            clock:     None,
            sink:      None,
            channel:   None,
            factories: Vec::new(),
            builtins:  false,
            entities:  Vec::new(),
        }
    }

    pub fn config(mut self, config: StageConfig) -> Self {
        self.config = config;
        self
    }

    /// Host scene graph exposed to entity callbacks.
    pub fn scene(mut self, scene: SceneRef) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Time source for the behavior scheduler's elapsed clock.
    pub fn clock(mut self, clock: impl TimeSource) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Receives every isolated failure from the channel, manager and
    /// registry.
    pub fn sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Share an existing channel instead of creating one.
    pub fn channel(mut self, channel: StateChannel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Register a behavior factory under `name`.  Later calls for the same
    /// name replace earlier ones.
    pub fn factory<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Options) -> Behavior + Send + Sync + 'static,
    {
        self.factories.push((name.into(), Box::new(factory)));
        self
    }

    /// Register `torusPulse.oscillator` and `torusPulse.aiOverrides`.
    pub fn with_builtin_behaviors(mut self) -> Self {
        self.builtins = true;
        self
    }

    /// Add an entity at build time (its `init` runs during `build`).
    pub fn entity<E: Entity>(mut self, entity: E) -> Self {
        self.entities.push(Box::new(entity));
        self
    }

    /// Validate the config, wire the components together, add entities and
    /// perform the configured activations.
    pub fn build(self) -> StageResult<Stage> {
        self.config.validate()?;

        let sink = self.sink.unwrap_or_else(TracingSink::shared);
        let channel = self.channel.unwrap_or_else(|| StateChannel::with_sink(sink.clone()));

        // ── Entities ──────────────────────────────────────────────────────
        let mut entities = EntityManager::new().with_sink(sink.clone());
        if let Some(scene) = self.scene {
            entities = entities.with_scene(scene);
        }
        for entity in self.entities {
            entities.add_boxed(entity)?;
        }

        // ── Behaviors ─────────────────────────────────────────────────────
        let mut scheduler = match self.clock {
            Some(clock) => BehaviorScheduler::with_boxed_clock(clock),
            None => BehaviorScheduler::new(),
        };
        if let Some(seed) = self.config.behavior_id_seed {
            scheduler = scheduler.with_id_seed(seed);
        }

        let mut registry = BehaviorRegistry::new().with_sink(sink);
        if self.builtins {
            register_builtins(&mut registry, &channel);
        }
        for (name, factory) in self.factories {
            registry.register_boxed_factory(name, factory);
        }

        let mut timer = FrameTimer::new();
        timer.set_viewport(self.config.viewport);

        let mut stage = Stage {
            config: self.config,
            entities,
            scheduler,
            registry,
            channel,
            timer,
            last_frame: None,
            frames: 0,
        };

        for activation in &stage.config.activate {
            stage.registry.activate(&mut stage.scheduler, &activation.name, &activation.options)?;
        }

        tracing::info!(
            entities = stage.entities.len(),
            factories = stage.registry.list_factories().len(),
            active = stage.registry.list_active().len(),
            "stage built"
        );
        Ok(stage)
    }
}

impl Default for StageBuilder {
    fn default() -> Self {
        Self::new()
    }
}
