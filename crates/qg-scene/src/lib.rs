//! `qg-scene` — entity lifecycle management.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`entity`]   | `Entity` trait (init / tick / dispose), `Tunable` capability |
//! | [`context`]  | `SceneContext<'a>` — per-callback view of frame, store, scene |
//! | [`store`]    | `SharedStore` — per-manager key/value scratch space        |
//! | [`manager`]  | `EntityManager`                                            |
//! | [`entities`] | Concrete entities (`TorusPulse`)                           |
//! | [`error`]    | `EntityError`, `SceneError`, `Phase`                       |
//!
//! # Design notes
//!
//! `EntityManager::step` ticks every entity registered when the call began.
//! Tick callbacks cannot add or remove entities directly; they queue
//! `spawn`/`despawn` commands on their [`SceneContext`], and the manager
//! applies the queue after the pass.  Structural changes made during a frame
//! therefore take effect from the next `step`, never mid-pass.
//!
//! Entities never hold references to each other.  They communicate through
//! the [`SharedStore`], and behaviors reach them through the [`Tunable`]
//! capability rather than by probing their concrete type.

pub mod context;
pub mod entities;
pub mod entity;
pub mod error;
pub mod manager;
pub mod store;


pub use context::{SceneCommand, SceneContext, SceneRef};
pub use entities::TorusPulse;
pub use entity::{Entity, Tunable};
pub use error::{EntityError, EntityResult, Phase, SceneError, SceneResult};
pub use manager::EntityManager;
pub use store::SharedStore;
