//! `qg-stage` — frame driver for the quantum-gallery scene runtime.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`config`]   | `StageConfig` loaded from TOML                                  |
//! | [`builder`]  | `StageBuilder` — fluent construction, build-time activations    |
//! | [`stage`]    | `Stage` — owns manager, scheduler, registry; drives each frame  |
//! | [`bridge`]   | `ControlBridge<'a>` — console façade over state and behaviors   |
//! | [`observer`] | `StageObserver`, `NoopObserver`, `LoggingObserver`              |
//! | [`error`]    | `StageError`, `StageResult<T>`                                  |
//!
//! # Frame loop
//!
//! ```text
//! per display frame:
//!   ① FrameTimer  — host timestamp → FrameState (time, dt, frame, viewport)
//!   ② Entities    — EntityManager::step(state); a tick error ends the frame
//!   ③ Behaviors   — BehaviorScheduler::update(state.dt, &mut entities)
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use qg_scene::TorusPulse;
//! use qg_stage::{NoopObserver, StageBuilder};
//!
//! let mut stage = StageBuilder::new()
//!     .with_builtin_behaviors()
//!     .entity(TorusPulse::default())
//!     .build()?;
//! stage.bridge().set("torusPulse.amplitude", 0.8);
//! stage.run_frames(120, &mut NoopObserver)?;
//! ```

pub mod bridge;
pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod stage;


pub use bridge::ControlBridge;
pub use builder::StageBuilder;
pub use config::{ActivationConfig, StageConfig};
pub use error::{StageError, StageResult};
pub use observer::{LoggingObserver, NoopObserver, StageObserver};
pub use stage::Stage;
