use std::fmt;

use qg_core::EntityId;
use thiserror::Error;

/// Failure returned by an entity lifecycle callback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EntityError(pub String);

impl EntityError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub type EntityResult<T> = Result<T, EntityError>;

/// Which lifecycle callback failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Init,
    Tick,
    Dispose,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Init => "init",
            Phase::Tick => "tick",
            Phase::Dispose => "dispose",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("entity {entity} failed during {phase}: {source}")]
    Lifecycle {
        entity: EntityId,
        phase:  Phase,
        source: EntityError,
    },
}

impl SceneError {
    pub fn entity(&self) -> &EntityId {
        match self {
            SceneError::Lifecycle { entity, .. } => entity,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            SceneError::Lifecycle { phase, .. } => *phase,
        }
    }
}

pub type SceneResult<T> = Result<T, SceneError>;
