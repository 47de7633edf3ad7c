use std::path::PathBuf;

use qg_behavior::BehaviorError;
use qg_scene::SceneError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("stage configuration error: {0}")]
    Config(String),

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),
}

pub type StageResult<T> = Result<T, StageError>;
