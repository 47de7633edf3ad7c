//! `StageConfig` — TOML-loadable stage settings.
//!
//! ```toml
//! behavior_id_seed = 42
//! refresh_hz       = 60.0
//! log_every_frames = 120
//!
//! [viewport]
//! width  = 1280
//! height = 720
//!
//! [[activate]]
//! name    = "torusPulse.oscillator"
//! options = { amplitude = 0.6, speed = 1.0 }
//! ```

use std::path::Path;

use qg_core::{Options, Viewport};
use serde::Deserialize;

use crate::{StageError, StageResult};

/// Settings read once when a [`Stage`][crate::Stage] is built.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Seed for generated behavior ids.  `None` seeds from OS entropy.
    pub behavior_id_seed: Option<u64>,

    /// Attached to every `FrameState` the stage produces.
    pub viewport: Option<Viewport>,

    /// Frame rate used by [`Stage::run_frames`][crate::Stage::run_frames].
    pub refresh_hz: f64,

    /// Interval for [`LoggingObserver`][crate::LoggingObserver]; 0 disables.
    pub log_every_frames: u64,

    /// Behaviors activated, in order, when the stage is built.
    pub activate: Vec<ActivationConfig>,
}

/// One `[[activate]]` entry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ActivationConfig {
    pub name: String,
    #[serde(default)]
    pub options: Options,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            behavior_id_seed: None,
            viewport:         None,
            refresh_hz:       60.0,
            log_every_frames: 0,
            activate:         Vec::new(),
        }
    }
}

impl StageConfig {
    pub fn from_toml_str(text: &str) -> StageResult<Self> {
        let config: StageConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> StageResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: StageConfig = toml::from_str(&text).map_err(|e| StageError::Parse {
            file:   path.to_path_buf(),
            detail: e.to_string(),
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "stage config loaded");
        Ok(config)
    }

    /// Seconds per synthetic frame.
    pub fn frame_dt(&self) -> f64 {
        1.0 / self.refresh_hz
    }

    pub fn validate(&self) -> StageResult<()> {
        if !(self.refresh_hz.is_finite() && self.refresh_hz > 0.0) {
            return Err(StageError::Config(format!(
                "refresh_hz must be a positive number, got {}",
                self.refresh_hz
            )));
        }
        if let Some(a) = self.activate.iter().find(|a| a.name.is_empty()) {
            return Err(StageError::Config(format!("activation with empty name: {a:?}")));
        }
        Ok(())
    }
}
