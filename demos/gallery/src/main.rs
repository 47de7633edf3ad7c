//! gallery — headless host for the quantum-gallery scene runtime.
//!
//! Drives a stage holding one `TorusPulse` at a fixed refresh rate, plays a
//! short scripted console session through the control bridge, and prints
//! the published torus pose and the State Channel snapshot.
//!
//! ```text
//! cargo run -p gallery                 # built-in config
//! cargo run -p gallery -- stage.toml   # config from file
//! RUST_LOG=qg_stage=debug cargo run -p gallery
//! ```

use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use qg_behavior::builtin::oscillator;
use qg_core::{FrameState, Options};
use qg_scene::{EntityManager, TorusPulse};
use qg_stage::{LoggingObserver, Stage, StageBuilder, StageConfig, StageObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const WARMUP_FRAMES:  u64 = 120;
const SESSION_FRAMES: u64 = 180;

const DEFAULT_CONFIG: &str = r#"
behavior_id_seed = 42
refresh_hz       = 60.0
log_every_frames = 60

[viewport]
width  = 1280
height = 720

[[activate]]
name = "torusPulse.aiOverrides"
"#;

// ── Observer wrapper to sample the pose ───────────────────────────────────────

struct PoseObserver {
    inner:   LoggingObserver,
    every:   u64,
    samples: Vec<(u64, f64, f64, f64, f64)>,
}

impl PoseObserver {
    fn new(inner: LoggingObserver, every: u64) -> Self {
        Self { inner, every, samples: Vec::new() }
    }
}

impl StageObserver for PoseObserver {
    fn on_frame_start(&mut self, state: &FrameState) {
        self.inner.on_frame_start(state);
    }

    fn on_frame_end(&mut self, state: &FrameState, entities: &EntityManager) {
        self.inner.on_frame_end(state, entities);
        if state.frame.is_multiple_of(self.every) {
            let store = entities.store();
            let read = |key: &str| store.get_f64(key).unwrap_or(f64::NAN);
            self.samples.push((
                state.frame,
                state.time,
                read(TorusPulse::KEY_ROT_X),
                read(TorusPulse::KEY_ROT_Y),
                read(TorusPulse::KEY_BREATH_Z),
            ));
        }
    }

    fn on_shutdown(&mut self, frames: u64) {
        self.inner.on_shutdown(frames);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gallery=info".parse()?))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => StageConfig::load(&path)?,
        None => StageConfig::from_toml_str(DEFAULT_CONFIG)?,
    };

    println!("=== gallery — quantum-gallery scene runtime ===");
    println!(
        "Refresh: {} Hz  |  Frames: {}  |  Activations: {}",
        config.refresh_hz,
        WARMUP_FRAMES + SESSION_FRAMES,
        config.activate.len()
    );
    println!();

    let mut obs = PoseObserver::new(LoggingObserver::new(config.log_every_frames), 30);
    let mut stage = StageBuilder::new()
        .config(config)
        .with_builtin_behaviors()
        .entity(TorusPulse::default())
        .build()?;

    let t0 = Instant::now();
    stage.run_frames(WARMUP_FRAMES, &mut obs)?;

    console_session(&mut stage)?;
    stage.run_frames(SESSION_FRAMES, &mut obs)?;
    let elapsed = t0.elapsed();

    println!("Ran {} frames in {:.3} ms", stage.frames(), elapsed.as_secs_f64() * 1e3);
    println!();
    println!("{:<7} {:>8} {:>8} {:>8} {:>9}", "Frame", "Time", "rotX", "rotY", "breathZ");
    println!("{}", "-".repeat(44));
    for (frame, time, rot_x, rot_y, z) in &obs.samples {
        println!("{frame:<7} {time:>8.3} {rot_x:>8.3} {rot_y:>8.3} {z:>9.4}");
    }
    println!();

    let amplitude = stage
        .entities_mut()
        .tunables_mut(TorusPulse::KIND)
        .next()
        .and_then(|t| t.param("amplitude"));
    println!("Torus amplitude after session: {amplitude:?}");
    println!("Active behaviors: {:?}", stage.bridge().list());
    println!("State snapshot:");
    println!("{}", serde_json::to_string_pretty(&stage.bridge().snapshot())?);

    stage.shutdown_with(&mut obs);
    tracing::info!(frames = stage.frames(), "gallery finished");
    Ok(())
}

/// What a developer would type into the console mid-run.
fn console_session(stage: &mut Stage) -> Result<()> {
    let mut bridge = stage.bridge();
    println!("{}", bridge.help());
    println!();
    println!("factories: {:?}", bridge.factories());

    // pinned every frame by torusPulse.aiOverrides
    bridge.set_literal("torusPulse.speed", "1.8");

    // no amplitude override is set, so the oscillator owns that parameter
    bridge.activate(oscillator::NAME, &Options::new().with("amplitude", 0.6))?;

    println!("active: {:?}", bridge.list());
    println!();
    Ok(())
}
