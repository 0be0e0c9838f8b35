//! Scripted interaction replay.
//!
//! A replay script names the models to load and a list of input events. The
//! script is driven through a seeded [`ViewerController`] and the resulting
//! scene is summarised, which makes whole interaction sequences reproducible
//! from the command line.
//!
//! ```json
//! {
//!   "viewport": { "width": 800, "height": 600 },
//!   "models": ["hero.json"],
//!   "events": [
//!     { "type": "down", "pointer": 1, "x": 400, "y": 300 },
//!     { "type": "up", "pointer": 1, "x": 400, "y": 300 },
//!     { "type": "tap", "object": 0, "region": "Head" }
//!   ]
//! }
//! ```

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ViewerConfig;
use crate::controller::{Action, ViewerController, ViewerError};
use crate::geom::Point;
use crate::loader::AssetLoader;
use crate::pointer::PointerId;
use crate::puppet::FileLoader;
use crate::scene::ObjectId;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read script {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("invalid script {path}: {error}")]
    Parse {
        path: PathBuf,
        #[source]
        error: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Down { pointer: PointerId, x: f64, y: f64 },
    Move { pointer: PointerId, x: f64, y: f64 },
    Up { pointer: PointerId, x: f64, y: f64 },
    Cancel { pointer: PointerId },
    Wheel { x: f64, y: f64, delta_y: f64 },
    /// Programmatic tap; `region` absent for a body tap.
    Tap {
        object: ObjectId,
        #[serde(default)]
        region: Option<String>,
    },
    Select { object: Option<ObjectId> },
    DeleteSelected,
    Frames { visible: bool },
    Resize { width: f64, height: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl ReplayScript {
    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] when the file cannot be read or parsed.
    pub async fn from_file(path: &Path) -> Result<Self, ReplayError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|error| ReplayError::Io { path: path.to_path_buf(), error })?;
        serde_json::from_str(&text).map_err(|error| ReplayError::Parse { path: path.to_path_buf(), error })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSummary {
    pub id: ObjectId,
    /// Paint-order rank; higher is on top.
    pub z: usize,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MotionRecord {
    pub object: ObjectId,
    pub group: String,
    pub index: usize,
}

/// Scene state after a replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplaySummary {
    /// Objects in load order.
    pub objects: Vec<ObjectSummary>,
    pub selection: Option<ObjectId>,
    pub motions: Vec<MotionRecord>,
    /// Total actions emitted to the host.
    pub actions: usize,
    /// Failed loads and rejected events, in order.
    pub errors: Vec<String>,
}

/// Replay `script`, loading models through `loader`.
///
/// Failed loads and rejected events are recorded in the summary and the
/// replay carries on.
pub async fn run<L: AssetLoader + ?Sized>(
    script: &ReplayScript,
    loader: &L,
    config: ViewerConfig,
    seed: u64,
) -> ReplaySummary {
    let mut viewer = ViewerController::with_seed(config, seed);
    viewer.set_viewport(script.viewport.width, script.viewport.height);
    let mut summary = ReplaySummary::default();

    for source in &script.models {
        if let Err(e) = viewer.load_object(loader, source).await {
            summary.errors.push(e.to_string());
        }
    }
    record(&mut summary, viewer.drain_actions());

    for (step, event) in script.events.iter().enumerate() {
        match apply(&mut viewer, event) {
            Ok(actions) => record(&mut summary, actions),
            Err(e) => {
                warn!(step, error = %e, "replay event rejected");
                summary.errors.push(format!("event {step}: {e}"));
            }
        }
        record(&mut summary, viewer.drain_actions());
    }

    summary.selection = viewer.selection();
    summary.objects = viewer
        .object_ids()
        .into_iter()
        .filter_map(|id| {
            let obj = viewer.scene().get(id)?;
            let pos = obj.node.position();
            Some(ObjectSummary {
                id,
                z: viewer.scene().z_rank(id).unwrap_or_default(),
                x: pos.x,
                y: pos.y,
                scale: obj.node.scale(),
            })
        })
        .collect();
    info!(objects = summary.objects.len(), motions = summary.motions.len(), actions = summary.actions, "replay finished");
    summary
}

/// Read the script at `path` and replay it, loading models relative to the script.
///
/// # Errors
///
/// Returns [`ReplayError`] when the script cannot be read or parsed.
pub async fn run_file(path: &Path, config: ViewerConfig, seed: u64) -> Result<ReplaySummary, ReplayError> {
    let script = ReplayScript::from_file(path).await?;
    let loader = match path.parent() {
        Some(dir) => FileLoader::with_root(dir),
        None => FileLoader::new(),
    };
    Ok(run(&script, &loader, config, seed).await)
}

fn apply(viewer: &mut ViewerController, event: &ScriptEvent) -> Result<Vec<Action>, ViewerError> {
    let actions = match *event {
        ScriptEvent::Down { pointer, x, y } => viewer.on_pointer_down(pointer, Point::new(x, y)),
        ScriptEvent::Move { pointer, x, y } => viewer.on_pointer_move(pointer, Point::new(x, y)),
        ScriptEvent::Up { pointer, x, y } => viewer.on_pointer_up(pointer, Point::new(x, y)),
        ScriptEvent::Cancel { pointer } => viewer.on_pointer_cancel(pointer),
        ScriptEvent::Wheel { x, y, delta_y } => viewer.on_wheel(Point::new(x, y), delta_y),
        ScriptEvent::Tap { object, ref region } => {
            viewer.simulate_tap(object, region.as_deref())?;
            Vec::new()
        }
        ScriptEvent::Select { object } => {
            viewer.select_object(object)?;
            Vec::new()
        }
        ScriptEvent::DeleteSelected => {
            viewer.delete_selected()?;
            Vec::new()
        }
        ScriptEvent::Frames { visible } => {
            viewer.set_region_frames_visible(visible);
            Vec::new()
        }
        ScriptEvent::Resize { width, height } => {
            viewer.set_viewport(width, height);
            Vec::new()
        }
    };
    Ok(actions)
}

fn record(summary: &mut ReplaySummary, actions: Vec<Action>) {
    summary.actions += actions.len();
    for action in actions {
        if let Action::MotionStarted { id, group, index } = action {
            summary.motions.push(MotionRecord { object: id, group, index });
        }
    }
}
