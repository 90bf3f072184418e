//! Headless replay of recorded gesture scripts.
//!
//! A script is a JSON document holding an optional canvas configuration and a
//! list of steps:
//!
//! ```json
//! {
//!   "config": { "history_limit": 64 },
//!   "steps": [
//!     { "action": "tool", "tool": { "tool": "lasso" } },
//!     { "action": "pointer", "event": { "phase": "began", "samples": [ { "location": { "x": 0.0, "y": 0.0 }, "kind": "finger" } ] } },
//!     { "action": "undo" }
//!   ]
//! }
//! ```

use inkpad_core::{
    Canvas, CanvasConfig, ImageData, ImageFormat, ImagePlaceholder, InkpadError, PointerEvent,
    SceneSnapshot, Tool,
};
use kurbo::{Affine, Rect};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Canvas(#[from] InkpadError),
}

pub type ReplayResult<T> = Result<T, ReplayError>;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Tool { tool: Tool },
    Pointer { event: PointerEvent },
    Undo,
    Redo,
    Reset,
    /// Show an image placeholder filled with a solid bitmap.
    Placeholder {
        bounds: Rect,
        width: u32,
        height: u32,
        /// Rotation in radians about the center of `bounds`.
        #[serde(default)]
        rotation: f64,
    },
    ConfirmPlaceholders,
    /// Set a solid background bitmap, or clear it when no size is given.
    Background {
        #[serde(default)]
        size: Option<(u32, u32)>,
    },
}

/// A recorded session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: CanvasConfig,
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse and validate a script.
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        let script: Script = serde_json::from_str(json)?;
        script.config.validate()?;
        Ok(script)
    }

    /// Load a script from a file.
    pub fn load(path: &Path) -> ReplayResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ReplayError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Run every step against a fresh canvas.
    pub fn run(&self) -> Canvas {
        let mut canvas = Canvas::with_config(self.config.clone());
        for (index, step) in self.steps.iter().enumerate() {
            log::debug!("Step {index}: {step:?}");
            apply(&mut canvas, step);
        }
        log::info!(
            "Replayed {} steps, {} drawables on the canvas",
            self.steps.len(),
            canvas.scene().len()
        );
        canvas
    }
}

/// Apply a single step.
pub fn apply(canvas: &mut Canvas, step: &Step) {
    match step {
        Step::Tool { tool } => canvas.set_tool(tool.clone()),
        Step::Pointer { event } => canvas.handle(event.clone()),
        Step::Undo => {
            canvas.undo();
        }
        Step::Redo => {
            canvas.redo();
        }
        Step::Reset => canvas.reset(),
        Step::Placeholder {
            bounds,
            width,
            height,
            rotation,
        } => {
            canvas.add_placeholder(Box::new(ScriptedPlaceholder {
                bitmap: solid_bitmap(*width, *height),
                bounds: *bounds,
                transform: Affine::rotate(*rotation),
            }));
        }
        Step::ConfirmPlaceholders => {
            canvas.confirm_all_placeholders();
        }
        Step::Background { size } => {
            canvas.set_background(size.map(|(w, h)| solid_bitmap(w, h)));
        }
    }
}

/// Load `path`, replay it and return the final snapshot.
pub fn replay_file(path: &Path) -> ReplayResult<SceneSnapshot> {
    let script = Script::load(path)?;
    Ok(script.run().scene_snapshot())
}

/// White RGBA8 bitmap of the given size.
fn solid_bitmap(width: u32, height: u32) -> ImageData {
    let len = width as usize * height as usize * 4;
    ImageData::new(&vec![255u8; len], width, height, ImageFormat::Rgba8)
}

/// Placeholder driven by a script step instead of a UI.
struct ScriptedPlaceholder {
    bitmap: ImageData,
    bounds: Rect,
    transform: Affine,
}

impl ImagePlaceholder for ScriptedPlaceholder {
    fn bitmap(&self) -> Option<ImageData> {
        Some(self.bitmap.clone())
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn dismiss(&mut self) {
        log::debug!("Scripted placeholder at {:?} dismissed", self.bounds);
    }
}
