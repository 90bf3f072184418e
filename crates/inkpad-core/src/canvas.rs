//! Canvas state management and pointer routing.

use crate::config::CanvasConfig;
use crate::embed::{EmbeddingManager, ImagePlaceholder, PlaceholderId};
use crate::error::InkpadResult;
use crate::gestures::{
    EraserEngine, EraserOverlay, GestureContext, GestureEngine, InkEngine, LassoEngine,
    LassoOverlay,
};
use crate::history::CommandHistory;
use crate::input::{PointerEvent, PointerSample, accepted_locations};
use crate::scene::Scene;
use crate::shapes::{DrawableId, ImageData};
use crate::snapshot::SceneSnapshot;
use crate::tools::Tool;
use kurbo::Point;

/// Produces a static image from a scene snapshot.
pub trait CaptureRenderer {
    type Output;

    fn render(&mut self, snapshot: &SceneSnapshot) -> InkpadResult<Self::Output>;
}

/// In-progress feedback that is not part of the scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preview {
    /// Stroke currently being inked (it is already in the snapshot).
    pub active_stroke: Option<DrawableId>,
    pub lasso: Option<LassoOverlay>,
    pub eraser: Option<EraserOverlay>,
}

/// The canvas: scene, history, active tool and one engine per tool.
#[derive(Debug)]
pub struct Canvas {
    config: CanvasConfig,
    scene: Scene,
    history: CommandHistory,
    tool: Tool,
    ink: InkEngine,
    eraser: EraserEngine,
    lasso: LassoEngine,
    embedding: EmbeddingManager,
    background: Option<ImageData>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a canvas with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            tool: Tool::default_ink(&config),
            history: CommandHistory::with_limit(config.history_limit),
            scene: Scene::new(),
            ink: InkEngine::new(),
            eraser: EraserEngine::new(),
            lasso: LassoEngine::new(),
            embedding: EmbeddingManager::new(),
            background: None,
            config,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Switch tools, discarding any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        self.reset_gestures();
        self.tool = tool.sanitized(self.config.min_tool_width);
        log::debug!("Tool set to {}", self.tool.name());
    }

    /// Route a pointer event to the active tool.
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Began { samples } => self.begin(&samples),
            PointerEvent::Moved {
                coalesced,
                predicted,
            } => self.moved(&coalesced, &predicted),
            PointerEvent::Ended { samples } => self.end(&samples),
            PointerEvent::Cancelled { samples } => self.cancel(&samples),
        }
    }

    pub fn begin(&mut self, samples: &[PointerSample]) {
        let Some(points) = self.accepted(samples) else {
            return;
        };
        let mut ctx = GestureContext::new(&mut self.scene, &mut self.history);
        match &self.tool {
            Tool::Ink { .. } => {
                let style = self.tool.stroke_style().unwrap_or_default();
                self.ink.begin(&mut ctx, &points, style);
            }
            Tool::Erase { .. } => {
                if let Some(settings) = self.tool.eraser_settings() {
                    self.eraser.begin(&mut ctx, &points, settings);
                }
            }
            Tool::Lasso => self.lasso.begin(&mut ctx, &points),
        }
        self.purge();
    }

    /// Confirmed samples are kept; predicted samples only feed the preview.
    pub fn moved(&mut self, coalesced: &[PointerSample], predicted: &[PointerSample]) {
        let Some(confirmed) = self.accepted(coalesced) else {
            return;
        };
        let predicted = self.accepted(predicted).unwrap_or_default();
        let mut ctx = GestureContext::new(&mut self.scene, &mut self.history);
        match &self.tool {
            Tool::Ink { .. } => self.ink.moved(&mut ctx, &confirmed, &predicted),
            Tool::Erase { .. } => self.eraser.moved(&mut ctx, &confirmed),
            Tool::Lasso => self.lasso.moved(&mut ctx, &confirmed, &predicted),
        }
        self.purge();
    }

    pub fn end(&mut self, samples: &[PointerSample]) {
        let Some(points) = self.accepted(samples) else {
            return;
        };
        let mut ctx = GestureContext::new(&mut self.scene, &mut self.history);
        match &self.tool {
            Tool::Ink { .. } => self.ink.end(&mut ctx, &points),
            Tool::Erase { .. } => self.eraser.end(&mut ctx, &points),
            Tool::Lasso => self.lasso.end(&mut ctx, &points),
        }
        self.purge();
    }

    /// A cancelled gesture ends like a released one.
    pub fn cancel(&mut self, samples: &[PointerSample]) {
        self.end(samples);
    }

    /// Undo the last command. Any gesture in progress is discarded first.
    pub fn undo(&mut self) -> bool {
        self.reset_gestures();
        let undone = self.history.undo(&mut self.scene);
        self.purge();
        undone
    }

    /// Redo the last undone command. Any gesture in progress is discarded first.
    pub fn redo(&mut self) -> bool {
        self.reset_gestures();
        let redone = self.history.redo(&mut self.scene);
        self.purge();
        redone
    }

    /// Clear the scene and both history stacks. Pending placeholders and the
    /// background survive.
    pub fn reset(&mut self) {
        self.reset_gestures();
        self.scene.clear();
        self.history.clear();
        log::info!("Canvas reset");
    }

    /// Render-ready view of the scene.
    pub fn scene_snapshot(&self) -> SceneSnapshot {
        self.scene.snapshot(self.background.as_ref())
    }

    /// Hand the current snapshot to `renderer`.
    pub fn capture<R: CaptureRenderer>(&self, renderer: &mut R) -> InkpadResult<R::Output> {
        let snapshot = self.scene_snapshot();
        log::debug!("Capturing {} drawables", snapshot.items.len());
        renderer.render(&snapshot)
    }

    /// Overlays for the gesture in progress.
    pub fn preview(&self) -> Preview {
        Preview {
            active_stroke: self.ink.current(),
            lasso: self.lasso.overlay(),
            eraser: self.eraser.overlay(),
        }
    }

    /// Show an interactive image placeholder. Pointer input is ignored until
    /// every placeholder is confirmed.
    pub fn add_placeholder(&mut self, placeholder: Box<dyn ImagePlaceholder>) -> PlaceholderId {
        self.reset_gestures();
        self.embedding.add(placeholder)
    }

    pub fn confirm_placeholder(&mut self, id: PlaceholderId) -> Option<DrawableId> {
        let mut ctx = GestureContext::new(&mut self.scene, &mut self.history);
        let embedded = self.embedding.confirm(&mut ctx, id, self.config.sample_bins);
        self.purge();
        embedded
    }

    pub fn confirm_all_placeholders(&mut self) -> Vec<DrawableId> {
        let mut ctx = GestureContext::new(&mut self.scene, &mut self.history);
        let embedded = self.embedding.confirm_all(&mut ctx, self.config.sample_bins);
        self.purge();
        embedded
    }

    /// Whether an image placeholder is waiting for confirmation.
    pub fn is_editing_image(&self) -> bool {
        self.embedding.is_editing()
    }

    /// Bitmap drawn under every drawable. Not part of the history.
    pub fn set_background(&mut self, background: Option<ImageData>) {
        self.background = background.filter(|data| !data.is_empty());
        log::info!(
            "Background {}",
            if self.background.is_some() { "set" } else { "cleared" }
        );
    }

    pub fn background(&self) -> Option<&ImageData> {
        self.background.as_ref()
    }

    /// Locations of accepted samples. `None` when the event should be ignored:
    /// a placeholder is pending, or every sample came from a rejected device.
    fn accepted(&self, samples: &[PointerSample]) -> Option<Vec<Point>> {
        if self.embedding.is_editing() {
            return None;
        }
        let points = accepted_locations(samples, &self.config.accepted_pointers);
        if points.is_empty() && !samples.is_empty() {
            return None;
        }
        Some(points)
    }

    fn reset_gestures(&mut self) {
        self.ink.reset(&mut self.scene);
        self.eraser.reset(&mut self.scene);
        self.lasso.reset(&mut self.scene);
    }

    /// Drop detached drawables no command can bring back.
    fn purge(&mut self) {
        let history = &self.history;
        self.scene.purge_detached(|id| history.references(id));
    }
}
