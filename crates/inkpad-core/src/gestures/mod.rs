//! Per-tool gesture state machines.
//!
//! Each engine consumes pointer locations for its tool, mutates the scene and
//! records commands. None of them can fail: events that do not fit the current
//! state are ignored.

pub mod eraser;
pub mod ink;
pub mod lasso;

pub use eraser::{EraserEngine, EraserOverlay, EraserSettings, Footprint};
pub use ink::InkEngine;
pub use lasso::{LassoEngine, LassoOverlay, LassoPhase, SelectionGroup};

use crate::history::CommandHistory;
use crate::scene::Scene;

/// Mutable state a gesture works against.
pub struct GestureContext<'a> {
    pub scene: &'a mut Scene,
    pub history: &'a mut CommandHistory,
}

impl<'a> GestureContext<'a> {
    pub fn new(scene: &'a mut Scene, history: &'a mut CommandHistory) -> Self {
        Self { scene, history }
    }
}

/// Behavior shared by every engine, used when switching tools or replaying history.
pub trait GestureEngine {
    /// Whether a gesture is in progress.
    fn is_active(&self) -> bool;

    /// Drop any uncommitted state, undoing its visible effect on `scene`.
    /// Never records a command.
    fn reset(&mut self, scene: &mut Scene);
}
