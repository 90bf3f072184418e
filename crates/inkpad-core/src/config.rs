//! Canvas tunables.

use crate::error::{InkpadError, InkpadResult};
use crate::geometry::DEFAULT_SAMPLE_BINS;
use crate::input::PointerKind;
use serde::{Deserialize, Serialize};

/// Default cap on the number of undoable commands.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Configuration for a [`crate::Canvas`]. Every field has a default, so a partial
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Lattice bins per side when sampling an embedded image.
    pub sample_bins: usize,
    /// Smallest width or size a tool may carry.
    pub min_tool_width: f64,
    /// Maximum number of commands kept on the undo stack.
    pub history_limit: usize,
    /// Pointer kinds the gesture engines listen to.
    pub accepted_pointers: Vec<PointerKind>,
    pub default_ink_width: f64,
    pub default_eraser_size: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            sample_bins: DEFAULT_SAMPLE_BINS,
            min_tool_width: 0.1,
            history_limit: DEFAULT_HISTORY_LIMIT,
            accepted_pointers: vec![PointerKind::Finger, PointerKind::Pen, PointerKind::Mouse],
            default_ink_width: 4.0,
            default_eraser_size: 40.0,
        }
    }
}

impl CanvasConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> InkpadResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| InkpadError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no canvas can work with.
    pub fn validate(&self) -> InkpadResult<()> {
        if self.sample_bins == 0 {
            return Err(InkpadError::Config("sample_bins must be at least 1".into()));
        }
        if !(self.min_tool_width.is_finite() && self.min_tool_width > 0.0) {
            return Err(InkpadError::Config(format!(
                "min_tool_width must be positive, got {}",
                self.min_tool_width
            )));
        }
        if self.history_limit == 0 {
            return Err(InkpadError::Config("history_limit must be at least 1".into()));
        }
        Ok(())
    }

    /// Whether samples from `kind` reach the gesture engines.
    pub fn accepts(&self, kind: PointerKind) -> bool {
        self.accepted_pointers.contains(&kind)
    }
}
