//! Tool system for the canvas.

use crate::config::CanvasConfig;
use crate::gestures::EraserSettings;
use crate::shapes::{InkType, SerializableColor, StrokeStyle};
use serde::{Deserialize, Serialize};

/// How the eraser treats the strokes it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraseMode {
    /// Remove every object the footprint touches.
    #[default]
    Vector,
    /// Knock the eraser trail out of overlapped strokes, keeping the strokes.
    Trim,
}

/// Outline of the vector eraser's footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FootprintShape {
    #[default]
    Square,
    Circle,
}

/// The active tool and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum Tool {
    Ink {
        #[serde(default)]
        color: SerializableColor,
        width: f64,
        #[serde(default)]
        ink_type: InkType,
    },
    Erase {
        #[serde(default)]
        mode: EraseMode,
        /// Footprint edge length (square) or diameter (circle); also the trim width.
        size: f64,
        #[serde(default)]
        can_erase_images: bool,
        #[serde(default)]
        footprint: FootprintShape,
    },
    Lasso,
}

impl Default for Tool {
    fn default() -> Self {
        Tool::Ink {
            color: SerializableColor::black(),
            width: 4.0,
            ink_type: InkType::Pen,
        }
    }
}

impl Tool {
    /// Black pen at the configured default width.
    pub fn default_ink(config: &CanvasConfig) -> Self {
        Tool::Ink {
            color: SerializableColor::black(),
            width: config.default_ink_width,
            ink_type: InkType::Pen,
        }
        .sanitized(config.min_tool_width)
    }

    /// Vector eraser at the configured default size.
    pub fn default_eraser(config: &CanvasConfig) -> Self {
        Tool::Erase {
            mode: EraseMode::Vector,
            size: config.default_eraser_size,
            can_erase_images: false,
            footprint: FootprintShape::Square,
        }
        .sanitized(config.min_tool_width)
    }

    /// Clamp non-positive or non-finite widths and sizes up to `min`.
    pub fn sanitized(self, min: f64) -> Self {
        let clamp = |value: f64, what: &str| {
            if value.is_finite() && value >= min {
                value
            } else {
                log::warn!("Clamping {what} {value} to {min}");
                min
            }
        };

        match self {
            Tool::Ink {
                color,
                width,
                ink_type,
            } => Tool::Ink {
                color,
                width: clamp(width, "ink width"),
                ink_type,
            },
            Tool::Erase {
                mode,
                size,
                can_erase_images,
                footprint,
            } => Tool::Erase {
                mode,
                size: clamp(size, "eraser size"),
                can_erase_images,
                footprint,
            },
            Tool::Lasso => Tool::Lasso,
        }
    }

    /// Style new strokes get, if this is an ink tool.
    pub fn stroke_style(&self) -> Option<StrokeStyle> {
        match self {
            Tool::Ink {
                color,
                width,
                ink_type,
            } => Some(StrokeStyle {
                color: *color,
                width: *width,
                ink_type: *ink_type,
                ..Default::default()
            }),
            _ => None,
        }
    }

    /// Eraser parameters, if this is an eraser.
    pub fn eraser_settings(&self) -> Option<EraserSettings> {
        match *self {
            Tool::Erase {
                mode,
                size,
                can_erase_images,
                footprint,
            } => Some(EraserSettings {
                mode,
                size,
                can_erase_images,
                footprint,
            }),
            _ => None,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Ink { .. } => "ink",
            Tool::Erase {
                mode: EraseMode::Vector,
                ..
            } => "vector eraser",
            Tool::Erase {
                mode: EraseMode::Trim,
                ..
            } => "trim eraser",
            Tool::Lasso => "lasso",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        let style = Tool::default_ink(&config).stroke_style().unwrap();
        assert_eq!(style.width, 4.0);
        assert_eq!(style.color, SerializableColor::black());
        assert_eq!(style.ink_type, InkType::Pen);

        match Tool::default_eraser(&config) {
            Tool::Erase { size, mode, .. } => {
                assert_eq!(size, 40.0);
                assert_eq!(mode, EraseMode::Vector);
            }
            other => panic!("unexpected tool {other:?}"),
        }
    }

    #[test]
    fn test_sanitize_clamps_bad_values() {
        let ink = Tool::Ink {
            color: SerializableColor::white(),
            width: -3.0,
            ink_type: InkType::Marker,
        };
        assert_eq!(ink.sanitized(0.1).stroke_style().unwrap().width, 0.1);

        let eraser = Tool::Erase {
            mode: EraseMode::Trim,
            size: f64::NAN,
            can_erase_images: true,
            footprint: FootprintShape::Circle,
        };
        match eraser.sanitized(0.5) {
            Tool::Erase { size, .. } => assert_eq!(size, 0.5),
            other => panic!("unexpected tool {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_clamped() {
        let config = CanvasConfig {
            default_ink_width: 0.0,
            default_eraser_size: f64::INFINITY,
            ..CanvasConfig::default()
        };
        let style = Tool::default_ink(&config).stroke_style().unwrap();
        assert_eq!(style.width, config.min_tool_width);
        let settings = Tool::default_eraser(&config).eraser_settings().unwrap();
        assert_eq!(settings.size, config.min_tool_width);
    }

    #[test]
    fn test_sanitize_keeps_good_values() {
        let ink = Tool::default();
        assert_eq!(ink.clone().sanitized(0.1), ink);
        assert_eq!(Tool::Lasso.sanitized(0.1), Tool::Lasso);
    }

    #[test]
    fn test_tool_json() {
        let tool: Tool =
            serde_json::from_str(r#"{ "tool": "erase", "mode": "trim", "size": 12.0 }"#).unwrap();
        assert_eq!(tool.name(), "trim eraser");
        assert!(tool.stroke_style().is_none());
        let settings = tool.eraser_settings().unwrap();
        assert_eq!(settings.size, 12.0);
        assert!(!settings.can_erase_images);
        assert_eq!(settings.footprint, FootprintShape::Square);
    }
}
