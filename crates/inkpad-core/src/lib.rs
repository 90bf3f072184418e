//! InkPad Core Library
//!
//! Gesture engines, scene model and undo history for a touch-driven annotation
//! canvas. Rendering is left to the host: it draws the [`SceneSnapshot`] the
//! canvas exports.

pub mod canvas;
pub mod config;
pub mod embed;
pub mod error;
pub mod geometry;
pub mod gestures;
pub mod history;
pub mod input;
pub mod scene;
pub mod shapes;
pub mod snapshot;
pub mod tools;

pub use canvas::{Canvas, CaptureRenderer, Preview};
pub use config::CanvasConfig;
pub use embed::{EmbeddingManager, ImagePlaceholder, PlaceholderId};
pub use error::{InkpadError, InkpadResult};
pub use gestures::{EraserOverlay, Footprint, LassoOverlay, SelectionGroup};
pub use history::{Command, CommandHistory};
pub use input::{PointerEvent, PointerKind, PointerSample};
pub use scene::Scene;
pub use shapes::{Drawable, DrawableId, DrawableTrait, ImageData, ImageFormat, ImageObject, Stroke, StrokeStyle};
pub use snapshot::{SceneSnapshot, SnapshotItem};
pub use tools::{EraseMode, FootprintShape, Tool};
