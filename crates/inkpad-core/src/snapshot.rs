//! Render-ready export of the scene.

use crate::error::InkpadResult;
use crate::shapes::{
    Drawable, DrawableId, DrawableTrait, EraseMask, ImageData, RenderHandle, StrokeStyle,
};
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// One attached drawable, flattened to canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotItem {
    Stroke {
        id: DrawableId,
        handle: RenderHandle,
        /// Confirmed points followed by any live predicted tail.
        points: Vec<Point>,
        style: StrokeStyle,
    },
    Image {
        id: DrawableId,
        handle: RenderHandle,
        /// Untransformed placement.
        rect: Rect,
        /// Full placement transform to apply to `rect`.
        transform: Affine,
        data: ImageData,
    },
    Mask {
        id: DrawableId,
        handle: RenderHandle,
        target: DrawableId,
        points: Vec<Point>,
        width: f64,
    },
}

impl SnapshotItem {
    /// Flatten a stroke or image. Masks need their target's frame, see [`SnapshotItem::mask`].
    pub fn from_drawable(drawable: &Drawable) -> Option<Self> {
        match drawable {
            Drawable::Stroke(stroke) => Some(SnapshotItem::Stroke {
                id: stroke.id(),
                handle: stroke.render_handle(),
                points: stroke.preview_points(),
                style: stroke.style.clone(),
            }),
            Drawable::Image(image) => Some(SnapshotItem::Image {
                id: image.id(),
                handle: image.render_handle(),
                rect: image.rect(),
                transform: image.world_transform(),
                data: image.data.clone(),
            }),
            Drawable::Mask(_) => None,
        }
    }

    /// Flatten a mask whose target's live frame sits at `target_origin`.
    pub fn mask(mask: &EraseMask, target_origin: Vec2) -> Self {
        SnapshotItem::Mask {
            id: mask.id(),
            handle: mask.render_handle(),
            target: mask.target,
            points: mask.points_at(target_origin),
            width: mask.width,
        }
    }

    pub fn id(&self) -> DrawableId {
        match self {
            SnapshotItem::Stroke { id, .. }
            | SnapshotItem::Image { id, .. }
            | SnapshotItem::Mask { id, .. } => *id,
        }
    }
}

/// Ordered drawable list handed to the external renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Optional background bitmap drawn below everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<ImageData>,
    /// Attached drawables, back to front.
    pub items: Vec<SnapshotItem>,
}

impl SceneSnapshot {
    /// Serialize the snapshot to JSON.
    pub fn to_json(&self) -> InkpadResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a snapshot from JSON.
    pub fn from_json(json: &str) -> InkpadResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
