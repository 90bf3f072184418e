//! Trim-eraser overlay clipping a single stroke.

use super::{DrawableId, DrawableTrait, RenderHandle};
use crate::geometry::{points_bounds, polyline_path};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A knock-out polyline drawn over one target stroke.
///
/// Points live in the target's local frame, so the mask travels with its target
/// when the target is moved. Masks are never hit-tested themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EraseMask {
    pub(crate) id: DrawableId,
    handle: RenderHandle,
    /// Stroke this mask clips.
    pub target: DrawableId,
    points: Vec<Point>,
    /// Eraser width the polyline is stroked with.
    pub width: f64,
}

impl EraseMask {
    /// Create a mask for `target` from points already expressed in the target's frame.
    pub fn new(target: DrawableId, points: Vec<Point>, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            handle: RenderHandle::next(),
            target,
            points,
            width,
        }
    }

    /// Points in the target's local frame.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Points on the canvas for a target whose live frame sits at `target_origin`.
    pub fn points_at(&self, target_origin: Vec2) -> Vec<Point> {
        self.points.iter().map(|p| *p + target_origin).collect()
    }
}

impl DrawableTrait for EraseMask {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn render_handle(&self) -> RenderHandle {
        self.handle
    }

    /// Bounds in the target's frame.
    fn bounds(&self) -> Rect {
        points_bounds(&self.points).unwrap_or(Rect::ZERO)
    }

    fn sample_points(&self) -> Vec<Point> {
        Vec::new()
    }

    fn to_path(&self) -> BezPath {
        polyline_path(&self.points, false)
    }

    fn origin(&self) -> Vec2 {
        Vec2::ZERO
    }

    // Masks follow their target; they have no frame of their own.
    fn set_origin(&mut self, _origin: Vec2) {}

    fn commit_origin(&mut self) {}
}
