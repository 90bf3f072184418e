//! Freehand ink stroke.

use super::{DrawableId, DrawableTrait, RenderHandle, StrokeStyle};
use crate::geometry::{points_bounds, polyline_path};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke: confirmed points in temporal order plus a live preview tail.
///
/// Points are kept in the stroke's local frame; `origin` places that frame on the
/// canvas. Hit-test samples use `hit_origin`, which only catches up with `origin`
/// when a move is committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: DrawableId,
    handle: RenderHandle,
    /// Confirmed points, in the order they were sampled.
    points: Vec<Point>,
    /// Predicted points used only for the live preview.
    #[serde(skip)]
    predicted: Vec<Point>,
    /// Style properties.
    pub style: StrokeStyle,
    origin: Vec2,
    hit_origin: Vec2,
    #[serde(skip)]
    path: BezPath,
}

impl Stroke {
    /// Start a stroke at its first confirmed point.
    pub fn new(start: Point, style: StrokeStyle) -> Self {
        Self::from_points(vec![start], style)
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>, style: StrokeStyle) -> Self {
        let path = polyline_path(&points, false);
        Self {
            id: Uuid::new_v4(),
            handle: RenderHandle::next(),
            points,
            predicted: Vec::new(),
            style,
            origin: Vec2::ZERO,
            hit_origin: Vec2::ZERO,
            path,
        }
    }

    /// Append confirmed samples and replace the predicted tail, then rebuild the preview.
    pub fn extend(&mut self, confirmed: &[Point], predicted: &[Point]) {
        self.points.extend_from_slice(confirmed);
        self.predicted.clear();
        self.predicted.extend_from_slice(predicted);

        let mut preview = self.points.clone();
        preview.extend_from_slice(&self.predicted);
        self.path = polyline_path(&preview, false);
    }

    /// Drop the predicted tail and rebuild the path from confirmed points only.
    pub fn finalize(&mut self) {
        self.predicted.clear();
        self.path = polyline_path(&self.points, false);
    }

    /// Confirmed points in the local frame.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Current predicted tail (empty once finalized).
    pub fn predicted(&self) -> &[Point] {
        &self.predicted
    }

    /// Confirmed plus predicted points, in canvas coordinates at the live position.
    pub fn preview_points(&self) -> Vec<Point> {
        self.points
            .iter()
            .chain(self.predicted.iter())
            .map(|p| *p + self.origin)
            .collect()
    }

    /// Get the number of confirmed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke has no confirmed points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Committed hit-test offset.
    pub fn hit_origin(&self) -> Vec2 {
        self.hit_origin
    }

    /// Path in the local frame, as last rebuilt.
    pub fn local_path(&self) -> &BezPath {
        &self.path
    }
}

impl DrawableTrait for Stroke {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn render_handle(&self) -> RenderHandle {
        self.handle
    }

    fn bounds(&self) -> Rect {
        points_bounds(&self.points)
            .map(|rect| rect + self.origin)
            .unwrap_or(Rect::ZERO)
    }

    fn sample_points(&self) -> Vec<Point> {
        self.points.iter().map(|p| *p + self.hit_origin).collect()
    }

    fn to_path(&self) -> BezPath {
        Affine::translate(self.origin) * self.path.clone()
    }

    fn origin(&self) -> Vec2 {
        self.origin
    }

    fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    fn commit_origin(&mut self) {
        self.hit_origin = self.origin;
    }
}
