//! Lasso selection and group move: `Search -> Move -> Search`.

use super::{GestureContext, GestureEngine};
use crate::geometry::{path_encloses, points_bounds, polyline_path, rect_contains};
use crate::history::Command;
use crate::scene::Scene;
use crate::shapes::{Drawable, DrawableId};
use kurbo::{Point, Rect, Vec2};

/// Objects picked up by a closed lasso, with their origins at pick-up time.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionGroup {
    pub moves: Vec<(DrawableId, Vec2)>,
    /// Translation accumulated by the current drag.
    pub delta: Vec2,
}

impl SelectionGroup {
    fn apply(&self, scene: &mut Scene) {
        for (id, before) in &self.moves {
            scene.set_origin(*id, *before + self.delta);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LassoPhase {
    /// Tracing a new outline. `points` is empty between gestures.
    Search {
        points: Vec<Point>,
        predicted: Vec<Point>,
        tracing: bool,
    },
    /// A closed outline holds a selection that can be dragged.
    Move {
        selection: SelectionGroup,
        outline: Vec<Point>,
        bounds: Rect,
        /// Pointer position where the current drag started, if the last down
        /// landed inside the outline bounds.
        drag_start: Option<Point>,
        /// Whether a pointer is down.
        pressed: bool,
    },
}

impl Default for LassoPhase {
    fn default() -> Self {
        LassoPhase::Search {
            points: Vec::new(),
            predicted: Vec::new(),
            tracing: false,
        }
    }
}

/// Outline the renderer should draw for the lasso.
#[derive(Debug, Clone, PartialEq)]
pub struct LassoOverlay {
    /// Outline in canvas coordinates, including any drag offset.
    pub points: Vec<Point>,
    pub closed: bool,
    /// Draw as marching ants.
    pub marching: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LassoEngine {
    phase: LassoPhase,
}

impl LassoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &LassoPhase {
        &self.phase
    }

    /// The picked-up objects, if an outline is closed.
    pub fn selection(&self) -> Option<&SelectionGroup> {
        match &self.phase {
            LassoPhase::Move { selection, .. } => Some(selection),
            LassoPhase::Search { .. } => None,
        }
    }

    pub fn begin(&mut self, _ctx: &mut GestureContext<'_>, points: &[Point]) {
        let Some(&first) = points.first() else {
            return;
        };
        match &mut self.phase {
            LassoPhase::Search {
                points: traced,
                predicted,
                tracing,
            } => {
                traced.clear();
                traced.extend_from_slice(points);
                predicted.clear();
                *tracing = true;
            }
            LassoPhase::Move {
                selection,
                bounds,
                drag_start,
                pressed,
                ..
            } => {
                *pressed = true;
                let current = *bounds + selection.delta;
                *drag_start = rect_contains(current, first).then_some(first);
                if drag_start.is_some() {
                    log::debug!("Lasso drag started at {first:?}");
                }
            }
        }
    }

    pub fn moved(&mut self, ctx: &mut GestureContext<'_>, confirmed: &[Point], predicted: &[Point]) {
        match &mut self.phase {
            LassoPhase::Search {
                points,
                predicted: preview,
                tracing: true,
            } => {
                points.extend_from_slice(confirmed);
                preview.clear();
                preview.extend_from_slice(predicted);
            }
            LassoPhase::Move {
                selection,
                drag_start: Some(start),
                ..
            } => {
                let Some(&last) = confirmed.last() else {
                    return;
                };
                selection.delta = last - *start;
                selection.apply(ctx.scene);
            }
            _ => {}
        }
    }

    pub fn end(&mut self, ctx: &mut GestureContext<'_>, points: &[Point]) {
        match &mut self.phase {
            LassoPhase::Search {
                points: traced,
                tracing: true,
                ..
            } => {
                traced.extend_from_slice(points);
                let outline = std::mem::take(traced);
                self.phase = close(ctx.scene, outline);
            }
            LassoPhase::Move {
                selection,
                drag_start,
                pressed: true,
                ..
            } => {
                if let (Some(start), Some(&last)) = (*drag_start, points.last()) {
                    selection.delta = last - start;
                }
                if drag_start.is_some() && selection.delta != Vec2::ZERO {
                    commit(ctx, selection);
                } else {
                    log::debug!("Lasso selection dismissed");
                    selection.delta = Vec2::ZERO;
                    selection.apply(ctx.scene);
                }
                self.phase = LassoPhase::default();
            }
            _ => {}
        }
    }

    pub fn overlay(&self) -> Option<LassoOverlay> {
        match &self.phase {
            LassoPhase::Search {
                points,
                predicted,
                tracing: true,
            } => Some(LassoOverlay {
                points: points.iter().chain(predicted.iter()).copied().collect(),
                closed: false,
                marching: false,
            }),
            LassoPhase::Move {
                selection, outline, ..
            } => Some(LassoOverlay {
                points: outline.iter().map(|p| *p + selection.delta).collect(),
                closed: true,
                marching: true,
            }),
            _ => None,
        }
    }
}

impl GestureEngine for LassoEngine {
    fn is_active(&self) -> bool {
        !matches!(self.phase, LassoPhase::Search { tracing: false, .. })
    }

    /// Puts dragged objects back where they were picked up.
    fn reset(&mut self, scene: &mut Scene) {
        if let LassoPhase::Move { selection, .. } = &mut self.phase {
            selection.delta = Vec2::ZERO;
            selection.apply(scene);
        }
        self.phase = LassoPhase::default();
    }
}

/// Close `outline` and pick up every selectable object with a sample inside it.
fn close(scene: &Scene, outline: Vec<Point>) -> LassoPhase {
    if outline.len() < 3 {
        log::debug!("Lasso with {} points discarded", outline.len());
        return LassoPhase::default();
    }
    let Some(bounds) = points_bounds(&outline) else {
        return LassoPhase::default();
    };

    let moves: Vec<(DrawableId, Vec2)> = enclosed(scene, &outline)
        .into_iter()
        .filter_map(|id| scene.origin(id).map(|origin| (id, origin)))
        .collect();

    if moves.is_empty() {
        log::debug!("Lasso enclosed nothing");
        return LassoPhase::default();
    }

    log::debug!("Lasso selected {} objects", moves.len());
    LassoPhase::Move {
        selection: SelectionGroup {
            moves,
            delta: Vec2::ZERO,
        },
        outline,
        bounds,
        drag_start: None,
        pressed: false,
    }
}

/// Fix the dragged objects at their new origins and record the move.
fn commit(ctx: &mut GestureContext<'_>, selection: &SelectionGroup) {
    for (id, before) in &selection.moves {
        ctx.scene.place(*id, *before + selection.delta);
    }
    log::debug!(
        "Lasso moved {} objects by {:?}",
        selection.moves.len(),
        selection.delta
    );
    ctx.history.push(Command::Translate {
        moves: selection.moves.clone(),
        delta: selection.delta,
    });
}

/// IDs of every selectable object the outline encloses, without selecting them.
pub fn enclosed(scene: &Scene, outline: &[Point]) -> Vec<DrawableId> {
    if outline.len() < 3 {
        return Vec::new();
    }
    let path = polyline_path(outline, true);
    scene
        .drawables_ordered()
        .filter(|d| d.is_selectable())
        .filter(|d| d.sample_points().into_iter().any(|p| path_encloses(&path, p)))
        .map(Drawable::id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::CommandHistory;
    use crate::shapes::{Stroke, StrokeStyle};

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 20.0),
            Point::new(0.0, 20.0),
        ]
    }

    fn stroke_at(scene: &mut Scene, x: f64, y: f64) -> DrawableId {
        scene.add(Stroke::from_points(
            vec![Point::new(x, y), Point::new(x + 2.0, y + 2.0)],
            StrokeStyle::default(),
        ))
    }

    fn trace(engine: &mut LassoEngine, ctx: &mut GestureContext<'_>, outline: &[Point]) {
        engine.begin(ctx, &outline[..1]);
        engine.moved(ctx, &outline[1..], &[]);
        engine.end(ctx, &[]);
    }

    #[test]
    fn test_enclosure() {
        let mut scene = Scene::new();
        let inside = stroke_at(&mut scene, 5.0, 5.0);
        let outside = stroke_at(&mut scene, 50.0, 50.0);

        let picked = enclosed(&scene, &square());
        assert!(picked.contains(&inside));
        assert!(!picked.contains(&outside));
    }

    #[test]
    fn test_empty_lasso_is_discarded() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        stroke_at(&mut scene, 50.0, 50.0);
        let mut engine = LassoEngine::new();
        let mut ctx = GestureContext::new(&mut scene, &mut history);

        trace(&mut engine, &mut ctx, &square());
        assert!(engine.selection().is_none());
        assert!(!engine.is_active());
        assert!(!ctx.history.can_undo());
    }

    #[test]
    fn test_two_point_lasso_is_discarded() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        stroke_at(&mut scene, 5.0, 5.0);
        let mut engine = LassoEngine::new();
        let mut ctx = GestureContext::new(&mut scene, &mut history);

        trace(&mut engine, &mut ctx, &square()[..2]);
        assert!(engine.selection().is_none());
    }

    #[test]
    fn test_drag_and_commit() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let id = stroke_at(&mut scene, 5.0, 5.0);
        let mut engine = LassoEngine::new();
        let mut ctx = GestureContext::new(&mut scene, &mut history);

        trace(&mut engine, &mut ctx, &square());
        assert!(engine.overlay().unwrap().marching);

        engine.begin(&mut ctx, &[Point::new(10.0, 10.0)]);
        engine.moved(&mut ctx, &[Point::new(12.0, 9.0), Point::new(15.0, 7.0)], &[]);
        assert_eq!(ctx.scene.origin(id), Some(Vec2::new(5.0, -3.0)));
        // Samples wait for the release.
        assert_eq!(ctx.scene.get(id).unwrap().sample_points()[0], Point::new(5.0, 5.0));
        assert_eq!(engine.overlay().unwrap().points[0], Point::new(5.0, -3.0));

        engine.end(&mut ctx, &[Point::new(15.0, 7.0)]);
        assert!(engine.selection().is_none());
        assert_eq!(ctx.scene.get(id).unwrap().sample_points()[0], Point::new(10.0, 2.0));
        assert_eq!(
            ctx.history.last(),
            Some(&Command::Translate {
                moves: vec![(id, Vec2::ZERO)],
                delta: Vec2::new(5.0, -3.0),
            })
        );
    }

    #[test]
    fn test_tap_outside_dismisses() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let id = stroke_at(&mut scene, 5.0, 5.0);
        let mut engine = LassoEngine::new();
        let mut ctx = GestureContext::new(&mut scene, &mut history);

        trace(&mut engine, &mut ctx, &square());
        engine.begin(&mut ctx, &[Point::new(80.0, 80.0)]);
        engine.moved(&mut ctx, &[Point::new(90.0, 90.0)], &[]);
        engine.end(&mut ctx, &[]);

        assert!(engine.selection().is_none());
        assert_eq!(ctx.scene.origin(id), Some(Vec2::ZERO));
        assert!(!ctx.history.can_undo());
    }

    #[test]
    fn test_reset_restores_dragged_objects() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let id = stroke_at(&mut scene, 5.0, 5.0);
        let mut engine = LassoEngine::new();
        {
            let mut ctx = GestureContext::new(&mut scene, &mut history);
            trace(&mut engine, &mut ctx, &square());
            engine.begin(&mut ctx, &[Point::new(10.0, 10.0)]);
            engine.moved(&mut ctx, &[Point::new(30.0, 30.0)], &[]);
        }
        assert_eq!(scene.origin(id), Some(Vec2::new(20.0, 20.0)));

        engine.reset(&mut scene);
        assert_eq!(scene.origin(id), Some(Vec2::ZERO));
        assert!(!history.can_undo());
    }
}
