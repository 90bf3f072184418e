//! Freehand ink: `Idle -> Drawing -> Idle`.

use super::{GestureContext, GestureEngine};
use crate::history::Command;
use crate::scene::Scene;
use crate::shapes::{DrawableId, Stroke, StrokeStyle};
use kurbo::Point;

/// Builds one stroke per gesture.
#[derive(Debug, Clone, Default)]
pub struct InkEngine {
    /// Stroke being drawn; it is already in the scene but not in the history.
    current: Option<DrawableId>,
}

impl InkEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stroke currently being drawn.
    pub fn current(&self) -> Option<DrawableId> {
        self.current
    }

    /// Start a stroke at the first sample. A stray begin while drawing finishes
    /// the previous stroke first.
    pub fn begin(&mut self, ctx: &mut GestureContext<'_>, points: &[Point], style: StrokeStyle) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        if self.current.is_some() {
            self.end(ctx, &[]);
        }

        let mut stroke = Stroke::new(*first, style);
        if !rest.is_empty() {
            stroke.extend(rest, &[]);
        }
        let id = ctx.scene.add(stroke);
        log::debug!("Ink stroke {id} started at {first:?}");
        self.current = Some(id);
    }

    /// Append confirmed samples; predicted samples only shape the preview.
    pub fn moved(&mut self, ctx: &mut GestureContext<'_>, confirmed: &[Point], predicted: &[Point]) {
        let Some(stroke) = self.current_stroke(ctx.scene) else {
            return;
        };
        stroke.extend(confirmed, predicted);
    }

    /// Finish the stroke and record it. Strokes that never leave their first point are dropped.
    pub fn end(&mut self, ctx: &mut GestureContext<'_>, points: &[Point]) {
        let Some(stroke) = self.current_stroke(ctx.scene) else {
            return;
        };

        let tail: Vec<Point> = points
            .iter()
            .copied()
            .filter(|p| stroke.points().last() != Some(p))
            .collect();
        stroke.extend(&tail, &[]);
        stroke.finalize();
        let committed = stroke.points().windows(2).any(|pair| pair[0] != pair[1]);

        let Some(id) = self.current.take() else {
            return;
        };
        if committed {
            log::debug!("Ink stroke {id} committed");
            ctx.history.push(Command::AddStroke(id));
        } else {
            log::debug!("Ink stroke {id} has no extent, dropping it");
            ctx.scene.remove(id);
        }
    }

    fn current_stroke<'s>(&self, scene: &'s mut Scene) -> Option<&'s mut Stroke> {
        let id = self.current?;
        let stroke = scene.get_mut(id).and_then(|d| d.as_stroke_mut());
        if stroke.is_none() {
            log::error!("In-progress stroke {id} is missing from the scene");
        }
        stroke
    }
}

impl GestureEngine for InkEngine {
    fn is_active(&self) -> bool {
        self.current.is_some()
    }

    fn reset(&mut self, scene: &mut Scene) {
        if let Some(id) = self.current.take() {
            log::debug!("Discarding in-progress stroke {id}");
            scene.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::CommandHistory;
    use crate::shapes::DrawableTrait;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_stroke_lifecycle() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let mut engine = InkEngine::new();
        let mut ctx = GestureContext::new(&mut scene, &mut history);

        engine.begin(&mut ctx, &pts(&[(0.0, 0.0)]), StrokeStyle::default());
        let id = engine.current().unwrap();
        assert!(ctx.scene.is_attached(id));
        assert_eq!(ctx.history.undo_len(), 0);

        engine.moved(&mut ctx, &pts(&[(1.0, 1.0), (2.0, 2.0)]), &pts(&[(3.0, 3.0)]));
        engine.end(&mut ctx, &pts(&[(2.0, 2.0)]));

        assert!(!engine.is_active());
        assert_eq!(ctx.history.last(), Some(&Command::AddStroke(id)));
        let stroke = ctx.scene.get(id).unwrap().as_stroke().unwrap();
        assert_eq!(stroke.points(), &pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)])[..]);
        assert!(stroke.predicted().is_empty());
    }

    #[test]
    fn test_predicted_points_only_in_preview() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let mut engine = InkEngine::new();
        let mut ctx = GestureContext::new(&mut scene, &mut history);

        engine.begin(&mut ctx, &pts(&[(0.0, 0.0)]), StrokeStyle::default());
        engine.moved(&mut ctx, &pts(&[(5.0, 0.0)]), &pts(&[(9.0, 0.0), (12.0, 0.0)]));
        let id = engine.current().unwrap();
        let preview = ctx.scene.get(id).unwrap().as_stroke().unwrap().preview_points();
        assert_eq!(preview.len(), 4);

        engine.end(&mut ctx, &[]);
        let stroke = ctx.scene.get(id).unwrap().as_stroke().unwrap();
        assert_eq!(stroke.points().len(), 2);
        assert_eq!(stroke.bounds().x1, 5.0);
    }

    #[test]
    fn test_single_point_commits_nothing() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let mut engine = InkEngine::new();
        let mut ctx = GestureContext::new(&mut scene, &mut history);

        engine.begin(&mut ctx, &pts(&[(4.0, 4.0)]), StrokeStyle::default());
        engine.end(&mut ctx, &pts(&[(4.0, 4.0)]));

        assert!(ctx.scene.is_empty());
        assert_eq!(ctx.scene.retained_len(), 0);
        assert_eq!(ctx.history.undo_len(), 0);
    }

    #[test]
    fn test_stationary_stroke_commits_nothing() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let mut engine = InkEngine::new();
        let mut ctx = GestureContext::new(&mut scene, &mut history);

        engine.begin(&mut ctx, &pts(&[(0.0, 0.0)]), StrokeStyle::default());
        engine.moved(&mut ctx, &pts(&[(0.0, 0.0), (0.0, 0.0)]), &pts(&[(3.0, 0.0)]));
        engine.end(&mut ctx, &[]);

        assert!(ctx.scene.is_empty());
        assert_eq!(ctx.scene.retained_len(), 0);
        assert!(!ctx.history.can_undo());
    }

    #[test]
    fn test_unmatched_events_are_ignored() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let mut engine = InkEngine::new();
        let mut ctx = GestureContext::new(&mut scene, &mut history);

        engine.moved(&mut ctx, &pts(&[(1.0, 1.0)]), &[]);
        engine.end(&mut ctx, &pts(&[(1.0, 1.0)]));
        engine.begin(&mut ctx, &[], StrokeStyle::default());

        assert!(ctx.scene.is_empty());
        assert!(!ctx.history.can_undo());
    }

    #[test]
    fn test_reset_removes_stroke() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let mut engine = InkEngine::new();
        {
            let mut ctx = GestureContext::new(&mut scene, &mut history);
            engine.begin(&mut ctx, &pts(&[(0.0, 0.0), (1.0, 0.0)]), StrokeStyle::default());
        }

        engine.reset(&mut scene);
        assert!(!engine.is_active());
        assert_eq!(scene.retained_len(), 0);
        assert!(!history.can_undo());
    }
}
