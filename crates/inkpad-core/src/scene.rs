//! Ordered collection of drawables.

use crate::shapes::{Drawable, DrawableId, ImageData};
use crate::snapshot::{SceneSnapshot, SnapshotItem};
use kurbo::Vec2;
use std::collections::{HashMap, HashSet};

/// The scene exclusively owns every drawable.
///
/// Removing an object on behalf of the history *detaches* it: the object keeps
/// its identity and z-slot but is hidden from rendering and hit-testing until it
/// is attached again or purged.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// All drawables, keyed by ID.
    shapes: HashMap<DrawableId, Drawable>,
    /// Z-order of drawables (back to front).
    z_order: Vec<DrawableId>,
    /// Drawables currently hidden but kept for undo/redo.
    detached: HashSet<DrawableId>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drawable on top of the z-order.
    pub fn add(&mut self, drawable: impl Into<Drawable>) -> DrawableId {
        let drawable = drawable.into();
        let id = drawable.id();
        self.z_order.push(id);
        self.shapes.insert(id, drawable);
        id
    }

    /// Delete a drawable outright. Only for objects no command refers to.
    pub fn remove(&mut self, id: DrawableId) -> Option<Drawable> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.detached.remove(&id);
        self.shapes.remove(&id)
    }

    /// Hide a drawable, keeping it for a later [`Scene::attach`].
    /// Returns false if the drawable is unknown or already detached.
    pub fn detach(&mut self, id: DrawableId) -> bool {
        self.shapes.contains_key(&id) && self.detached.insert(id)
    }

    /// Show a previously detached drawable in its original z-slot.
    pub fn attach(&mut self, id: DrawableId) -> bool {
        self.detached.remove(&id)
    }

    /// Whether the drawable exists and is visible.
    pub fn is_attached(&self, id: DrawableId) -> bool {
        self.shapes.contains_key(&id) && !self.detached.contains(&id)
    }

    /// Whether the drawable exists at all (attached or detached).
    pub fn contains(&self, id: DrawableId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Get a drawable by ID, attached or not.
    pub fn get(&self, id: DrawableId) -> Option<&Drawable> {
        self.shapes.get(&id)
    }

    /// Get a mutable reference to a drawable by ID.
    pub fn get_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        self.shapes.get_mut(&id)
    }

    /// Attached drawables in z-order (back to front).
    pub fn drawables_ordered(&self) -> impl Iterator<Item = &Drawable> {
        self.z_order
            .iter()
            .filter(|id| !self.detached.contains(*id))
            .filter_map(|id| self.shapes.get(id))
    }

    /// Attached drawables that render, back to front. Masks over a detached
    /// target are skipped.
    fn visible(&self) -> impl Iterator<Item = &Drawable> {
        self.drawables_ordered().filter(|drawable| match drawable {
            Drawable::Mask(mask) => self.is_attached(mask.target),
            _ => true,
        })
    }

    /// IDs of attached drawables in z-order.
    pub fn attached_ids(&self) -> Vec<DrawableId> {
        self.drawables_ordered().map(Drawable::id).collect()
    }

    /// Live frame offset of a drawable.
    pub fn origin(&self, id: DrawableId) -> Option<Vec2> {
        self.shapes.get(&id).map(Drawable::origin)
    }

    /// Place a drawable's live frame; hit-test samples are left untouched.
    pub fn set_origin(&mut self, id: DrawableId, origin: Vec2) -> bool {
        match self.shapes.get_mut(&id) {
            Some(drawable) => {
                drawable.set_origin(origin);
                true
            }
            None => false,
        }
    }

    /// Place a drawable and commit its hit-test samples to the new frame.
    pub fn place(&mut self, id: DrawableId, origin: Vec2) -> bool {
        match self.shapes.get_mut(&id) {
            Some(drawable) => {
                drawable.set_origin(origin);
                drawable.commit_origin();
                true
            }
            None => false,
        }
    }

    /// Drop detached drawables that nothing can bring back, plus masks whose
    /// target went with them.
    pub fn purge_detached(&mut self, still_referenced: impl Fn(DrawableId) -> bool) {
        let doomed: HashSet<DrawableId> = self
            .detached
            .iter()
            .copied()
            .filter(|&id| !still_referenced(id))
            .collect();
        if doomed.is_empty() {
            return;
        }

        let orphaned_masks: Vec<DrawableId> = self
            .shapes
            .values()
            .filter_map(Drawable::as_mask)
            .filter(|mask| doomed.contains(&mask.target))
            .map(|mask| mask.id)
            .collect();

        log::debug!(
            "Purging {} detached drawables and {} orphaned masks",
            doomed.len(),
            orphaned_masks.len()
        );
        for id in doomed.into_iter().chain(orphaned_masks) {
            self.remove(id);
        }
    }

    /// Clear all drawables, attached or not.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.z_order.clear();
        self.detached.clear();
    }

    /// Check if the scene shows nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of drawables a snapshot would show.
    pub fn len(&self) -> usize {
        self.visible().count()
    }

    /// Number of drawables held, attached or not.
    pub fn retained_len(&self) -> usize {
        self.shapes.len()
    }

    /// Render-ready view of the attached drawables, back to front.
    pub fn snapshot(&self, background: Option<&ImageData>) -> SceneSnapshot {
        let items = self
            .visible()
            .filter_map(|drawable| match drawable {
                Drawable::Mask(mask) => {
                    let target_origin = self.origin(mask.target).unwrap_or(Vec2::ZERO);
                    Some(SnapshotItem::mask(mask, target_origin))
                }
                other => SnapshotItem::from_drawable(other),
            })
            .collect();

        SceneSnapshot {
            background: background.cloned(),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{EraseMask, Stroke, StrokeStyle};
    use kurbo::Point;

    fn stroke_at(x: f64, y: f64) -> Stroke {
        Stroke::from_points(
            vec![Point::new(x, y), Point::new(x + 10.0, y + 10.0)],
            StrokeStyle::default(),
        )
    }

    #[test]
    fn test_scene_creation() {
        let scene = Scene::new();
        assert!(scene.is_empty());
    }

    #[test]
    fn test_add_and_remove() {
        let mut scene = Scene::new();
        let id = scene.add(stroke_at(0.0, 0.0));
        assert_eq!(scene.len(), 1);
        assert!(scene.get(id).is_some());

        assert!(scene.remove(id).is_some());
        assert!(scene.is_empty());
        assert!(!scene.contains(id));
    }

    #[test]
    fn test_detach_preserves_z_slot() {
        let mut scene = Scene::new();
        let a = scene.add(stroke_at(0.0, 0.0));
        let b = scene.add(stroke_at(10.0, 0.0));
        let c = scene.add(stroke_at(20.0, 0.0));

        assert!(scene.detach(b));
        assert!(!scene.detach(b));
        assert_eq!(scene.attached_ids(), vec![a, c]);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.retained_len(), 3);

        assert!(scene.attach(b));
        assert_eq!(scene.attached_ids(), vec![a, b, c]);
    }

    #[test]
    fn test_purge_drops_unreferenced_and_their_masks() {
        let mut scene = Scene::new();
        let kept = scene.add(stroke_at(0.0, 0.0));
        let gone = scene.add(stroke_at(50.0, 0.0));
        let mask = scene.add(EraseMask::new(gone, vec![Point::ZERO], 4.0));

        scene.detach(kept);
        scene.detach(gone);
        scene.purge_detached(|id| id == kept);

        assert!(scene.contains(kept));
        assert!(!scene.contains(gone));
        assert!(!scene.contains(mask));
    }

    #[test]
    fn test_place_commits_samples() {
        let mut scene = Scene::new();
        let id = scene.add(stroke_at(0.0, 0.0));

        scene.set_origin(id, Vec2::new(3.0, 4.0));
        assert_eq!(scene.get(id).unwrap().sample_points()[0], Point::ZERO);

        scene.place(id, Vec2::new(3.0, 4.0));
        assert_eq!(scene.get(id).unwrap().sample_points()[0], Point::new(3.0, 4.0));
    }

    #[test]
    fn test_snapshot_skips_detached_and_orphan_masks() {
        let mut scene = Scene::new();
        let stroke = scene.add(stroke_at(0.0, 0.0));
        scene.add(EraseMask::new(stroke, vec![Point::ZERO], 4.0));
        assert_eq!(scene.snapshot(None).items.len(), 2);

        scene.detach(stroke);
        assert!(scene.snapshot(None).items.is_empty());
    }

    #[test]
    fn test_len_skips_masks_over_detached_targets() {
        let mut scene = Scene::new();
        let stroke = scene.add(stroke_at(0.0, 0.0));
        scene.add(EraseMask::new(stroke, vec![Point::ZERO], 4.0));
        assert_eq!(scene.len(), 2);

        scene.detach(stroke);
        assert_eq!(scene.len(), 0);
        assert!(scene.is_empty());
        assert_eq!(scene.retained_len(), 2);
    }
}
