//! Turning interactive image placeholders into fixed image objects.
//!
//! A placeholder is a movable preview owned by the host UI. When the user
//! confirms it, its current geometry is frozen into an [`ImageObject`] and the
//! placeholder is asked to remove itself.

use crate::geometry::aspect_fit;
use crate::gestures::GestureContext;
use crate::history::Command;
use crate::shapes::{DrawableId, ImageData, ImageObject};
use kurbo::{Affine, Point, Rect};
use uuid::Uuid;

/// Interactive image preview supplied by the host.
pub trait ImagePlaceholder {
    /// Source bitmap, if one is loaded.
    fn bitmap(&self) -> Option<ImageData>;

    /// Untransformed frame of the placeholder, in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Area the image is drawn into, relative to the placeholder's own origin.
    fn image_frame(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.bounds().size())
    }

    /// Rotation/scale applied about the center of [`ImagePlaceholder::bounds`].
    fn transform(&self) -> Affine {
        Affine::IDENTITY
    }

    /// Remove the preview from display. Called exactly once.
    fn dismiss(&mut self);
}

/// Identifier of a pending placeholder.
pub type PlaceholderId = Uuid;

/// Placeholders waiting for confirmation.
#[derive(Default)]
pub struct EmbeddingManager {
    pending: Vec<(PlaceholderId, Box<dyn ImagePlaceholder>)>,
}

impl std::fmt::Debug for EmbeddingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingManager")
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl EmbeddingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, placeholder: Box<dyn ImagePlaceholder>) -> PlaceholderId {
        let id = Uuid::new_v4();
        self.pending.push((id, placeholder));
        log::debug!("Image placeholder {id} pending");
        id
    }

    /// Whether any placeholder is waiting; gestures are ignored meanwhile.
    pub fn is_editing(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Freeze one placeholder. Unknown IDs are ignored.
    pub fn confirm(
        &mut self,
        ctx: &mut GestureContext<'_>,
        id: PlaceholderId,
        sample_bins: usize,
    ) -> Option<DrawableId> {
        let index = self.pending.iter().position(|(pending, _)| *pending == id)?;
        let (_, mut placeholder) = self.pending.remove(index);
        embed(ctx, placeholder.as_mut(), sample_bins)
    }

    /// Freeze every pending placeholder, oldest first.
    pub fn confirm_all(&mut self, ctx: &mut GestureContext<'_>, sample_bins: usize) -> Vec<DrawableId> {
        self.pending
            .drain(..)
            .filter_map(|(_, mut placeholder)| embed(ctx, placeholder.as_mut(), sample_bins))
            .collect()
    }
}

/// Convert a placeholder into an image object and record it.
///
/// The placeholder is dismissed either way; without a usable bitmap the scene
/// is left untouched.
pub fn embed(
    ctx: &mut GestureContext<'_>,
    placeholder: &mut dyn ImagePlaceholder,
    sample_bins: usize,
) -> Option<DrawableId> {
    let bitmap = placeholder.bitmap().filter(|data| !data.is_empty());
    let bounds = placeholder.bounds().abs();
    let frame = placeholder.image_frame();
    let transform = placeholder.transform();
    placeholder.dismiss();

    let Some(bitmap) = bitmap else {
        log::warn!("Image placeholder confirmed without a bitmap");
        return None;
    };

    let rect = aspect_fit(bitmap.size(), frame) + bounds.origin().to_vec2();
    let image = ImageObject::new(bitmap, rect, bounds.center(), transform, sample_bins);
    let id = ctx.scene.add(image);
    log::info!("Embedded image {id} at {rect:?}");
    ctx.history.push(Command::AddImage(id));
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::CommandHistory;
    use crate::scene::Scene;
    use crate::shapes::{DrawableTrait, ImageFormat};
    use std::cell::Cell;
    use std::rc::Rc;

    struct TestPlaceholder {
        bitmap: Option<ImageData>,
        bounds: Rect,
        transform: Affine,
        dismissed: Rc<Cell<u32>>,
    }

    impl ImagePlaceholder for TestPlaceholder {
        fn bitmap(&self) -> Option<ImageData> {
            self.bitmap.clone()
        }

        fn bounds(&self) -> Rect {
            self.bounds
        }

        fn transform(&self) -> Affine {
            self.transform
        }

        fn dismiss(&mut self) {
            self.dismissed.set(self.dismissed.get() + 1);
        }
    }

    fn placeholder(bitmap: Option<ImageData>, dismissed: &Rc<Cell<u32>>) -> Box<TestPlaceholder> {
        Box::new(TestPlaceholder {
            bitmap,
            bounds: Rect::new(100.0, 100.0, 300.0, 200.0),
            transform: Affine::IDENTITY,
            dismissed: Rc::clone(dismissed),
        })
    }

    fn square_bitmap() -> ImageData {
        ImageData::new(&[255u8; 64], 4, 4, ImageFormat::Rgba8)
    }

    #[test]
    fn test_confirm_fits_and_records() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let mut manager = EmbeddingManager::new();
        let dismissed = Rc::new(Cell::new(0));
        let id = manager.add(placeholder(Some(square_bitmap()), &dismissed));
        assert!(manager.is_editing());

        let mut ctx = GestureContext::new(&mut scene, &mut history);
        let image_id = manager.confirm(&mut ctx, id, 16).unwrap();

        assert!(!manager.is_editing());
        assert_eq!(dismissed.get(), 1);
        assert_eq!(ctx.history.last(), Some(&Command::AddImage(image_id)));
        let image = ctx.scene.get(image_id).unwrap().as_image().unwrap();
        // A square bitmap in a 200x100 frame is centered as 100x100.
        assert_eq!(image.rect(), Rect::new(150.0, 100.0, 250.0, 200.0));
        assert_eq!(image.pivot(), Point::new(200.0, 150.0));
        assert_eq!(image.sample_count(), 17 * 17);
    }

    #[test]
    fn test_rotated_placeholder_samples_rotated_silhouette() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let dismissed = Rc::new(Cell::new(0));
        let mut rotated = placeholder(Some(square_bitmap()), &dismissed);
        rotated.transform = Affine::rotate(std::f64::consts::FRAC_PI_4);

        let mut ctx = GestureContext::new(&mut scene, &mut history);
        let id = embed(&mut ctx, rotated.as_mut(), 8).unwrap();
        let image = ctx.scene.get(id).unwrap().as_image().unwrap();

        // The corners of the square turn into diamond tips around (200, 150).
        let reach = 50.0 * std::f64::consts::SQRT_2;
        let top = image
            .sample_points()
            .into_iter()
            .map(|p| p.y)
            .fold(f64::INFINITY, f64::min);
        assert!((top - (150.0 - reach)).abs() < 1e-9);
    }

    #[test]
    fn test_missing_bitmap_only_dismisses() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let mut manager = EmbeddingManager::new();
        let dismissed = Rc::new(Cell::new(0));
        manager.add(placeholder(None, &dismissed));
        manager.add(placeholder(
            Some(ImageData::new(&[], 0, 0, ImageFormat::Png)),
            &dismissed,
        ));

        let mut ctx = GestureContext::new(&mut scene, &mut history);
        assert!(manager.confirm_all(&mut ctx, 16).is_empty());
        assert_eq!(dismissed.get(), 2);
        assert!(ctx.scene.is_empty());
        assert!(!ctx.history.can_undo());
    }

    #[test]
    fn test_unknown_placeholder_is_ignored() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let mut manager = EmbeddingManager::new();
        let mut ctx = GestureContext::new(&mut scene, &mut history);
        assert!(manager.confirm(&mut ctx, Uuid::new_v4(), 16).is_none());
    }
}
