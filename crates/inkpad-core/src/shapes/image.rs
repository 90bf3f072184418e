//! Embedded raster images.

use super::{DrawableId, DrawableTrait, RenderHandle};
use crate::geometry::{linear_part, pivot_transform, rect_lattice};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image format for stored image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
    /// WebP format.
    WebP,
    /// Undecoded RGBA8 pixels.
    Rgba8,
}

impl ImageFormat {
    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// Source bitmap of an image, stored base64-encoded so snapshots stay plain JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// Image format.
    pub format: ImageFormat,
    /// Original image width in pixels.
    pub source_width: u32,
    /// Original image height in pixels.
    pub source_height: u32,
    data_base64: String,
}

impl ImageData {
    /// Wrap raw image bytes.
    pub fn new(data: &[u8], source_width: u32, source_height: u32, format: ImageFormat) -> Self {
        use base64::{Engine, engine::general_purpose::STANDARD};

        Self {
            format,
            source_width,
            source_height,
            data_base64: STANDARD.encode(data),
        }
    }

    /// Wrap encoded bytes, sniffing the format. Unknown signatures are treated as raw RGBA8.
    pub fn from_bytes(data: &[u8], source_width: u32, source_height: u32) -> Self {
        let format = ImageFormat::from_magic_bytes(data).unwrap_or(ImageFormat::Rgba8);
        Self::new(data, source_width, source_height, format)
    }

    /// Get the raw image data (decoded from base64).
    pub fn data(&self) -> Option<Vec<u8>> {
        use base64::{Engine, engine::general_purpose::STANDARD};
        STANDARD.decode(&self.data_base64).ok()
    }

    /// Pixel size of the source bitmap.
    pub fn size(&self) -> Size {
        Size::new(self.source_width as f64, self.source_height as f64)
    }

    /// A bitmap with no pixels or no bytes cannot be embedded.
    pub fn is_empty(&self) -> bool {
        self.source_width == 0 || self.source_height == 0 || self.data_base64.is_empty()
    }
}

/// An image fixed onto the canvas.
///
/// `rect` is the untransformed placement; `transform` holds only the linear part
/// (rotation/scale), applied about `pivot`. Hit-test samples are a lattice over
/// `rect` generated once, mapped through the transform when queried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageObject {
    pub(crate) id: DrawableId,
    handle: RenderHandle,
    /// Source bitmap.
    pub data: ImageData,
    rect: Rect,
    pivot: Point,
    transform: Affine,
    origin: Vec2,
    hit_origin: Vec2,
    local_samples: Vec<Point>,
}

impl ImageObject {
    /// Place `data` at `rect`, rotated/scaled by the linear part of `transform` about `pivot`.
    pub fn new(data: ImageData, rect: Rect, pivot: Point, transform: Affine, sample_bins: usize) -> Self {
        let rect = rect.abs();
        Self {
            id: Uuid::new_v4(),
            handle: RenderHandle::next(),
            data,
            rect,
            pivot,
            transform: linear_part(transform),
            origin: Vec2::ZERO,
            hit_origin: Vec2::ZERO,
            local_samples: rect_lattice(rect, sample_bins),
        }
    }

    /// Untransformed placement rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Rotation/scale component.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Point the linear transform is applied about.
    pub fn pivot(&self) -> Point {
        self.pivot
    }

    /// Full placement transform at the live position.
    pub fn world_transform(&self) -> Affine {
        pivot_transform(self.pivot, self.transform, self.origin)
    }

    /// Committed hit-test offset.
    pub fn hit_origin(&self) -> Vec2 {
        self.hit_origin
    }

    /// Number of hit-test samples.
    pub fn sample_count(&self) -> usize {
        self.local_samples.len()
    }
}

impl DrawableTrait for ImageObject {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn render_handle(&self) -> RenderHandle {
        self.handle
    }

    fn bounds(&self) -> Rect {
        self.world_transform().transform_rect_bbox(self.rect)
    }

    fn sample_points(&self) -> Vec<Point> {
        let transform = pivot_transform(self.pivot, self.transform, self.hit_origin);
        self.local_samples.iter().map(|p| transform * *p).collect()
    }

    fn to_path(&self) -> BezPath {
        // Outline of the rotated silhouette (for selection rendering)
        self.world_transform() * self.rect.to_path(0.1)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> ImageData {
        ImageData::new(&[0u8; 16], 2, 2, ImageFormat::Rgba8)
    }

    #[test]
    fn test_format_detection() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(ImageFormat::from_magic_bytes(&png_header), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(&[1, 2]), None);

        let data = ImageData::from_bytes(&png_header, 1, 1);
        assert_eq!(data.format, ImageFormat::Png);
        assert_eq!(data.data().as_deref(), Some(&png_header[..]));
    }

    #[test]
    fn test_empty_bitmap() {
        assert!(ImageData::new(&[], 10, 10, ImageFormat::Png).is_empty());
        assert!(ImageData::new(&[1, 2, 3], 0, 10, ImageFormat::Png).is_empty());
        assert!(!sample_data().is_empty());
    }

    #[test]
    fn test_unrotated_samples_cover_rect() {
        let rect = Rect::new(10.0, 20.0, 110.0, 70.0);
        let image = ImageObject::new(sample_data(), rect, rect.center(), Affine::IDENTITY, 4);
        assert_eq!(image.sample_count(), 25);
        assert_eq!(image.bounds(), rect);

        let samples = image.sample_points();
        assert!(samples.contains(&Point::new(10.0, 20.0)));
        assert!(samples.contains(&Point::new(110.0, 70.0)));
    }

    #[test]
    fn test_rotated_samples_follow_silhouette() {
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
        let quarter_turn = Affine::rotate(std::f64::consts::FRAC_PI_2);
        let image = ImageObject::new(sample_data(), rect, rect.center(), quarter_turn, 4);

        // A 100x20 bar turned upright about (50, 10) spans x in [40, 60].
        let bounds = image.bounds();
        assert!((bounds.x0 - 40.0).abs() < 1e-9);
        assert!((bounds.x1 - 60.0).abs() < 1e-9);
        assert!((bounds.y0 + 40.0).abs() < 1e-9);

        for p in image.sample_points() {
            assert!(p.x > 40.0 - 1e-9 && p.x < 60.0 + 1e-9);
        }
    }

    #[test]
    fn test_translation_keeps_linear_part() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let rotate = Affine::rotate(0.3);
        let mut image = ImageObject::new(sample_data(), rect, rect.center(), rotate, 2);

        image.set_origin(Vec2::new(5.0, -3.0));
        assert_eq!(image.transform(), linear_part(rotate));
        let moved = image.world_transform() * image.pivot();
        assert!((moved - Point::new(10.0, 2.0)).hypot() < 1e-9);
        // Samples stay put until the move is committed.
        assert_eq!(image.hit_origin(), Vec2::ZERO);
    }
}
