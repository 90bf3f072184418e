//! Drawable objects that live in the scene.

mod image;
mod mask;
mod stroke;

pub use image::{ImageData, ImageFormat, ImageObject};
pub use mask::EraseMask;
pub use stroke::Stroke;

use kurbo::{BezPath, Cap, Join, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Kind of ink a stroke was drawn with. Purely descriptive for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InkType {
    Pencil,
    #[default]
    Pen,
    Marker,
}

/// End cap for stroked paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Segment join for stroked paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// Style properties for ink strokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: SerializableColor,
    pub width: f64,
    #[serde(default)]
    pub cap: LineCap,
    #[serde(default)]
    pub join: LineJoin,
    #[serde(default)]
    pub ink_type: InkType,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 4.0,
            cap: LineCap::default(),
            join: LineJoin::default(),
            ink_type: InkType::default(),
        }
    }
}

impl StrokeStyle {
    /// Get the stroke color as a peniko Color.
    pub fn color(&self) -> Color {
        self.color.into()
    }

    /// Stroke parameters in the form a kurbo-based renderer consumes.
    pub fn to_kurbo(&self) -> kurbo::Stroke {
        let cap = match self.cap {
            LineCap::Butt => Cap::Butt,
            LineCap::Round => Cap::Round,
            LineCap::Square => Cap::Square,
        };
        let join = match self.join {
            LineJoin::Miter => Join::Miter,
            LineJoin::Round => Join::Round,
            LineJoin::Bevel => Join::Bevel,
        };
        kurbo::Stroke::new(self.width).with_caps(cap).with_join(join)
    }
}

/// Unique identifier for drawables.
pub type DrawableId = Uuid;

/// Opaque handle the external renderer may key its caches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderHandle(u64);

impl RenderHandle {
    /// Allocate a fresh handle.
    pub fn next() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};

        static HANDLE_COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(HANDLE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Common behavior of every drawable.
pub trait DrawableTrait {
    /// Get the unique identifier.
    fn id(&self) -> DrawableId;

    /// Renderer handle.
    fn render_handle(&self) -> RenderHandle;

    /// Bounding box at the live position.
    fn bounds(&self) -> Rect;

    /// Hit-test samples in canvas coordinates, at the last committed position.
    fn sample_points(&self) -> Vec<Point>;

    /// Path for rendering, at the live position.
    fn to_path(&self) -> BezPath;

    /// Live frame offset.
    fn origin(&self) -> Vec2;

    /// Move the live frame without touching the hit-test samples.
    fn set_origin(&mut self, origin: Vec2);

    /// Make the hit-test samples follow the live frame.
    fn commit_origin(&mut self);
}

/// Closed set of drawable kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Drawable {
    Stroke(Stroke),
    Image(ImageObject),
    Mask(EraseMask),
}

impl Drawable {
    pub fn id(&self) -> DrawableId {
        match self {
            Drawable::Stroke(s) => s.id(),
            Drawable::Image(s) => s.id(),
            Drawable::Mask(s) => s.id(),
        }
    }

    pub fn render_handle(&self) -> RenderHandle {
        match self {
            Drawable::Stroke(s) => s.render_handle(),
            Drawable::Image(s) => s.render_handle(),
            Drawable::Mask(s) => s.render_handle(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Drawable::Stroke(s) => s.bounds(),
            Drawable::Image(s) => s.bounds(),
            Drawable::Mask(s) => s.bounds(),
        }
    }

    pub fn sample_points(&self) -> Vec<Point> {
        match self {
            Drawable::Stroke(s) => s.sample_points(),
            Drawable::Image(s) => s.sample_points(),
            Drawable::Mask(s) => s.sample_points(),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Drawable::Stroke(s) => s.to_path(),
            Drawable::Image(s) => s.to_path(),
            Drawable::Mask(s) => s.to_path(),
        }
    }

    pub fn origin(&self) -> Vec2 {
        match self {
            Drawable::Stroke(s) => s.origin(),
            Drawable::Image(s) => s.origin(),
            Drawable::Mask(s) => s.origin(),
        }
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        match self {
            Drawable::Stroke(s) => s.set_origin(origin),
            Drawable::Image(s) => s.set_origin(origin),
            Drawable::Mask(s) => s.set_origin(origin),
        }
    }

    pub fn commit_origin(&mut self) {
        match self {
            Drawable::Stroke(s) => s.commit_origin(),
            Drawable::Image(s) => s.commit_origin(),
            Drawable::Mask(s) => s.commit_origin(),
        }
    }

    /// Whether the lasso may pick this drawable up.
    pub fn is_selectable(&self) -> bool {
        !matches!(self, Drawable::Mask(_))
    }

    /// Whether the vector eraser may remove this drawable.
    pub fn is_erasable(&self, can_erase_images: bool) -> bool {
        match self {
            Drawable::Stroke(_) => true,
            Drawable::Image(_) => can_erase_images,
            Drawable::Mask(_) => false,
        }
    }

    /// Check if this drawable is a stroke.
    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Drawable::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_stroke_mut(&mut self) -> Option<&mut Stroke> {
        match self {
            Drawable::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageObject> {
        match self {
            Drawable::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_mask(&self) -> Option<&EraseMask> {
        match self {
            Drawable::Mask(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Stroke> for Drawable {
    fn from(stroke: Stroke) -> Self {
        Drawable::Stroke(stroke)
    }
}

impl From<ImageObject> for Drawable {
    fn from(image: ImageObject) -> Self {
        Drawable::Image(image)
    }
}

impl From<EraseMask> for Drawable {
    fn from(mask: EraseMask) -> Self {
        Drawable::Mask(mask)
    }
}
