//! Eraser gestures, in vector and trim modes.
//!
//! Vector mode removes whole objects as soon as the footprint touches one of
//! their sample points. Trim mode leaves objects alone and, on release, lays an
//! [`EraseMask`] over every stroke the eraser trail overlaps.

use super::{GestureContext, GestureEngine};
use crate::geometry::{points_bounds, rects_overlap};
use crate::history::Command;
use crate::scene::Scene;
use crate::shapes::{Drawable, DrawableId, DrawableTrait, EraseMask};
use crate::tools::{EraseMode, FootprintShape};
use kurbo::{BezPath, Circle, Point, Rect, Shape as _, Vec2};

/// Eraser parameters for one gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraserSettings {
    pub mode: EraseMode,
    /// Footprint edge length or diameter, and the trim width.
    pub size: f64,
    pub can_erase_images: bool,
    pub footprint: FootprintShape,
}

/// The eraser's instantaneous hit-test region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub center: Point,
    /// Half the edge length, or the radius.
    pub half: f64,
    pub shape: FootprintShape,
}

impl Footprint {
    pub fn new(center: Point, size: f64, shape: FootprintShape) -> Self {
        Self {
            center,
            half: size / 2.0,
            shape,
        }
    }

    /// Inclusive containment.
    pub fn contains(&self, point: Point) -> bool {
        let d = point - self.center;
        match self.shape {
            FootprintShape::Square => d.x.abs() <= self.half && d.y.abs() <= self.half,
            FootprintShape::Circle => d.hypot2() <= self.half * self.half,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (self.half * 2.0, self.half * 2.0))
    }

    /// Outline for the cursor preview.
    pub fn to_path(&self) -> BezPath {
        match self.shape {
            FootprintShape::Square => self.bounds().to_path(0.1),
            FootprintShape::Circle => Circle::new(self.center, self.half).to_path(0.1),
        }
    }
}

/// What the renderer should show while erasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EraserOverlay {
    /// Cursor in vector mode.
    pub footprint: Option<Footprint>,
    /// Trail so far in trim mode.
    pub trail: Vec<Point>,
    pub width: f64,
}

#[derive(Debug, Clone, Default)]
pub struct EraserEngine {
    settings: Option<EraserSettings>,
    trail: Vec<Point>,
    cursor: Option<Footprint>,
}

impl EraserEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, ctx: &mut GestureContext<'_>, points: &[Point], settings: EraserSettings) {
        if points.is_empty() {
            return;
        }
        if self.settings.is_some() {
            self.end(ctx, &[]);
        }
        log::debug!("{:?} eraser started", settings.mode);
        self.settings = Some(settings);
        self.trail.clear();
        self.track(ctx, points);
    }

    /// Predicted samples are ignored; erasing only follows confirmed input.
    pub fn moved(&mut self, ctx: &mut GestureContext<'_>, confirmed: &[Point]) {
        if self.settings.is_none() {
            return;
        }
        self.track(ctx, confirmed);
    }

    pub fn end(&mut self, ctx: &mut GestureContext<'_>, points: &[Point]) {
        let Some(settings) = self.settings else {
            return;
        };
        self.track(ctx, points);
        if settings.mode == EraseMode::Trim {
            trim(ctx, &self.trail, settings.size);
        }
        self.settings = None;
        self.trail.clear();
        self.cursor = None;
    }

    pub fn overlay(&self) -> Option<EraserOverlay> {
        let settings = self.settings?;
        Some(EraserOverlay {
            footprint: self.cursor,
            trail: self.trail.clone(),
            width: settings.size,
        })
    }

    fn track(&mut self, ctx: &mut GestureContext<'_>, points: &[Point]) {
        let Some(settings) = self.settings else {
            return;
        };
        for &point in points {
            self.trail.push(point);
            if settings.mode == EraseMode::Vector {
                let footprint = Footprint::new(point, settings.size, settings.footprint);
                self.cursor = Some(footprint);
                erase_under(ctx, &footprint, settings.can_erase_images);
            }
        }
    }
}

impl GestureEngine for EraserEngine {
    fn is_active(&self) -> bool {
        self.settings.is_some()
    }

    /// Objects already erased stay erased; their commands are recorded.
    fn reset(&mut self, _scene: &mut Scene) {
        self.settings = None;
        self.trail.clear();
        self.cursor = None;
    }
}

/// Remove every attached object with a sample point inside `footprint`.
fn erase_under(ctx: &mut GestureContext<'_>, footprint: &Footprint, can_erase_images: bool) {
    let hits: Vec<DrawableId> = ctx
        .scene
        .drawables_ordered()
        .filter(|d| d.is_erasable(can_erase_images))
        .filter(|d| d.sample_points().into_iter().any(|p| footprint.contains(p)))
        .map(Drawable::id)
        .collect();

    for id in hits {
        ctx.scene.detach(id);
        log::debug!("Erased {id}");
        ctx.history.push(Command::RemoveObject(id));
    }
}

/// Lay a mask over every stroke whose bounds overlap the trail's bounds.
fn trim(ctx: &mut GestureContext<'_>, trail: &[Point], width: f64) {
    let Some(trail_bounds) = points_bounds(trail) else {
        return;
    };

    let targets: Vec<(DrawableId, Vec2)> = ctx
        .scene
        .drawables_ordered()
        .filter_map(Drawable::as_stroke)
        .filter(|stroke| rects_overlap(stroke.bounds(), trail_bounds))
        .map(|stroke| (stroke.id, stroke.origin()))
        .collect();
    if targets.is_empty() {
        log::debug!("Trim eraser touched nothing");
        return;
    }

    let masks: Vec<DrawableId> = targets
        .into_iter()
        .map(|(target, origin)| {
            let local = trail.iter().map(|p| *p - origin).collect();
            ctx.scene.add(EraseMask::new(target, local, width))
        })
        .collect();
    log::debug!("Trim eraser masked {} strokes", masks.len());
    ctx.history.push(Command::AddMask(masks));
}
