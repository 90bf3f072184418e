//! Geometry helpers shared by the scene model and the gesture engines.

use kurbo::{Affine, BezPath, Point, Rect, Shape as _, Size, Vec2};

/// Default number of lattice bins used when sampling image rectangles.
pub const DEFAULT_SAMPLE_BINS: usize = 16;

/// Build a path that connects `points` with straight segments in order.
///
/// No smoothing is applied; round caps and joins are a rendering concern.
/// An empty slice yields an empty path.
pub fn polyline_path(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };

    path.move_to(*first);
    for point in points.iter().skip(1) {
        path.line_to(*point);
    }
    if closed {
        path.close_path();
    }
    path
}

/// Axis-aligned bounding box of a point set.
pub fn points_bounds(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    Some(
        points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p)),
    )
}

/// Inclusive overlap test. Degenerate (zero-width or zero-height) boxes still
/// overlap anything they touch, which kurbo's area-based intersection misses.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Inclusive containment (kurbo's `Rect::contains` excludes the far edges).
pub fn rect_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Nonzero-winding containment test against a closed path.
pub fn path_encloses(path: &BezPath, point: Point) -> bool {
    path.winding(point) != 0
}

/// Sample a rectangle on a `(bins + 1) x (bins + 1)` lattice, perimeter included.
pub fn rect_lattice(rect: Rect, bins: usize) -> Vec<Point> {
    let bins = bins.max(1);
    let rect = rect.abs();
    let gap_x = rect.width() / bins as f64;
    let gap_y = rect.height() / bins as f64;

    let mut points = Vec::with_capacity((bins + 1) * (bins + 1));
    for i in 0..=bins {
        for j in 0..=bins {
            points.push(Point::new(
                rect.x0 + gap_x * i as f64,
                rect.y0 + gap_y * j as f64,
            ));
        }
    }
    points
}

/// Strip the translation component of an affine, keeping rotation/scale/skew.
pub fn linear_part(affine: Affine) -> Affine {
    let [a, b, c, d, _, _] = affine.as_coeffs();
    Affine::new([a, b, c, d, 0.0, 0.0])
}

/// Compose `linear` applied about `pivot`, then translated by `offset`.
pub fn pivot_transform(pivot: Point, linear: Affine, offset: Vec2) -> Affine {
    Affine::translate(pivot.to_vec2() + offset) * linear_part(linear) * Affine::translate(-pivot.to_vec2())
}

/// Largest rectangle with the aspect ratio of `size` that fits centered inside `bounds`.
pub fn aspect_fit(size: Size, bounds: Rect) -> Rect {
    let bounds = bounds.abs();
    if size.width <= 0.0 || size.height <= 0.0 || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Rect::from_center_size(bounds.center(), Size::ZERO);
    }

    let aspect = size.width / size.height;
    let target_aspect = bounds.width() / bounds.height();

    let fitted = if aspect > target_aspect {
        // Wider than the target - fit to width
        Size::new(bounds.width(), bounds.width() / aspect)
    } else {
        Size::new(bounds.height() * aspect, bounds.height())
    };
    Rect::from_center_size(bounds.center(), fitted)
}
