//! Pointer input types for touch, pen and mouse events.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Device that produced a pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Finger,
    Pen,
    Mouse,
}

/// One pointer sample in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub location: Point,
    pub kind: PointerKind,
}

impl PointerSample {
    pub fn new(location: Point, kind: PointerKind) -> Self {
        Self { location, kind }
    }

    /// Shorthand for a finger sample.
    pub fn finger(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), PointerKind::Finger)
    }

    /// Shorthand for a pen sample.
    pub fn pen(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), PointerKind::Pen)
    }
}

/// Pointer event type for unified touch/pen/mouse handling.
///
/// `Moved` separates confirmed samples, which are persisted, from predicted
/// samples, which only feed the live preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PointerEvent {
    Began {
        samples: Vec<PointerSample>,
    },
    Moved {
        coalesced: Vec<PointerSample>,
        #[serde(default)]
        predicted: Vec<PointerSample>,
    },
    Ended {
        samples: Vec<PointerSample>,
    },
    Cancelled {
        samples: Vec<PointerSample>,
    },
}

/// Locations of the samples whose kind is accepted, in delivery order.
pub fn accepted_locations(samples: &[PointerSample], accepted: &[PointerKind]) -> Vec<Point> {
    let kept: Vec<Point> = samples
        .iter()
        .filter(|s| accepted.contains(&s.kind))
        .map(|s| s.location)
        .collect();
    if kept.len() < samples.len() {
        log::warn!(
            "Dropped {} pointer samples from unaccepted devices",
            samples.len() - kept.len()
        );
    }
    kept
}
