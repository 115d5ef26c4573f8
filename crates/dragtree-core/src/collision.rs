//! Collision heuristics between the dragged rect and drop targets.

use crate::tree::ItemId;
use kurbo::{Point, Rect};

/// A measured drop target.
pub type RectEntry = (ItemId, Rect);

/// Corners in top-left, top-right, bottom-left, bottom-right order.
pub fn corners_of_rectangle(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
    ]
}

/// Average distance between corresponding corners, rounded to four decimals
/// so that near-equal candidates tie.
pub fn corner_distance(a: Rect, b: Rect) -> f64 {
    let total: f64 = corners_of_rectangle(a)
        .iter()
        .zip(corners_of_rectangle(b).iter())
        .map(|(p, q)| p.distance(*q))
        .sum();
    ((total / 4.0) * 10_000.0).round() / 10_000.0
}

/// Pick the entry whose corners are closest to `target`'s corners.
///
/// Ties keep the earliest entry.
pub fn closest_corners(entries: &[RectEntry], target: Rect) -> Option<&ItemId> {
    let mut closest: Option<(&ItemId, f64)> = None;
    for (id, rect) in entries {
        let distance = corner_distance(*rect, target);
        match closest {
            Some((_, best)) if distance >= best => {}
            _ => closest = Some((id, distance)),
        }
    }
    closest.map(|(id, _)| id)
}
