//! Drag coordinates and their adjustment helpers.

use kurbo::{Point, Vec2};

/// Absolute position of the dragged item's preview.
pub type Coordinates = Point;

/// Subtract each adjustment from `coordinates`.
///
/// With no adjustments the coordinates come back unchanged.
pub fn subtract(coordinates: Coordinates, adjustments: &[Vec2]) -> Coordinates {
    adjustments
        .iter()
        .fold(coordinates, |acc, adjustment| acc - *adjustment)
}

/// Add each adjustment to `coordinates`.
pub fn add(coordinates: Coordinates, adjustments: &[Vec2]) -> Coordinates {
    adjustments
        .iter()
        .fold(coordinates, |acc, adjustment| acc + *adjustment)
}
