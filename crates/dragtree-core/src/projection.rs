//! Depth projection for a dragged tree item.
//!
//! While an item is dragged over the flattened list, its horizontal offset is
//! translated into an indentation depth. The depth is clamped to what the
//! neighbours at the drop position allow.

use crate::tree::{FlattenedItem, ItemId};
use serde::{Deserialize, Serialize};

/// Predicted placement of the active item if dropped at the over position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub depth: usize,
    pub min_depth: usize,
    pub max_depth: usize,
    /// Parent the item would be attached to, `None` for the root level.
    pub parent_id: Option<ItemId>,
}

impl Projection {
    /// Whether the item can still move one level to the left.
    pub fn can_outdent(&self) -> bool {
        self.depth > self.min_depth
    }

    /// Whether the item can still move one level to the right.
    pub fn can_indent(&self) -> bool {
        self.depth < self.max_depth
    }
}

/// Computes where the active item would land.
///
/// Returns `None` when either id is not part of `items`.
pub trait ProjectionCalculator {
    fn projection(
        &self,
        items: &[FlattenedItem],
        active_id: &ItemId,
        over_id: &ItemId,
        drag_offset: f64,
        indentation_width: f64,
    ) -> Option<Projection>;
}

impl<F> ProjectionCalculator for F
where
    F: Fn(&[FlattenedItem], &ItemId, &ItemId, f64, f64) -> Option<Projection>,
{
    fn projection(
        &self,
        items: &[FlattenedItem],
        active_id: &ItemId,
        over_id: &ItemId,
        drag_offset: f64,
        indentation_width: f64,
    ) -> Option<Projection> {
        self(items, active_id, over_id, drag_offset, indentation_width)
    }
}

/// Default projection: the active item is moved to the over position and its
/// depth follows the horizontal offset, bounded by its new neighbours.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthProjector;

impl ProjectionCalculator for DepthProjector {
    fn projection(
        &self,
        items: &[FlattenedItem],
        active_id: &ItemId,
        over_id: &ItemId,
        drag_offset: f64,
        indentation_width: f64,
    ) -> Option<Projection> {
        get_projection(items, active_id, over_id, drag_offset, indentation_width)
    }
}

/// Number of indentation levels covered by a horizontal offset.
///
/// Halves round towards positive infinity.
pub fn drag_depth(offset: f64, indentation_width: f64) -> i64 {
    if !indentation_width.is_finite() || indentation_width <= 0.0 || !offset.is_finite() {
        return 0;
    }
    (offset / indentation_width + 0.5).floor() as i64
}

/// Project the active item onto the over position.
pub fn get_projection(
    items: &[FlattenedItem],
    active_id: &ItemId,
    over_id: &ItemId,
    drag_offset: f64,
    indentation_width: f64,
) -> Option<Projection> {
    let over_index = items.iter().position(|item| &item.id == over_id)?;
    let active_index = items.iter().position(|item| &item.id == active_id)?;
    let active_item = &items[active_index];

    let mut moved: Vec<&FlattenedItem> = items.iter().collect();
    let active = moved.remove(active_index);
    moved.insert(over_index, active);

    let previous = over_index.checked_sub(1).map(|index| moved[index]);
    let next = moved.get(over_index + 1).copied();

    let projected = active_item.depth as i64 + drag_depth(drag_offset, indentation_width);
    let max_depth = previous.map_or(0, |item| item.depth + 1);
    let min_depth = next.map_or(0, |item| item.depth);

    let depth = if projected >= max_depth as i64 {
        max_depth
    } else if projected < min_depth as i64 {
        min_depth
    } else {
        projected as usize
    };

    let parent_id = match previous {
        None => None,
        Some(_) if depth == 0 => None,
        Some(previous) if depth == previous.depth => previous.parent_id.clone(),
        Some(previous) if depth > previous.depth => Some(previous.id.clone()),
        Some(_) => moved[..over_index]
            .iter()
            .rev()
            .find(|item| item.depth == depth)
            .and_then(|item| item.parent_id.clone()),
    };

    Some(Projection {
        depth,
        min_depth,
        max_depth,
        parent_id,
    })
}
