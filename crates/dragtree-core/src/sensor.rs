//! Keyboard coordinate resolution for a dragged tree item.
//!
//! The drag engine calls the resolver on every key press during a keyboard
//! drag. Left/Right change the item's depth one indentation step at a time,
//! Up/Down jump the preview onto the nearest row in that direction. The
//! resolver never fails: anything it cannot work out leaves the coordinates
//! where they are.

use crate::collision::closest_corners;
use crate::config::ResolverConfig;
use crate::coordinates::{Coordinates, subtract};
use crate::droppable::{DroppableContainers, MeasuredRects, RectProvider, measure_containers};
use crate::keyboard::{Direction, KeyboardEvent};
use crate::projection::{DepthProjector, Projection, ProjectionCalculator};
use crate::tree::{FlattenedItem, ItemId, find_item};
use kurbo::{Point, Rect, Vec2};
use std::cell::RefCell;
use std::rc::Rc;

/// What the tree view currently shows while dragging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Visible rows, with the dragged subtree already collapsed.
    pub items: Vec<FlattenedItem>,
    /// Horizontal offset accumulated since the drag started.
    pub offset: f64,
}

/// Live drag context owned by the tree view and updated as the drag moves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorContext {
    pub current: SensorSnapshot,
}

impl SensorContext {
    pub fn new(items: Vec<FlattenedItem>) -> Self {
        Self {
            current: SensorSnapshot { items, offset: 0.0 },
        }
    }
}

/// Context shared between the tree view and the keyboard sensor.
pub type SharedSensorContext = Rc<RefCell<SensorContext>>;

/// Engine state for one key press.
#[derive(Debug)]
pub struct DragState<'a, N> {
    pub active: ItemId,
    pub current_coordinates: Coordinates,
    /// Droppable currently under the dragged item.
    pub over: Option<ItemId>,
    /// Measured rect of the dragged item, once available.
    pub translated_rect: Option<Rect>,
    pub droppable_containers: &'a DroppableContainers<N>,
}

/// Turns arrow keys into new drag coordinates for a sortable tree.
#[derive(Debug, Clone)]
pub struct KeyboardCoordinateResolver<P = DepthProjector, R = MeasuredRects> {
    step: f64,
    origin: Vec2,
    projection: P,
    rects: R,
}

impl KeyboardCoordinateResolver {
    /// Resolver moving `step` units per indentation level.
    pub fn new(step: f64) -> Self {
        Self {
            step,
            origin: Vec2::ZERO,
            projection: DepthProjector,
            rects: MeasuredRects,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.indentation_width).with_origin(config.coordinate_origin)
    }
}

impl<P, R> KeyboardCoordinateResolver<P, R> {
    /// Replace the projection calculator.
    pub fn with_projection<Q>(self, projection: Q) -> KeyboardCoordinateResolver<Q, R> {
        KeyboardCoordinateResolver {
            step: self.step,
            origin: self.origin,
            projection,
            rects: self.rects,
        }
    }

    /// Replace the rect provider.
    pub fn with_rect_provider<S>(self, rects: S) -> KeyboardCoordinateResolver<P, S> {
        KeyboardCoordinateResolver {
            step: self.step,
            origin: self.origin,
            projection: self.projection,
            rects,
        }
    }

    /// Set the origin subtracted from vertical jump targets.
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Compute new coordinates for a key press, or `None` to keep the current
    /// ones.
    ///
    /// Arrow keys have their default action prevented even when no move
    /// results; other keys are left untouched.
    pub fn resolve<N, E>(
        &self,
        context: &SensorContext,
        event: &mut E,
        state: &DragState<'_, N>,
    ) -> Option<Coordinates>
    where
        P: ProjectionCalculator,
        R: RectProvider<N>,
        E: KeyboardEvent + ?Sized,
    {
        let direction = event.code().direction()?;
        event.prevent_default();

        let Some(translated_rect) = state.translated_rect else {
            log::trace!("Ignoring {:?}: dragged item not measured yet", direction);
            return None;
        };

        let SensorSnapshot { items, offset } = &context.current;

        if direction.is_horizontal() {
            let Some(over) = &state.over else {
                log::trace!("Ignoring {:?}: nothing under the dragged item", direction);
                return None;
            };
            let projection =
                self.projection
                    .projection(items, &state.active, over, *offset, self.step)?;
            return self.change_depth(direction, &projection, state.current_coordinates);
        }

        self.jump(direction, items, translated_rect, state)
    }

    /// Left/Right: shift one step unless the projected depth is at its bound.
    fn change_depth(
        &self,
        direction: Direction,
        projection: &Projection,
        current: Coordinates,
    ) -> Option<Coordinates> {
        let dx = match direction {
            Direction::Left if projection.can_outdent() => -self.step,
            Direction::Right if projection.can_indent() => self.step,
            _ => {
                log::debug!(
                    "Depth {} already at bound [{}, {}] for {:?}",
                    projection.depth,
                    projection.min_depth,
                    projection.max_depth,
                    direction
                );
                return None;
            }
        };
        Some(Point::new(current.x + dx, current.y))
    }

    /// Up/Down: move onto the closest row above or below.
    fn jump<N>(
        &self,
        direction: Direction,
        items: &[FlattenedItem],
        translated_rect: Rect,
        state: &DragState<'_, N>,
    ) -> Option<Coordinates>
    where
        P: ProjectionCalculator,
        R: RectProvider<N>,
    {
        let candidates = measure_containers(state.droppable_containers, &self.rects, |rect| {
            match direction {
                Direction::Down => rect.y0 > translated_rect.y0,
                Direction::Up => rect.y0 < translated_rect.y0,
                Direction::Left | Direction::Right => false,
            }
        });

        let closest_id = closest_corners(&candidates, translated_rect)?;
        if state.over.is_none() {
            return None;
        }

        let new_rect = candidates
            .iter()
            .find(|(id, _)| id == closest_id)
            .map(|(_, rect)| *rect)?;
        let (Some(new_item), Some(active_item)) =
            (find_item(items, closest_id), find_item(items, &state.active))
        else {
            log::debug!("Row {} or active item missing from the tree", closest_id);
            return None;
        };

        let drag_offset = (new_item.depth as f64 - active_item.depth as f64) * self.step;
        let projection =
            self.projection
                .projection(items, &state.active, closest_id, drag_offset, self.step)?;

        let target = Point::new(
            new_rect.x0 + projection.depth as f64 * self.step,
            new_rect.y0 - (translated_rect.height() - new_rect.height()),
        );
        log::trace!(
            "Jumping {:?} onto {} at depth {}",
            direction,
            closest_id,
            projection.depth
        );
        Some(subtract(target, &[self.origin]))
    }
}

/// Build a key handler bound to a shared tree context.
///
/// The context is borrowed on every call, so updates made by the tree view
/// between key presses are always seen.
pub fn make_resolver(
    context: SharedSensorContext,
    step: f64,
) -> impl Fn(&mut dyn KeyboardEvent, &DragState<'_, Rect>) -> Option<Coordinates> {
    let resolver = KeyboardCoordinateResolver::new(step);
    move |event: &mut dyn KeyboardEvent, state: &DragState<'_, Rect>| {
        let Ok(context) = context.try_borrow() else {
            log::warn!("Sensor context is being updated; skipping key press");
            return None;
        };
        resolver.resolve(&context, event, state)
    }
}
