//! Keyboard drag session.
//!
//! Drives a [`KeyboardCoordinateResolver`] the way a keyboard sensor does:
//! an activator key picks an item up, arrow keys move it, and the end or
//! cancel keys drop it or put it back. Every accepted move writes the
//! horizontal offset back into the shared tree context so the next
//! projection sees it.

use crate::coordinates::Coordinates;
use crate::droppable::{DroppableContainers, RectProvider};
use crate::keyboard::{KeyboardCodes, KeyboardEvent};
use crate::projection::ProjectionCalculator;
use crate::sensor::{DragState, KeyboardCoordinateResolver, SharedSensorContext};
use crate::tree::ItemId;
use kurbo::Rect;

/// Outcome of a key press routed through the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A drag started at the given coordinates.
    Started(Coordinates),
    /// The dragged item moved.
    Moved(Coordinates),
    /// An arrow key produced no movement.
    Unchanged,
    /// The item was dropped at the given coordinates.
    Dropped { active: ItemId, coordinates: Coordinates },
    /// The drag was abandoned; coordinates are back where it started.
    Cancelled { active: ItemId, coordinates: Coordinates },
    /// The key is not handled in the current phase.
    Ignored,
}

/// What the engine measured for the current frame.
#[derive(Debug)]
pub struct DragFrame<'a, N> {
    pub over: Option<ItemId>,
    pub translated_rect: Option<Rect>,
    pub droppable_containers: &'a DroppableContainers<N>,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    active: ItemId,
    initial: Coordinates,
    current: Coordinates,
}

/// A single keyboard drag gesture over a sortable tree.
pub struct KeyboardDragSession<P, R> {
    resolver: KeyboardCoordinateResolver<P, R>,
    context: SharedSensorContext,
    codes: KeyboardCodes,
    drag: Option<ActiveDrag>,
}

impl<P, R> KeyboardDragSession<P, R> {
    pub fn new(resolver: KeyboardCoordinateResolver<P, R>, context: SharedSensorContext) -> Self {
        Self {
            resolver,
            context,
            codes: KeyboardCodes::default(),
            drag: None,
        }
    }

    /// Use custom start/end/cancel keys.
    pub fn with_codes(mut self, codes: KeyboardCodes) -> Self {
        self.codes = codes;
        self
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Id of the item being dragged.
    pub fn active(&self) -> Option<&ItemId> {
        self.drag.as_ref().map(|drag| &drag.active)
    }

    /// Current preview coordinates of the dragged item.
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.drag.as_ref().map(|drag| drag.current)
    }

    /// Handle a key press on an idle item's drag handle.
    pub fn activate<E>(&mut self, event: &mut E, active: ItemId, coordinates: Coordinates) -> SessionEvent
    where
        E: KeyboardEvent + ?Sized,
    {
        if self.drag.is_some() || !self.codes.start.contains(&event.code()) {
            return SessionEvent::Ignored;
        }
        event.prevent_default();
        log::debug!("Keyboard drag of {} started", active);
        self.drag = Some(ActiveDrag {
            active,
            initial: coordinates,
            current: coordinates,
        });
        self.set_offset(0.0);
        SessionEvent::Started(coordinates)
    }

    /// Handle a key press while dragging.
    pub fn handle_key<N, E>(&mut self, event: &mut E, frame: DragFrame<'_, N>) -> SessionEvent
    where
        P: ProjectionCalculator,
        R: RectProvider<N>,
        E: KeyboardEvent + ?Sized,
    {
        let Some(drag) = self.drag.clone() else {
            return SessionEvent::Ignored;
        };
        let code = event.code();

        if self.codes.end.contains(&code) {
            event.prevent_default();
            self.finish();
            log::debug!("Keyboard drag of {} dropped", drag.active);
            return SessionEvent::Dropped {
                active: drag.active,
                coordinates: drag.current,
            };
        }

        if self.codes.cancel.contains(&code) {
            event.prevent_default();
            self.finish();
            log::debug!("Keyboard drag of {} cancelled", drag.active);
            return SessionEvent::Cancelled {
                active: drag.active,
                coordinates: drag.initial,
            };
        }

        if code.direction().is_none() {
            return SessionEvent::Ignored;
        }

        let state = DragState {
            active: drag.active.clone(),
            current_coordinates: drag.current,
            over: frame.over,
            translated_rect: frame.translated_rect,
            droppable_containers: frame.droppable_containers,
        };
        let resolved = match self.context.try_borrow() {
            Ok(context) => self.resolver.resolve(&context, event, &state),
            Err(_) => {
                log::warn!("Sensor context is being updated; skipping key press");
                event.prevent_default();
                None
            }
        };

        match resolved {
            Some(coordinates) => {
                self.set_offset(coordinates.x - drag.initial.x);
                if let Some(drag) = self.drag.as_mut() {
                    drag.current = coordinates;
                }
                SessionEvent::Moved(coordinates)
            }
            None => SessionEvent::Unchanged,
        }
    }

    /// Abort the drag without a key press (e.g. focus lost).
    pub fn cancel(&mut self) -> Option<SessionEvent> {
        let drag = self.drag.take()?;
        self.set_offset(0.0);
        Some(SessionEvent::Cancelled {
            active: drag.active,
            coordinates: drag.initial,
        })
    }

    fn finish(&mut self) {
        self.drag = None;
        self.set_offset(0.0);
    }

    fn set_offset(&self, offset: f64) {
        match self.context.try_borrow_mut() {
            Ok(mut context) => context.current.offset = offset,
            Err(_) => log::warn!("Sensor context is borrowed; offset {} not recorded", offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::droppable::DroppableContainer;
    use crate::keyboard::{KeyPress, KeyboardCode};
    use crate::sensor::SensorContext;
    use crate::tree::{FlattenedItem, TreeItem, flatten_tree, remove_children_of};
    use kurbo::Point;
    use std::cell::RefCell;
    use std::rc::Rc;

    const STEP: f64 = 25.0;

    fn id(value: &str) -> ItemId {
        ItemId::from(value)
    }

    fn row(index: usize) -> Rect {
        let top = index as f64 * 30.0;
        Rect::new(0.0, top, 300.0, top + 30.0)
    }

    fn setup() -> (SharedSensorContext, DroppableContainers<Rect>) {
        let items = flatten_tree(&[
            TreeItem::new("a"),
            TreeItem::with_children("b", vec![TreeItem::new("b1")]),
            TreeItem::new("c"),
        ]);
        // b is dragged, so its child is hidden
        let visible: Vec<FlattenedItem> = remove_children_of(&items, &[id("b")]);
        let containers = visible
            .iter()
            .enumerate()
            .map(|(index, item)| (item.id.clone(), DroppableContainer::new(row(index))))
            .collect();
        (Rc::new(RefCell::new(SensorContext::new(visible))), containers)
    }

    fn frame<'a>(
        over: &str,
        rect: Rect,
        containers: &'a DroppableContainers<Rect>,
    ) -> DragFrame<'a, Rect> {
        DragFrame {
            over: Some(id(over)),
            translated_rect: Some(rect),
            droppable_containers: containers,
        }
    }

    #[test]
    fn test_activation_requires_start_key() {
        let (context, _) = setup();
        let mut session = KeyboardDragSession::new(KeyboardCoordinateResolver::new(STEP), context);

        let mut arrow = KeyPress::new(KeyboardCode::Down);
        assert_eq!(
            session.activate(&mut arrow, id("b"), Point::new(0.0, 30.0)),
            SessionEvent::Ignored
        );
        assert!(!session.is_dragging());

        let mut space = KeyPress::new(KeyboardCode::Space);
        assert_eq!(
            session.activate(&mut space, id("b"), Point::new(0.0, 30.0)),
            SessionEvent::Started(Point::new(0.0, 30.0))
        );
        assert!(space.default_prevented);
        assert_eq!(session.active(), Some(&id("b")));
    }

    #[test]
    fn test_keys_ignored_while_idle() {
        let (context, containers) = setup();
        let mut session = KeyboardDragSession::new(KeyboardCoordinateResolver::new(STEP), context);
        let mut right = KeyPress::new(KeyboardCode::Right);
        assert_eq!(
            session.handle_key(&mut right, frame("b", row(1), &containers)),
            SessionEvent::Ignored
        );
        assert!(!right.default_prevented);
    }

    #[test]
    fn test_right_updates_offset_then_clamps() {
        let (context, containers) = setup();
        let mut session =
            KeyboardDragSession::new(KeyboardCoordinateResolver::new(STEP), Rc::clone(&context));
        let start = Point::new(0.0, 30.0);
        session.activate(&mut KeyPress::new(KeyboardCode::Enter), id("b"), start);

        let mut right = KeyPress::new(KeyboardCode::Right);
        assert_eq!(
            session.handle_key(&mut right, frame("b", row(1), &containers)),
            SessionEvent::Moved(Point::new(STEP, 30.0))
        );
        assert!((context.borrow().current.offset - STEP).abs() < f64::EPSILON);

        // b can nest under a but no deeper
        let mut right = KeyPress::new(KeyboardCode::Right);
        assert_eq!(
            session.handle_key(&mut right, frame("b", row(1), &containers)),
            SessionEvent::Unchanged
        );
        assert_eq!(session.coordinates(), Some(Point::new(STEP, 30.0)));

        let mut left = KeyPress::new(KeyboardCode::Left);
        assert_eq!(
            session.handle_key(&mut left, frame("b", row(1), &containers)),
            SessionEvent::Moved(start)
        );
        assert!(context.borrow().current.offset.abs() < f64::EPSILON);
    }

    #[test]
    fn test_drop_reports_final_coordinates() {
        let (context, containers) = setup();
        let mut session =
            KeyboardDragSession::new(KeyboardCoordinateResolver::new(STEP), Rc::clone(&context));
        session.activate(&mut KeyPress::new(KeyboardCode::Space), id("b"), Point::new(0.0, 30.0));

        let mut down = KeyPress::new(KeyboardCode::Down);
        let moved = session.handle_key(&mut down, frame("b", row(1), &containers));
        assert_eq!(moved, SessionEvent::Moved(Point::new(0.0, 60.0)));

        let mut space = KeyPress::new(KeyboardCode::Space);
        assert_eq!(
            session.handle_key(&mut space, frame("c", row(2), &containers)),
            SessionEvent::Dropped {
                active: id("b"),
                coordinates: Point::new(0.0, 60.0),
            }
        );
        assert!(!session.is_dragging());
        assert!(context.borrow().current.offset.abs() < f64::EPSILON);
    }

    #[test]
    fn test_escape_restores_initial_coordinates() {
        let (context, containers) = setup();
        let mut session = KeyboardDragSession::new(KeyboardCoordinateResolver::new(STEP), context);
        let start = Point::new(0.0, 30.0);
        session.activate(&mut KeyPress::new(KeyboardCode::Space), id("b"), start);
        session.handle_key(
            &mut KeyPress::new(KeyboardCode::Right),
            frame("b", row(1), &containers),
        );

        let mut escape = KeyPress::new(KeyboardCode::Esc);
        assert_eq!(
            session.handle_key(&mut escape, frame("b", row(1), &containers)),
            SessionEvent::Cancelled {
                active: id("b"),
                coordinates: start,
            }
        );
        assert!(escape.default_prevented);
    }

    #[test]
    fn test_programmatic_cancel() {
        let (context, _) = setup();
        let mut session = KeyboardDragSession::new(KeyboardCoordinateResolver::new(STEP), context);
        assert_eq!(session.cancel(), None);
        session.activate(&mut KeyPress::new(KeyboardCode::Space), id("a"), Point::ZERO);
        assert!(matches!(session.cancel(), Some(SessionEvent::Cancelled { .. })));
        assert!(!session.is_dragging());
    }

    #[test]
    fn test_custom_codes() {
        let (context, _) = setup();
        let codes = KeyboardCodes {
            start: vec![KeyboardCode::Enter],
            cancel: vec![KeyboardCode::Esc],
            end: vec![KeyboardCode::Enter],
        };
        let mut session =
            KeyboardDragSession::new(KeyboardCoordinateResolver::new(STEP), context).with_codes(codes);
        assert_eq!(
            session.activate(&mut KeyPress::new(KeyboardCode::Space), id("a"), Point::ZERO),
            SessionEvent::Ignored
        );
    }
}
