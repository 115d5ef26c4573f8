//! DragTree Core Library
//!
//! Keyboard-driven reordering for sortable trees rendered as flat, indented
//! lists: depth projection, collision heuristics and the key handler that
//! turns arrow keys into new drag coordinates.

pub mod collision;
pub mod config;
pub mod coordinates;
pub mod droppable;
pub mod keyboard;
pub mod projection;
pub mod sensor;
pub mod session;
pub mod tree;

pub use collision::{RectEntry, closest_corners};
pub use config::{ConfigError, ResolverConfig, DEFAULT_INDENTATION_WIDTH};
pub use coordinates::{Coordinates, subtract};
pub use droppable::{DroppableContainer, DroppableContainers, MeasuredRects, RectProvider, ScrolledRects};
pub use keyboard::{Direction, KeyPress, KeyboardCode, KeyboardCodes, KeyboardEvent};
pub use projection::{DepthProjector, Projection, ProjectionCalculator, get_projection};
pub use sensor::{DragState, KeyboardCoordinateResolver, SensorContext, SensorSnapshot, SharedSensorContext, make_resolver};
pub use session::{DragFrame, KeyboardDragSession, SessionEvent};
pub use tree::{FlattenedItem, ItemId, TreeError, TreeItem, build_tree, flatten_tree, remove_children_of};
