//! Registered drop targets and how their rects are measured.

use crate::collision::RectEntry;
use crate::tree::ItemId;
use indexmap::IndexMap;
use kurbo::{Rect, Vec2};

/// A drop target tracked by the drag engine.
///
/// `node` is whatever handle the host uses for the rendered row; `None`
/// means the row is not mounted and cannot be measured.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppableContainer<N> {
    pub disabled: bool,
    pub node: Option<N>,
}

impl<N> DroppableContainer<N> {
    /// An enabled container bound to a live node.
    pub fn new(node: N) -> Self {
        Self {
            disabled: false,
            node: Some(node),
        }
    }

    /// An enabled container whose node is not mounted.
    pub fn unmounted() -> Self {
        Self {
            disabled: false,
            node: None,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// The node, if this container can take part in collision detection.
    pub fn measurable_node(&self) -> Option<&N> {
        if self.disabled {
            return None;
        }
        self.node.as_ref()
    }
}

/// Drop targets keyed by id, iterated in registration order.
pub type DroppableContainers<N> = IndexMap<ItemId, DroppableContainer<N>>;

/// Measures the current on-screen rect of a node.
pub trait RectProvider<N> {
    fn view_rect(&self, node: &N) -> Rect;
}

impl<N, F> RectProvider<N> for F
where
    F: Fn(&N) -> Rect,
{
    fn view_rect(&self, node: &N) -> Rect {
        self(node)
    }
}

/// Provider for hosts that already store the measured rect as the node.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasuredRects;

impl RectProvider<Rect> for MeasuredRects {
    fn view_rect(&self, node: &Rect) -> Rect {
        *node
    }
}

/// Measured rects shifted by the scroll offset of the list viewport.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrolledRects {
    pub scroll: Vec2,
}

impl ScrolledRects {
    pub fn new(scroll: Vec2) -> Self {
        Self { scroll }
    }
}

impl RectProvider<Rect> for ScrolledRects {
    fn view_rect(&self, node: &Rect) -> Rect {
        *node - self.scroll
    }
}

/// Measure every enabled, mounted container whose rect passes `keep`.
pub fn measure_containers<N, R, F>(
    containers: &DroppableContainers<N>,
    rects: &R,
    mut keep: F,
) -> Vec<RectEntry>
where
    R: RectProvider<N> + ?Sized,
    F: FnMut(&Rect) -> bool,
{
    containers
        .iter()
        .filter_map(|(id, container)| {
            let node = container.measurable_node()?;
            let rect = rects.view_rect(node);
            keep(&rect).then(|| (id.clone(), rect))
        })
        .collect()
}
