//! Tree items and their flattened, depth-annotated representation.
//!
//! A sortable tree is rendered as a flat list where each row carries its
//! indentation depth. Dragging works on that flat list; the nested form is
//! rebuilt once the drop is committed.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a tree item (and of its droppable container).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Mint a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Errors raised while converting between nested and flattened trees.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Duplicate item id: {0}")]
    DuplicateId(ItemId),
    #[error("Item {item} references unknown parent {parent}")]
    MissingParent { item: ItemId, parent: ItemId },
    #[error("Item {0} is not reachable from a root item")]
    Detached(ItemId),
    #[error("Item {item} jumps from depth {previous} to depth {depth}")]
    DepthJump {
        item: ItemId,
        previous: usize,
        depth: usize,
    },
}

/// A node of the nested tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeItem {
    pub id: ItemId,
    #[serde(default)]
    pub children: Vec<TreeItem>,
    /// Collapsed items hide their children from the flattened view.
    #[serde(default)]
    pub collapsed: bool,
}

impl TreeItem {
    /// Create a leaf item.
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
            collapsed: false,
        }
    }

    /// Create an item with the given children.
    pub fn with_children(id: impl Into<ItemId>, children: Vec<TreeItem>) -> Self {
        Self {
            id: id.into(),
            children,
            collapsed: false,
        }
    }

    /// Get all item IDs in this subtree (including this item).
    pub fn all_ids(&self) -> Vec<ItemId> {
        let mut ids = vec![self.id.clone()];
        for child in &self.children {
            ids.extend(child.all_ids());
        }
        ids
    }

    /// Number of descendants below this item.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// A tree node placed in the flat, visually ordered list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlattenedItem {
    pub id: ItemId,
    pub parent_id: Option<ItemId>,
    /// Indentation level, 0 for root items.
    pub depth: usize,
    /// Position among its siblings.
    pub index: usize,
    #[serde(default)]
    pub collapsed: bool,
}

impl FlattenedItem {
    /// Create a flattened item without sibling bookkeeping, mostly for tests
    /// and hand-built lists.
    pub fn new(id: impl Into<ItemId>, depth: usize) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            depth,
            index: 0,
            collapsed: false,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<ItemId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

/// Flatten a nested tree into pre-order rows.
pub fn flatten_tree(items: &[TreeItem]) -> Vec<FlattenedItem> {
    let mut flattened = Vec::new();
    flatten_into(items, None, 0, &mut flattened);
    flattened
}

fn flatten_into(
    items: &[TreeItem],
    parent_id: Option<&ItemId>,
    depth: usize,
    out: &mut Vec<FlattenedItem>,
) {
    for (index, item) in items.iter().enumerate() {
        out.push(FlattenedItem {
            id: item.id.clone(),
            parent_id: parent_id.cloned(),
            depth,
            index,
            collapsed: item.collapsed,
        });
        flatten_into(&item.children, Some(&item.id), depth + 1, out);
    }
}

/// Rebuild the nested tree from flattened rows using their parent links.
///
/// Sibling order follows the order of `items`.
pub fn build_tree(items: &[FlattenedItem]) -> Result<Vec<TreeItem>, TreeError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(&item.id) {
            return Err(TreeError::DuplicateId(item.id.clone()));
        }
    }

    let mut children_of: HashMap<Option<&ItemId>, Vec<&FlattenedItem>> = HashMap::new();
    for item in items {
        if let Some(parent) = &item.parent_id {
            if !seen.contains(parent) {
                return Err(TreeError::MissingParent {
                    item: item.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
        children_of
            .entry(item.parent_id.as_ref())
            .or_default()
            .push(item);
    }

    let roots = assemble(None, &children_of);

    let built: usize = roots.iter().map(|root| 1 + root.descendant_count()).sum();
    if built != items.len() {
        let reachable: HashSet<ItemId> = roots.iter().flat_map(TreeItem::all_ids).collect();
        if let Some(item) = items.iter().find(|item| !reachable.contains(&item.id)) {
            return Err(TreeError::Detached(item.id.clone()));
        }
    }

    Ok(roots)
}

fn assemble<'a>(
    parent: Option<&'a ItemId>,
    children_of: &HashMap<Option<&'a ItemId>, Vec<&'a FlattenedItem>>,
) -> Vec<TreeItem> {
    children_of
        .get(&parent)
        .map(|children| {
            children
                .iter()
                .map(|&item| TreeItem {
                    id: item.id.clone(),
                    children: assemble(Some(&item.id), children_of),
                    collapsed: item.collapsed,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Drop every descendant of the given ids from the flattened list.
///
/// Used to hide the dragged subtree and the children of collapsed items.
pub fn remove_children_of(items: &[FlattenedItem], ids: &[ItemId]) -> Vec<FlattenedItem> {
    let mut excluded: HashSet<&ItemId> = ids.iter().collect();
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        match &item.parent_id {
            Some(parent) if excluded.contains(parent) => {
                excluded.insert(&item.id);
            }
            _ => kept.push(item.clone()),
        }
    }
    kept
}

/// Find a row by id.
pub fn find_item<'a>(items: &'a [FlattenedItem], id: &ItemId) -> Option<&'a FlattenedItem> {
    items.iter().find(|item| &item.id == id)
}

/// Find a node anywhere in a nested tree.
pub fn find_item_deep<'a>(items: &'a [TreeItem], id: &ItemId) -> Option<&'a TreeItem> {
    for item in items {
        if &item.id == id {
            return Some(item);
        }
        if let Some(found) = find_item_deep(&item.children, id) {
            return Some(found);
        }
    }
    None
}

/// Number of descendants of `id`, or 0 if it is not in the tree.
pub fn child_count(items: &[TreeItem], id: &ItemId) -> usize {
    find_item_deep(items, id).map_or(0, TreeItem::descendant_count)
}

/// Remove a node (with its subtree) from a nested tree.
pub fn remove_item(items: &mut Vec<TreeItem>, id: &ItemId) -> Option<TreeItem> {
    if let Some(position) = items.iter().position(|item| &item.id == id) {
        return Some(items.remove(position));
    }
    items
        .iter_mut()
        .find_map(|item| remove_item(&mut item.children, id))
}

/// Set the collapsed flag of a node. Returns false if the node was not found.
pub fn set_collapsed(items: &mut [TreeItem], id: &ItemId, collapsed: bool) -> bool {
    for item in items.iter_mut() {
        if &item.id == id {
            item.collapsed = collapsed;
            return true;
        }
        if set_collapsed(&mut item.children, id, collapsed) {
            return true;
        }
    }
    false
}

/// Check that depths encode a valid tree: the list starts at depth 0 and no
/// row is more than one level deeper than the row above it.
pub fn validate_depths(items: &[FlattenedItem]) -> Result<(), TreeError> {
    let mut previous: Option<usize> = None;
    for item in items {
        let limit = previous.map_or(0, |depth| depth + 1);
        if item.depth > limit {
            return Err(TreeError::DepthJump {
                item: item.id.clone(),
                previous: previous.unwrap_or(0),
                depth: item.depth,
            });
        }
        previous = Some(item.depth);
    }
    Ok(())
}
