//! Arena storage for [`Tree`]

use super::traverse::{Children, PostOrder, PreOrder, Unordered};
use thiserror::Error;

/// Integer handle of a tree node, `0` means "no node"
pub type TreeNodeId = u32;

/// The null node handle
pub const NULL_NODE: TreeNodeId = 0;

/// Errors reported by tree mutations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The parent handle does not designate a live node
    #[error("Unknown parent node: {0}")]
    UnknownParent(TreeNodeId),
}

#[derive(Debug, Clone)]
struct Node<T> {
    parent: TreeNodeId,
    first_child: TreeNodeId,
    last_child: TreeNodeId,
    prev_sibling: TreeNodeId,
    next_sibling: TreeNodeId,
    data: T,
}

/// Arena-indexed ordered tree (forest) of payloads `T`
#[derive(Debug, Clone)]
pub struct Tree<T> {
    /// Slot 0 is never occupied so that id 0 stays null
    slots: Vec<Option<Node<T>>>,
    roots: Vec<TreeNodeId>,
    live: usize,
}

impl<T> Tree<T> {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self {
            slots: vec![None],
            roots: Vec::new(),
            live: 0,
        }
    }

    /// Append a node as the last child of `parent`
    ///
    /// `parent == 0` creates a new root.
    pub fn append_child(&mut self, parent: TreeNodeId, data: T) -> Result<TreeNodeId, TreeError> {
        if parent != NULL_NODE && !self.contains(parent) {
            return Err(TreeError::UnknownParent(parent));
        }

        let prev_sibling = if parent == NULL_NODE {
            NULL_NODE
        } else {
            self.child_last(parent)
        };
        let id = self.push_node(parent, prev_sibling, data);

        if parent == NULL_NODE {
            self.roots.push(id);
        } else {
            if let Some(prev) = self.node_mut(prev_sibling) {
                prev.next_sibling = id;
            }
            if let Some(p) = self.node_mut(parent) {
                if p.first_child == NULL_NODE {
                    p.first_child = id;
                }
                p.last_child = id;
            }
        }

        Ok(id)
    }

    /// Append a new root node
    pub fn append_root(&mut self, data: T) -> TreeNodeId {
        let id = self.push_node(NULL_NODE, NULL_NODE, data);
        self.roots.push(id);
        id
    }

    /// Destroy `id` and its entire subtree
    ///
    /// Unknown ids are ignored.
    pub fn remove(&mut self, id: TreeNodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);

        // Unlink from siblings / parent / root list
        if let Some(p) = self.node_mut(prev) {
            p.next_sibling = next;
        }
        if let Some(n) = self.node_mut(next) {
            n.prev_sibling = prev;
        }
        if parent == NULL_NODE {
            self.roots.retain(|&root| root != id);
        } else if let Some(p) = self.node_mut(parent) {
            if p.first_child == id {
                p.first_child = next;
            }
            if p.last_child == id {
                p.last_child = prev;
            }
        }

        // Collect first: the traversal borrows the arena
        let doomed: Vec<TreeNodeId> = self.post_order(id).collect();
        for doomed_id in doomed {
            self.slots[doomed_id as usize] = None;
            self.live -= 1;
        }
    }

    /// Remove every node
    ///
    /// Ids handed out before the clear are never reused.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.roots.clear();
        self.live = 0;
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the tree holds no node
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether `id` designates a live node
    pub fn contains(&self, id: TreeNodeId) -> bool {
        self.node(id).is_some()
    }

    /// Root ids in insertion order
    pub fn roots(&self) -> &[TreeNodeId] {
        &self.roots
    }

    /// Payload of a node
    pub fn data(&self, id: TreeNodeId) -> Option<&T> {
        self.node(id).map(|n| &n.data)
    }

    /// Mutable payload of a node
    pub fn data_mut(&mut self, id: TreeNodeId) -> Option<&mut T> {
        self.node_mut(id).map(|n| &mut n.data)
    }

    /// Parent of a node, `0` for roots and unknown ids
    pub fn parent(&self, id: TreeNodeId) -> TreeNodeId {
        self.node(id).map_or(NULL_NODE, |n| n.parent)
    }

    /// First child of a node
    pub fn child_first(&self, id: TreeNodeId) -> TreeNodeId {
        self.node(id).map_or(NULL_NODE, |n| n.first_child)
    }

    /// Last child of a node
    pub fn child_last(&self, id: TreeNodeId) -> TreeNodeId {
        self.node(id).map_or(NULL_NODE, |n| n.last_child)
    }

    /// Next sibling of a node
    pub fn sibling_next(&self, id: TreeNodeId) -> TreeNodeId {
        self.node(id).map_or(NULL_NODE, |n| n.next_sibling)
    }

    /// Previous sibling of a node
    pub fn sibling_previous(&self, id: TreeNodeId) -> TreeNodeId {
        self.node(id).map_or(NULL_NODE, |n| n.prev_sibling)
    }

    /// Root of the tree containing `id`, `0` for unknown ids
    pub fn root(&self, id: TreeNodeId) -> TreeNodeId {
        if !self.contains(id) {
            return NULL_NODE;
        }
        let mut current = id;
        let mut steps = 0usize;
        loop {
            let parent = self.parent(current);
            if parent == NULL_NODE {
                return current;
            }
            current = parent;
            steps += 1;
            debug_assert!(steps <= self.live, "cycle detected in tree");
        }
    }

    /// Whether `id` is a live root
    pub fn is_root(&self, id: TreeNodeId) -> bool {
        self.node(id).is_some_and(|n| n.parent == NULL_NODE)
    }

    /// Whether `id` is a live node without children
    pub fn is_leaf(&self, id: TreeNodeId) -> bool {
        self.node(id).is_some_and(|n| n.first_child == NULL_NODE)
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: TreeNodeId, id: TreeNodeId) -> bool {
        let mut current = id;
        while current != NULL_NODE {
            if current == ancestor {
                return true;
            }
            current = self.parent(current);
        }
        false
    }

    /// Iterate the direct children of a node
    pub fn children(&self, id: TreeNodeId) -> Children<'_, T> {
        Children::new(self, self.child_first(id))
    }

    /// Iterate the subtree of `start`, parents before children
    pub fn pre_order(&self, start: TreeNodeId) -> PreOrder<'_, T> {
        PreOrder::new(self, start)
    }

    /// Iterate the subtree of `start`, children before parents
    pub fn post_order(&self, start: TreeNodeId) -> PostOrder<'_, T> {
        PostOrder::new(self, start)
    }

    /// Iterate every live node once, in no particular order
    pub fn unordered(&self) -> Unordered<'_, T> {
        Unordered::new(self)
    }

    fn push_node(&mut self, parent: TreeNodeId, prev_sibling: TreeNodeId, data: T) -> TreeNodeId {
        let id = TreeNodeId::try_from(self.slots.len()).expect("tree node ids exhausted");
        self.slots.push(Some(Node {
            parent,
            first_child: NULL_NODE,
            last_child: NULL_NODE,
            prev_sibling,
            next_sibling: NULL_NODE,
            data,
        }));
        self.live += 1;
        id
    }

    /// Capacity of the id space handed out so far, including tombstones
    pub(super) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn node(&self, id: TreeNodeId) -> Option<&Node<T>> {
        self.slots.get(id as usize)?.as_ref()
    }

    fn node_mut(&mut self, id: TreeNodeId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id as usize)?.as_mut()
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}
