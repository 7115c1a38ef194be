//! Tree traversal iterators
//!
//! All iterators follow the sibling/parent links directly, so they need no
//! auxiliary stack and can be created again at any time to restart a walk.
//! They borrow the tree, which rules out structural edits mid-walk.

use super::store::{Tree, TreeNodeId, NULL_NODE};

/// An iterator over the direct children of a node.
///
/// Created by [`Tree::children`].
#[derive(Debug)]
pub struct Children<'a, T> {
    tree: &'a Tree<T>,
    current: TreeNodeId,
}

impl<'a, T> Children<'a, T> {
    pub(super) fn new(tree: &'a Tree<T>, first: TreeNodeId) -> Self {
        Self { tree, current: first }
    }
}

impl<T> Iterator for Children<'_, T> {
    type Item = TreeNodeId;

    fn next(&mut self) -> Option<TreeNodeId> {
        if self.current == NULL_NODE {
            return None;
        }
        let id = self.current;
        self.current = self.tree.sibling_next(id);
        Some(id)
    }
}

/// Depth-first walk of a subtree, parent before children.
///
/// Created by [`Tree::pre_order`].
#[derive(Debug)]
pub struct PreOrder<'a, T> {
    tree: &'a Tree<T>,
    start: TreeNodeId,
    current: TreeNodeId,
}

impl<'a, T> PreOrder<'a, T> {
    pub(super) fn new(tree: &'a Tree<T>, start: TreeNodeId) -> Self {
        let current = if tree.contains(start) { start } else { NULL_NODE };
        Self { tree, start, current }
    }
}

impl<T> Iterator for PreOrder<'_, T> {
    type Item = TreeNodeId;

    fn next(&mut self) -> Option<TreeNodeId> {
        if self.current == NULL_NODE {
            return None;
        }
        let id = self.current;

        let child = self.tree.child_first(id);
        if child != NULL_NODE {
            self.current = child;
            return Some(id);
        }

        // Climb until a node with an unvisited next sibling, never past `start`
        let mut node = id;
        self.current = loop {
            if node == self.start {
                break NULL_NODE;
            }
            let sibling = self.tree.sibling_next(node);
            if sibling != NULL_NODE {
                break sibling;
            }
            node = self.tree.parent(node);
            if node == NULL_NODE {
                break NULL_NODE;
            }
        };
        Some(id)
    }
}

/// Depth-first walk of a subtree, children before parent.
///
/// Created by [`Tree::post_order`].
#[derive(Debug)]
pub struct PostOrder<'a, T> {
    tree: &'a Tree<T>,
    start: TreeNodeId,
    current: TreeNodeId,
}

impl<'a, T> PostOrder<'a, T> {
    pub(super) fn new(tree: &'a Tree<T>, start: TreeNodeId) -> Self {
        let current = if tree.contains(start) {
            Self::deepest_first(tree, start)
        } else {
            NULL_NODE
        };
        Self { tree, start, current }
    }

    fn deepest_first(tree: &Tree<T>, mut id: TreeNodeId) -> TreeNodeId {
        loop {
            let child = tree.child_first(id);
            if child == NULL_NODE {
                return id;
            }
            id = child;
        }
    }
}

impl<T> Iterator for PostOrder<'_, T> {
    type Item = TreeNodeId;

    fn next(&mut self) -> Option<TreeNodeId> {
        if self.current == NULL_NODE {
            return None;
        }
        let id = self.current;
        self.current = if id == self.start {
            NULL_NODE
        } else {
            match self.tree.sibling_next(id) {
                NULL_NODE => self.tree.parent(id),
                sibling => Self::deepest_first(self.tree, sibling),
            }
        };
        Some(id)
    }
}

/// Every live node of a tree, in arena order.
///
/// Created by [`Tree::unordered`].
#[derive(Debug)]
pub struct Unordered<'a, T> {
    tree: &'a Tree<T>,
    index: usize,
}

impl<'a, T> Unordered<'a, T> {
    pub(super) fn new(tree: &'a Tree<T>) -> Self {
        Self { tree, index: 1 }
    }
}

impl<T> Iterator for Unordered<'_, T> {
    type Item = TreeNodeId;

    fn next(&mut self) -> Option<TreeNodeId> {
        while self.index < self.tree.slot_count() {
            let id = TreeNodeId::try_from(self.index).ok()?;
            self.index += 1;
            if self.tree.contains(id) {
                return Some(id);
            }
        }
        None
    }
}
