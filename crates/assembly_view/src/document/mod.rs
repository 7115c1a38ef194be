//! In-memory document collaborator
//!
//! A [`Document`] owns the model tree of one loaded file. Each root of the
//! tree that has been announced with [`Document::add_entity`] is an *entity*:
//! the unit that views map and unmap. Structural changes are reported as
//! queued [`DocumentEvent`]s that the owning view drains.

mod product_node;

pub use product_node::{ProductId, ProductNode, ProductNodeKind};

use crate::tree::{Tree, TreeError, TreeNodeId};
use std::fmt;

/// Identity of a document within a session
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u32);

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.0)
    }
}

/// Structural change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A complete entity was handed to the document
    EntityAdded(TreeNodeId),
    /// An entity was removed from the tree
    ///
    /// The subtree is gone when the event is drained. Views unmap from the
    /// bookkeeping they captured when the entity was mapped.
    EntityAboutToBeDestroyed(TreeNodeId),
}

/// Document holding a model tree and its ordered entities
#[derive(Debug)]
pub struct Document<P> {
    id: DocumentId,
    name: String,
    tree: Tree<P>,
    entities: Vec<TreeNodeId>,
    pending: Vec<DocumentEvent>,
}

impl<P> Document<P> {
    /// Create an empty document
    pub fn new(id: DocumentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tree: Tree::new(),
            entities: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Document identity
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Document name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the document
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Model tree
    pub fn tree(&self) -> &Tree<P> {
        &self.tree
    }

    /// Mutable model tree, for building entities before announcing them
    pub fn tree_mut(&mut self) -> &mut Tree<P> {
        &mut self.tree
    }

    /// Create the root of a future entity
    ///
    /// The entity is announced only by [`add_entity`](Self::add_entity), once
    /// its subtree is complete.
    pub fn new_entity_root(&mut self, payload: P) -> TreeNodeId {
        self.tree.append_root(payload)
    }

    /// Append a node below `parent` in the model tree
    pub fn append_child(&mut self, parent: TreeNodeId, payload: P) -> Result<TreeNodeId, TreeError> {
        self.tree.append_child(parent, payload)
    }

    /// Announce a completed entity
    ///
    /// Ignored for unknown ids, non-root nodes and already announced entities.
    pub fn add_entity(&mut self, root: TreeNodeId) {
        if !self.tree.is_root(root) || self.entities.contains(&root) {
            log::debug!("Document {:?}: ignoring add_entity({})", self.id, root);
            return;
        }
        self.entities.push(root);
        self.pending.push(DocumentEvent::EntityAdded(root));
    }

    /// Remove an entity and its subtree
    ///
    /// The about-to-be-destroyed notification is queued and the subtree is
    /// removed at once. Views unmap the entity from the bookkeeping captured
    /// at mapping time, not from the tree.
    pub fn destroy_entity(&mut self, root: TreeNodeId) {
        if !self.is_entity(root) {
            return;
        }
        self.pending.push(DocumentEvent::EntityAboutToBeDestroyed(root));
        self.entities.retain(|&id| id != root);
        self.tree.remove(root);
    }

    /// Whether `id` is an announced entity root
    pub fn is_entity(&self, id: TreeNodeId) -> bool {
        self.entities.contains(&id)
    }

    /// Number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Root of the entity at `index`, `0` when out of range
    pub fn entity_tree_node_id(&self, index: usize) -> TreeNodeId {
        self.entities.get(index).copied().unwrap_or(crate::tree::NULL_NODE)
    }

    /// Entity roots in announcement order
    pub fn entities(&self) -> &[TreeNodeId] {
        &self.entities
    }

    /// Drain queued notifications
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.pending)
    }
}
