//! Application selection model and scene ↔ tree reconciliation
//!
//! Two selection states exist side by side: the *tree-level* selection held
//! by [`SelectionModel`] (shared by every document of a session) and the
//! highlighted renderables of each scene. [`SelectionBridge`] keeps them in
//! step. Every change is described by a [`SelectionChanged`] event carrying a
//! [`SelectionSync`] flag, so a change that originates in a scene is not fed
//! back to that scene.

use super::synchronizer::GraphicsSynchronizer;
use super::visibility::{TriState, VisibilityCoordinator};
use crate::assembly::AssemblyPayload;
use crate::document::DocumentId;
use crate::scene::GraphicsScene;
use crate::tree::{Tree, TreeNodeId};

/// Unit of tree-level selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApplicationItem {
    /// Owning document
    pub document: DocumentId,
    /// Node in the document's model tree
    pub node: TreeNodeId,
}

impl ApplicationItem {
    /// Create an item
    pub fn new(document: DocumentId, node: TreeNodeId) -> Self {
        Self { document, node }
    }
}

/// Whether a selection change must be mirrored into scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSync {
    /// Mirror the change into the scenes
    Propagate,
    /// The scenes already reflect the change
    Suppress,
}

/// Items added to and removed from the selection model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    /// Newly selected items
    pub added: Vec<ApplicationItem>,
    /// Newly deselected items
    pub removed: Vec<ApplicationItem>,
    /// Mirroring policy
    pub sync: SelectionSync,
}

impl SelectionChanged {
    /// Whether the event touches an item of `document`
    pub fn concerns(&self, document: DocumentId) -> bool {
        self.added
            .iter()
            .chain(&self.removed)
            .any(|item| item.document == document)
    }

    fn merge(first: Option<Self>, second: Option<Self>) -> Option<Self> {
        match (first, second) {
            (Some(mut first), Some(second)) => {
                first.added.extend(second.added);
                first.removed.extend(second.removed);
                Some(first)
            }
            (first, second) => first.or(second),
        }
    }
}

/// Ordered set of selected items, shared by all documents
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    items: Vec<ApplicationItem>,
}

impl SelectionModel {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected items in selection order
    pub fn selected_items(&self) -> &[ApplicationItem] {
        &self.items
    }

    /// Selected items of one document
    pub fn items_of(&self, document: DocumentId) -> impl Iterator<Item = ApplicationItem> + '_ {
        self.items.iter().copied().filter(move |item| item.document == document)
    }

    /// Whether `item` is selected
    pub fn is_selected(&self, item: ApplicationItem) -> bool {
        self.items.contains(&item)
    }

    /// Number of selected items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Select items, ignoring those already selected
    pub fn add(
        &mut self,
        items: impl IntoIterator<Item = ApplicationItem>,
        sync: SelectionSync,
    ) -> Option<SelectionChanged> {
        let mut added = Vec::new();
        for item in items {
            if !self.items.contains(&item) {
                self.items.push(item);
                added.push(item);
            }
        }
        (!added.is_empty()).then(|| SelectionChanged {
            added,
            removed: Vec::new(),
            sync,
        })
    }

    /// Deselect items, ignoring those not selected
    pub fn remove(
        &mut self,
        items: impl IntoIterator<Item = ApplicationItem>,
        sync: SelectionSync,
    ) -> Option<SelectionChanged> {
        let mut removed = Vec::new();
        for item in items {
            if let Some(index) = self.items.iter().position(|&current| current == item) {
                self.items.remove(index);
                removed.push(item);
            }
        }
        (!removed.is_empty()).then(|| SelectionChanged {
            added: Vec::new(),
            removed,
            sync,
        })
    }

    /// Deselect everything
    pub fn clear(&mut self, sync: SelectionSync) -> Option<SelectionChanged> {
        let removed = std::mem::take(&mut self.items);
        (!removed.is_empty()).then(|| SelectionChanged {
            added: Vec::new(),
            removed,
            sync,
        })
    }

    /// Deselect every item of one document
    pub fn clear_document(&mut self, document: DocumentId, sync: SelectionSync) -> Option<SelectionChanged> {
        let items: Vec<_> = self.items_of(document).collect();
        self.remove(items, sync)
    }
}

/// Selection reconciliation for one document
#[derive(Debug, Clone, Copy)]
pub struct SelectionBridge {
    document: DocumentId,
}

impl SelectionBridge {
    /// Create the bridge of `document`
    pub fn new(document: DocumentId) -> Self {
        Self { document }
    }

    /// Document served by this bridge
    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// Pull the scene selection into the model
    ///
    /// Renderables without a node are discarded. Renderables whose node is
    /// hidden are deselected in the scene and never reach the model. Items of
    /// other documents are left untouched.
    pub fn on_scene_selection_changed<P: AssemblyPayload>(
        &self,
        graphics: &GraphicsSynchronizer<P>,
        visibility: &VisibilityCoordinator,
        scene: &mut dyn GraphicsScene,
        model: &mut SelectionModel,
    ) -> Option<SelectionChanged> {
        let mut selected = Vec::new();
        for object in scene.selected_objects() {
            let node = graphics.node_from_graphics_object(object);
            if node == 0 {
                log::trace!("Selected object {:?} has no tree node", object);
                continue;
            }
            if visibility.node_visible_state(node) == TriState::Hidden {
                log::debug!("Rejecting selection of hidden node {}", node);
                scene.set_object_selected(object, false);
                continue;
            }
            let item = ApplicationItem::new(self.document, node);
            if !selected.contains(&item) {
                selected.push(item);
            }
        }

        let removed: Vec<_> = model
            .items_of(self.document)
            .filter(|item| !selected.contains(item))
            .collect();
        let removed = model.remove(removed, SelectionSync::Suppress);
        let added = model.add(selected, SelectionSync::Suppress);
        SelectionChanged::merge(added, removed)
    }

    /// Mirror a model change into the scene
    ///
    /// Renderables shared with items still selected in `model` stay
    /// highlighted. Returns `false` when the event is suppressed or concerns
    /// only other documents.
    pub fn on_tree_selection_changed<P: AssemblyPayload>(
        &self,
        event: &SelectionChanged,
        tree: &Tree<P>,
        graphics: &GraphicsSynchronizer<P>,
        scene: &mut dyn GraphicsScene,
        model: &SelectionModel,
    ) -> bool {
        if event.sync == SelectionSync::Suppress || !event.concerns(self.document) {
            return false;
        }
        let mine = |items: &[ApplicationItem]| -> Vec<TreeNodeId> {
            items
                .iter()
                .filter(|item| item.document == self.document)
                .map(|item| item.node)
                .collect()
        };
        let removed = mine(&event.removed);
        for &node in &removed {
            for object in graphics.graphics_objects_under(tree, node) {
                scene.set_object_selected(object, false);
            }
        }
        if !removed.is_empty() {
            for item in model.items_of(self.document) {
                for object in graphics.graphics_objects_under(tree, item.node) {
                    scene.set_object_selected(object, true);
                }
            }
        }
        for node in mine(&event.added) {
            for object in graphics.graphics_objects_under(tree, node) {
                scene.set_object_selected(object, true);
            }
        }
        scene.redraw();
        true
    }

    /// Tree-level selection of items of this document
    ///
    /// Hidden or unknown nodes are rejected. Items of other documents are
    /// ignored.
    pub fn select_items(
        &self,
        items: impl IntoIterator<Item = ApplicationItem>,
        visibility: &VisibilityCoordinator,
        model: &mut SelectionModel,
    ) -> Option<SelectionChanged> {
        let accepted: Vec<_> = items
            .into_iter()
            .filter(|item| item.document == self.document)
            .filter(|item| {
                let hidden = visibility.node_visible_state(item.node) == TriState::Hidden;
                if hidden {
                    log::debug!("Rejecting selection of hidden node {}", item.node);
                }
                !hidden
            })
            .collect();
        model.add(accepted, SelectionSync::Propagate)
    }

    /// Flip the scene selection of every renderable under an item
    ///
    /// Returns `false` for items of other documents.
    pub fn toggle_item_selected<P: AssemblyPayload>(
        &self,
        item: ApplicationItem,
        tree: &Tree<P>,
        graphics: &GraphicsSynchronizer<P>,
        scene: &mut dyn GraphicsScene,
    ) -> bool {
        if item.document != self.document {
            return false;
        }
        for object in graphics.graphics_objects_under(tree, item.node) {
            scene.toggle_object_selected(object);
        }
        true
    }

    /// Selection side of a visibility change of `node`
    ///
    /// Hiding deselects the node and its selected descendants, in the model
    /// and in the scene. Showing re-highlights the shown renderables when the
    /// node or one of its ancestors is selected.
    pub(super) fn on_node_visibility_changed<P: AssemblyPayload>(
        &self,
        node: TreeNodeId,
        visible: bool,
        tree: &Tree<P>,
        graphics: &GraphicsSynchronizer<P>,
        scene: &mut dyn GraphicsScene,
        model: &mut SelectionModel,
    ) -> Option<SelectionChanged> {
        let objects = graphics.graphics_objects_under(tree, node);
        if !visible {
            for &object in &objects {
                scene.set_object_selected(object, false);
            }
            let hidden: Vec<_> = model
                .items_of(self.document)
                .filter(|item| tree.is_ancestor_or_self(node, item.node))
                .collect();
            return model.remove(hidden, SelectionSync::Suppress);
        }

        let highlighted = model
            .items_of(self.document)
            .any(|item| tree.is_ancestor_or_self(item.node, node));
        if highlighted {
            for &object in &objects {
                scene.set_object_selected(object, true);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(document: u32, node: TreeNodeId) -> ApplicationItem {
        ApplicationItem::new(DocumentId(document), node)
    }

    #[test]
    fn test_add_ignores_duplicates() {
        let mut model = SelectionModel::new();
        let event = model.add([item(1, 2), item(1, 3), item(1, 2)], SelectionSync::Propagate).unwrap();
        assert_eq!(event.added, vec![item(1, 2), item(1, 3)]);
        assert!(model.add([item(1, 3)], SelectionSync::Propagate).is_none());
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_remove_and_clear_document() {
        let mut model = SelectionModel::new();
        model.add([item(1, 2), item(2, 2), item(1, 5)], SelectionSync::Propagate);
        assert!(model.remove([item(1, 9)], SelectionSync::Propagate).is_none());

        let event = model.clear_document(DocumentId(1), SelectionSync::Suppress).unwrap();
        assert_eq!(event.removed, vec![item(1, 2), item(1, 5)]);
        assert_eq!(event.sync, SelectionSync::Suppress);
        assert_eq!(model.selected_items(), &[item(2, 2)]);
    }

    #[test]
    fn test_event_concerns_document() {
        let event = SelectionChanged {
            added: vec![item(1, 2)],
            removed: vec![item(3, 4)],
            sync: SelectionSync::Propagate,
        };
        assert!(event.concerns(DocumentId(1)));
        assert!(event.concerns(DocumentId(3)));
        assert!(!event.concerns(DocumentId(2)));
    }

    #[test]
    fn test_clear_reports_everything() {
        let mut model = SelectionModel::new();
        assert!(model.clear(SelectionSync::Propagate).is_none());
        model.add([item(1, 2), item(2, 3)], SelectionSync::Propagate);
        let event = model.clear(SelectionSync::Propagate).unwrap();
        assert_eq!(event.removed.len(), 2);
        assert!(model.is_empty());
    }
}
