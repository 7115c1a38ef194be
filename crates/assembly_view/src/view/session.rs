//! Top-level controller
//!
//! The [`Session`] owns the application selection model shared by every
//! open document, the view settings and one [`DocumentView`] per document.
//! Operations are routed to the view of the document they name. Selection
//! changes made at tree level are mirrored into every scene.

use super::document_view::{DocumentView, ViewContext};
use super::selection::{ApplicationItem, SelectionChanged, SelectionModel, SelectionSync};
use super::visibility::TriState;
use crate::assembly::AssemblyPayload;
use crate::config::ViewConfig;
use crate::document::{Document, DocumentId};
use crate::events::{EventHandler, EventSystem, EventType, ViewEvent};
use crate::scene::{DisplayMode, DriverId, DriverTable, GraphicsScene};
use crate::tree::TreeNodeId;

/// Open documents and the application selection
#[derive(Debug)]
pub struct Session<P: AssemblyPayload, S: GraphicsScene> {
    config: ViewConfig,
    selection: SelectionModel,
    views: Vec<DocumentView<P, S>>,
    events: EventSystem,
}

impl<P: AssemblyPayload, S: GraphicsScene> Session<P, S> {
    /// Create a session without documents
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            selection: SelectionModel::new(),
            views: Vec::new(),
            events: EventSystem::new(),
        }
    }

    /// Session settings
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Application selection
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Open a view of `document` in `scene`
    ///
    /// Returns `false` if a document with the same id is already open.
    pub fn open_document(&mut self, document: Document<P>, scene: S, drivers: DriverTable<P>) -> bool {
        let id = document.id();
        if self.view(id).is_some() {
            log::warn!("Document {:?} is already open", id);
            return false;
        }
        let context = ViewContext {
            document: id,
            config: self.config.clone(),
        };
        self.views.push(DocumentView::new(context, document, scene, drivers));
        true
    }

    /// Close a document, dropping its scene and its selected items
    pub fn close_document(&mut self, id: DocumentId) -> Option<Document<P>> {
        let index = self.views.iter().position(|view| view.id() == id)?;
        let mut view = self.views.remove(index);
        for event in view.take_events() {
            self.events.send(event);
        }
        if let Some(event) = self.selection.clear_document(id, SelectionSync::Suppress) {
            self.events.send(ViewEvent::SelectionChanged(event));
        }
        log::info!("Closed document {:?}", id);
        Some(view.into_document())
    }

    /// Ids of the open documents, in opening order
    pub fn document_ids(&self) -> Vec<DocumentId> {
        self.views.iter().map(DocumentView::id).collect()
    }

    /// View of a document
    pub fn view(&self, id: DocumentId) -> Option<&DocumentView<P, S>> {
        self.views.iter().find(|view| view.id() == id)
    }

    /// Mutable view of a document
    pub fn view_mut(&mut self, id: DocumentId) -> Option<&mut DocumentView<P, S>> {
        self.views.iter_mut().find(|view| view.id() == id)
    }

    /// Process the queued entity notifications of every document
    pub fn handle_document_events(&mut self) {
        for view in &mut self.views {
            view.handle_document_events(&mut self.selection);
        }
        self.collect_view_events();
    }

    /// Destroy an entity of a document
    pub fn destroy_entity(&mut self, id: DocumentId, root: TreeNodeId) {
        if let Some(view) = self.views.iter_mut().find(|view| view.id() == id) {
            view.destroy_entity(root, &mut self.selection);
        }
        self.collect_view_events();
    }

    /// Visibility of an item, `Hidden` for unknown documents
    pub fn node_visible_state(&self, item: ApplicationItem) -> TriState {
        self.view(item.document)
            .map_or(TriState::Hidden, |view| view.node_visible_state(item.node))
    }

    /// Show or hide an item and its subtree
    pub fn set_node_visible(&mut self, item: ApplicationItem, on: bool) -> bool {
        let Some(view) = self.views.iter_mut().find(|view| view.id() == item.document) else {
            log::debug!("set_node_visible: unknown document {:?}", item.document);
            return false;
        };
        let changed = view.set_node_visible(item.node, on, &mut self.selection);
        self.collect_view_events();
        changed
    }

    /// Select items at tree level
    ///
    /// Hidden nodes and items of unknown documents are rejected. Returns
    /// `true` if the selection changed.
    pub fn select_items(&mut self, items: &[ApplicationItem]) -> bool {
        let mut changed = false;
        for view in &mut self.views {
            let document = view.id();
            let mine = items.iter().copied().filter(|item| item.document == document);
            changed |= view.select_items(mine, &mut self.selection).is_some();
        }
        self.collect_view_events();
        changed
    }

    /// Deselect items at tree level
    pub fn deselect_items(&mut self, items: &[ApplicationItem]) -> bool {
        let event = self.selection.remove(items.iter().copied(), SelectionSync::Propagate);
        self.publish(event)
    }

    /// Deselect everything
    pub fn clear_selection(&mut self) -> bool {
        let event = self.selection.clear(SelectionSync::Propagate);
        self.publish(event)
    }

    /// Flip the scene selection under an item
    pub fn toggle_item_selected(&mut self, item: ApplicationItem) {
        if let Some(view) = self.views.iter_mut().find(|view| view.id() == item.document) {
            view.toggle_item_selected(item, &mut self.selection);
        }
        self.collect_view_events();
    }

    /// Pull the scene selection of a document into the selection model
    ///
    /// Call after picking in the document's scene.
    pub fn notify_scene_selection_changed(&mut self, id: DocumentId) {
        if let Some(view) = self.views.iter_mut().find(|view| view.id() == id) {
            view.on_scene_selection_changed(&mut self.selection);
        }
        self.collect_view_events();
    }

    /// Activate a display mode of a driver in a document
    pub fn set_active_display_mode(&mut self, id: DocumentId, driver: DriverId, mode: DisplayMode) -> bool {
        self.view_mut(id)
            .is_some_and(|view| view.set_active_display_mode(driver, mode))
    }

    /// Change the exploding factor of a document
    pub fn set_exploding_factor(&mut self, id: DocumentId, t: f32) {
        if let Some(view) = self.view_mut(id) {
            view.set_exploding_factor(t);
        }
    }

    /// Register a handler for events delivered by [`drain_events`](Self::drain_events)
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.events.register_handler(event_type, handler);
    }

    /// Deliver pending events to the handlers and return them
    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        self.collect_view_events();
        self.events.dispatch()
    }

    fn publish(&mut self, event: Option<SelectionChanged>) -> bool {
        self.collect_view_events();
        let Some(event) = event else {
            return false;
        };
        for view in &mut self.views {
            view.on_tree_selection_changed(&event, &self.selection);
        }
        self.events.send(ViewEvent::SelectionChanged(event));
        true
    }

    fn collect_view_events(&mut self) {
        for view in &mut self.views {
            for event in view.take_events() {
                self.events.send(event);
            }
        }
    }
}
