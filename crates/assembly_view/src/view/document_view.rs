//! Per-document view controller
//!
//! A [`DocumentView`] owns one document together with the scene that
//! displays it and keeps the two consistent: it maps entities as the
//! document announces them, tracks node visibility and mirrors selection
//! between the scene and the application [`SelectionModel`].

use super::selection::{ApplicationItem, SelectionBridge, SelectionChanged, SelectionModel, SelectionSync};
use super::synchronizer::{GraphicsSynchronizer, MapOutcome};
use super::visibility::{TriState, VisibilityCoordinator};
use crate::assembly::{AssemblyModel, AssemblyPayload, InstanceNameFormat};
use crate::config::ViewConfig;
use crate::document::{Document, DocumentEvent, DocumentId};
use crate::events::ViewEvent;
use crate::foundation::bounds::BoundingBox;
use crate::scene::{DisplayMode, DriverId, DriverTable, GraphicsObjectId, GraphicsScene};
use crate::tree::TreeNodeId;

/// What a view is built from
#[derive(Debug, Clone, PartialEq)]
pub struct ViewContext {
    /// Document shown by the view
    pub document: DocumentId,
    /// Session settings
    pub config: ViewConfig,
}

/// View of one document in one scene
#[derive(Debug)]
pub struct DocumentView<P: AssemblyPayload, S: GraphicsScene> {
    context: ViewContext,
    document: Document<P>,
    scene: S,
    drivers: DriverTable<P>,
    model: AssemblyModel,
    graphics: GraphicsSynchronizer<P>,
    visibility: VisibilityCoordinator,
    selection: SelectionBridge,
    events: Vec<ViewEvent>,
}

impl<P: AssemblyPayload, S: GraphicsScene> DocumentView<P, S> {
    /// Create a view and map the entities the document already holds
    pub fn new(context: ViewContext, mut document: Document<P>, scene: S, drivers: DriverTable<P>) -> Self {
        debug_assert_eq!(context.document, document.id(), "view context names another document");
        // Entities present now are mapped below, their notifications are stale
        document.take_events();

        let mut view = Self {
            model: AssemblyModel::new(context.config.instance_name_format),
            selection: SelectionBridge::new(context.document),
            context,
            document,
            scene,
            drivers,
            graphics: GraphicsSynchronizer::new(),
            visibility: VisibilityCoordinator::new(),
            events: Vec::new(),
        };
        view.apply_configured_display_modes();

        let entities = view.document.entities().to_vec();
        for entity in entities {
            view.map_entity(entity);
        }
        if view.context.config.exploding_factor > 0.0 {
            view.set_exploding_factor(view.context.config.exploding_factor);
        }
        log::info!(
            "Opened view of document '{}' with {} entities",
            view.document.name(),
            view.graphics.entity_count()
        );
        view
    }

    fn apply_configured_display_modes(&mut self) {
        for (driver_name, mode_name) in &self.context.config.display_modes {
            let Some(driver) = self.drivers.find_by_name(driver_name) else {
                log::warn!("Configured display mode for unknown driver '{}'", driver_name);
                continue;
            };
            let mode = self
                .drivers
                .driver(driver)
                .and_then(|descriptor| descriptor.display_mode_from_name(mode_name));
            match mode {
                Some(mode) => {
                    self.graphics
                        .set_active_display_mode(&self.drivers, driver, mode, &mut self.scene);
                }
                None => log::warn!("Driver '{}' has no display mode '{}'", driver_name, mode_name),
            }
        }
    }

    /// Identity of the viewed document
    pub fn id(&self) -> DocumentId {
        self.context.document
    }

    /// Context the view was built from
    pub fn context(&self) -> &ViewContext {
        &self.context
    }

    /// Viewed document
    pub fn document(&self) -> &Document<P> {
        &self.document
    }

    /// Mutable document; call [`handle_document_events`](Self::handle_document_events)
    /// after announcing or destroying entities
    pub fn document_mut(&mut self) -> &mut Document<P> {
        &mut self.document
    }

    /// Give the document back, dropping the scene
    pub fn into_document(self) -> Document<P> {
        self.document
    }

    /// Scene displaying the document
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable scene, for picking; call
    /// [`on_scene_selection_changed`](Self::on_scene_selection_changed) afterwards
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// Graphics drivers
    pub fn drivers(&self) -> &DriverTable<P> {
        &self.drivers
    }

    /// Renderable bookkeeping
    pub fn graphics(&self) -> &GraphicsSynchronizer<P> {
        &self.graphics
    }

    /// Visibility records
    pub fn visibility(&self) -> &VisibilityCoordinator {
        &self.visibility
    }

    /// Map or unmap entities for every queued document notification
    pub fn handle_document_events(&mut self, selection: &mut SelectionModel) {
        for event in self.document.take_events() {
            match event {
                DocumentEvent::EntityAdded(root) => {
                    if self.map_entity(root) {
                        self.push_bounding_box_changed();
                    }
                }
                DocumentEvent::EntityAboutToBeDestroyed(root) => self.unmap_entity(root, selection),
            }
        }
    }

    /// Announce an entity of the document and map it
    pub fn add_entity(&mut self, root: TreeNodeId, selection: &mut SelectionModel) {
        self.document.add_entity(root);
        self.handle_document_events(selection);
    }

    /// Destroy an entity of the document and unmap it
    pub fn destroy_entity(&mut self, root: TreeNodeId, selection: &mut SelectionModel) {
        self.document.destroy_entity(root);
        self.handle_document_events(selection);
    }

    fn map_entity(&mut self, root: TreeNodeId) -> bool {
        let outcome = self
            .graphics
            .map_entity(self.document.tree(), root, &mut self.scene, &self.drivers);
        if !matches!(outcome, MapOutcome::Mapped { .. }) {
            return false;
        }
        self.visibility.register_entity(self.document.tree(), root);
        true
    }

    fn unmap_entity(&mut self, root: TreeNodeId, selection: &mut SelectionModel) {
        let nodes = self.visibility.entity_nodes(root);
        let stale: Vec<_> = selection
            .items_of(self.id())
            .filter(|item| nodes.contains(&item.node))
            .collect();
        if let Some(event) = selection.remove(stale, SelectionSync::Suppress) {
            self.events.push(ViewEvent::SelectionChanged(event));
        }

        self.graphics.unmap_entity(root, &mut self.scene);
        self.visibility.unregister_entity(root);
        self.push_bounding_box_changed();
    }

    fn push_bounding_box_changed(&mut self) {
        self.events.push(ViewEvent::GraphicsBoundingBoxChanged {
            document: self.id(),
            bbox: self.graphics.bounding_box(),
        });
    }

    /// Visibility of a node, `Hidden` for unknown ids
    pub fn node_visible_state(&self, node: TreeNodeId) -> TriState {
        self.visibility.node_visible_state(node)
    }

    /// Show or hide a node and its subtree
    ///
    /// Returns `false` when nothing changed.
    pub fn set_node_visible(&mut self, node: TreeNodeId, on: bool, selection: &mut SelectionModel) -> bool {
        let change = self.visibility.set_node_visible(
            self.document.tree(),
            &self.graphics,
            &mut self.scene,
            &self.selection,
            selection,
            node,
            on,
        );
        let Some(change) = change else {
            return false;
        };
        let selection_event = change.selection.clone();
        self.events.push(ViewEvent::NodesVisibilityChanged {
            document: self.id(),
            change,
        });
        if let Some(event) = selection_event {
            self.events.push(ViewEvent::SelectionChanged(event));
        }
        true
    }

    /// Select items of this document and highlight them
    ///
    /// Hidden nodes and items of other documents are rejected.
    pub fn select_items(
        &mut self,
        items: impl IntoIterator<Item = ApplicationItem>,
        selection: &mut SelectionModel,
    ) -> Option<SelectionChanged> {
        let event = self.selection.select_items(items, &self.visibility, selection)?;
        self.on_tree_selection_changed(&event, selection);
        self.events.push(ViewEvent::SelectionChanged(event.clone()));
        Some(event)
    }

    /// Mirror a selection model change into the scene
    pub fn on_tree_selection_changed(&mut self, event: &SelectionChanged, selection: &SelectionModel) -> bool {
        self.selection.on_tree_selection_changed(
            event,
            self.document.tree(),
            &self.graphics,
            &mut self.scene,
            selection,
        )
    }

    /// Pull the scene selection into the selection model
    pub fn on_scene_selection_changed(&mut self, selection: &mut SelectionModel) -> Option<SelectionChanged> {
        let event = self.selection.on_scene_selection_changed(
            &self.graphics,
            &self.visibility,
            &mut self.scene,
            selection,
        )?;
        self.events.push(ViewEvent::SelectionChanged(event.clone()));
        Some(event)
    }

    /// Flip the scene selection under an item, then sync the model
    pub fn toggle_item_selected(&mut self, item: ApplicationItem, selection: &mut SelectionModel) {
        let toggled = self.selection.toggle_item_selected(
            item,
            self.document.tree(),
            &self.graphics,
            &mut self.scene,
        );
        if toggled {
            self.scene.redraw();
            self.on_scene_selection_changed(selection);
        }
    }

    /// Renderables mapped under a node
    pub fn graphics_objects_under(&self, node: TreeNodeId) -> Vec<GraphicsObjectId> {
        self.graphics.graphics_objects_under(self.document.tree(), node)
    }

    /// Node linked to a renderable, `0` if none
    pub fn node_from_graphics_object(&self, object: GraphicsObjectId) -> TreeNodeId {
        self.graphics.node_from_graphics_object(object)
    }

    /// Active display mode of a driver
    pub fn active_display_mode(&self, driver: DriverId) -> Option<DisplayMode> {
        self.graphics.active_display_mode(&self.drivers, driver)
    }

    /// Activate a display mode of a driver
    pub fn set_active_display_mode(&mut self, driver: DriverId, mode: DisplayMode) -> bool {
        self.graphics
            .set_active_display_mode(&self.drivers, driver, mode, &mut self.scene)
    }

    /// Current exploding factor
    pub fn exploding_factor(&self) -> f32 {
        self.graphics.exploding_factor()
    }

    /// Spread renderables away from their entity centre
    pub fn set_exploding_factor(&mut self, t: f32) {
        self.graphics.set_exploding_factor(t, &mut self.scene);
    }

    /// Box enclosing every mapped entity
    pub fn bounding_box(&self) -> BoundingBox {
        self.graphics.bounding_box()
    }

    /// Label of a node
    pub fn display_name(&self, node: TreeNodeId) -> Option<String> {
        self.model.display_name(self.document.tree(), node)
    }

    /// Change how reference nodes are labelled
    pub fn set_instance_name_format(&mut self, format: InstanceNameFormat) {
        self.model.set_name_format(format);
        self.context.config.instance_name_format = format;
    }

    /// Drain queued events
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }
}
