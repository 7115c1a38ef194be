//! Assembly tree → scene synchronisation
//!
//! Mapping an entity walks its subtree and gives every displayable leaf a
//! renderable. Leaves sharing a product identity share one *product*
//! renderable; each placement of it is an *instance* carrying the absolute
//! placement of the leaf. A leaf placed by a reference is linked to the
//! reference node, which is what users see and select.

use crate::assembly::{AssemblyModel, AssemblyPayload};
use crate::foundation::bounds::BoundingBox;
use crate::foundation::math::Mat4;
use crate::scene::{DisplayMode, DriverId, DriverTable, GraphicsObjectId, GraphicsScene};
use crate::tree::{Tree, TreeNodeId, NULL_NODE};
use std::collections::HashMap;

/// Result of [`GraphicsSynchronizer::map_entity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapOutcome {
    /// Entity mapped
    Mapped {
        /// Renderables inserted into the scene
        objects: usize,
        /// Product renderables allocated
        products: usize,
    },
    /// Entity was mapped already, nothing changed
    AlreadyMapped,
    /// Entity id not in the tree
    UnknownEntity,
}

#[derive(Debug, Clone)]
struct MappedObject {
    id: GraphicsObjectId,
    node: TreeNodeId,
    driver: DriverId,
    original: Mat4,
    bbox: BoundingBox,
}

#[derive(Debug)]
struct GraphicsEntity<K> {
    objects: Vec<MappedObject>,
    products: HashMap<K, GraphicsObjectId>,
    bbox: BoundingBox,
}

impl<K> GraphicsEntity<K> {
    fn new() -> Self {
        Self {
            objects: Vec::new(),
            products: HashMap::new(),
            bbox: BoundingBox::void(),
        }
    }
}

/// Renderables of every mapped entity
#[derive(Debug)]
pub struct GraphicsSynchronizer<P: AssemblyPayload> {
    /// Keyed by entity root
    entities: HashMap<TreeNodeId, GraphicsEntity<P::ProductKey>>,
    node_objects: HashMap<TreeNodeId, GraphicsObjectId>,
    object_nodes: HashMap<GraphicsObjectId, TreeNodeId>,
    active_modes: HashMap<DriverId, DisplayMode>,
    exploding_factor: f32,
    bbox: BoundingBox,
}

impl<P: AssemblyPayload> GraphicsSynchronizer<P> {
    /// Create a synchronizer with nothing mapped
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            node_objects: HashMap::new(),
            object_nodes: HashMap::new(),
            active_modes: HashMap::new(),
            exploding_factor: 0.0,
            bbox: BoundingBox::void(),
        }
    }

    /// Build the renderables of an entity
    ///
    /// Leaves no driver supports are skipped. An entity without displayable
    /// leaves maps to zero objects and a void box.
    pub fn map_entity(
        &mut self,
        tree: &Tree<P>,
        entity: TreeNodeId,
        scene: &mut dyn GraphicsScene,
        drivers: &DriverTable<P>,
    ) -> MapOutcome {
        if !tree.contains(entity) {
            log::debug!("map_entity: unknown entity {}", entity);
            return MapOutcome::UnknownEntity;
        }
        if self.entities.contains_key(&entity) {
            log::warn!("Entity {} is already mapped", entity);
            return MapOutcome::AlreadyMapped;
        }

        let mut gfx = GraphicsEntity::new();
        for node in tree.pre_order(entity) {
            if !tree.is_leaf(node) {
                continue;
            }
            let Some(data) = tree.data(node) else {
                continue;
            };
            let Some(driver_id) = drivers.find_driver(data) else {
                log::debug!("No graphics driver for node {} '{}'", node, data.name());
                continue;
            };

            let key = data.product_key();
            let product = if let Some(&product) = gfx.products.get(&key) {
                product
            } else {
                let created = drivers
                    .driver(driver_id)
                    .and_then(|driver| driver.create_product(data, &mut *scene));
                let Some(product) = created else {
                    log::debug!("Driver produced nothing for node {}", node);
                    continue;
                };
                gfx.products.insert(key, product);
                product
            };

            let (object, link) = if node == entity {
                (product, node)
            } else {
                let Some(instance) = scene.create_instance(product) else {
                    continue;
                };
                (instance, AssemblyModel::owning_item(tree, node))
            };
            scene.set_object_transform(object, AssemblyModel::absolute_placement(tree, node));
            log::trace!("Node {} → object {:?}", link, object);
            self.node_objects.insert(link, object);
            self.object_nodes.insert(object, link);
            gfx.objects.push(MappedObject {
                id: object,
                node: link,
                driver: driver_id,
                original: Mat4::identity(),
                bbox: BoundingBox::void(),
            });
        }

        for object in &gfx.objects {
            scene.insert_object(object.id);
            if let Some(mode) = self.active_display_mode(drivers, object.driver) {
                scene.set_display_mode(object.id, mode);
            }
        }
        for object in &mut gfx.objects {
            object.bbox = scene.object_bounding_box(object.id);
            object.original = scene.object_transform(object.id).unwrap_or_else(Mat4::identity);
            gfx.bbox.add(&object.bbox);
        }

        if self.exploding_factor > 0.0 {
            Self::explode(&gfx, self.exploding_factor, scene);
        }
        scene.redraw();

        self.bbox.add(&gfx.bbox);
        let outcome = MapOutcome::Mapped {
            objects: gfx.objects.len(),
            products: gfx.products.len(),
        };
        log::info!(
            "Mapped entity {}: {} objects, {} products",
            entity,
            gfx.objects.len(),
            gfx.products.len()
        );
        self.entities.insert(entity, gfx);
        outcome
    }

    /// Destroy every renderable of an entity
    ///
    /// The global box is recomputed from the remaining entities in every
    /// case. Returns `false` if the entity was not mapped.
    pub fn unmap_entity(&mut self, entity: TreeNodeId, scene: &mut dyn GraphicsScene) -> bool {
        let found = self.entities.remove(&entity);
        if let Some(gfx) = &found {
            for object in &gfx.objects {
                scene.erase_object(object.id);
                self.object_nodes.remove(&object.id);
                if self.node_objects.get(&object.node) == Some(&object.id) {
                    self.node_objects.remove(&object.node);
                }
            }
            // Products displayed through instances only are still allocated
            for &product in gfx.products.values() {
                if !gfx.objects.iter().any(|object| object.id == product) {
                    scene.erase_object(product);
                }
            }
            scene.redraw();
            log::info!("Unmapped entity {}", entity);
        } else {
            log::debug!("unmap_entity: entity {} is not mapped", entity);
        }

        self.bbox = BoundingBox::enclosing(self.entities.values().map(|gfx| &gfx.bbox));
        found.is_some()
    }

    /// Whether an entity is mapped
    pub fn is_mapped(&self, entity: TreeNodeId) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Every renderable mapped in the subtree of `node`
    ///
    /// A subtree may map to several renderables.
    pub fn graphics_objects_under(&self, tree: &Tree<P>, node: TreeNodeId) -> Vec<GraphicsObjectId> {
        if !self.entities.contains_key(&tree.root(node)) {
            return Vec::new();
        }
        let mut objects: Vec<_> = tree
            .pre_order(node)
            .filter_map(|id| self.node_objects.get(&id).copied())
            .collect();
        // A leaf placed by a reference is drawn through the reference's object
        if objects.is_empty() && tree.is_leaf(node) {
            let owner = AssemblyModel::owning_item(tree, node);
            objects.extend(self.node_objects.get(&owner).copied());
        }
        objects
    }

    /// Renderable linked to `node`
    pub fn graphics_object(&self, node: TreeNodeId) -> Option<GraphicsObjectId> {
        self.node_objects.get(&node).copied()
    }

    /// Node linked to a renderable, `0` if none
    pub fn node_from_graphics_object(&self, object: GraphicsObjectId) -> TreeNodeId {
        self.object_nodes.get(&object).copied().unwrap_or(NULL_NODE)
    }

    /// Display mode applied to the renderables of a driver
    ///
    /// The driver default until another mode is activated. `None` for unknown
    /// drivers.
    pub fn active_display_mode(&self, drivers: &DriverTable<P>, driver: DriverId) -> Option<DisplayMode> {
        let default = drivers.driver(driver)?.default_display_mode();
        Some(self.active_modes.get(&driver).copied().unwrap_or(default))
    }

    /// Activate a display mode and apply it to every renderable of `driver`
    ///
    /// Returns `false` for unknown drivers, modes out of range and modes
    /// already active.
    pub fn set_active_display_mode(
        &mut self,
        drivers: &DriverTable<P>,
        driver: DriverId,
        mode: DisplayMode,
        scene: &mut dyn GraphicsScene,
    ) -> bool {
        let Some(descriptor) = drivers.driver(driver) else {
            return false;
        };
        if usize::try_from(mode).map_or(true, |index| index >= descriptor.display_mode_names().len()) {
            log::warn!("Display mode {} out of range for driver '{}'", mode, descriptor.name());
            return false;
        }
        if self.active_display_mode(drivers, driver) == Some(mode) {
            return false;
        }

        self.active_modes.insert(driver, mode);
        for object in self.entities.values().flat_map(|gfx| &gfx.objects) {
            if object.driver == driver {
                scene.set_display_mode(object.id, mode);
            }
        }
        scene.redraw();
        log::debug!("Driver '{}' display mode set to {}", descriptor.name(), mode);
        true
    }

    /// Current exploding factor
    pub fn exploding_factor(&self) -> f32 {
        self.exploding_factor
    }

    /// Move renderables away from their entity centre
    ///
    /// Each renderable is translated by `2·t·(object centre − entity centre)`
    /// from its original placement. `t` is clamped to `[0, 1]` and non-finite
    /// values count as `0`, which restores the original placements.
    pub fn set_exploding_factor(&mut self, t: f32, scene: &mut dyn GraphicsScene) {
        let t = if t.is_finite() { t } else { 0.0 };
        self.exploding_factor = t.clamp(0.0, 1.0);
        for gfx in self.entities.values() {
            Self::explode(gfx, self.exploding_factor, scene);
        }
        scene.redraw();
    }

    fn explode(gfx: &GraphicsEntity<P::ProductKey>, t: f32, scene: &mut dyn GraphicsScene) {
        let Some(entity_center) = gfx.bbox.center() else {
            return;
        };
        for object in &gfx.objects {
            let Some(center) = object.bbox.center() else {
                continue;
            };
            let offset = (center - entity_center) * (2.0 * t);
            scene.set_object_transform(object.id, Mat4::new_translation(&offset) * object.original);
        }
    }

    /// Box enclosing every mapped entity
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Box of one mapped entity
    pub fn entity_bounding_box(&self, entity: TreeNodeId) -> Option<BoundingBox> {
        self.entities.get(&entity).map(|gfx| gfx.bbox)
    }

    /// Number of mapped entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of renderables inserted into the scene for all entities
    pub fn object_count(&self) -> usize {
        self.entities.values().map(|gfx| gfx.objects.len()).sum()
    }

    /// Number of product renderables of an entity
    pub fn product_count(&self, entity: TreeNodeId) -> usize {
        self.entities.get(&entity).map_or(0, |gfx| gfx.products.len())
    }
}

impl<P: AssemblyPayload> Default for GraphicsSynchronizer<P> {
    fn default() -> Self {
        Self::new()
    }
}
