//! Scene trait and in-memory implementation

use super::graphics_object::{GraphicsObject, GraphicsObjectKind};
use super::{DisplayMode, GraphicsObjectId};
use crate::foundation::bounds::BoundingBox;
use crate::foundation::math::Mat4;
use slotmap::SlotMap;

/// Operations the view core needs from a 3D scene
///
/// Unknown handles are ignored by setters and report neutral values from
/// getters.
pub trait GraphicsScene {
    /// Allocate a product renderable owning `geometry`
    fn create_product(&mut self, geometry: BoundingBox) -> GraphicsObjectId;

    /// Allocate an instance drawing the geometry of `product`
    ///
    /// `None` if `product` is unknown.
    fn create_instance(&mut self, product: GraphicsObjectId) -> Option<GraphicsObjectId>;

    /// Add an allocated renderable to the displayed set
    fn insert_object(&mut self, id: GraphicsObjectId);

    /// Remove a renderable from the scene and free it
    ///
    /// Returns `false` for unknown handles.
    fn erase_object(&mut self, id: GraphicsObjectId) -> bool;

    /// World placement of a renderable
    fn object_transform(&self, id: GraphicsObjectId) -> Option<Mat4>;

    /// Change the world placement of a renderable
    fn set_object_transform(&mut self, id: GraphicsObjectId, transform: Mat4);

    /// Whether a renderable is drawn
    fn is_object_visible(&self, id: GraphicsObjectId) -> bool;

    /// Show or hide a renderable; hiding also deselects it
    fn set_object_visible(&mut self, id: GraphicsObjectId, visible: bool);

    /// World bounds of a renderable, void for unknown handles
    fn object_bounding_box(&self, id: GraphicsObjectId) -> BoundingBox;

    /// Display mode of a renderable
    fn display_mode(&self, id: GraphicsObjectId) -> Option<DisplayMode>;

    /// Change the display mode of a renderable
    fn set_display_mode(&mut self, id: GraphicsObjectId, mode: DisplayMode);

    /// Selected renderables, in selection order
    fn selected_objects(&self) -> Vec<GraphicsObjectId>;

    /// Whether a renderable is selected
    fn is_object_selected(&self, id: GraphicsObjectId) -> bool;

    /// Select or deselect a renderable
    fn set_object_selected(&mut self, id: GraphicsObjectId, selected: bool);

    /// Flip the selection of a renderable
    fn toggle_object_selected(&mut self, id: GraphicsObjectId) {
        let selected = self.is_object_selected(id);
        self.set_object_selected(id, !selected);
    }

    /// Request a redraw
    fn redraw(&mut self);
}

/// Scene keeping renderables in a slot map
///
/// Hidden or not yet displayed renderables cannot be selected. Instances
/// report the display mode of their product.
#[derive(Debug, Default)]
pub struct InMemoryScene {
    objects: SlotMap<GraphicsObjectId, GraphicsObject>,
    selection: Vec<GraphicsObjectId>,
    product_allocations: usize,
    redraw_count: usize,
}

impl InMemoryScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored record of a renderable
    pub fn object(&self, id: GraphicsObjectId) -> Option<&GraphicsObject> {
        self.objects.get(id)
    }

    /// Number of renderables currently in the displayed set
    pub fn displayed_count(&self) -> usize {
        self.objects.values().filter(|object| object.displayed).count()
    }

    /// Number of allocated renderables
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of product renderables allocated since creation
    pub fn product_allocations(&self) -> usize {
        self.product_allocations
    }

    /// Number of redraw requests since creation
    pub fn redraw_count(&self) -> usize {
        self.redraw_count
    }

    fn product_record(&self, id: GraphicsObjectId) -> Option<&GraphicsObject> {
        let object = self.objects.get(id)?;
        self.objects.get(object.product_of(id))
    }
}

impl GraphicsScene for InMemoryScene {
    fn create_product(&mut self, geometry: BoundingBox) -> GraphicsObjectId {
        self.product_allocations += 1;
        self.objects.insert(GraphicsObject::product(geometry))
    }

    fn create_instance(&mut self, product: GraphicsObjectId) -> Option<GraphicsObjectId> {
        let target = self.objects.get(product)?;
        // Instances always point at the product, never at another instance
        let product = target.product_of(product);
        Some(self.objects.insert(GraphicsObject::instance(product)))
    }

    fn insert_object(&mut self, id: GraphicsObjectId) {
        if let Some(object) = self.objects.get_mut(id) {
            object.displayed = true;
        }
    }

    fn erase_object(&mut self, id: GraphicsObjectId) -> bool {
        self.selection.retain(|&selected| selected != id);
        self.objects.remove(id).is_some()
    }

    fn object_transform(&self, id: GraphicsObjectId) -> Option<Mat4> {
        self.objects.get(id).map(|object| object.transform)
    }

    fn set_object_transform(&mut self, id: GraphicsObjectId, transform: Mat4) {
        if let Some(object) = self.objects.get_mut(id) {
            object.transform = transform;
        }
    }

    fn is_object_visible(&self, id: GraphicsObjectId) -> bool {
        self.objects.get(id).is_some_and(GraphicsObject::should_render)
    }

    fn set_object_visible(&mut self, id: GraphicsObjectId, visible: bool) {
        if let Some(object) = self.objects.get_mut(id) {
            object.visible = visible;
            if !visible {
                self.selection.retain(|&selected| selected != id);
            }
        }
    }

    fn object_bounding_box(&self, id: GraphicsObjectId) -> BoundingBox {
        let Some(object) = self.objects.get(id) else {
            return BoundingBox::void();
        };
        match self.product_record(id).map(|product| product.kind) {
            Some(GraphicsObjectKind::Product { geometry }) => geometry.transformed(&object.transform),
            _ => BoundingBox::void(),
        }
    }

    fn display_mode(&self, id: GraphicsObjectId) -> Option<DisplayMode> {
        self.product_record(id).map(|product| product.display_mode)
    }

    fn set_display_mode(&mut self, id: GraphicsObjectId, mode: DisplayMode) {
        let Some(product) = self.objects.get(id).map(|object| object.product_of(id)) else {
            return;
        };
        if let Some(object) = self.objects.get_mut(product) {
            object.display_mode = mode;
        }
    }

    fn selected_objects(&self) -> Vec<GraphicsObjectId> {
        self.selection.clone()
    }

    fn is_object_selected(&self, id: GraphicsObjectId) -> bool {
        self.selection.contains(&id)
    }

    fn set_object_selected(&mut self, id: GraphicsObjectId, selected: bool) {
        if !selected {
            self.selection.retain(|&current| current != id);
            return;
        }
        if !self.is_object_visible(id) {
            log::trace!("Refusing to select hidden object {:?}", id);
            return;
        }
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    fn redraw(&mut self) {
        self.redraw_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Transform, Vec3};
    use approx::assert_relative_eq;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_instance_shares_product_geometry() {
        let mut scene = InMemoryScene::new();
        let product = scene.create_product(unit_box());
        let instance = scene.create_instance(product).unwrap();
        scene.set_object_transform(instance, Transform::from_position(Vec3::new(3.0, 0.0, 0.0)).to_matrix());

        let bbox = scene.object_bounding_box(instance);
        assert_relative_eq!(bbox.min, Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(bbox.max, Vec3::new(4.0, 1.0, 1.0), epsilon = 1e-6);
        assert_eq!(scene.product_allocations(), 1);
        assert_eq!(scene.object_count(), 2);
    }

    #[test]
    fn test_instance_of_instance_points_at_product() {
        let mut scene = InMemoryScene::new();
        let product = scene.create_product(unit_box());
        let first = scene.create_instance(product).unwrap();
        let second = scene.create_instance(first).unwrap();
        assert_eq!(
            scene.object(second).map(|object| object.kind),
            Some(GraphicsObjectKind::Instance { product })
        );
    }

    #[test]
    fn test_display_mode_is_shared_with_product() {
        let mut scene = InMemoryScene::new();
        let product = scene.create_product(unit_box());
        let instance = scene.create_instance(product).unwrap();
        scene.set_display_mode(instance, 2);
        assert_eq!(scene.display_mode(product), Some(2));
        assert_eq!(scene.display_mode(instance), Some(2));
    }

    #[test]
    fn test_hidden_objects_cannot_be_selected() {
        let mut scene = InMemoryScene::new();
        let product = scene.create_product(unit_box());
        scene.set_object_selected(product, true);
        assert!(!scene.is_object_selected(product), "not displayed yet");

        scene.insert_object(product);
        scene.set_object_selected(product, true);
        assert!(scene.is_object_selected(product));

        scene.set_object_visible(product, false);
        assert!(scene.selected_objects().is_empty());
        scene.toggle_object_selected(product);
        assert!(!scene.is_object_selected(product));
    }

    #[test]
    fn test_erase_drops_selection() {
        let mut scene = InMemoryScene::new();
        let product = scene.create_product(unit_box());
        scene.insert_object(product);
        scene.set_object_selected(product, true);
        assert!(scene.erase_object(product));
        assert!(!scene.erase_object(product));
        assert!(scene.selected_objects().is_empty());
        assert!(scene.object_bounding_box(product).is_void());
    }
}
