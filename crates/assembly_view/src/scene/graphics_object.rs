//! Renderable record stored by [`InMemoryScene`](super::InMemoryScene)

use super::{DisplayMode, GraphicsObjectId};
use crate::foundation::bounds::BoundingBox;
use crate::foundation::math::Mat4;

/// What a renderable draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphicsObjectKind {
    /// Owns geometry, given by its local bounds
    Product {
        /// Local geometry bounds
        geometry: BoundingBox,
    },
    /// Draws the geometry of another renderable with its own placement
    Instance {
        /// Shared product renderable
        product: GraphicsObjectId,
    },
}

/// Per-renderable scene state
///
/// Instances share geometry and display mode with their product but own
/// placement, visibility and selection.
#[derive(Debug, Clone)]
pub struct GraphicsObject {
    /// Product or instance
    pub kind: GraphicsObjectKind,
    /// World placement
    pub transform: Mat4,
    /// Whether the object is drawn
    pub visible: bool,
    /// Display mode, meaningful for products only
    pub display_mode: DisplayMode,
    /// Whether the object was inserted into the displayed set
    pub displayed: bool,
}

impl GraphicsObject {
    /// New product renderable, not yet displayed
    pub fn product(geometry: BoundingBox) -> Self {
        Self {
            kind: GraphicsObjectKind::Product { geometry },
            transform: Mat4::identity(),
            visible: true,
            display_mode: 0,
            displayed: false,
        }
    }

    /// New instance of `product`, not yet displayed
    pub fn instance(product: GraphicsObjectId) -> Self {
        Self {
            kind: GraphicsObjectKind::Instance { product },
            transform: Mat4::identity(),
            visible: true,
            display_mode: 0,
            displayed: false,
        }
    }

    /// Product this object draws, itself for products
    pub fn product_of(&self, own_id: GraphicsObjectId) -> GraphicsObjectId {
        match self.kind {
            GraphicsObjectKind::Product { .. } => own_id,
            GraphicsObjectKind::Instance { product } => product,
        }
    }

    /// Check if this object should be drawn
    pub fn should_render(&self) -> bool {
        self.displayed && self.visible
    }
}
