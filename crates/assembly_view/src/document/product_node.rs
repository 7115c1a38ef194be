//! Reference payload type for in-memory product structures

use crate::assembly::AssemblyPayload;
use crate::foundation::bounds::BoundingBox;
use crate::foundation::math::Mat4;
use std::fmt;

/// Identity of a shared product definition
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(pub u32);

impl fmt::Debug for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProductId({})", self.0)
    }
}

/// Structural kind of a [`ProductNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductNodeKind {
    /// Groups components
    Assembly,
    /// Places a shared product, expanded as its single child
    Reference,
    /// Simple solid shape
    Part,
    /// Compound of shapes
    Compound,
    /// Face, edge or other sub-shape of a part
    SubShape,
}

/// Payload of one node of an in-memory product structure
///
/// `geometry` is the opaque geometry summary handed to the scene: only its
/// local bounds are known to this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductNode {
    /// Display name
    pub name: String,
    /// Structural kind
    pub kind: ProductNodeKind,
    /// Product identity; for references, the referred product
    pub product: ProductId,
    /// Placement relative to the parent node
    pub location: Mat4,
    /// Local geometry bounds, `None` for nodes without displayable geometry
    pub geometry: Option<BoundingBox>,
}

impl ProductNode {
    /// Assembly node
    pub fn assembly(name: impl Into<String>, product: ProductId) -> Self {
        Self {
            name: name.into(),
            kind: ProductNodeKind::Assembly,
            product,
            location: Mat4::identity(),
            geometry: None,
        }
    }

    /// Reference placing `product` at `location`
    pub fn reference(name: impl Into<String>, product: ProductId, location: Mat4) -> Self {
        Self {
            name: name.into(),
            kind: ProductNodeKind::Reference,
            product,
            location,
            geometry: None,
        }
    }

    /// Simple part with geometry
    pub fn part(name: impl Into<String>, product: ProductId, geometry: BoundingBox) -> Self {
        Self {
            name: name.into(),
            kind: ProductNodeKind::Part,
            product,
            location: Mat4::identity(),
            geometry: Some(geometry),
        }
    }

    /// Compound shape with geometry
    pub fn compound(name: impl Into<String>, product: ProductId, geometry: BoundingBox) -> Self {
        Self {
            kind: ProductNodeKind::Compound,
            ..Self::part(name, product, geometry)
        }
    }

    /// Sub-shape without own displayable geometry
    pub fn sub_shape(name: impl Into<String>, product: ProductId) -> Self {
        Self {
            name: name.into(),
            kind: ProductNodeKind::SubShape,
            product,
            location: Mat4::identity(),
            geometry: None,
        }
    }

    /// Override the local placement
    pub fn with_location(mut self, location: Mat4) -> Self {
        self.location = location;
        self
    }
}

impl AssemblyPayload for ProductNode {
    type ProductKey = ProductId;

    fn product_key(&self) -> ProductId {
        self.product
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Mat4 {
        self.location
    }

    fn is_assembly(&self) -> bool {
        self.kind == ProductNodeKind::Assembly
    }

    fn is_reference(&self) -> bool {
        self.kind == ProductNodeKind::Reference
    }

    fn is_component(&self) -> bool {
        // References are the components of their parent assembly
        self.kind == ProductNodeKind::Reference
    }

    fn is_compound(&self) -> bool {
        self.kind == ProductNodeKind::Compound
    }

    fn is_simple(&self) -> bool {
        matches!(self.kind, ProductNodeKind::Part | ProductNodeKind::Compound)
    }

    fn is_sub_shape(&self) -> bool {
        self.kind == ProductNodeKind::SubShape
    }
}
