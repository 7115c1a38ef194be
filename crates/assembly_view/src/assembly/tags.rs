//! Node classification

use crate::foundation::math::Mat4;
use bitflags::bitflags;
use std::fmt::Debug;
use std::hash::Hash;

bitflags! {
    /// Roles a tree node plays in the product structure
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeTags: u32 {
        /// Node groups components
        const ASSEMBLY = 1 << 0;
        /// Node places a shared product
        const REFERENCE = 1 << 1;
        /// Node is a direct component of an assembly
        const COMPONENT = 1 << 2;
        /// Node is a compound of shapes
        const COMPOUND = 1 << 3;
        /// Node is a simple (non-assembly) shape
        const SIMPLE = 1 << 4;
        /// Node is a sub-shape of another shape
        const SUB_SHAPE = 1 << 5;
    }
}

/// Structural view of a tree payload
///
/// Implemented by the document collaborator's payload type. The predicates
/// are independent of each other; [`AssemblyModel::classify`](super::AssemblyModel::classify)
/// gathers them into a [`NodeTags`] set.
pub trait AssemblyPayload {
    /// Product identity: equal keys designate the same underlying shape
    /// definition and therefore share one product renderable
    type ProductKey: Clone + Eq + Hash + Debug;

    /// Product identity of this payload
    fn product_key(&self) -> Self::ProductKey;

    /// Display name of this payload
    fn name(&self) -> &str;

    /// Local placement relative to the parent node
    fn location(&self) -> Mat4 {
        Mat4::identity()
    }

    /// Whether the payload is an assembly
    fn is_assembly(&self) -> bool {
        false
    }

    /// Whether the payload is a reference to a product
    fn is_reference(&self) -> bool {
        false
    }

    /// Whether the payload is a component of an assembly
    fn is_component(&self) -> bool {
        false
    }

    /// Whether the payload is a compound shape
    fn is_compound(&self) -> bool {
        false
    }

    /// Whether the payload is a simple shape
    fn is_simple(&self) -> bool {
        false
    }

    /// Whether the payload is a sub-shape
    fn is_sub_shape(&self) -> bool {
        false
    }

    /// Gather every predicate into a tag set
    fn tags(&self) -> NodeTags {
        let mut tags = NodeTags::empty();
        tags.set(NodeTags::ASSEMBLY, self.is_assembly());
        tags.set(NodeTags::REFERENCE, self.is_reference());
        tags.set(NodeTags::COMPONENT, self.is_component());
        tags.set(NodeTags::COMPOUND, self.is_compound());
        tags.set(NodeTags::SIMPLE, self.is_simple());
        tags.set(NodeTags::SUB_SHAPE, self.is_sub_shape());
        tags
    }
}
