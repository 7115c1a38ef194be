//! Reference resolution, placements and display names

use super::tags::{AssemblyPayload, NodeTags};
use crate::foundation::math::Mat4;
use crate::tree::{Tree, TreeNodeId, NULL_NODE};
use serde::{Deserialize, Serialize};

/// How a reference node is labelled in views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InstanceNameFormat {
    /// Name of the reference itself
    Instance,
    /// Name of the referred product
    #[default]
    Product,
    /// Both, as `instance → product`
    Both,
}

impl InstanceNameFormat {
    /// Label template with `%instance` / `%product` placeholders
    pub fn template(self) -> &'static str {
        match self {
            Self::Instance => "%instance",
            Self::Product => "%product",
            Self::Both => "%instance \u{2192} %product",
        }
    }
}

/// Target of a reference node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTarget<K> {
    /// Node of the referred product
    pub node: TreeNodeId,
    /// Product identity of the referred product
    pub product: K,
}

/// Semantic queries over an assembly tree
#[derive(Debug, Clone, Default)]
pub struct AssemblyModel {
    name_format: InstanceNameFormat,
}

impl AssemblyModel {
    /// Create a model with the given reference labelling
    pub fn new(name_format: InstanceNameFormat) -> Self {
        Self { name_format }
    }

    /// Current reference labelling
    pub fn name_format(&self) -> InstanceNameFormat {
        self.name_format
    }

    /// Change the reference labelling
    pub fn set_name_format(&mut self, format: InstanceNameFormat) {
        self.name_format = format;
    }

    /// Roles of a node, empty for unknown ids
    pub fn classify<P: AssemblyPayload>(tree: &Tree<P>, id: TreeNodeId) -> NodeTags {
        tree.data(id).map_or_else(NodeTags::empty, AssemblyPayload::tags)
    }

    /// Whether a node is a reference
    pub fn is_reference<P: AssemblyPayload>(tree: &Tree<P>, id: TreeNodeId) -> bool {
        tree.data(id).is_some_and(AssemblyPayload::is_reference)
    }

    /// Referred product of a reference node
    ///
    /// `None` when `id` is not a reference or the reference was not expanded.
    pub fn reference_target<P: AssemblyPayload>(
        tree: &Tree<P>,
        id: TreeNodeId,
    ) -> Option<ReferenceTarget<P::ProductKey>> {
        if !Self::is_reference(tree, id) {
            return None;
        }
        let node = tree.child_first(id);
        let product = tree.data(node)?.product_key();
        Some(ReferenceTarget { node, product })
    }

    /// Absolute placement of a node
    ///
    /// Product of the local placements from the entity root down to `id`,
    /// root-most first. Identity for unknown ids.
    pub fn absolute_placement<P: AssemblyPayload>(tree: &Tree<P>, id: TreeNodeId) -> Mat4 {
        let mut placement = Mat4::identity();
        let mut current = id;
        while let Some(data) = tree.data(current) {
            placement = data.location() * placement;
            current = tree.parent(current);
        }
        placement
    }

    /// Node representing `id` in views
    ///
    /// A product expanded below a reference is shown through its reference.
    pub fn owning_item<P: AssemblyPayload>(tree: &Tree<P>, id: TreeNodeId) -> TreeNodeId {
        let parent = tree.parent(id);
        if parent != NULL_NODE && Self::is_reference(tree, parent) {
            parent
        } else {
            id
        }
    }

    /// Label of a node, formatted with the current [`InstanceNameFormat`]
    pub fn display_name<P: AssemblyPayload>(&self, tree: &Tree<P>, id: TreeNodeId) -> Option<String> {
        let data = tree.data(id)?;
        if !data.is_reference() {
            return Some(data.name().trim().to_string());
        }
        let product_name = tree
            .data(tree.child_first(id))
            .map_or("", AssemblyPayload::name)
            .trim();
        Some(
            self.name_format
                .template()
                .replace("%instance", data.name().trim())
                .replace("%product", product_name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ProductId, ProductNode};
    use crate::foundation::bounds::BoundingBox;
    use crate::foundation::math::{translation_of, Transform, Vec3};
    use approx::assert_relative_eq;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))
    }

    fn offset(x: f32) -> Mat4 {
        Transform::from_position(Vec3::new(x, 0.0, 0.0)).to_matrix()
    }

    // A ── Sub(ref, +10) ── SubAsm ── Bolt(ref, +1) ── P
    fn nested() -> (Tree<ProductNode>, TreeNodeId, TreeNodeId, TreeNodeId) {
        let mut tree = Tree::new();
        let a = tree.append_root(ProductNode::assembly("A", ProductId(1)));
        let sub_ref = tree
            .append_child(a, ProductNode::reference("sub#1", ProductId(2), offset(10.0)))
            .unwrap();
        let sub = tree.append_child(sub_ref, ProductNode::assembly("Sub", ProductId(2))).unwrap();
        let bolt_ref = tree
            .append_child(sub, ProductNode::reference("bolt#1", ProductId(3), offset(1.0)))
            .unwrap();
        let bolt = tree.append_child(bolt_ref, ProductNode::part(" Bolt ", ProductId(3), unit_box())).unwrap();
        (tree, a, bolt_ref, bolt)
    }

    #[test]
    fn test_classify_reference_and_component() {
        let (tree, a, bolt_ref, bolt) = nested();
        assert!(AssemblyModel::classify(&tree, a).contains(NodeTags::ASSEMBLY));
        let tags = AssemblyModel::classify(&tree, bolt_ref);
        assert!(tags.contains(NodeTags::REFERENCE | NodeTags::COMPONENT));
        assert!(AssemblyModel::classify(&tree, bolt).contains(NodeTags::SIMPLE));
        assert!(AssemblyModel::classify(&tree, 999).is_empty());
    }

    #[test]
    fn test_reference_target() {
        let (tree, a, bolt_ref, bolt) = nested();
        let target = AssemblyModel::reference_target(&tree, bolt_ref).unwrap();
        assert_eq!(target.node, bolt);
        assert_eq!(target.product, ProductId(3));
        assert!(AssemblyModel::reference_target(&tree, a).is_none());
    }

    #[test]
    fn test_absolute_placement_accumulates_chain() {
        let (tree, a, _, bolt) = nested();
        assert_relative_eq!(translation_of(&AssemblyModel::absolute_placement(&tree, bolt)), Vec3::new(11.0, 0.0, 0.0));
        assert_eq!(AssemblyModel::absolute_placement(&tree, a), Mat4::identity());
    }

    #[test]
    fn test_owning_item_is_reference_parent() {
        let (tree, a, bolt_ref, bolt) = nested();
        assert_eq!(AssemblyModel::owning_item(&tree, bolt), bolt_ref);
        assert_eq!(AssemblyModel::owning_item(&tree, a), a);
    }

    #[test]
    fn test_display_name_formats() {
        let (tree, _, bolt_ref, bolt) = nested();
        let mut model = AssemblyModel::default();
        assert_eq!(model.display_name(&tree, bolt_ref).as_deref(), Some("Bolt"));
        model.set_name_format(InstanceNameFormat::Instance);
        assert_eq!(model.display_name(&tree, bolt_ref).as_deref(), Some("bolt#1"));
        model.set_name_format(InstanceNameFormat::Both);
        assert_eq!(model.display_name(&tree, bolt_ref).as_deref(), Some("bolt#1 \u{2192} Bolt"));
        assert_eq!(model.display_name(&tree, bolt).as_deref(), Some("Bolt"));
    }
}
