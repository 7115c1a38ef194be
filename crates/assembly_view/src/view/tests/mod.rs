//! Scenario tests driving whole sessions

mod scenario;

use crate::config::ViewConfig;
use crate::document::{Document, DocumentId, ProductId, ProductNode};
use crate::foundation::bounds::BoundingBox;
use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::scene::{DriverTable, InMemoryScene};
use crate::tree::TreeNodeId;
use crate::view::{ApplicationItem, Session};

/// Node ids of the A/B/C fixture
///
/// ```text
/// A (assembly)
/// ├─ B (reference, x = 0) ── P
/// └─ C (reference, x = 5) ── P
/// ```
#[derive(Debug, Clone, Copy)]
struct Abc {
    a: TreeNodeId,
    b: TreeNodeId,
    c: TreeNodeId,
    pb: TreeNodeId,
    pc: TreeNodeId,
}

fn unit_box() -> BoundingBox {
    BoundingBox::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))
}

fn at(x: f32) -> Mat4 {
    Transform::from_position(Vec3::new(x, 0.0, 0.0)).to_matrix()
}

fn build_abc(document: &mut Document<ProductNode>) -> Abc {
    let p = ProductId(10);
    let a = document.new_entity_root(ProductNode::assembly("A", ProductId(1)));
    let b = document.append_child(a, ProductNode::reference("B", p, at(0.0))).unwrap();
    let pb = document.append_child(b, ProductNode::part("P", p, unit_box())).unwrap();
    let c = document.append_child(a, ProductNode::reference("C", p, at(5.0))).unwrap();
    let pc = document.append_child(c, ProductNode::part("P", p, unit_box())).unwrap();
    Abc { a, b, c, pb, pc }
}

fn abc_document(id: u32) -> (Document<ProductNode>, Abc) {
    let mut document = Document::new(DocumentId(id), format!("doc{}", id));
    let abc = build_abc(&mut document);
    document.add_entity(abc.a);
    (document, abc)
}

fn session_with(config: ViewConfig, documents: &[u32]) -> (Session<ProductNode, InMemoryScene>, Abc) {
    let mut session = Session::new(config);
    let mut ids = None;
    for &id in documents {
        let (document, abc) = abc_document(id);
        assert!(session.open_document(document, InMemoryScene::new(), DriverTable::with_shape_driver()));
        ids = Some(abc);
    }
    (session, ids.expect("at least one document"))
}

fn item(document: u32, node: TreeNodeId) -> ApplicationItem {
    ApplicationItem::new(DocumentId(document), node)
}
