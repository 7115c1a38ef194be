//! # Assembly View
//!
//! Keeps an instanced product structure consistent with a scene of
//! renderable objects.
//!
//! ## Features
//!
//! - **Arena Tree**: integer handles, O(1) navigation, stack-free traversals
//! - **Instancing**: one product renderable per shared part, one instance per placement
//! - **Tri-state Visibility**: cascading show/hide with aggregated ancestor states
//! - **Selection Sync**: scene picks and tree selection reconciled without feedback loops
//! - **Display Modes**: per-driver modes and an exploded view
//!
//! ## Quick Start
//!
//! ```rust
//! use assembly_view::prelude::*;
//!
//! let mut document = Document::new(DocumentId(1), "bracket");
//! let root = document.new_entity_root(ProductNode::assembly("Bracket", ProductId(1)));
//! let bolt = document
//!     .append_child(root, ProductNode::reference("Bolt:1", ProductId(2), Mat4::identity()))
//!     .unwrap();
//! let geometry = BoundingBox::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 4.0));
//! document.append_child(bolt, ProductNode::part("Bolt", ProductId(2), geometry)).unwrap();
//! document.add_entity(root);
//!
//! let mut session = Session::new(ViewConfig::default());
//! session.open_document(document, InMemoryScene::new(), DriverTable::with_shape_driver());
//! session.set_node_visible(ApplicationItem::new(DocumentId(1), bolt), false);
//! assert_eq!(
//!     session.node_visible_state(ApplicationItem::new(DocumentId(1), root)),
//!     TriState::Hidden
//! );
//! ```

pub mod assembly;
pub mod config;
pub mod document;
pub mod events;
pub mod foundation;
pub mod scene;
pub mod tree;
pub mod view;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        assembly::{AssemblyModel, AssemblyPayload, InstanceNameFormat, NodeTags},
        config::{Config, ConfigError, ViewConfig},
        document::{Document, DocumentEvent, DocumentId, ProductId, ProductNode, ProductNodeKind},
        events::{EventHandler, EventType, ViewEvent},
        foundation::{
            bounds::BoundingBox,
            math::{Mat4, Transform, Vec3},
        },
        scene::{DriverId, DriverTable, GraphicsObjectId, GraphicsScene, InMemoryScene, ShapeDriver},
        tree::{Tree, TreeError, TreeNodeId},
        view::{ApplicationItem, DocumentView, SelectionModel, Session, TriState, ViewContext},
    };
}
