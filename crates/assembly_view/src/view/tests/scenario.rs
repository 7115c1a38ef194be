//! Mapping, visibility and bounding box scenarios
//!
//! Shared product instancing, tri-state aggregation and entity lifecycle.

use super::*;
use crate::assembly::InstanceNameFormat;
use crate::foundation::math::translation_of;
use crate::events::ViewEvent;
use crate::scene::{GraphicsScene, ShapeDriver};
use crate::view::TriState;
use approx::assert_relative_eq;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_product_has_one_renderable() {
        let (session, abc) = session_with(ViewConfig::default(), &[1]);
        let view = session.view(DocumentId(1)).unwrap();

        assert_eq!(view.scene().product_allocations(), 1);
        assert_eq!(view.graphics().product_count(abc.a), 1);
        assert_eq!(view.graphics().object_count(), 2);

        let b = view.graphics().graphics_object(abc.b).unwrap();
        let c = view.graphics().graphics_object(abc.c).unwrap();
        assert_ne!(b, c);
        // Leaves under references are represented by the reference
        assert!(view.graphics().graphics_object(abc.pb).is_none());

        let b_x = translation_of(&view.scene().object_transform(b).unwrap()).x;
        let c_x = translation_of(&view.scene().object_transform(c).unwrap()).x;
        assert_relative_eq!(b_x, 0.0);
        assert_relative_eq!(c_x, 5.0);

        let bbox = view.bounding_box();
        assert_relative_eq!(bbox.max, Vec3::new(6.0, 1.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_hiding_one_instance_leaves_other_visible() {
        let (mut session, abc) = session_with(ViewConfig::default(), &[1]);
        assert!(session.set_node_visible(item(1, abc.b), false));

        let view = session.view(DocumentId(1)).unwrap();
        assert_eq!(view.node_visible_state(abc.b), TriState::Hidden);
        assert_eq!(view.node_visible_state(abc.pb), TriState::Hidden);
        assert_eq!(view.node_visible_state(abc.c), TriState::Visible);
        assert_eq!(view.node_visible_state(abc.pc), TriState::Visible);
        assert_eq!(view.node_visible_state(abc.a), TriState::Mixed);

        let b = view.graphics().graphics_object(abc.b).unwrap();
        let c = view.graphics().graphics_object(abc.c).unwrap();
        assert!(!view.scene().is_object_visible(b));
        assert!(view.scene().is_object_visible(c));

        let events = session.drain_events();
        assert_eq!(events.len(), 1);
        let ViewEvent::NodesVisibilityChanged { document, change } = &events[0] else {
            panic!("expected a visibility event, got {:?}", events[0]);
        };
        assert_eq!(*document, DocumentId(1));
        assert_eq!(change.nodes.len(), 3);
        assert_eq!(change.state_of(abc.a), Some(TriState::Mixed));
        assert_eq!(change.state_of(abc.pb), Some(TriState::Hidden));
        assert_eq!(change.state_of(abc.c), None);
    }

    #[test]
    fn test_hiding_all_children_hides_parent() {
        let (mut session, abc) = session_with(ViewConfig::default(), &[1]);
        session.set_node_visible(item(1, abc.b), false);
        session.set_node_visible(item(1, abc.c), false);
        assert_eq!(session.node_visible_state(item(1, abc.a)), TriState::Hidden);

        session.set_node_visible(item(1, abc.pb), true);
        assert_eq!(session.node_visible_state(item(1, abc.b)), TriState::Visible);
        assert_eq!(session.node_visible_state(item(1, abc.a)), TriState::Mixed);
    }

    #[test]
    fn test_hiding_root_cascades() {
        let (mut session, abc) = session_with(ViewConfig::default(), &[1]);
        assert!(session.set_node_visible(item(1, abc.a), false));
        for node in [abc.a, abc.b, abc.c, abc.pb, abc.pc] {
            assert_eq!(session.node_visible_state(item(1, node)), TriState::Hidden);
        }
        let view = session.view(DocumentId(1)).unwrap();
        assert!(view.scene().selected_objects().is_empty());
        assert!(view
            .graphics_objects_under(abc.a)
            .into_iter()
            .all(|object| !view.scene().is_object_visible(object)));

        // Same state and unknown ids are no-ops
        assert!(!session.set_node_visible(item(1, abc.a), false));
        assert!(!session.set_node_visible(item(1, 999), true));
        assert!(!session.set_node_visible(item(7, abc.a), true));
        assert_eq!(session.drain_events().len(), 1);
    }

    #[test]
    fn test_entity_lifecycle() {
        let (mut session, abc) = session_with(ViewConfig::default(), &[1]);
        let view = session.view_mut(DocumentId(1)).unwrap();
        let cube = view
            .document_mut()
            .new_entity_root(ProductNode::part("Cube", ProductId(20), unit_box()).with_location(at(20.0)));
        view.document_mut().add_entity(cube);
        session.handle_document_events();

        let view = session.view(DocumentId(1)).unwrap();
        assert_eq!(view.graphics().entity_count(), 2);
        assert_relative_eq!(view.bounding_box().max.x, 21.0, epsilon = 1e-6);
        assert_eq!(view.visibility().record_count(), 6);

        session.destroy_entity(DocumentId(1), abc.a);
        let view = session.view(DocumentId(1)).unwrap();
        assert_eq!(view.graphics().entity_count(), 1);
        assert_eq!(view.graphics().object_count(), 1);
        assert_eq!(view.scene().object_count(), 1);
        assert_eq!(view.visibility().record_count(), 1);
        assert_eq!(view.node_visible_state(abc.b), TriState::Hidden);
        assert_eq!(Some(view.bounding_box()), view.graphics().entity_bounding_box(cube));

        let boxes = session
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, ViewEvent::GraphicsBoundingBoxChanged { .. }))
            .count();
        assert_eq!(boxes, 2);
    }

    #[test]
    fn test_unmapping_last_entity_voids_box() {
        let (mut session, abc) = session_with(ViewConfig::default(), &[1]);
        session.destroy_entity(DocumentId(1), abc.a);
        let view = session.view(DocumentId(1)).unwrap();
        assert!(view.bounding_box().is_void());
        assert_eq!(view.scene().object_count(), 0);
        assert_eq!(view.visibility().record_count(), 0);
        assert!(view.document().tree().is_empty());
    }

    #[test]
    fn test_configured_view_settings() {
        let mut config = ViewConfig::default();
        config.display_modes.insert("shape".into(), "wireframe".into());
        config.instance_name_format = InstanceNameFormat::Both;
        config.exploding_factor = 0.5;
        let (session, abc) = session_with(config, &[1]);
        let view = session.view(DocumentId(1)).unwrap();

        let shape = view.drivers().find_by_name("shape").unwrap();
        assert_eq!(view.active_display_mode(shape), Some(ShapeDriver::WIREFRAME));
        let b = view.graphics().graphics_object(abc.b).unwrap();
        assert_eq!(view.scene().display_mode(b), Some(ShapeDriver::WIREFRAME));

        assert_eq!(view.display_name(abc.b).as_deref(), Some("B \u{2192} P"));
        assert_eq!(view.display_name(abc.a).as_deref(), Some("A"));

        // Entity centre x = 3, B centre x = 0.5: offset 2 * 0.5 * -2.5
        assert_relative_eq!(view.exploding_factor(), 0.5);
        assert_relative_eq!(translation_of(&view.scene().object_transform(b).unwrap()).x, -2.5, epsilon = 1e-5);
    }

    #[test]
    fn test_display_mode_routed_by_document() {
        let (mut session, _) = session_with(ViewConfig::default(), &[1, 2]);
        let shape = session.view(DocumentId(1)).unwrap().drivers().find_by_name("shape").unwrap();
        assert!(session.set_active_display_mode(DocumentId(1), shape, ShapeDriver::SHADED_WITH_EDGES));
        assert!(!session.set_active_display_mode(DocumentId(3), shape, ShapeDriver::WIREFRAME));

        let first = session.view(DocumentId(1)).unwrap();
        let second = session.view(DocumentId(2)).unwrap();
        assert_eq!(first.active_display_mode(shape), Some(ShapeDriver::SHADED_WITH_EDGES));
        assert_eq!(second.active_display_mode(shape), Some(ShapeDriver::SHADED));
    }

    #[test]
    fn test_open_same_document_twice() {
        let (mut session, _) = session_with(ViewConfig::default(), &[1]);
        let (duplicate, _) = abc_document(1);
        assert!(!session.open_document(duplicate, InMemoryScene::new(), DriverTable::with_shape_driver()));
        assert_eq!(session.document_ids(), vec![DocumentId(1)]);
    }
}
