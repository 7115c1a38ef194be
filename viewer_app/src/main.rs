//! Assembly view demo
//!
//! Builds a small bracket assembly in memory, opens it in a session and
//! walks through visibility, selection, display mode and exploded view
//! operations, logging what the view reports.
//!
//! Usage: `assembly_demo [config.toml|config.ron]`

use assembly_view::foundation::logging;
use assembly_view::prelude::*;

/// Demo failures
#[derive(thiserror::Error, Debug)]
enum DemoError {
    /// Configuration file could not be used
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    /// Product structure could not be built
    #[error("product structure: {0}")]
    Tree(#[from] TreeError),
}

const DOCUMENT: DocumentId = DocumentId(1);

/// Node ids the demo operates on
struct Bracket {
    root: TreeNodeId,
    bolts: Vec<TreeNodeId>,
}

fn build_bracket(document: &mut Document<ProductNode>) -> Result<Bracket, DemoError> {
    let plate_geometry = BoundingBox::new(Vec3::zeros(), Vec3::new(10.0, 10.0, 1.0));
    let bolt_geometry = BoundingBox::new(Vec3::new(-0.3, -0.3, 0.0), Vec3::new(0.3, 0.3, 3.0));
    let bolt = ProductId(3);

    let root = document.new_entity_root(ProductNode::assembly("Bracket", ProductId(1)));
    let plate = document.append_child(root, ProductNode::reference("Plate:1", ProductId(2), Mat4::identity()))?;
    document.append_child(plate, ProductNode::part("Plate", ProductId(2), plate_geometry))?;

    let mut bolts = Vec::new();
    for (i, (x, y)) in [(1.0, 1.0), (9.0, 1.0), (9.0, 9.0), (1.0, 9.0)].into_iter().enumerate() {
        let placement = Transform::from_position(Vec3::new(x, y, 1.0)).to_matrix();
        let reference = document.append_child(root, ProductNode::reference(format!("Bolt:{}", i + 1), bolt, placement))?;
        document.append_child(reference, ProductNode::part("Bolt M6", bolt, bolt_geometry))?;
        bolts.push(reference);
    }
    document.add_entity(root);
    Ok(Bracket { root, bolts })
}

/// Logs every event it sees, never consumes
struct EventLogger;

impl EventHandler for EventLogger {
    fn on_event(&mut self, event: &ViewEvent) -> bool {
        match event {
            ViewEvent::GraphicsBoundingBoxChanged { document, bbox } => {
                log::info!("{:?}: bounding box now {:?} .. {:?}", document, bbox.min, bbox.max);
            }
            ViewEvent::NodesVisibilityChanged { document, change } => {
                log::info!("{:?}: {} nodes changed visibility", document, change.nodes.len());
            }
            ViewEvent::SelectionChanged(change) => {
                log::info!(
                    "Selection: +{} -{} ({:?})",
                    change.added.len(),
                    change.removed.len(),
                    change.sync
                );
            }
        }
        false
    }
}

fn run() -> Result<(), DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => ViewConfig::load_from_file(path)?,
        None => ViewConfig::default(),
    };
    logging::init_with_level(&config.log_level);
    log::info!("Starting assembly view demo");

    let mut document = Document::new(DOCUMENT, "bracket");
    let bracket = build_bracket(&mut document)?;

    let mut session = Session::new(config);
    session.register_handler(EventType::GraphicsBoundingBoxChanged, Box::new(EventLogger));
    session.register_handler(EventType::NodesVisibilityChanged, Box::new(EventLogger));
    session.register_handler(EventType::SelectionChanged, Box::new(EventLogger));
    session.open_document(document, InMemoryScene::new(), DriverTable::with_shape_driver());

    if let Some(view) = session.view(DOCUMENT) {
        log::info!(
            "Mapped {} renderables from {} product allocations",
            view.graphics().object_count(),
            view.scene().product_allocations()
        );
        for &bolt in &bracket.bolts {
            log::info!("  {}", view.display_name(bolt).unwrap_or_default());
        }
    }

    let first_bolt = ApplicationItem::new(DOCUMENT, bracket.bolts[0]);
    let root = ApplicationItem::new(DOCUMENT, bracket.root);
    session.set_node_visible(first_bolt, false);
    log::info!("Bracket is now {:?}", session.node_visible_state(root));

    if !session.select_items(&[first_bolt]) {
        log::info!("Hidden bolt cannot be selected");
    }
    session.set_node_visible(first_bolt, true);
    session.select_items(&[root]);
    session.toggle_item_selected(ApplicationItem::new(DOCUMENT, bracket.bolts[1]));
    log::info!("{} items selected", session.selection().len());
    session.clear_selection();

    if let Some(shape) = session.view(DOCUMENT).and_then(|view| view.drivers().find_by_name("shape")) {
        session.set_active_display_mode(DOCUMENT, shape, ShapeDriver::WIREFRAME);
    }
    session.set_exploding_factor(DOCUMENT, 0.5);
    session.drain_events();

    if let Some(document) = session.close_document(DOCUMENT) {
        log::info!("Closed '{}' with {} entities", document.name(), document.entity_count());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run()?;
    Ok(())
}
