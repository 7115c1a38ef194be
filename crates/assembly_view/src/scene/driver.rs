//! Payload → renderable factories

use super::{DisplayMode, GraphicsObjectId, GraphicsScene};
use crate::document::ProductNode;
use std::fmt;

/// Index of a driver in its [`DriverTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DriverId(pub usize);

/// Creates product renderables for the payloads it supports
///
/// Display modes are indices into [`display_mode_names`](Self::display_mode_names).
pub trait GraphicsObjectDriver<P> {
    /// Unique driver name
    fn name(&self) -> &str;

    /// Whether this driver can display `payload`
    fn supports(&self, payload: &P) -> bool;

    /// Allocate the product renderable of `payload` in `scene`
    ///
    /// `None` when the payload has nothing to display.
    fn create_product(&self, payload: &P, scene: &mut dyn GraphicsScene) -> Option<GraphicsObjectId>;

    /// Names of the display modes, indexed by [`DisplayMode`]
    fn display_mode_names(&self) -> &[&'static str];

    /// Mode applied until another one is activated
    fn default_display_mode(&self) -> DisplayMode;

    /// Mode with the given name
    fn display_mode_from_name(&self, name: &str) -> Option<DisplayMode> {
        self.display_mode_names()
            .iter()
            .position(|candidate| *candidate == name)
            .and_then(|index| DisplayMode::try_from(index).ok())
    }
}

/// Ordered set of drivers, queried first to last
pub struct DriverTable<P> {
    drivers: Vec<Box<dyn GraphicsObjectDriver<P>>>,
}

impl<P> DriverTable<P> {
    /// Create an empty table
    pub fn new() -> Self {
        Self { drivers: Vec::new() }
    }

    /// Append a driver
    pub fn register(&mut self, driver: Box<dyn GraphicsObjectDriver<P>>) -> DriverId {
        log::debug!("Registering graphics driver '{}'", driver.name());
        self.drivers.push(driver);
        DriverId(self.drivers.len() - 1)
    }

    /// First driver supporting `payload`
    pub fn find_driver(&self, payload: &P) -> Option<DriverId> {
        self.drivers
            .iter()
            .position(|driver| driver.supports(payload))
            .map(DriverId)
    }

    /// Driver with the given name
    pub fn find_by_name(&self, name: &str) -> Option<DriverId> {
        self.drivers
            .iter()
            .position(|driver| driver.name() == name)
            .map(DriverId)
    }

    /// Driver by id
    pub fn driver(&self, id: DriverId) -> Option<&dyn GraphicsObjectDriver<P>> {
        self.drivers.get(id.0).map(|driver| &**driver)
    }

    /// Number of drivers
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    /// Whether no driver is registered
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

impl<P> Default for DriverTable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for DriverTable<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.drivers.iter().map(|driver| driver.name()))
            .finish()
    }
}

impl DriverTable<ProductNode> {
    /// Table holding a single [`ShapeDriver`]
    pub fn with_shape_driver() -> Self {
        let mut table = Self::new();
        table.register(Box::new(ShapeDriver));
        table
    }
}

/// Driver for [`ProductNode`]s carrying geometry
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeDriver;

impl ShapeDriver {
    /// Edges only
    pub const WIREFRAME: DisplayMode = 0;
    /// Shaded faces
    pub const SHADED: DisplayMode = 1;
    /// Shaded faces with edges
    pub const SHADED_WITH_EDGES: DisplayMode = 2;
}

impl GraphicsObjectDriver<ProductNode> for ShapeDriver {
    fn name(&self) -> &str {
        "shape"
    }

    fn supports(&self, payload: &ProductNode) -> bool {
        payload.geometry.is_some()
    }

    fn create_product(&self, payload: &ProductNode, scene: &mut dyn GraphicsScene) -> Option<GraphicsObjectId> {
        payload.geometry.map(|geometry| scene.create_product(geometry))
    }

    fn display_mode_names(&self) -> &[&'static str] {
        &["wireframe", "shaded", "shaded_with_edges"]
    }

    fn default_display_mode(&self) -> DisplayMode {
        Self::SHADED
    }
}
