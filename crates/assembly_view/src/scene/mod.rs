//! Scene collaborator
//!
//! The view core never draws anything itself. It allocates renderables,
//! places them, toggles their visibility and selection through the
//! [`GraphicsScene`] trait.
//!
//! ## Architecture
//!
//! ```text
//! Tree node (payload)
//!      ↓  DriverTable: first driver supporting the payload
//! Product renderable (geometry, display attributes)
//!      ↓  create_instance
//! Instance renderables (placement, visibility, selection)
//! ```
//!
//! [`InMemoryScene`] is the reference implementation used by tests and the
//! demo binary.

mod driver;
mod graphics_object;
mod graphics_scene;

pub use driver::{DriverId, DriverTable, GraphicsObjectDriver, ShapeDriver};
pub use graphics_object::{GraphicsObject, GraphicsObjectKind};
pub use graphics_scene::{GraphicsScene, InMemoryScene};

slotmap::new_key_type! {
    /// Handle of a renderable in a scene
    pub struct GraphicsObjectId;
}

/// Driver-specific display mode index
pub type DisplayMode = u32;
