//! Assembly view core
//!
//! ## Architecture
//!
//! ```text
//! Session (selection model, config)
//!      ↓ routes by DocumentId
//! DocumentView (document + scene)
//!      ├─ GraphicsSynchronizer   tree ↔ renderables, product cache
//!      ├─ VisibilityCoordinator  tri-state per node
//!      └─ SelectionBridge        scene ↔ tree selection
//! ```
//!
//! The components hold no references to each other. The view lends each
//! one the collaborators it needs per call.

mod document_view;
mod selection;
mod session;
mod synchronizer;
mod visibility;

#[cfg(test)]
mod tests;

pub use document_view::{DocumentView, ViewContext};
pub use selection::{ApplicationItem, SelectionBridge, SelectionChanged, SelectionModel, SelectionSync};
pub use session::Session;
pub use synchronizer::{GraphicsSynchronizer, MapOutcome};
pub use visibility::{TriState, VisibilityChange, VisibilityCoordinator};
