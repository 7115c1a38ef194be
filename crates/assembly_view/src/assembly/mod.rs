//! Semantic assembly layer
//!
//! Interprets the opaque payloads of a [`Tree`](crate::tree::Tree) as a
//! product structure: assemblies, references (placed instances of a shared
//! product), components and leaf shapes.
//!
//! A node can play several roles at once, e.g. a reference that is also a
//! component of its parent assembly, so classification yields a
//! [`NodeTags`] set instead of a single kind.
//!
//! References are expanded in the tree: the referred product node is the
//! first (and only) child of the reference node.
//!
//! ```text
//!   Assembly A
//!   ├── Reference B ──► Product P (leaf)
//!   └── Reference C ──► Product P (leaf)   same product identity as under B
//! ```

mod tags;
mod model;

pub use tags::{AssemblyPayload, NodeTags};
pub use model::{AssemblyModel, InstanceNameFormat, ReferenceTarget};
