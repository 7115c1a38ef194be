//! Generic N-ary tree over an opaque payload
//!
//! Nodes live in an arena and are addressed by integer handles
//! ([`TreeNodeId`]). The value `0` is reserved as the null handle, so every
//! navigation accessor can answer "nothing" without an `Option`.
//!
//! ```text
//!   roots: [A, E]
//!
//!   A ── B ── D          parent / first_child / last_child
//!   │    └─── (D')       prev_sibling / next_sibling
//!   └─ C
//!   E
//! ```
//!
//! Removing a node destroys its whole subtree. Slots of removed nodes are
//! tombstoned and their ids are never handed out again, so ids held by other
//! components go stale instead of silently aliasing a new node.

mod store;
mod traverse;

pub use store::{Tree, TreeError, TreeNodeId, NULL_NODE};
pub use traverse::{Children, PostOrder, PreOrder, Unordered};
