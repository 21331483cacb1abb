//! Mind map domain model.
//!
//! # Responsibility
//! - Define the node entity and the document that owns it.
//! - Keep tree invariants (parent links, children cache, id uniqueness)
//!   inside the document API.
//!
//! # Invariants
//! - Every node is identified by a document-unique `NodeId`.
//! - Deletion removes whole subtrees; there are no tombstones.

pub mod defaults;
pub mod document;
pub mod node;
pub mod placement;
