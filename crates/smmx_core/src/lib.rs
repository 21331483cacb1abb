//! Core domain logic for `.smmx` mind maps.
//! This crate is the single source of truth for document invariants.

pub mod codec;
pub mod error;
pub mod export;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use codec::{decode, encode, CodecError, CodecResult};
pub use error::ErrorKind;
pub use export::{to_json, to_markdown, ExportFormat};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::document::{
    breadcrumb, DocumentError, DocumentResult, MapMeta, MindMap, NewChild, NodeUpdate, PathEntry,
    Relation,
};
pub use model::node::{Layout, Node, NodeId, Position};
pub use model::placement::place_child;
pub use service::mindmap_service::{MindMapService, ServiceError, ServiceResult};
pub use service::views::{
    MapListing, MapSummary, NodeInfo, NodeListing, NodePath, SavedChange, SearchReport,
};
pub use store::{FsMindMapStore, MindMapStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
