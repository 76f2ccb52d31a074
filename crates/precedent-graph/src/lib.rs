//! # precedent-graph
//!
//! Property-graph store for versioned legal entities and their citation
//! edges. Writers mutate a copy-on-write [`GraphState`]; readers and
//! maintenance passes work on immutable snapshots and never block ingestion.

pub mod alias;
pub mod consistency;
pub mod indexed;
pub mod state;
pub mod store;
pub mod traversal;

pub use alias::normalize_reference;
pub use indexed::{CitationLink, EntityNode, IndexedGraph};
pub use state::GraphState;
pub use store::{IGraphStore, InMemoryGraphStore};
pub use traversal::{ExpandedNode, ExpansionConfig};
