//! Row-level reads and writes, one module per table.

pub mod chunk_ops;
pub mod citation_ops;
pub mod entity_ops;
pub mod review_ops;
pub mod status_ops;
