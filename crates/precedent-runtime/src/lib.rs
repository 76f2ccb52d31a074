//! # precedent-runtime
//!
//! The single entry point to the engine. [`PrecedentRuntime`] owns the
//! graph store and every engine built over it, restores the graph from
//! SQLite on open and writes it back on [`PrecedentRuntime::save`].
//!
//! ```no_run
//! # async fn demo() -> precedent_core::errors::PrecedentResult<()> {
//! use precedent_core::models::RetrievalFilters;
//! use precedent_runtime::PrecedentRuntime;
//!
//! let runtime = PrecedentRuntime::in_memory().await?;
//! let outcome = runtime
//!     .query("Section 17 registration", &RetrievalFilters::default(), Some(5))
//!     .await?;
//! println!("{} results", outcome.results.len());
//! # Ok(())
//! # }
//! ```

pub mod maintenance;
pub mod review;
pub mod runtime;

pub use maintenance::MaintenanceReport;
pub use precedent_ingest::IngestRequest;
pub use runtime::{PrecedentRuntime, RuntimeOptions};
