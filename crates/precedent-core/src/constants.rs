/// Precedent system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hard ceiling on multi-hop expansion depth, regardless of configuration.
pub const MAX_EXPANSION_HOPS: usize = 3;

/// Maximum number of entities accepted by a single batch ingest call.
pub const MAX_INGEST_BATCH_SIZE: usize = 1000;

/// Lowest and highest court levels (1 = apex court).
pub const MIN_COURT_LEVEL: u8 = 1;
pub const MAX_COURT_LEVEL: u8 = 5;

/// `extracted_by` tag for edges and chunks produced by the rule-based pipeline.
pub const RULE_EXTRACTOR: &str = "precedent-rules";

/// Characters of surrounding text kept as citation context.
pub const CITATION_CONTEXT_CHARS: usize = 240;
