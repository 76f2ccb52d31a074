// Single source of truth for all default values.

// --- Chunking ---
pub const DEFAULT_MAX_CHUNK_TOKENS: usize = 600;
pub const DEFAULT_TARGET_CHUNK_TOKENS: usize = 400;
pub const DEFAULT_MIN_CHUNK_TOKENS: usize = 100;
pub const DEFAULT_TOKEN_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_CHUNK_TYPE_REVIEW_THRESHOLD: f64 = 0.5;

// --- Classification ---
pub const DEFAULT_AUTO_ACCEPT_THRESHOLD: f64 = 0.85;
pub const DEFAULT_REVIEW_THRESHOLD: f64 = 0.60;
pub const DEFAULT_QUALIFIED_TRIGGERS_STATUS: bool = false;

// --- Trust ---
pub const DEFAULT_CITATION_SATURATION: u32 = 20;
pub const DEFAULT_RECENCY_HORIZON_YEARS: f64 = 50.0;
pub const DEFAULT_RECENCY_FLOOR: f64 = 0.5;
pub const DEFAULT_TOP_CITED_LIMIT: usize = 20;

// --- Retrieval ---
pub const DEFAULT_MAX_RESULTS: usize = 10;
pub const DEFAULT_CANDIDATE_POOL: usize = 50;
pub const DEFAULT_RERANK_TOP_K: usize = 40;
pub const DEFAULT_RERANK_BLEND: f64 = 0.6;
pub const DEFAULT_EXPANSION_SEED_K: usize = 5;
pub const DEFAULT_EXPANSION_BUDGET: usize = 30;
pub const DEFAULT_MAX_HOPS: usize = 3;
pub const DEFAULT_HOP_DECAY: f64 = 0.7;
pub const DEFAULT_EMBED_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_SCORER_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 256;
pub const DEFAULT_EMBEDDING_CACHE_SIZE: u64 = 10_000;

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "precedent.db";

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
