//! PrecedentRuntime: owns the graph store, every engine and persistence.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use precedent_core::config::PrecedentConfig;
use precedent_core::errors::PrecedentResult;
use precedent_core::models::{
    EntityKind, IngestReport, LegalEntity, QueryOutcome, RetrievalFilters, ReviewItem,
    SourceMeta, StatusChange,
};
use precedent_core::traits::{IEmbeddingProvider, IIntentModel, IPairwiseScorer, ITreatmentModel};
use precedent_embeddings::EmbeddingEngine;
use precedent_graph::{IGraphStore, InMemoryGraphStore};
use precedent_ingest::{IngestRequest, IngestionPipeline, PipelineDeps};
use precedent_observability::DegradationTracker;
use precedent_retrieval::RetrievalEngine;
use precedent_storage::engine::PersistStats;
use precedent_storage::StorageEngine;
use precedent_temporal::resolver::resolve_in_state;
use precedent_temporal::StatusPropagationManager;
use precedent_trust::{CitedEntry, DirtySet, TopCitedView, TrustMaintenance};

/// Options for opening a runtime. External services default to the
/// built-in fallbacks: hashed TF-IDF embeddings, no reranker, no learned
/// classifiers.
#[derive(Default)]
pub struct RuntimeOptions {
    /// SQLite database. `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    /// TOML configuration. `None` uses defaults.
    pub config_toml: Option<String>,
    /// Install the global tracing subscriber from the observability config.
    pub init_tracing: bool,
    pub embedding_provider: Option<Arc<dyn IEmbeddingProvider>>,
    pub scorer: Option<Arc<dyn IPairwiseScorer>>,
    pub intent_model: Option<Arc<dyn IIntentModel>>,
    pub treatment_model: Option<Arc<dyn ITreatmentModel>>,
}

pub struct PrecedentRuntime {
    pub(crate) store: Arc<dyn IGraphStore>,
    pub(crate) storage: StorageEngine,
    pub(crate) pipeline: Arc<IngestionPipeline>,
    pub(crate) retrieval: RetrievalEngine,
    pub(crate) status: StatusPropagationManager,
    pub(crate) trust: TrustMaintenance,
    pub(crate) top_cited: TopCitedView,
    pub(crate) dirty: Arc<DirtySet>,
    pub(crate) degradations: Arc<Mutex<DegradationTracker>>,
    pub(crate) config: PrecedentConfig,
}

impl PrecedentRuntime {
    /// Open a runtime, restoring the persisted graph when `db_path` is set.
    pub async fn open(opts: RuntimeOptions) -> PrecedentResult<Self> {
        let config = match &opts.config_toml {
            Some(raw) => PrecedentConfig::from_toml(raw)?,
            None => PrecedentConfig::default(),
        };
        if opts.init_tracing {
            precedent_observability::init_tracing(&config.observability);
        }

        let storage = match &opts.db_path {
            Some(path) => StorageEngine::open(path)?,
            None => StorageEngine::open_in_memory()?,
        };
        let state = storage.load().await?;
        info!(
            entities = state.entity_count(),
            db = ?opts.db_path,
            "precedent runtime opened"
        );
        let store: Arc<dyn IGraphStore> = Arc::new(InMemoryGraphStore::from_state(state));

        let embeddings = Arc::new(match opts.embedding_provider {
            Some(provider) => EmbeddingEngine::with_provider(config.embedding.clone(), provider),
            None => EmbeddingEngine::new(config.embedding.clone()),
        });
        let dirty = Arc::new(DirtySet::new());
        let degradations = Arc::new(Mutex::new(DegradationTracker::new()));

        let mut pipeline = IngestionPipeline::new(
            PipelineDeps {
                store: Arc::clone(&store),
                dirty: Arc::clone(&dirty),
                embeddings: Arc::clone(&embeddings),
                degradations: Arc::clone(&degradations),
            },
            &config,
        )?;
        if let Some(model) = opts.treatment_model {
            pipeline = pipeline.with_treatment_model(model);
        }

        let mut retrieval = RetrievalEngine::new(
            Arc::clone(&store),
            Arc::clone(&embeddings),
            Arc::clone(&degradations),
            &config,
        );
        if let Some(scorer) = opts.scorer {
            retrieval = retrieval.with_scorer(scorer);
        }
        if let Some(model) = opts.intent_model {
            retrieval = retrieval.with_intent_model(model);
        }

        Ok(Self {
            status: StatusPropagationManager::new(Arc::clone(&store)),
            trust: TrustMaintenance::new(Arc::clone(&store), Arc::clone(&dirty), config.trust.clone()),
            top_cited: TopCitedView::new(),
            pipeline: Arc::new(pipeline),
            retrieval,
            store,
            storage,
            dirty,
            degradations,
            config,
        })
    }

    /// In-memory runtime with default configuration.
    pub async fn in_memory() -> PrecedentResult<Self> {
        Self::open(RuntimeOptions::default()).await
    }

    pub fn config(&self) -> &PrecedentConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn IGraphStore> {
        &self.store
    }

    // --- Ingestion ---

    /// Ingest one entity. Trust scores of everything the ingest touched
    /// are recomputed before returning.
    pub async fn ingest(
        &self,
        entity_id: &str,
        kind: EntityKind,
        text: &str,
        meta: SourceMeta,
    ) -> PrecedentResult<IngestReport> {
        let report = self.pipeline.ingest(entity_id, kind, text, meta).await?;
        self.refresh_trust();
        Ok(report)
    }

    /// Concurrent ingestion; one entity's failure is reported in its own
    /// report and does not abort the rest. One trust pass follows the batch.
    pub async fn ingest_batch(&self, requests: Vec<IngestRequest>) -> PrecedentResult<Vec<IngestReport>> {
        let reports = self.pipeline.ingest_batch(requests).await?;
        self.refresh_trust();
        Ok(reports)
    }

    /// Rescore the entities marked dirty since the last pass. The write
    /// that marked them has already committed, so a failed pass is logged
    /// and the entities stay marked for the next one.
    pub(crate) fn refresh_trust(&self) {
        if let Err(e) = self.trust.run_pass(false) {
            warn!(error = %e, "trust pass after write failed");
        }
    }

    // --- Reads ---

    pub async fn query(
        &self,
        text: &str,
        filters: &RetrievalFilters,
        max_results: Option<usize>,
    ) -> PrecedentResult<QueryOutcome> {
        self.retrieval.query(text, filters, max_results).await
    }

    /// The version of `entity_id` in force at `at`.
    pub fn resolve_version(&self, entity_id: &str, at: DateTime<Utc>) -> PrecedentResult<LegalEntity> {
        resolve_in_state(&self.store.snapshot(), entity_id, at)
    }

    /// Status log ordered by sequence.
    pub fn get_status_history(&self, entity_id: &str) -> PrecedentResult<Vec<StatusChange>> {
        self.status.history(entity_id)
    }

    pub fn review_queue(&self) -> Vec<ReviewItem> {
        self.store.review_items()
    }

    /// Cached most-cited entities of `kind`, as of the last maintenance pass.
    pub fn top_cited(&self, kind: EntityKind) -> Vec<CitedEntry> {
        self.top_cited.top(kind)
    }

    /// Components currently running on a fallback.
    pub fn degraded_components(&self) -> Vec<String> {
        let tracker = match self.degradations.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut components: Vec<String> = tracker
            .active_degradations()
            .into_iter()
            .map(|d| d.event.component.clone())
            .collect();
        components.sort();
        components.dedup();
        components
    }

    // --- Persistence ---

    /// Write the current graph to the database.
    pub async fn save(&self) -> PrecedentResult<PersistStats> {
        let snapshot = self.store.snapshot();
        let stats = self.storage.save(&snapshot).await?;
        info!(
            versions = stats.entity_versions,
            chunks = stats.chunks,
            citations = stats.citations,
            "graph saved"
        );
        Ok(stats)
    }
}
