mod chunk;
mod citation;
mod degradation_event;
mod entity;
mod ingest;
mod jurisdiction;
mod provenance;
mod retrieval;
mod review;
mod status;
mod trust;

pub use chunk::{Chunk, ChunkType};
pub use citation::{CitationEdge, CitationType, EdgeState, Treatment, TreatmentEffect};
pub use degradation_event::DegradationEvent;
pub use entity::{EntityAttributes, EntityKind, LegalEntity};
pub use ingest::{IngestReport, SourceMeta};
pub use jurisdiction::{CrossJurisdictionRelation, JurisdictionRelationKind, ResolutionStatus};
pub use provenance::{Provenance, SourceTier};
pub use retrieval::{QueryOutcome, RankedResult, RetrievalFilters, TreatmentContext};
pub use review::{ReviewItem, ReviewKind};
pub use status::{PrecedentStatus, StatusChange, StatusChangeKind};
pub use trust::{TrustBlock, VerificationStatus};
