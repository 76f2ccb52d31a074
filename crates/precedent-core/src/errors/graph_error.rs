use crate::models::{ResolutionStatus, Treatment};

/// Graph store errors: structural invariants of entities and edges.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("version {version} of {entity_id} already exists")]
    DuplicateVersion { entity_id: String, version: u32 },

    #[error("{entity_id} would have more than one current version")]
    MultipleCurrentVersions { entity_id: String },

    #[error("version {version} of {entity_id} has valid_from after valid_to")]
    InvalidValidity { entity_id: String, version: u32 },

    #[error(
        "{citing_id} already holds a {existing} edge to {cited_id}; refusing {attempted}"
    )]
    TreatmentConflict {
        citing_id: String,
        cited_id: String,
        existing: Treatment,
        attempted: Treatment,
    },

    #[error("invalid resolution transition: {from:?} -> {to:?}")]
    InvalidResolutionTransition {
        from: ResolutionStatus,
        to: ResolutionStatus,
    },

    #[error("cross-jurisdiction relation requires different jurisdictions: {reason}")]
    InvalidRelation { reason: String },

    #[error("review item not found: {id}")]
    ReviewNotFound { id: String },

    #[error("review item {id} has no pending citation edge to adjudicate")]
    NotAdjudicable { id: String },
}
