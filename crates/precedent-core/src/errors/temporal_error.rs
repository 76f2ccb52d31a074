use chrono::{DateTime, Utc};

use crate::models::PrecedentStatus;

/// Point-in-time resolution and status state-machine errors.
#[derive(Debug, thiserror::Error)]
pub enum TemporalError {
    #[error("no version of {entity_id} is valid at {at}")]
    NoVersionFound { entity_id: String, at: DateTime<Utc> },

    #[error("versions {versions:?} of {entity_id} all claim to be valid at {at}")]
    AmbiguousVersion {
        entity_id: String,
        at: DateTime<Utc>,
        versions: Vec<u32>,
    },

    #[error("invalid status transition for {entity_id}: {from} -> {to}")]
    InvalidStatusTransition {
        entity_id: String,
        from: PrecedentStatus,
        to: PrecedentStatus,
    },

    #[error("reinstatement of {entity_id} requires a reinstating authority")]
    MissingReinstatingAuthority { entity_id: String },

    #[error("new version of {entity_id} starts at {valid_from}, before the current version")]
    VersionOutOfOrder {
        entity_id: String,
        valid_from: DateTime<Utc>,
    },
}
