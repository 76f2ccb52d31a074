use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Precedential status of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecedentStatus {
    #[default]
    Active,
    Overruled,
    Superseded,
    Deprecated,
}

impl PrecedentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Overruled => "overruled",
            Self::Superseded => "superseded",
            Self::Deprecated => "deprecated",
        }
    }

    /// Overruled and superseded authorities can only return via reinstatement.
    pub fn is_reinstatable(self) -> bool {
        matches!(self, Self::Overruled | Self::Superseded)
    }
}

impl std::fmt::Display for PrecedentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusChangeKind {
    Transition,
    /// Return to `Active` on the authority of `triggering_entity_id`.
    Reinstated,
}

/// Immutable audit record of a status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Per-entity sequence number, starting at 1.
    pub sequence: u64,
    pub entity_id: String,
    pub previous_status: PrecedentStatus,
    pub new_status: PrecedentStatus,
    pub change_date: DateTime<Utc>,
    pub reason: String,
    pub triggering_entity_id: Option<String>,
    pub kind: StatusChangeKind,
}
