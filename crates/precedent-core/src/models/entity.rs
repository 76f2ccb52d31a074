use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provenance::Provenance;
use super::trust::TrustBlock;

/// The seven kinds of legal entity held in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Case,
    Statute,
    Section,
    Principle,
    Court,
    Judge,
    Party,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        Self::Case,
        Self::Statute,
        Self::Section,
        Self::Principle,
        Self::Court,
        Self::Judge,
        Self::Party,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Statute => "statute",
            Self::Section => "section",
            Self::Principle => "principle",
            Self::Court => "court",
            Self::Judge => "judge",
            Self::Party => "party",
        }
    }

    /// Judgments are chunked by numbered paragraph.
    pub fn is_judgment(self) -> bool {
        matches!(self, Self::Case)
    }

    /// Legislative text is chunked by section/subsection markers.
    pub fn is_legislation(self) -> bool {
        matches!(self, Self::Statute | Self::Section)
    }

    /// Kinds whose text carries citations worth extracting.
    pub fn carries_citations(self) -> bool {
        matches!(self, Self::Case | Self::Statute | Self::Section | Self::Principle)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown entity kind: {s}"))
    }
}

/// Free-form descriptive attributes of an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityAttributes {
    pub title: String,
    pub jurisdiction: Option<String>,
    /// Court hierarchy level, 1 (apex) to 5.
    pub court_level: Option<u8>,
    pub decision_date: Option<DateTime<Utc>>,
    /// Alternative names this entity is cited by.
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One version of a logical legal entity.
///
/// The logical identity is `id`; `version` increases monotonically across
/// re-enactments, amendments and re-extractions. At most one version of an
/// `id` has `is_current_version` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalEntity {
    pub id: String,
    pub kind: EntityKind,
    pub version: u32,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub is_current_version: bool,
    pub attributes: EntityAttributes,
    /// Short description handed to treatment classifiers.
    pub summary: String,
    /// blake3 of the source text this version was chunked from.
    pub content_hash: String,
    pub provenance: Provenance,
    pub trust: TrustBlock,
}

impl LegalEntity {
    /// `valid_from <= valid_to` when both are set.
    pub fn has_valid_interval(&self) -> bool {
        match (self.valid_from, self.valid_to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        }
    }

    /// Whether this version is in force at `at`.
    /// The interval is half-open: `[valid_from, valid_to)`. A missing bound is unbounded.
    pub fn covers(&self, at: DateTime<Utc>) -> bool {
        let after_start = self.valid_from.map_or(true, |from| from <= at);
        let before_end = self.valid_to.map_or(true, |to| at < to);
        after_start && before_end
    }

    /// Key identifying this exact version.
    pub fn version_key(&self) -> (String, u32) {
        (self.id.clone(), self.version)
    }

    /// Date used for recency: decision date, then validity start, then extraction time.
    pub fn reference_date(&self) -> DateTime<Utc> {
        self.attributes
            .decision_date
            .or(self.valid_from)
            .unwrap_or(self.provenance.extracted_at)
    }
}
