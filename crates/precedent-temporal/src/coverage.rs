//! Coverage audit of a version chain: where no version is in force (gaps)
//! and where several are (overlaps).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use precedent_core::models::{LegalEntity, ReviewItem, ReviewKind};

/// A data-quality defect in one entity's version chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CoverageIssue {
    /// Nothing is in force over `[from, to)`.
    Gap {
        entity_id: String,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        after_version: u32,
        before_version: u32,
    },
    /// Two versions are both in force somewhere.
    Overlap {
        entity_id: String,
        first_version: u32,
        second_version: u32,
    },
}

impl CoverageIssue {
    pub fn entity_id(&self) -> &str {
        match self {
            Self::Gap { entity_id, .. } | Self::Overlap { entity_id, .. } => entity_id,
        }
    }

    /// Review queue entry for this issue.
    pub fn to_review_item(&self) -> ReviewItem {
        match self {
            Self::Gap {
                entity_id,
                from,
                to,
                after_version,
                before_version,
            } => ReviewItem::new(
                ReviewKind::TemporalGap,
                entity_id.clone(),
                None,
                format!(
                    "no version in force between v{after_version} and v{before_version}: {} .. {}",
                    from.to_rfc3339(),
                    to.to_rfc3339()
                ),
            ),
            Self::Overlap {
                entity_id,
                first_version,
                second_version,
            } => ReviewItem::new(
                ReviewKind::TemporalOverlap,
                entity_id.clone(),
                None,
                format!("versions v{first_version} and v{second_version} overlap"),
            ),
        }
    }
}

/// Every gap and overlap in `versions` (one logical entity).
///
/// Empty intervals (`valid_from == valid_to`) cover nothing and are ignored.
pub fn audit(versions: &[LegalEntity]) -> Vec<CoverageIssue> {
    let mut chain: Vec<&LegalEntity> = versions
        .iter()
        .filter(|v| !is_empty_interval(v))
        .collect();
    // None sorts first: an open start precedes every dated start.
    chain.sort_by_key(|v| (v.valid_from, v.version));

    let mut issues = Vec::new();

    for (i, a) in chain.iter().enumerate() {
        for b in &chain[i + 1..] {
            if overlaps(a, b) {
                let (first, second) = if a.version <= b.version {
                    (a.version, b.version)
                } else {
                    (b.version, a.version)
                };
                issues.push(CoverageIssue::Overlap {
                    entity_id: a.id.clone(),
                    first_version: first,
                    second_version: second,
                });
            }
        }
    }

    // Walk in start order, tracking how far coverage reaches.
    let mut reach: Option<(Option<DateTime<Utc>>, u32)> = None;
    for v in &chain {
        if let Some((Some(end), after_version)) = reach {
            if let Some(start) = v.valid_from {
                if start > end {
                    issues.push(CoverageIssue::Gap {
                        entity_id: v.id.clone(),
                        from: end,
                        to: start,
                        after_version,
                        before_version: v.version,
                    });
                }
            }
        }
        reach = match reach {
            None => Some((v.valid_to, v.version)),
            Some((None, version)) => Some((None, version)),
            Some((Some(end), version)) => match v.valid_to {
                None => Some((None, v.version)),
                Some(to) if to > end => Some((Some(to), v.version)),
                Some(_) => Some((Some(end), version)),
            },
        };
    }

    issues
}

fn is_empty_interval(v: &LegalEntity) -> bool {
    matches!((v.valid_from, v.valid_to), (Some(from), Some(to)) if from >= to)
}

/// Half-open intervals intersect; a missing bound is unbounded.
fn overlaps(a: &LegalEntity, b: &LegalEntity) -> bool {
    let a_before_b_ends = match (a.valid_from, b.valid_to) {
        (Some(from), Some(to)) => from < to,
        _ => true,
    };
    let b_before_a_ends = match (b.valid_from, a.valid_to) {
        (Some(from), Some(to)) => from < to,
        _ => true,
    };
    a_before_b_ends && b_before_a_ends
}
