//! Record every degradation event: component, failure mode, fallback used,
//! timestamp, recovery status.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use precedent_core::models::DegradationEvent;
use serde::{Deserialize, Serialize};

/// Tracked entries kept; the oldest recovered entries go first.
pub const DEGRADATION_HISTORY_LIMIT: usize = 256;

/// Recovery status of a degradation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

/// A tracked degradation with recovery status. Repeated failures of a
/// component that is already degraded fold into its active entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    /// The most recent failure.
    pub event: DegradationEvent,
    pub occurrences: u32,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Tracks degradation events for reporting.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: VecDeque<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a degradation event and log it.
    pub fn record(&mut self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        if let Some(active) = self.active_mut(&event.component) {
            active.event = event;
            active.occurrences = active.occurrences.saturating_add(1);
            return;
        }
        self.events.push_back(TrackedDegradation {
            event,
            occurrences: 1,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
        self.compact();
    }

    /// Mark a component's active degradation as recovered. Returns whether
    /// the component was degraded.
    pub fn mark_recovered(&mut self, component: &str) -> bool {
        let Some(tracked) = self.active_mut(component) else {
            return false;
        };
        tracked.recovery_status = RecoveryStatus::Recovered;
        tracked.recovered_at = Some(Utc::now());
        crate::tracing_setup::events::degradation_recovered(component, tracked.occurrences);
        true
    }

    /// Oldest first.
    pub fn events(&self) -> impl Iterator<Item = &TrackedDegradation> {
        self.events.iter()
    }

    /// Active (unrecovered) degradations.
    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.events.iter().any(|t| {
            t.event.component == component && t.recovery_status == RecoveryStatus::Active
        })
    }

    fn active_mut(&mut self, component: &str) -> Option<&mut TrackedDegradation> {
        self.events.iter_mut().rev().find(|t| {
            t.event.component == component && t.recovery_status == RecoveryStatus::Active
        })
    }

    fn compact(&mut self) {
        while self.events.len() > DEGRADATION_HISTORY_LIMIT {
            let evict = self
                .events
                .iter()
                .position(|t| t.recovery_status == RecoveryStatus::Recovered)
                .unwrap_or(0);
            self.events.remove(evict);
        }
    }
}
