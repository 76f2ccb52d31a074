//! Periodic maintenance: late reference resolution, status propagation,
//! trust rescoring, data-quality audits and the top-cited view.

use tracing::info;

use precedent_core::errors::PrecedentResult;
use precedent_core::models::ReviewItem;
use precedent_observability::{events, maintenance_span};
use precedent_temporal::coverage;
use precedent_trust::TrustPassReport;

use crate::runtime::PrecedentRuntime;

/// What one maintenance pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceReport {
    /// Pending references that now resolve to an ingested entity.
    pub references_linked: usize,
    pub status_changes: usize,
    pub trust: TrustPassReport,
    pub coverage_issues: usize,
    pub consistency_issues: usize,
    /// Review items that were not already queued.
    pub reviews_enqueued: usize,
    pub top_cited_refreshed: bool,
}

impl PrecedentRuntime {
    /// One maintenance pass. Steps run in dependency order: new links first,
    /// then statuses, then trust (which reads both).
    pub fn run_maintenance(&self) -> PrecedentResult<MaintenanceReport> {
        let _span = maintenance_span!("full").entered();
        let mut report = MaintenanceReport {
            references_linked: self.pipeline.resolve_pending_references()?,
            ..Default::default()
        };
        let changes = self.status.propagate()?;
        for change in &changes {
            self.dirty.mark(&change.entity_id);
        }
        report.status_changes = changes.len();
        report.trust = self.trust.run_pass(false)?;

        let snapshot = self.store.snapshot();
        let mut findings: Vec<ReviewItem> = Vec::new();
        for entity_id in snapshot.entity_ids() {
            let issues = coverage::audit(snapshot.versions(entity_id));
            report.coverage_issues += issues.len();
            findings.extend(issues.iter().map(|issue| issue.to_review_item()));
        }
        let conflicts = precedent_graph::consistency::check(&snapshot);
        report.consistency_issues = conflicts.len();
        findings.extend(conflicts);

        for item in findings {
            if self.store.enqueue_review(item.clone())? {
                report.reviews_enqueued += 1;
                events::data_quality_flagged(item.kind.as_str(), &item.entity_id, &item.detail);
            }
        }

        report.top_cited_refreshed = self
            .top_cited
            .refresh(&self.store.snapshot(), self.config.trust.top_cited_limit);

        info!(
            references_linked = report.references_linked,
            status_changes = report.status_changes,
            reviews_enqueued = report.reviews_enqueued,
            "maintenance pass completed"
        );
        Ok(report)
    }
}
