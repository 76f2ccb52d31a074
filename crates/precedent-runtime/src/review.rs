//! Human adjudication of the review queue.

use tracing::info;

use precedent_core::errors::{GraphError, PrecedentResult};
use precedent_core::models::{EdgeState, ReviewItem, ReviewKind, StatusChange};

use crate::runtime::PrecedentRuntime;

impl PrecedentRuntime {
    /// Accept a pending citation: the edge becomes active and, for an
    /// `overruled` treatment, the cited authority's status changes.
    pub fn accept_review(&self, review_id: &str) -> PrecedentResult<Option<StatusChange>> {
        let (item, edge_id) = self.adjudicable(review_id)?;
        let mut accepted = None;
        self.store.write(&mut |state| {
            accepted = Some(state.set_citation_state(&edge_id, EdgeState::Active)?);
            state.remove_reviews_for_edge(&edge_id);
            Ok(())
        })?;
        let Some(edge) = accepted else {
            return Ok(None);
        };

        self.dirty.mark(&edge.citing_id);
        if let Some(cited) = edge.cited_id.as_deref() {
            self.dirty.mark(cited);
        }
        let change = self.status.apply_treatment(&edge)?;
        self.refresh_trust();
        info!(
            review_id,
            entity_id = %item.entity_id,
            edge_id = %edge_id,
            treatment = %edge.treatment,
            "pending citation accepted"
        );
        Ok(change)
    }

    /// Reject a pending citation: the edge is removed.
    pub fn reject_review(&self, review_id: &str) -> PrecedentResult<()> {
        let (item, edge_id) = self.adjudicable(review_id)?;
        let mut cited = None;
        self.store.write(&mut |state| {
            cited = state.remove_citation(&edge_id)?.cited_id;
            state.remove_reviews_for_edge(&edge_id);
            Ok(())
        })?;
        self.dirty.mark(&item.entity_id);
        if let Some(cited) = cited.as_deref() {
            self.dirty.mark(cited);
        }
        self.refresh_trust();
        info!(review_id, entity_id = %item.entity_id, edge_id = %edge_id, "pending citation rejected");
        Ok(())
    }

    /// Close a review item after the underlying issue was handled outside
    /// the graph. Nothing else changes.
    pub fn dismiss_review(&self, review_id: &str) -> PrecedentResult<ReviewItem> {
        self.store.remove_review(review_id)?.ok_or_else(|| {
            GraphError::ReviewNotFound {
                id: review_id.to_string(),
            }
            .into()
        })
    }

    fn adjudicable(&self, review_id: &str) -> PrecedentResult<(ReviewItem, String)> {
        let item = self
            .store
            .snapshot()
            .review_item(review_id)
            .cloned()
            .ok_or_else(|| GraphError::ReviewNotFound {
                id: review_id.to_string(),
            })?;
        match (&item.kind, item.edge_id.clone()) {
            (ReviewKind::PendingCitation, Some(edge_id)) => Ok((item, edge_id)),
            _ => Err(GraphError::NotAdjudicable {
                id: review_id.to_string(),
            }
            .into()),
        }
    }
}
