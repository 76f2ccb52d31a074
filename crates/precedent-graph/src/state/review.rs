use precedent_core::models::ReviewItem;

use super::GraphState;

impl GraphState {
    /// Review items oldest first.
    pub fn review_items(&self) -> Vec<&ReviewItem> {
        let mut items: Vec<&ReviewItem> = self.review_queue.values().collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        items
    }

    pub fn review_item(&self, id: &str) -> Option<&ReviewItem> {
        self.review_queue.get(id)
    }

    /// Returns false when an identical item is already queued.
    pub fn enqueue_review(&mut self, item: ReviewItem) -> bool {
        if self.review_queue.contains_key(&item.id) {
            return false;
        }
        self.review_queue.insert(item.id.clone(), item);
        self.touch();
        true
    }

    pub fn remove_review(&mut self, id: &str) -> Option<ReviewItem> {
        let removed = self.review_queue.remove(id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Drop queued items that point at an edge (after adjudication or re-extraction).
    pub fn remove_reviews_for_edge(&mut self, edge_id: &str) -> usize {
        let before = self.review_queue.len();
        self.review_queue
            .retain(|_, item| item.edge_id.as_deref() != Some(edge_id));
        let removed = before - self.review_queue.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }
}
