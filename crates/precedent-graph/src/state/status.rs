use precedent_core::errors::{PrecedentError, PrecedentResult};
use precedent_core::models::{PrecedentStatus, StatusChange};

use super::GraphState;

impl GraphState {
    /// Status log ordered by sequence.
    pub fn status_history(&self, entity_id: &str) -> &[StatusChange] {
        self.status_log.get(entity_id).map_or(&[], Vec::as_slice)
    }

    /// Derived current status: `new_status` of the last change, else Active.
    pub fn current_status(&self, entity_id: &str) -> PrecedentStatus {
        self.status_cache
            .get(entity_id)
            .copied()
            .unwrap_or_default()
    }

    /// Append a status change. The store assigns the sequence number and
    /// refuses the append when `previous_status` is not the current status.
    pub fn append_status_change(&mut self, mut change: StatusChange) -> PrecedentResult<StatusChange> {
        if !self.contains_entity(&change.entity_id) {
            return Err(PrecedentError::EntityNotFound {
                id: change.entity_id.clone(),
            });
        }
        let current = self.current_status(&change.entity_id);
        if change.previous_status != current {
            return Err(PrecedentError::ConcurrencyError(format!(
                "status of {} is {current}, change expected {}",
                change.entity_id, change.previous_status
            )));
        }
        let log = self.status_log.entry(change.entity_id.clone()).or_default();
        change.sequence = log.len() as u64 + 1;
        log.push(change.clone());
        let derived = log.last().map(|c| c.new_status).unwrap_or_default();
        self.status_cache.insert(change.entity_id.clone(), derived);
        self.touch();
        Ok(change)
    }
}
