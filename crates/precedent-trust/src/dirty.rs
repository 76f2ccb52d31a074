//! Entities whose trust inputs changed since the last pass.

use dashmap::DashSet;

/// Concurrent dirty set. Ingestion marks, the maintenance pass drains.
#[derive(Debug, Default)]
pub struct DirtySet {
    ids: DashSet<String>,
}

impl DirtySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self, entity_id: &str) {
        self.ids.insert(entity_id.to_string());
    }

    pub fn mark_all<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            self.mark(id.as_ref());
        }
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.ids.contains(entity_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Take every id currently marked, sorted.
    pub fn drain(&self) -> Vec<String> {
        let mut taken: Vec<String> = self.ids.iter().map(|id| id.key().clone()).collect();
        for id in &taken {
            self.ids.remove(id);
        }
        taken.sort();
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_and_dedupes() {
        let dirty = DirtySet::new();
        dirty.mark_all(["b", "a", "b"]);
        assert_eq!(dirty.len(), 2);
        assert_eq!(dirty.drain(), vec!["a".to_string(), "b".to_string()]);
        assert!(dirty.is_empty());
    }
}
