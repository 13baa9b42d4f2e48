//! Pattern store contract and an in-memory implementation

use crate::error::{ArbiterError, ArbiterResult};
use crate::types::{Pattern, PatternId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Owner of the pattern corpus
///
/// Concurrent updates to the same pattern are not sequenced by the engine;
/// implementations must serialize them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatternStore: Send + Sync {
    /// Fetch a pattern, `None` if it does not exist
    async fn get_pattern(&self, id: &PatternId) -> ArbiterResult<Option<Pattern>>;

    /// Replace the stored copy of a pattern
    async fn update_pattern(&self, pattern: &Pattern) -> ArbiterResult<()>;
}

/// Pattern store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct InMemoryPatternStore {
    patterns: RwLock<HashMap<PatternId, Pattern>>,
}

impl InMemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with patterns
    pub fn from_patterns(patterns: impl IntoIterator<Item = Pattern>) -> Self {
        let store = Self::new();
        {
            let mut map = store.patterns.write();
            for pattern in patterns {
                map.insert(pattern.id.clone(), pattern);
            }
        }
        store
    }

    /// Insert or replace a pattern
    pub fn insert(&self, pattern: Pattern) {
        self.patterns.write().insert(pattern.id.clone(), pattern);
    }

    /// Snapshot of every stored pattern
    pub fn all(&self) -> Vec<Pattern> {
        let mut patterns: Vec<_> = self.patterns.read().values().cloned().collect();
        patterns.sort_by(|a, b| a.id.cmp(&b.id));
        patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }
}

#[async_trait]
impl PatternStore for InMemoryPatternStore {
    async fn get_pattern(&self, id: &PatternId) -> ArbiterResult<Option<Pattern>> {
        Ok(self.patterns.read().get(id).cloned())
    }

    /// Fails with a storage error for patterns never inserted
    async fn update_pattern(&self, pattern: &Pattern) -> ArbiterResult<()> {
        match self.patterns.write().get_mut(&pattern.id) {
            Some(stored) => {
                *stored = pattern.clone();
                Ok(())
            }
            None => Err(ArbiterError::storage(format!(
                "cannot update unknown pattern {}",
                pattern.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PatternType;

    #[tokio::test]
    async fn test_in_memory_store_roundtrip() {
        let store = InMemoryPatternStore::from_patterns([Pattern::new(
            "p1",
            "Parameterized queries",
            PatternType::Security,
        )]);
        assert_eq!(store.len(), 1);

        let id = PatternId::from_string("p1");
        let mut pattern = store.get_pattern(&id).await.unwrap().unwrap();
        pattern.confidence_score = 0.9;
        store.update_pattern(&pattern).await.unwrap();

        let stored = store.get_pattern(&id).await.unwrap().unwrap();
        assert_eq!(stored.confidence_score, 0.9);
        assert!(store
            .get_pattern(&PatternId::from_string("missing"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_of_unknown_pattern_is_storage_error() {
        let store = InMemoryPatternStore::new();
        let err = store
            .update_pattern(&Pattern::new("ghost", "", PatternType::General))
            .await
            .unwrap_err();

        assert!(matches!(err, ArbiterError::Storage { .. }));
        assert!(store.is_empty());
    }
}
