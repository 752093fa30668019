//! In-memory persistence port, used by tests and front-door test harnesses.

use super::{KnowledgeBase, KnowledgePersistence};
use crate::error::ChatbotError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct MemoryState {
    snapshot: Option<KnowledgeBase>,
    saves: usize,
    fail_saves: bool,
}

/// Keeps the last saved base in memory. Clones share the same state, so a test can keep
/// a handle after moving one into a [`KnowledgeStore`](super::KnowledgeStore).
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    inner: Arc<Mutex<MemoryState>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `base` already "on storage".
    pub fn with_base(base: KnowledgeBase) -> Self {
        let persistence = Self::new();
        persistence.state().snapshot = Some(base);
        persistence
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.state().saves
    }

    /// Last saved (or initial) base.
    pub fn snapshot(&self) -> Option<KnowledgeBase> {
        self.state().snapshot.clone()
    }

    /// When set, every subsequent save fails with a persistence error.
    pub fn fail_saves(&self, fail: bool) {
        self.state().fail_saves = fail;
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KnowledgePersistence for InMemoryPersistence {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> Result<KnowledgeBase, ChatbotError> {
        Ok(self.state().snapshot.clone().unwrap_or_default())
    }

    fn save(&self, base: &KnowledgeBase) -> Result<(), ChatbotError> {
        let mut state = self.state();
        if state.fail_saves {
            return Err(ChatbotError::Persistence {
                target: self.describe(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "storage is read-only"),
            });
        }
        state.snapshot = Some(base.clone());
        state.saves += 1;
        Ok(())
    }
}
