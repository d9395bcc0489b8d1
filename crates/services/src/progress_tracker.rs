use std::sync::Arc;

use prep_core::{ProgressMap, QuestionId, TopicId};
use storage::repository::{KeyValueStore, StorageError};

/// Default slot name, shared with the browser build's local storage key.
pub const DEFAULT_PROGRESS_SLOT: &str = "devinterview_progress";

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of writing the progress map to its slot.
///
/// A dropped write is not an error for the caller: the in-memory map stays
/// authoritative for the rest of the session, it just will not survive a
/// restart.
#[derive(Debug)]
pub enum PersistOutcome {
    Saved,
    Dropped(StorageError),
}

impl PersistOutcome {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// New read state after a toggle, plus what happened to the write.
#[derive(Debug)]
pub struct ToggleOutcome {
    pub read: bool,
    pub persist: PersistOutcome,
}

//
// ─── TRACKER ───────────────────────────────────────────────────────────────────
//

/// Owns the progress map and writes it through to a key-value slot after
/// every mutation.
pub struct ProgressTracker {
    store: Arc<dyn KeyValueStore>,
    slot: String,
    progress: ProgressMap,
}

impl ProgressTracker {
    /// Restore progress from `slot`.
    ///
    /// Never fails: a missing slot, a read error, or an unparsable value all
    /// start the session with empty progress.
    pub async fn restore(store: Arc<dyn KeyValueStore>, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let progress = match store.get(&slot).await {
            Ok(Some(raw)) => ProgressMap::from_json(&raw).unwrap_or_else(|err| {
                tracing::warn!(%slot, error = %err, "stored progress is corrupt, starting empty");
                ProgressMap::new()
            }),
            Ok(None) => ProgressMap::new(),
            Err(err) => {
                tracing::warn!(%slot, error = %err, "could not read stored progress, starting empty");
                ProgressMap::new()
            }
        };

        Self {
            store,
            slot,
            progress,
        }
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    #[must_use]
    pub fn slot(&self) -> &str {
        &self.slot
    }

    #[must_use]
    pub fn is_read(&self, topic: &str, question: QuestionId) -> bool {
        self.progress.is_read(topic, question)
    }

    /// Flip one question and write through.
    pub async fn toggle_read(&mut self, topic: &TopicId, question: QuestionId) -> ToggleOutcome {
        let read = self.progress.toggle(topic, question);
        let persist = self.persist().await;
        ToggleOutcome { read, persist }
    }

    /// Mark every id as read, then write once.
    pub async fn mark_all_read<I>(&mut self, topic: &TopicId, questions: I) -> PersistOutcome
    where
        I: IntoIterator<Item = QuestionId>,
    {
        let inserted = self.progress.mark_all(topic, questions);
        tracing::debug!(%topic, inserted, "marked questions read");
        self.persist().await
    }

    /// Forget every read entry of a topic, then write once.
    pub async fn reset_topic(&mut self, topic: &str) -> PersistOutcome {
        let removed = self.progress.clear_topic(topic);
        tracing::debug!(%topic, removed, "reset topic progress");
        self.persist().await
    }

    /// Swap in a whole map (e.g. an imported backup), then write once.
    pub async fn replace(&mut self, progress: ProgressMap) -> PersistOutcome {
        self.progress = progress;
        self.persist().await
    }

    /// Serialize the full map into the slot.
    pub async fn persist(&self) -> PersistOutcome {
        let raw = match self.progress.to_json() {
            Ok(raw) => raw,
            Err(err) => return self.dropped(StorageError::Serialization(err.to_string())),
        };

        match self.store.set(&self.slot, &raw).await {
            Ok(()) => PersistOutcome::Saved,
            Err(err) => self.dropped(err),
        }
    }

    fn dropped(&self, err: StorageError) -> PersistOutcome {
        tracing::warn!(slot = %self.slot, error = %err, "progress not saved");
        PersistOutcome::Dropped(err)
    }
}
