use std::sync::Arc;

use prep_core::{
    Catalog, CatalogOverview, ProgressAggregator, ProgressMap, ProgressStats, QuestionId,
    SearchIndex, SearchResults, Topic,
};
use storage::repository::KeyValueStore;

use crate::error::SessionError;
use crate::progress_tracker::{PersistOutcome, ProgressTracker, ToggleOutcome};
use crate::topic_descriptions;

/// Everything one study session works with: the catalog, the search index
/// built from it, and the progress tracker.
///
/// The presentation layer drives the session through plain method calls and
/// renders whatever the queries return.
pub struct StudySession {
    catalog: Arc<Catalog>,
    index: SearchIndex,
    tracker: ProgressTracker,
}

impl StudySession {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, tracker: ProgressTracker) -> Self {
        let index = SearchIndex::build(&catalog);
        tracing::debug!(entries = index.len(), "search index built");
        Self {
            catalog,
            index,
            tracker,
        }
    }

    /// Restore progress from `slot` and build the session around `catalog`.
    pub async fn open(
        catalog: Arc<Catalog>,
        store: Arc<dyn KeyValueStore>,
        slot: impl Into<String>,
    ) -> Self {
        let tracker = ProgressTracker::restore(store, slot).await;
        Self::new(catalog, tracker)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        self.catalog.topics()
    }

    /// Validate a deep-link target against the catalog.
    #[must_use]
    pub fn resolve_topic(&self, topic_id: &str) -> Option<&Topic> {
        self.catalog.topic(topic_id.trim())
    }

    /// The catalog's own description, else the built-in one for stock topics.
    #[must_use]
    pub fn topic_description(&self, topic_id: &str) -> Option<&str> {
        self.catalog
            .topic(topic_id)
            .and_then(Topic::description)
            .or_else(|| topic_descriptions::built_in(topic_id))
    }

    #[must_use]
    pub fn is_read(&self, topic_id: &str, question: QuestionId) -> bool {
        self.tracker.is_read(topic_id, question)
    }

    /// Toggle a question that exists in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownTopic` or `SessionError::UnknownQuestion`
    /// when the target is not in the catalog.
    pub async fn toggle_read(
        &mut self,
        topic_id: &str,
        question: QuestionId,
    ) -> Result<ToggleOutcome, SessionError> {
        let topic = self.known_topic(topic_id)?;
        if topic.question(question).is_none() {
            return Err(SessionError::UnknownQuestion {
                topic: topic.id().clone(),
                question,
            });
        }
        let id = topic.id().clone();
        Ok(self.tracker.toggle_read(&id, question).await)
    }

    /// Mark every question of a topic as read with a single write.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownTopic` for ids outside the catalog.
    pub async fn mark_topic_read(
        &mut self,
        topic_id: &str,
    ) -> Result<PersistOutcome, SessionError> {
        let topic = self.known_topic(topic_id)?;
        let id = topic.id().clone();
        let questions: Vec<QuestionId> = topic.question_ids().collect();
        Ok(self.tracker.mark_all_read(&id, questions).await)
    }

    /// Clear a topic's progress.
    ///
    /// Ids outside the catalog are accepted so stale entries can be cleaned up.
    pub async fn reset_topic(&mut self, topic_id: &str) -> PersistOutcome {
        self.tracker.reset_topic(topic_id.trim()).await
    }

    #[must_use]
    pub fn topic_progress(&self, topic_id: &str) -> ProgressStats {
        self.aggregator().topic_progress(topic_id)
    }

    #[must_use]
    pub fn total_progress(&self) -> ProgressStats {
        self.aggregator().total_progress()
    }

    #[must_use]
    pub fn overview(&self) -> CatalogOverview {
        self.aggregator().overview()
    }

    #[must_use]
    pub fn search(&self, term: &str) -> SearchResults<'_> {
        self.index.query(term)
    }

    /// Current progress in its persisted JSON shape.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidProgress` if encoding fails.
    pub fn export_progress(&self) -> Result<String, SessionError> {
        Ok(self.tracker.progress().to_json()?)
    }

    /// Replace progress with a previously exported document.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidProgress` when `raw` is not a progress
    /// document; the current progress is left untouched in that case.
    pub async fn import_progress(&mut self, raw: &str) -> Result<PersistOutcome, SessionError> {
        let progress = ProgressMap::from_export(raw)?;
        Ok(self.tracker.replace(progress).await)
    }

    fn aggregator(&self) -> ProgressAggregator<'_> {
        ProgressAggregator::new(&self.catalog, self.tracker.progress())
    }

    fn known_topic(&self, topic_id: &str) -> Result<&Topic, SessionError> {
        self.resolve_topic(topic_id)
            .ok_or_else(|| SessionError::UnknownTopic(topic_id.to_owned()))
    }
}
