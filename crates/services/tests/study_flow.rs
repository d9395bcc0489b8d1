use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use prep_core::{CatalogDocument, ProgressStats, Question, QuestionId, Topic, TopicId};
use services::{AppServices, PersistOutcome, ProgressTracker, SessionError, StudySession};
use storage::repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
use storage::StaticCatalog;

fn q(id: u32, question: &str, answer: &str, example: &str) -> Question {
    Question::new(QuestionId::new(id), question, answer, example)
}

fn document() -> CatalogDocument {
    CatalogDocument {
        topics: vec![
            Topic::new(
                TopicId::new("javascript"),
                "JavaScript",
                "JS",
                vec![
                    q(1, "What is a closure?", "A function plus its lexical scope.", "() => count++"),
                    q(2, "What is the event loop?", "It schedules callbacks.", "queueMicrotask(fn)"),
                    q(3, "Explain hoisting", "Declarations are processed first.", "var x;"),
                ],
            ),
            Topic::new(
                TopicId::new("css"),
                "CSS",
                "#",
                vec![
                    q(1, "How do you center a div?", "Use flex with justify-content.", ".c { margin: auto }"),
                    q(2, "What is specificity?", "How selectors are weighted.", "#a .b {}"),
                ],
            ),
        ],
    }
}

/// Store that refuses every write and counts attempts.
#[derive(Default)]
struct FullStore {
    writes: AtomicUsize,
}

#[async_trait]
impl KeyValueStore for FullStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("unavailable".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Rejected("quota exceeded".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Store that counts successful writes.
#[derive(Default)]
struct CountingStore {
    inner: InMemoryStore,
    writes: AtomicUsize,
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

async fn open(store: Arc<dyn KeyValueStore>) -> StudySession {
    let storage = Storage { slots: store };
    AppServices::from_parts(&StaticCatalog::new(document()), storage, "devinterview_progress")
        .await
        .expect("bootstrap")
        .into_session()
}

#[tokio::test]
async fn progress_scenario_matches_expected_percentages() {
    let mut session = open(Arc::new(InMemoryStore::new())).await;
    session.toggle_read("javascript", QuestionId::new(1)).await.unwrap();
    session.toggle_read("javascript", QuestionId::new(2)).await.unwrap();

    assert_eq!(
        session.topic_progress("javascript"),
        ProgressStats { read: 2, total: 3, pct: 67 }
    );
    assert_eq!(
        session.total_progress(),
        ProgressStats { read: 2, total: 5, pct: 40 }
    );
    assert_eq!(
        session.topic_progress("nonexistent-topic"),
        ProgressStats { read: 0, total: 0, pct: 0 }
    );
}

#[tokio::test]
async fn toggle_twice_restores_state_and_persisted_value() {
    let store = Arc::new(InMemoryStore::new());
    let mut session = open(store.clone()).await;
    session.toggle_read("css", QuestionId::new(2)).await.unwrap();
    let before = store.get("devinterview_progress").await.unwrap();

    let first = session.toggle_read("css", QuestionId::new(1)).await.unwrap();
    let second = session.toggle_read("css", QuestionId::new(1)).await.unwrap();
    assert!(first.read);
    assert!(!second.read);
    assert!(!session.is_read("css", QuestionId::new(1)));
    assert_eq!(store.get("devinterview_progress").await.unwrap(), before);
}

#[tokio::test]
async fn mark_topic_read_writes_once() {
    let store = Arc::new(CountingStore::default());
    let mut session = open(store.clone()).await;

    let outcome = session.mark_topic_read("javascript").await.unwrap();
    assert!(outcome.is_saved());
    assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    assert_eq!(session.topic_progress("javascript").read, 3);

    session.mark_topic_read("javascript").await.unwrap();
    assert_eq!(session.topic_progress("javascript").read, 3);
}

#[tokio::test]
async fn mark_topic_read_rejects_unknown_topic() {
    let mut session = open(Arc::new(InMemoryStore::new())).await;
    let err = session.mark_topic_read("rust").await.unwrap_err();
    assert!(matches!(err, SessionError::UnknownTopic(id) if id == "rust"));
}

#[tokio::test]
async fn failed_writes_are_reported_but_state_survives() {
    let store = Arc::new(FullStore::default());
    let mut session = open(store.clone()).await;

    let outcome = session.toggle_read("css", QuestionId::new(1)).await.unwrap();
    assert!(outcome.read);
    assert!(matches!(
        outcome.persist,
        PersistOutcome::Dropped(StorageError::Rejected(_))
    ));
    assert!(session.is_read("css", QuestionId::new(1)));
    assert_eq!(session.topic_progress("css").read, 1);
    assert_eq!(store.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn progress_survives_restart() {
    let store = Arc::new(InMemoryStore::new());
    {
        let mut session = open(store.clone()).await;
        session.toggle_read("javascript", QuestionId::new(3)).await.unwrap();
        session.mark_topic_read("css").await.unwrap();
    }

    let session = open(store).await;
    assert!(session.is_read("javascript", QuestionId::new(3)));
    assert!(!session.is_read("javascript", QuestionId::new(1)));
    assert_eq!(session.topic_progress("css").read, 2);
}

#[tokio::test]
async fn stale_stored_ids_do_not_break_statistics() {
    let store = InMemoryStore::new().with_slot(
        "devinterview_progress",
        r#"{"css":{"1":true,"2":true,"99":true},"dropped-topic":{"1":true}}"#,
    );
    let session = open(Arc::new(store)).await;

    let css = session.topic_progress("css");
    assert!(css.read <= css.total);
    assert_eq!(css.pct, 100);
    assert_eq!(session.total_progress(), ProgressStats { read: 2, total: 5, pct: 40 });
}

#[tokio::test]
async fn search_flex_hits_one_css_answer() {
    let session = open(Arc::new(InMemoryStore::new())).await;
    let results = session.search("flex");
    assert_eq!(results.len(), 1);

    let groups = results.group_by_topic();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].topic_id.as_str(), "css");
    assert_eq!(groups[0].entries.len(), 1);
}

#[tokio::test]
async fn search_ignores_case_and_reads_examples() {
    let session = open(Arc::new(InMemoryStore::new())).await;
    let upper: Vec<_> = session
        .search("CLOSURE")
        .matches()
        .iter()
        .map(|e| e.question().id())
        .collect();
    let lower: Vec<_> = session
        .search("closure")
        .matches()
        .iter()
        .map(|e| e.question().id())
        .collect();
    assert_eq!(upper, lower);

    let example_only = session.search("queuemicrotask");
    assert_eq!(example_only.len(), 1);
    assert_eq!(example_only.matches()[0].topic_id().as_str(), "javascript");
}

#[tokio::test]
async fn restore_tolerates_unreadable_store() {
    let tracker = ProgressTracker::restore(Arc::new(FullStore::default()), "slot").await;
    assert!(tracker.progress().is_empty());
}

#[tokio::test]
async fn invalid_catalog_is_fatal() {
    let mut bad = document();
    bad.topics.push(Topic::new(TopicId::new("css"), "CSS again", "#", Vec::new()));

    let result = AppServices::from_parts(
        &StaticCatalog::new(bad),
        Storage::in_memory(),
        "devinterview_progress",
    )
    .await;
    assert!(matches!(result, Err(services::AppServicesError::Catalog(_))));
}
