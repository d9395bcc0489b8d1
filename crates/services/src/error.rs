//! Shared error types for the services crate.

use thiserror::Error;

use prep_core::{CatalogError, QuestionId, TopicId};
use storage::sqlite::SqliteInitError;

/// Errors emitted by `StudySession` commands that name a target explicitly.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
    #[error("topic {topic} has no question {question}")]
    UnknownQuestion { topic: TopicId, question: QuestionId },
    #[error("progress data is not valid: {0}")]
    InvalidProgress(#[from] serde_json::Error),
}

/// Errors emitted while bootstrapping app services. All of them are fatal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
