use std::path::PathBuf;
use std::sync::Arc;

use storage::repository::Storage;
use storage::{CatalogSource, JsonFileCatalog};

use crate::error::AppServicesError;
use crate::progress_tracker::DEFAULT_PROGRESS_SLOT;
use crate::study_session::StudySession;

/// Where the session's inputs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesConfig {
    pub catalog_path: PathBuf,
    pub db_url: String,
    pub progress_slot: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("questions.json"),
            db_url: "sqlite://prep.sqlite3".to_owned(),
            progress_slot: DEFAULT_PROGRESS_SLOT.to_owned(),
        }
    }
}

/// Assembles the storage backend and the study session.
pub struct AppServices {
    session: StudySession,
}

impl AppServices {
    /// Build services from a JSON catalog file and `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog cannot be loaded or the
    /// database cannot be opened. Stored progress problems are not errors.
    pub async fn bootstrap(config: &ServicesConfig) -> Result<Self, AppServicesError> {
        let source = JsonFileCatalog::new(&config.catalog_path);
        let storage = Storage::sqlite(&config.db_url).await?;
        Self::from_parts(&source, storage, &config.progress_slot).await
    }

    /// Build services from any catalog source and storage backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the catalog cannot be loaded.
    pub async fn from_parts(
        source: &dyn CatalogSource,
        storage: Storage,
        progress_slot: &str,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(source.load().await?);
        let session =
            StudySession::open(catalog, storage.slots, progress_slot).await;
        tracing::info!(
            topics = session.catalog().topic_count(),
            questions = session.catalog().question_count(),
            slot = progress_slot,
            "study session ready"
        );
        Ok(Self { session })
    }

    #[must_use]
    pub fn into_session(self) -> StudySession {
        self.session
    }
}
