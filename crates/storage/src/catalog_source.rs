use std::path::{Path, PathBuf};

use async_trait::async_trait;
use prep_core::{Catalog, CatalogDocument, CatalogError};

/// Where the question bank comes from. Loaded once per session.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch and validate the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the document is missing, unreadable, or
    /// malformed. Callers treat every error as fatal.
    async fn load(&self) -> Result<Catalog, CatalogError>;
}

/// Reads a `{ "topics": [...] }` JSON document from disk.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn load(&self) -> Result<Catalog, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| {
                CatalogError::Unavailable(format!("{}: {err}", self.path.display()))
            })?;
        let catalog = Catalog::from_json(&raw)?;
        tracing::debug!(
            path = %self.path.display(),
            topics = catalog.topic_count(),
            questions = catalog.question_count(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

/// A catalog document held in memory, validated on every load.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    document: CatalogDocument,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(document: CatalogDocument) -> Self {
        Self { document }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load(&self) -> Result<Catalog, CatalogError> {
        Catalog::from_document(self.document.clone())
    }
}
