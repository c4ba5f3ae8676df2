//! Domain service for saving pages and reading them back.

use thiserror::Error;

use crate::db::StoreError;
use crate::models::Site;

/// Errors specific to archive operations.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL is already saved: {0}")]
    DuplicateUrl(String),

    #[error("Site {0} not found")]
    NotFound(i32),

    #[error("Archiving failed: {0}")]
    Archival(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Snapshot for site {id} is missing at {path}")]
    SnapshotMissing { id: i32, path: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ArchiveError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUrl(url) => Self::DuplicateUrl(url),
            other => Self::Database(other.to_string()),
        }
    }
}

/// Domain service trait for the archive.
#[async_trait::async_trait]
pub trait ArchiveService: Send + Sync {
    /// Snapshots `url`, extracts its title and text and records it.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::DuplicateUrl`] if the URL is already saved.
    /// Nothing is recorded unless both archiving and extraction succeed.
    async fn save(&self, url: &str, tags: &[String]) -> Result<Site, ArchiveError>;

    async fn get_site(&self, id: i32) -> Result<Site, ArchiveError>;

    async fn get_original_url(&self, id: i32) -> Result<String, ArchiveError>;

    /// Reads the archived HTML of a site.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::SnapshotMissing`] when the record exists but
    /// its file does not.
    async fn read_snapshot(&self, id: i32) -> Result<Vec<u8>, ArchiveError>;
}
