//! Default implementation of the `ArchiveService` trait.
//!
//! A save runs the archiver and the extractor concurrently and only writes a
//! record once both have succeeded. Any snapshot written for a save that
//! does not end in a record is removed again.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::{PageArchiver, PageExtractor};
use crate::db::Store;
use crate::models::{NewSite, Site};
use crate::services::archive_service::{ArchiveError, ArchiveService};

pub struct DefaultArchiveService {
    store: Store,
    archiver: Arc<dyn PageArchiver>,
    extractor: Arc<dyn PageExtractor>,
    saved_pages_path: PathBuf,
}

impl DefaultArchiveService {
    #[must_use]
    pub fn new(
        store: Store,
        archiver: Arc<dyn PageArchiver>,
        extractor: Arc<dyn PageExtractor>,
        saved_pages_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            archiver,
            extractor,
            saved_pages_path: saved_pages_path.into(),
        }
    }

    async fn discard_snapshot(path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await
            && e.kind() != ErrorKind::NotFound
        {
            warn!(path = %path.display(), error = %e, "Failed to remove orphaned snapshot");
        }
    }
}

/// Accepts absolute http(s) URLs only.
fn validate_url(raw: &str) -> Result<&str, ArchiveError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ArchiveError::InvalidUrl("URL cannot be empty".to_string()));
    }

    let parsed = url::Url::parse(trimmed)
        .map_err(|e| ArchiveError::InvalidUrl(format!("{trimmed}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(trimmed),
        scheme => Err(ArchiveError::InvalidUrl(format!(
            "{trimmed}: unsupported scheme '{scheme}'"
        ))),
    }
}

#[async_trait]
impl ArchiveService for DefaultArchiveService {
    async fn save(&self, url: &str, tags: &[String]) -> Result<Site, ArchiveError> {
        let url = validate_url(url)?;

        if self.store.find_site_by_url(url).await?.is_some() {
            return Err(ArchiveError::DuplicateUrl(url.to_string()));
        }

        let (archived, extracted) = tokio::join!(
            self.archiver.archive(url, &self.saved_pages_path),
            self.extractor.extract(url),
        );

        let saved_path = archived.map_err(|e| ArchiveError::Archival(format!("{e:#}")));
        let page = extracted.map_err(|e| ArchiveError::Extraction(format!("{e:#}")));

        let (saved_path, page) = match (saved_path, page) {
            (Ok(path), Ok(page)) => (path, page),
            (Ok(path), Err(e)) => {
                Self::discard_snapshot(&path).await;
                return Err(e);
            }
            (Err(e), _) => return Err(e),
        };

        let new_site = NewSite {
            url: url.to_string(),
            title: page.title,
            tags: tags.to_vec(),
            content: page.text,
            saved_path: saved_path.to_string_lossy().into_owned(),
        };

        let site = match self.store.create_site(&new_site).await {
            Ok(site) => site,
            Err(e) => {
                Self::discard_snapshot(&saved_path).await;
                return Err(e.into());
            }
        };

        metrics::counter!("sites_saved_total").increment(1);
        info!(
            id = site.id,
            url = %site.url,
            title = %site.title,
            tags = %site.tags,
            path = %site.saved_path,
            "Saved site"
        );

        Ok(site)
    }

    async fn get_site(&self, id: i32) -> Result<Site, ArchiveError> {
        self.store
            .get_site(id)
            .await?
            .ok_or(ArchiveError::NotFound(id))
    }

    async fn get_original_url(&self, id: i32) -> Result<String, ArchiveError> {
        self.store
            .get_site_url(id)
            .await?
            .ok_or(ArchiveError::NotFound(id))
    }

    async fn read_snapshot(&self, id: i32) -> Result<Vec<u8>, ArchiveError> {
        let site = self.get_site(id).await?;

        match tokio::fs::read(&site.saved_path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ArchiveError::SnapshotMissing {
                id,
                path: site.saved_path,
            }),
            Err(e) => Err(ArchiveError::Internal(format!(
                "Failed to read {}: {e}",
                site.saved_path
            ))),
        }
    }
}
