//! External collaborators used when saving a page.

pub mod monolith;
pub mod page;

pub use monolith::MonolithArchiver;
pub use page::HttpPageExtractor;

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Title and plain text pulled out of a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub text: String,
}

/// Produces a self-contained HTML snapshot of a URL.
#[async_trait]
pub trait PageArchiver: Send + Sync {
    /// Saves `url` into `output_dir` and returns the written file.
    async fn archive(&self, url: &str, output_dir: &Path) -> Result<PathBuf>;
}

/// Fetches a URL and extracts its title and plain text.
#[async_trait]
pub trait PageExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractedPage>;
}
