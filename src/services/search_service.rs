//! Domain service for searching archived pages.
//!
//! Translates a search request into a text predicate and hands it to the
//! record store, which applies tag filters, ordering and the limit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::StoreError;
use crate::matching::MatchMode;
use crate::models::Site;

/// A search over one text field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,

    #[serde(default)]
    pub mode: MatchMode,

    /// Every tag must be present on a result.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Maximum number of results. Range checks happen at the API boundary.
    pub limit: usize,
}

impl SearchRequest {
    #[must_use]
    pub fn new(query: impl Into<String>, mode: MatchMode, limit: usize) -> Self {
        Self {
            query: query.into(),
            mode,
            tags: Vec::new(),
            limit,
        }
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Errors specific to search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<StoreError> for SearchError {
    fn from(err: StoreError) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for search.
#[async_trait::async_trait]
pub trait SearchService: Send + Sync {
    /// Searches the extracted page text, newest first.
    ///
    /// A blank query yields an empty list, not an error.
    async fn search_content(&self, request: &SearchRequest) -> Result<Vec<Site>, SearchError>;

    /// Searches page titles with the same semantics as
    /// [`SearchService::search_content`].
    async fn search_titles(&self, request: &SearchRequest) -> Result<Vec<Site>, SearchError>;
}
