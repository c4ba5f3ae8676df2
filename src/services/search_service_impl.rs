//! `SeaORM` implementation of the `SearchService` trait.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::db::{SiteQuery, Store};
use crate::matching::Matcher;
use crate::models::{Site, TagFilter, TagMatch, TextField};
use crate::services::search_service::{SearchError, SearchRequest, SearchService};

pub struct SeaOrmSearchService {
    store: Store,
    tag_match: TagMatch,
}

impl SeaOrmSearchService {
    #[must_use]
    pub const fn new(store: Store, tag_match: TagMatch) -> Self {
        Self { store, tag_match }
    }

    async fn search(
        &self,
        field: TextField,
        request: &SearchRequest,
    ) -> Result<Vec<Site>, SearchError> {
        let Some(matcher) = Matcher::new(&request.query, request.mode) else {
            debug!(%field, "Blank search query, nothing to match");
            return Ok(Vec::new());
        };

        let tags = TagFilter::new(self.tag_match, &request.tags);
        let query = SiteQuery {
            field,
            predicate: &matcher,
            tags: &tags,
            limit: request.limit,
        };

        let sites = self.store.query_sites(&query).await?;

        metrics::counter!(
            "searches_total",
            "field" => field.as_str(),
            "mode" => request.mode.as_str()
        )
        .increment(1);

        info!(
            %field,
            mode = %request.mode,
            query = %request.query.trim(),
            tags = ?request.tags,
            results = sites.len(),
            "Search completed"
        );

        Ok(sites)
    }
}

#[async_trait]
impl SearchService for SeaOrmSearchService {
    async fn search_content(&self, request: &SearchRequest) -> Result<Vec<Site>, SearchError> {
        self.search(TextField::Content, request).await
    }

    async fn search_titles(&self, request: &SearchRequest) -> Result<Vec<Site>, SearchError> {
        self.search(TextField::Title, request).await
    }
}
