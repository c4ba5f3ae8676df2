use crate::entities::{prelude::*, sites};
use crate::matching::TextPredicate;
use crate::models::{NewSite, Site, TagFilter, TextField, normalize_tags};
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info};

use crate::db::StoreError;

/// Rows fetched per round trip while scanning for matches.
const SCAN_PAGE_SIZE: u64 = 256;

/// A filtered, newest-first scan over all sites.
pub struct SiteQuery<'a> {
    /// Field the predicate is evaluated against.
    pub field: TextField,

    pub predicate: &'a dyn TextPredicate,

    pub tags: &'a TagFilter,

    /// Maximum number of sites returned. Applied after ordering.
    pub limit: usize,
}

pub struct SiteRepository {
    conn: DatabaseConnection,
}

impl SiteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: sites::Model) -> Result<Site, StoreError> {
        let created_at = DateTime::parse_from_rfc3339(&model.created_at)
            .map_err(|e| {
                StoreError::Corrupt(format!(
                    "site {} has invalid created_at '{}': {e}",
                    model.id, model.created_at
                ))
            })?
            .with_timezone(&Utc);

        Ok(Site {
            id: model.id,
            url: model.url,
            title: model.title,
            tags: model.tags,
            content: model.content,
            saved_path: model.saved_path,
            created_at,
        })
    }

    pub async fn create(&self, site: &NewSite) -> Result<Site, StoreError> {
        let active_model = sites::ActiveModel {
            url: Set(site.url.clone()),
            title: Set(site.title.clone()),
            tags: Set(normalize_tags(&site.tags)),
            content: Set(site.content.clone()),
            saved_path: Set(site.saved_path.clone()),
            created_at: Set(format_timestamp(Utc::now())),
            ..Default::default()
        };

        // The UNIQUE index on url makes concurrent inserts of one URL race
        // safely: exactly one of them gets past this point.
        let model = active_model
            .insert(&self.conn)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    StoreError::DuplicateUrl(site.url.clone())
                }
                _ => StoreError::Database(err),
            })?;

        info!(id = model.id, url = %model.url, "Site record created");
        Self::map_model(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Site>, StoreError> {
        Sites::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(Self::map_model)
            .transpose()
    }

    pub async fn get_url(&self, id: i32) -> Result<Option<String>, StoreError> {
        let url = Sites::find_by_id(id)
            .select_only()
            .column(sites::Column::Url)
            .into_tuple::<String>()
            .one(&self.conn)
            .await?;

        Ok(url)
    }

    pub async fn find_by_url(&self, url: &str) -> Result<Option<Site>, StoreError> {
        Sites::find()
            .filter(sites::Column::Url.eq(url))
            .one(&self.conn)
            .await?
            .map(Self::map_model)
            .transpose()
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        Ok(Sites::find().count(&self.conn).await?)
    }

    /// Scans sites newest first (ties in insertion order) and keeps those
    /// passing both the tag filter and the text predicate.
    ///
    /// The scan runs in one transaction, so it sees a single snapshot even
    /// while other requests insert.
    pub async fn query(&self, query: &SiteQuery<'_>) -> Result<Vec<Site>, StoreError> {
        let mut matches = Vec::new();
        if query.limit == 0 {
            return Ok(matches);
        }

        let txn = self.conn.begin().await?;
        let mut scanned = 0usize;

        {
            let mut paginator = Sites::find()
                .order_by_desc(sites::Column::CreatedAt)
                .order_by_asc(sites::Column::Id)
                .paginate(&txn, SCAN_PAGE_SIZE);

            'scan: while let Some(page) = paginator.fetch_and_next().await? {
                for model in page {
                    scanned += 1;

                    if !query.tags.matches(&model.tags) {
                        continue;
                    }

                    let text = match query.field {
                        TextField::Content => model.content.as_str(),
                        TextField::Title => model.title.as_str(),
                    };
                    if !query.predicate.matches(text) {
                        continue;
                    }

                    matches.push(Self::map_model(model)?);
                    if matches.len() >= query.limit {
                        break 'scan;
                    }
                }
            }
        }

        txn.commit().await?;

        debug!(
            field = %query.field,
            scanned,
            matched = matches.len(),
            limit = query.limit,
            "Site scan finished"
        );

        Ok(matches)
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
