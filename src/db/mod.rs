use crate::models::{NewSite, Site};
use anyhow::{Context, Result};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement,
};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::sites::SiteQuery;

/// Errors surfaced by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("A site with URL {0} is already saved")]
    DuplicateUrl(String),

    #[error("Stored data is invalid: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Handle to the record store. Cloning is cheap, clones share one pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = is_in_memory(db_url);

        if !in_memory {
            let path_str = sqlite_file_path(db_url);
            if let Some(parent) = Path::new(path_str).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let pool = PoolSettings::for_url(in_memory, max_connections, min_connections);

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .max_connections(pool.max_connections)
            .min_connections(pool.min_connections)
            .idle_timeout(pool.idle_timeout)
            .max_lifetime(pool.max_lifetime)
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        if !in_memory {
            // Readers keep working on the last committed state while a save
            // is being written.
            let backend = conn.get_database_backend();
            conn.execute(Statement::from_string(
                backend,
                "PRAGMA journal_mode=WAL".to_string(),
            ))
            .await?;
        }

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            pool.min_connections, pool.max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn site_repo(&self) -> repositories::sites::SiteRepository {
        repositories::sites::SiteRepository::new(self.conn.clone())
    }

    pub async fn create_site(&self, site: &NewSite) -> Result<Site, StoreError> {
        self.site_repo().create(site).await
    }

    pub async fn get_site(&self, id: i32) -> Result<Option<Site>, StoreError> {
        self.site_repo().get(id).await
    }

    pub async fn get_site_url(&self, id: i32) -> Result<Option<String>, StoreError> {
        self.site_repo().get_url(id).await
    }

    pub async fn find_site_by_url(&self, url: &str) -> Result<Option<Site>, StoreError> {
        self.site_repo().find_by_url(url).await
    }

    pub async fn count_sites(&self) -> Result<u64, StoreError> {
        self.site_repo().count().await
    }

    pub async fn query_sites(&self, query: &SiteQuery<'_>) -> Result<Vec<Site>, StoreError> {
        self.site_repo().query(query).await
    }
}

/// Lifetime that outlasts any process, used where recycling a connection
/// would lose data.
const NEVER_RECYCLE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PoolSettings {
    max_connections: u32,
    min_connections: u32,
    idle_timeout: Duration,
    max_lifetime: Duration,
}

impl PoolSettings {
    /// Each in-memory connection is a separate database, so an in-memory pool
    /// holds exactly one connection and never closes or replaces it.
    const fn for_url(in_memory: bool, max_connections: u32, min_connections: u32) -> Self {
        if in_memory {
            Self {
                max_connections: 1,
                min_connections: 1,
                idle_timeout: NEVER_RECYCLE,
                max_lifetime: NEVER_RECYCLE,
            }
        } else {
            Self {
                max_connections,
                min_connections,
                idle_timeout: Duration::from_secs(300),
                max_lifetime: Duration::from_secs(600),
            }
        }
    }
}

fn is_in_memory(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

fn sqlite_file_path(db_url: &str) -> &str {
    let path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    path.split('?').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(sqlite_file_path("sqlite:data/recall.db"), "data/recall.db");
        assert_eq!(
            sqlite_file_path("sqlite:///var/lib/recall.db?mode=rwc"),
            "/var/lib/recall.db"
        );
        assert_eq!(sqlite_file_path("recall.db"), "recall.db");
    }

    #[test]
    fn test_in_memory_pool_is_never_recycled() {
        let pool = PoolSettings::for_url(true, 5, 1);
        assert_eq!(pool.max_connections, 1);
        assert_eq!(pool.min_connections, 1);
        assert_eq!(pool.idle_timeout, NEVER_RECYCLE);
        assert_eq!(pool.max_lifetime, NEVER_RECYCLE);

        let pool = PoolSettings::for_url(false, 5, 2);
        assert_eq!(pool.max_connections, 5);
        assert_eq!(pool.min_connections, 2);
        assert!(pool.max_lifetime < NEVER_RECYCLE);
    }

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:recall?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite:data/recall.db"));
    }
}
