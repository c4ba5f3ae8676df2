use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::{HttpPageExtractor, MonolithArchiver, PageArchiver, PageExtractor};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    ArchiveService, DefaultArchiveService, SeaOrmSearchService, SearchService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub archive_service: Arc<dyn ArchiveService>,

    pub search_service: Arc<dyn SearchService>,
}

impl SharedState {
    /// Connects to the database and wires the production collaborators
    /// (`monolith` for snapshots, HTTP fetch for text extraction).
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let archiver = Arc::new(MonolithArchiver::from_config(&config.archive));
        let extractor = Arc::new(HttpPageExtractor::new(&config.archive)?);
        Self::with_collaborators(config, archiver, extractor).await
    }

    /// Same as [`SharedState::new`] with caller-supplied collaborators.
    pub async fn with_collaborators(
        config: Config,
        archiver: Arc<dyn PageArchiver>,
        extractor: Arc<dyn PageExtractor>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let archive_service = Arc::new(DefaultArchiveService::new(
            store.clone(),
            archiver,
            extractor,
            PathBuf::from(&config.archive.saved_pages_path),
        )) as Arc<dyn ArchiveService>;

        let search_service = Arc::new(SeaOrmSearchService::new(
            store.clone(),
            config.search.tag_match,
        )) as Arc<dyn SearchService>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            archive_service,
            search_service,
        })
    }
}
