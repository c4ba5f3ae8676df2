pub mod archive_service;
pub use archive_service::{ArchiveError, ArchiveService};

pub mod archive_service_impl;
pub use archive_service_impl::DefaultArchiveService;

pub mod search_service;
pub use search_service::{SearchError, SearchRequest, SearchService};

pub mod search_service_impl;
pub use search_service_impl::SeaOrmSearchService;
