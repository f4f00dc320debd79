//! Core domain logic for the World Bank indicator cache.
//! This crate is the single source of truth for collection invariants.

pub mod catalog;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod upstream;

pub use logging::{default_log_level, init_logging, logging_status, LogDestination};
pub use model::collection::{
    CollectionDetail, CollectionId, CollectionSummary, Entry, EntryValue, NewCollection,
    YearEntries, MISSING_VALUE,
};
pub use query::{SortDirection, YearFilter};
pub use repo::collection_repo::{
    CollectionHeader, CollectionRepository, RepoError, RepoResult, SqliteCollectionRepository,
};
pub use service::collection_service::{
    CollectionService, ImportOutcome, ServiceError, ServiceResult,
};
pub use upstream::{
    IndicatorSource, NormalizeError, RawPayload, UpstreamConfig, UpstreamError, WorldBankClient,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
