//! Collection use-case service.
//!
//! # Responsibility
//! - Gate imports on the indicator catalog before any network or storage work.
//! - Import on demand: reuse a stored collection, else fetch, normalize, insert.
//! - Translate repository outcomes into client vs server failures.
//!
//! # Invariants
//! - Imports of one indicator are serialized; a concurrent duplicate resolves
//!   to the already stored collection.
//! - The connection guard is held only for the duration of one store call and
//!   never across the upstream fetch.

use crate::catalog;
use crate::db::DbError;
use crate::model::collection::{
    CollectionDetail, CollectionId, CollectionSummary, EntryValue, YearEntries,
};
use crate::query::YearFilter;
use crate::repo::collection_repo::{
    CollectionRepository, RepoError, RepoResult, SqliteCollectionRepository,
};
use crate::service::import_lock::ImportLocks;
use crate::upstream::{normalize, IndicatorSource, NormalizeError, UpstreamError};
use log::{error, info, warn};
use rusqlite::Connection;
use std::sync::Mutex;
use std::time::Instant;
use thiserror::Error;

/// Service error for collection use-cases.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Indicator code is not in the catalog.
    #[error("invalid indicator `{0}`")]
    InvalidIndicator(String),
    /// Target collection does not exist.
    #[error("collection {0} does not exist")]
    CollectionNotFound(CollectionId),
    /// Lookup matched no rows, or the filter text was not understood.
    #[error("no matching entries")]
    NoMatch,
    /// Provider could not be reached or answered with a failure.
    #[error("upstream failure: {0}")]
    Upstream(#[from] UpstreamError),
    /// Provider answered with an unexpected document shape.
    #[error("malformed upstream payload: {0}")]
    MalformedPayload(#[from] NormalizeError),
    /// Persistence-layer failure.
    #[error(transparent)]
    Repo(RepoError),
    /// A previous holder of the store lock panicked.
    #[error("store lock poisoned")]
    StorePoisoned,
}

impl ServiceError {
    /// Returns whether the failure is caused by caller input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidIndicator(_) | Self::CollectionNotFound(_) | Self::NoMatch
        )
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::CollectionNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result of an import request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Fetched from the provider and stored now.
    Created(CollectionDetail),
    /// Already cached; returned unchanged.
    Existing(CollectionDetail),
}

impl ImportOutcome {
    pub fn collection(&self) -> &CollectionDetail {
        match self {
            Self::Created(detail) | Self::Existing(detail) => detail,
        }
    }

    pub fn into_collection(self) -> CollectionDetail {
        match self {
            Self::Created(detail) | Self::Existing(detail) => detail,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Collection service over a shared SQLite connection.
pub struct CollectionService {
    conn: Mutex<Connection>,
    source: Box<dyn IndicatorSource>,
    import_locks: ImportLocks,
}

impl CollectionService {
    /// Creates a service from a migrated connection and an upstream source.
    pub fn new(conn: Connection, source: impl IndicatorSource + 'static) -> Self {
        Self {
            conn: Mutex::new(conn),
            source: Box::new(source),
            import_locks: ImportLocks::default(),
        }
    }

    /// Lists all stored collections; empty when nothing has been imported.
    pub fn list_collections(&self) -> ServiceResult<Vec<CollectionSummary>> {
        self.with_repo(|repo| repo.list_collections())
    }

    /// Returns the collection for `indicator`, importing it first if needed.
    pub fn import_collection(&self, indicator: &str) -> ServiceResult<ImportOutcome> {
        if !catalog::is_valid(indicator) {
            warn!(
                "event=collection_import module=service status=rejected error_code=invalid_indicator"
            );
            return Err(ServiceError::InvalidIndicator(indicator.to_string()));
        }

        let slot = self.import_locks.slot(indicator);
        let _import_guard = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(existing) = self.stored_for_indicator(indicator)? {
            info!(
                "event=collection_import module=service status=ok indicator={indicator} collection_id={} cached=true",
                existing.collection_id
            );
            return Ok(ImportOutcome::Existing(existing));
        }

        let started_at = Instant::now();
        info!(
            "event=collection_import module=service status=start indicator={indicator} source={}",
            self.source.name()
        );
        let payload = self.source.fetch(indicator).map_err(|err| {
            error!(
                "event=collection_import module=service status=error indicator={indicator} error_code=upstream_failed error={err}"
            );
            ServiceError::from(err)
        })?;
        let collection = normalize(&payload).map_err(|err| {
            error!(
                "event=collection_import module=service status=error indicator={indicator} error_code=malformed_payload error={err}"
            );
            ServiceError::from(err)
        })?;

        match self.with_repo(|repo| repo.insert_collection(&collection)) {
            Ok(collection_id) => {
                let detail = self
                    .with_repo(|repo| repo.get_collection(collection_id))?
                    .ok_or(ServiceError::CollectionNotFound(collection_id))?;
                info!(
                    "event=collection_import module=service status=ok indicator={indicator} collection_id={collection_id} entries={} cached=false duration_ms={}",
                    detail.entries.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(ImportOutcome::Created(detail))
            }
            Err(ServiceError::Repo(RepoError::DuplicateIndicator(_))) => {
                warn!(
                    "event=collection_import module=service status=conflict indicator={indicator}"
                );
                self.stored_for_indicator(indicator)?
                    .map(ImportOutcome::Existing)
                    .ok_or(ServiceError::NoMatch)
            }
            Err(err) => Err(err),
        }
    }

    /// Gets one collection with all of its entries.
    pub fn get_collection(&self, id: CollectionId) -> ServiceResult<CollectionDetail> {
        self.with_repo(|repo| repo.get_collection(id))?
            .ok_or(ServiceError::CollectionNotFound(id))
    }

    /// Deletes one collection with all of its entries.
    pub fn delete_collection(&self, id: CollectionId) -> ServiceResult<()> {
        self.with_repo(|repo| repo.delete_collection(id))
    }

    /// Gets the value of one country for one year.
    pub fn get_entry(
        &self,
        id: CollectionId,
        year: i32,
        country: &str,
    ) -> ServiceResult<EntryValue> {
        let year = year.to_string();
        self.with_repo(|repo| repo.get_entry(id, country, &year))?
            .ok_or(ServiceError::NoMatch)
    }

    /// Gets the entries of one year, optionally narrowed by a top/bottom filter.
    ///
    /// Unparseable filter text is reported as [`ServiceError::NoMatch`].
    pub fn entries_for_year(
        &self,
        id: CollectionId,
        year: i32,
        filter_text: Option<&str>,
    ) -> ServiceResult<YearEntries> {
        let filter = match filter_text {
            Some(text) => Some(YearFilter::parse(text).ok_or(ServiceError::NoMatch)?),
            None => None,
        };
        let year = year.to_string();
        self.with_repo(|repo| repo.entries_for_year(id, &year, filter.as_ref()))?
            .ok_or(ServiceError::NoMatch)
    }

    fn stored_for_indicator(&self, indicator: &str) -> ServiceResult<Option<CollectionDetail>> {
        self.with_repo(|repo| match repo.find_by_indicator(indicator)? {
            Some(header) => repo.get_collection(header.collection_id),
            None => Ok(None),
        })
    }

    fn with_repo<T>(
        &self,
        operation: impl FnOnce(&mut SqliteCollectionRepository<'_>) -> RepoResult<T>,
    ) -> ServiceResult<T> {
        let mut conn = self.conn.lock().map_err(|_| ServiceError::StorePoisoned)?;
        let mut repo = SqliteCollectionRepository::try_new(&mut conn)?;
        Ok(operation(&mut repo)?)
    }
}
