//! Collection repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist collections with their entries and read them back.
//! - Own id assignment and cascade deletion.
//!
//! # Invariants
//! - New ids are `MAX(collection_id) + 1`, or 1 on an empty store.
//! - At most one collection per indicator code (`UNIQUE` constraint).
//! - A collection and its entries are inserted or deleted atomically.
//! - Year queries never return entries holding the missing-data marker.

use crate::db::DbError;
use crate::model::collection::{
    CollectionDetail, CollectionId, CollectionSummary, Entry, EntryValue, NewCollection,
    YearEntries, MISSING_VALUE,
};
use crate::query::{SortDirection, YearFilter};
use log::{debug, info};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use thiserror::Error;

const HEADER_SELECT_SQL: &str = "SELECT
    collection_id,
    indicator_id,
    indicator_val,
    creation_time
FROM collections";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for collection persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("collection not found: {0}")]
    NotFound(CollectionId),
    #[error("a collection for indicator `{0}` already exists")]
    DuplicateIndicator(String),
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Collection metadata without entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionHeader {
    pub collection_id: CollectionId,
    pub indicator: String,
    pub indicator_value: String,
    pub creation_time: String,
}

/// Repository interface for collection storage.
pub trait CollectionRepository {
    /// Lists all collections in store order.
    fn list_collections(&self) -> RepoResult<Vec<CollectionSummary>>;
    /// Finds the collection imported for `indicator`, if any.
    fn find_by_indicator(&self, indicator: &str) -> RepoResult<Option<CollectionHeader>>;
    /// Persists a collection and all of its entries; returns the new id.
    fn insert_collection(&mut self, collection: &NewCollection) -> RepoResult<CollectionId>;
    /// Gets one collection with all entries.
    fn get_collection(&self, id: CollectionId) -> RepoResult<Option<CollectionDetail>>;
    /// Deletes one collection and its entries.
    fn delete_collection(&mut self, id: CollectionId) -> RepoResult<()>;
    /// Gets the entry for an exact collection/country/year match.
    fn get_entry(
        &self,
        id: CollectionId,
        country: &str,
        year: &str,
    ) -> RepoResult<Option<EntryValue>>;
    /// Gets one year of entries, optionally sorted and truncated.
    ///
    /// Returns `None` when no entry matches.
    fn entries_for_year(
        &self,
        id: CollectionId,
        year: &str,
        filter: Option<&YearFilter>,
    ) -> RepoResult<Option<YearEntries>>;
}

/// SQLite-backed collection repository.
pub struct SqliteCollectionRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCollectionRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in ["collections", "entries"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }

    fn header(&self, id: CollectionId) -> RepoResult<Option<CollectionHeader>> {
        let header = self
            .conn
            .query_row(
                &format!("{HEADER_SELECT_SQL} WHERE collection_id = ?1;"),
                [id],
                parse_header_row,
            )
            .optional()?;
        Ok(header)
    }
}

impl CollectionRepository for SqliteCollectionRepository<'_> {
    fn list_collections(&self) -> RepoResult<Vec<CollectionSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT collection_id, indicator_id, creation_time
             FROM collections;",
        )?;
        let mut rows = stmt.query([])?;
        let mut collections = Vec::new();
        while let Some(row) = rows.next()? {
            collections.push(CollectionSummary::new(
                row.get("collection_id")?,
                row.get("indicator_id")?,
                row.get("creation_time")?,
            ));
        }
        Ok(collections)
    }

    fn find_by_indicator(&self, indicator: &str) -> RepoResult<Option<CollectionHeader>> {
        let header = self
            .conn
            .query_row(
                &format!("{HEADER_SELECT_SQL} WHERE indicator_id = ?1;"),
                [indicator],
                parse_header_row,
            )
            .optional()?;
        Ok(header)
    }

    fn insert_collection(&mut self, collection: &NewCollection) -> RepoResult<CollectionId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let collection_id: CollectionId = tx.query_row(
            "SELECT COALESCE(MAX(collection_id), 0) + 1 FROM collections;",
            [],
            |row| row.get(0),
        )?;

        let inserted = tx.execute(
            "INSERT INTO collections (collection_id, indicator_id, indicator_val, creation_time)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                collection_id,
                collection.indicator.as_str(),
                collection.indicator_value.as_str(),
                collection.creation_time.as_str(),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(RepoError::DuplicateIndicator(collection.indicator.clone()));
            }
            Err(err) => return Err(err.into()),
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO entries (collection_id, country, date, value)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            for entry in &collection.entries {
                stmt.execute(params![
                    collection_id,
                    entry.country.as_str(),
                    entry.date.as_str(),
                    entry.value.as_str(),
                ])?;
            }
        }

        tx.commit()?;
        info!(
            "event=collection_insert module=repo status=ok collection_id={collection_id} indicator={} entries={}",
            collection.indicator,
            collection.entries.len()
        );
        Ok(collection_id)
    }

    fn get_collection(&self, id: CollectionId) -> RepoResult<Option<CollectionDetail>> {
        let Some(header) = self.header(id)? else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT country, date, value
             FROM entries
             WHERE collection_id = ?1
             ORDER BY entry_id ASC;",
        )?;
        let entries = collect_entries(stmt.query([id])?)?;

        Ok(Some(CollectionDetail {
            collection_id: header.collection_id,
            indicator: header.indicator,
            indicator_value: header.indicator_value,
            creation_time: header.creation_time,
            entries,
        }))
    }

    fn delete_collection(&mut self, id: CollectionId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed_entries = tx.execute("DELETE FROM entries WHERE collection_id = ?1;", [id])?;
        let removed = tx.execute("DELETE FROM collections WHERE collection_id = ?1;", [id])?;
        if removed == 0 {
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        info!(
            "event=collection_delete module=repo status=ok collection_id={id} entries={removed_entries}"
        );
        Ok(())
    }

    fn get_entry(
        &self,
        id: CollectionId,
        country: &str,
        year: &str,
    ) -> RepoResult<Option<EntryValue>> {
        let value = self
            .conn
            .query_row(
                "SELECT e.collection_id, c.indicator_id, e.country, e.date, e.value
                 FROM entries e
                 INNER JOIN collections c ON c.collection_id = e.collection_id
                 WHERE e.collection_id = ?1
                   AND e.country = ?2
                   AND e.date = ?3
                 ORDER BY e.entry_id ASC
                 LIMIT 1;",
                params![id, country, year],
                |row| {
                    Ok(EntryValue {
                        collection_id: row.get(0)?,
                        indicator: row.get(1)?,
                        country: row.get(2)?,
                        year: row.get(3)?,
                        value: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(value)
    }

    fn entries_for_year(
        &self,
        id: CollectionId,
        year: &str,
        filter: Option<&YearFilter>,
    ) -> RepoResult<Option<YearEntries>> {
        let mut sql = String::from(
            "SELECT country, date, value
             FROM entries
             WHERE collection_id = ?1
               AND date = ?2
               AND value <> ?3",
        );
        match filter.map(|filter| filter.direction) {
            Some(SortDirection::Descending) => {
                sql.push_str(" ORDER BY CAST(value AS REAL) DESC, country ASC LIMIT ?4")
            }
            Some(SortDirection::Ascending) => {
                sql.push_str(" ORDER BY CAST(value AS REAL) ASC, country ASC LIMIT ?4")
            }
            None => sql.push_str(" ORDER BY entry_id ASC LIMIT ?4"),
        }
        let limit = filter.map_or(-1, |filter| i64::from(filter.limit));
        debug!(
            "event=year_query module=repo collection_id={id} year={year} filter={}",
            filter.map_or_else(|| "none".to_string(), ToString::to_string)
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let entries = collect_entries(stmt.query(params![id, year, MISSING_VALUE, limit])?)?;
        if entries.is_empty() {
            return Ok(None);
        }

        let Some(header) = self.header(id)? else {
            return Ok(None);
        };
        Ok(Some(YearEntries {
            indicator: header.indicator,
            indicator_value: header.indicator_value,
            entries,
        }))
    }
}

fn parse_header_row(row: &Row<'_>) -> rusqlite::Result<CollectionHeader> {
    Ok(CollectionHeader {
        collection_id: row.get("collection_id")?,
        indicator: row.get("indicator_id")?,
        indicator_value: row.get("indicator_val")?,
        creation_time: row.get("creation_time")?,
    })
}

fn collect_entries(mut rows: rusqlite::Rows<'_>) -> RepoResult<Vec<Entry>> {
    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        entries.push(Entry {
            country: row.get("country")?,
            date: row.get("date")?,
            value: row.get("value")?,
        });
    }
    Ok(entries)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
