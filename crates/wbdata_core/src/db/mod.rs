//! SQLite storage bootstrap.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the indicator cache.
//! - Create the `collections`/`entries` schema when it is absent.
//!
//! # Invariants
//! - Core code never reads/writes collections on a connection that has not
//!   been bootstrapped.

use thiserror::Error;

mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
