//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Multi-row writes run inside one transaction.
//! - Repository APIs return semantic errors (`NotFound`,
//!   `DuplicateIndicator`) in addition to DB transport errors.

pub mod collection_repo;
