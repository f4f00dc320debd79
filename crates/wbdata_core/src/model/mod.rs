//! Domain model for cached indicator collections.
//!
//! # Responsibility
//! - Define the collection/entry shapes shared by store, service and HTTP.
//! - Keep ownership one-directional: entries carry no back-reference, the
//!   owning collection is resolved by query.
//!
//! # Invariants
//! - A collection's indicator code is immutable once stored.
//! - Entries exist only as children of exactly one collection.

pub mod collection;
