//! HTTP resource layer for the indicator cache.
//!
//! # Responsibility
//! - Map `/collections` routes onto [`CollectionService`] use-cases.
//! - Translate service failures into 400/500 responses.
//!
//! # Invariants
//! - Service calls run on the blocking pool; handlers never block the
//!   async workers.
//!
//! [`CollectionService`]: wbdata_core::CollectionService

mod error;
mod routes;

pub use error::ApiError;
pub use routes::{configure, EMPTY_COLLECTIONS_MESSAGE};
