//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate catalog, upstream and repository calls into use-case APIs.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod collection_service;
mod import_lock;
