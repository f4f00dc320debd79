//! Upstream indicator provider boundary.
//!
//! # Responsibility
//! - Abstract the World Bank HTTP API behind [`IndicatorSource`] so the
//!   service can be exercised with fakes.
//! - Convert the provider's `[header, records]` payload into a
//!   [`NewCollection`](crate::model::collection::NewCollection).
//!
//! # Invariants
//! - Fetch failures are reported to the caller, never retried here.

use thiserror::Error;

mod client;
mod normalizer;

pub use client::{UpstreamConfig, WorldBankClient, DATE_RANGE, PAGE_SIZE};
pub use normalizer::{normalize, normalize_at, value_to_text, NormalizeError};

/// Decoded two-element JSON document returned by the provider.
pub type RawPayload = serde_json::Value;

/// Transport-level failure while talking to the provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("request to `{url}` failed: {message}")]
    Network { url: String, message: String },
    #[error("provider returned http {status} for `{url}`")]
    Status { url: String, status: u16 },
    #[error("provider returned undecodable json for `{url}`: {message}")]
    Decode { url: String, message: String },
}

/// Source of raw indicator time series.
pub trait IndicatorSource: Send + Sync {
    /// Short name used in log events.
    fn name(&self) -> &str;

    /// Fetches all countries' series for `indicator`.
    fn fetch(&self, indicator: &str) -> Result<RawPayload, UpstreamError>;
}
