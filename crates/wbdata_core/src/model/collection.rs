//! Collection and entry records.
//!
//! Field names double as the JSON wire names of the resource layer.

use serde::{Serialize, Serializer};

/// Store-assigned collection identifier (`max(id) + 1`, starting at 1).
pub type CollectionId = i64;

/// Textual marker stored for data points the provider reports as null.
pub const MISSING_VALUE: &str = "None";

/// One per-country/per-year data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub country: String,
    pub date: String,
    /// String-encoded number, or [`MISSING_VALUE`].
    pub value: String,
}

impl Entry {
    pub fn new(
        country: impl Into<String>,
        date: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            date: date.into(),
            value: value.into(),
        }
    }

    /// Returns whether the provider had no data for this point.
    pub fn is_missing(&self) -> bool {
        self.value == MISSING_VALUE
    }
}

/// Normalized import ready to be persisted; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCollection {
    pub indicator: String,
    pub indicator_value: String,
    /// ISO-8601 UTC, second precision, trailing `Z`.
    pub creation_time: String,
    pub entries: Vec<Entry>,
}

/// List item returned by the collection index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub location: String,
    pub collection_id: CollectionId,
    pub creation_time: String,
    pub indicator: String,
}

impl CollectionSummary {
    pub fn new(collection_id: CollectionId, indicator: String, creation_time: String) -> Self {
        Self {
            location: collection_location(collection_id),
            collection_id,
            creation_time,
            indicator,
        }
    }
}

/// Full collection with all of its entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionDetail {
    pub collection_id: CollectionId,
    pub indicator: String,
    pub indicator_value: String,
    pub creation_time: String,
    pub entries: Vec<Entry>,
}

/// Single country/year lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryValue {
    #[serde(serialize_with = "id_as_string")]
    pub collection_id: CollectionId,
    pub indicator: String,
    pub country: String,
    pub year: String,
    pub value: String,
}

/// Entries of one collection for one year, with indicator metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearEntries {
    pub indicator: String,
    pub indicator_value: String,
    pub entries: Vec<Entry>,
}

/// Relative location advertised for a collection.
///
/// The angle brackets are part of the published format; clients match on it.
pub fn collection_location(collection_id: CollectionId) -> String {
    format!("/<collections>/{collection_id}")
}

fn id_as_string<S: Serializer>(id: &CollectionId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id)
}
