//! Conversion of provider payloads into importable collections.
//!
//! # Invariants
//! - Indicator code/name come from the first record only.
//! - Every record becomes exactly one entry, null values included.

use crate::model::collection::{Entry, NewCollection, MISSING_VALUE};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Payload did not have the expected `[header, records]` structure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("payload is not a [header, records] array")]
    MissingRecords,
    #[error("payload contains no records")]
    EmptyRecords,
    #[error("record {index} is malformed: {message}")]
    InvalidRecord { index: usize, message: String },
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    indicator: RawLabel,
    country: RawLabel,
    date: String,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    #[serde(default)]
    id: Option<String>,
    value: String,
}

/// Normalizes `payload`, stamping the current UTC time.
pub fn normalize(payload: &Value) -> Result<NewCollection, NormalizeError> {
    normalize_at(payload, Utc::now())
}

/// Normalizes `payload` with an explicit creation time.
pub fn normalize_at(
    payload: &Value,
    created_at: DateTime<Utc>,
) -> Result<NewCollection, NormalizeError> {
    let records = match payload.as_array().map(Vec::as_slice) {
        Some([_header, records, ..]) => records
            .as_array()
            .ok_or(NormalizeError::MissingRecords)?,
        _ => return Err(NormalizeError::MissingRecords),
    };
    if records.is_empty() {
        return Err(NormalizeError::EmptyRecords);
    }

    let parsed = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            RawRecord::deserialize(record).map_err(|err| NormalizeError::InvalidRecord {
                index,
                message: err.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let first = &parsed[0];
    let indicator = first
        .indicator
        .id
        .clone()
        .ok_or_else(|| NormalizeError::InvalidRecord {
            index: 0,
            message: "indicator.id is missing".to_string(),
        })?;
    let indicator_value = first.indicator.value.clone();

    let entries = parsed
        .into_iter()
        .map(|record| {
            Entry::new(
                record.country.value,
                record.date,
                value_to_text(&record.value),
            )
        })
        .collect();

    Ok(NewCollection {
        indicator,
        indicator_value,
        creation_time: created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        entries,
    })
}

/// Renders a provider value the way it is persisted.
///
/// Nulls become [`MISSING_VALUE`]. Numbers are emitted as the exact text
/// the provider sent (`serde_json` is built with `arbitrary_precision`), so
/// neither rounding nor exponent rewriting happens.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => MISSING_VALUE.to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_at, value_to_text, NormalizeError};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn record(country: &str, date: &str, value: serde_json::Value) -> serde_json::Value {
        json!({
            "indicator": {"id": "NY.GDP.MKTP.CD", "value": "GDP (current US$)"},
            "country": {"id": "1A", "value": country},
            "countryiso3code": "ARB",
            "date": date,
            "value": value,
            "unit": "",
            "obs_status": "",
            "decimal": 0
        })
    }

    #[test]
    fn maps_header_and_records_into_collection() {
        let payload = json!([
            {"page": 1, "pages": 1, "per_page": 100, "total": 2},
            [
                record("Arab World", "2016", json!(2513935702899.65)),
                record("Aruba", "2016", json!(null)),
            ]
        ]);
        let created_at = Utc
            .with_ymd_and_hms(2019, 3, 1, 10, 20, 30)
            .single()
            .expect("fixed timestamp should be unambiguous");

        let collection = normalize_at(&payload, created_at)
            .expect("well-formed payload should normalize");

        assert_eq!(collection.indicator, "NY.GDP.MKTP.CD");
        assert_eq!(collection.indicator_value, "GDP (current US$)");
        assert_eq!(collection.creation_time, "2019-03-01T10:20:30Z");
        assert_eq!(collection.entries.len(), 2);
        assert_eq!(collection.entries[0].country, "Arab World");
        assert_eq!(collection.entries[0].value, "2513935702899.65");
        assert_eq!(collection.entries[1].value, "None");
    }

    #[test]
    fn rejects_error_documents_and_empty_pages() {
        let error_doc = json!([{"message": [{"id": "120", "value": "Invalid value"}]}]);
        assert_eq!(
            normalize_at(&error_doc, Utc::now()),
            Err(NormalizeError::MissingRecords)
        );

        let null_records = json!([{"page": 0}, null]);
        assert_eq!(
            normalize_at(&null_records, Utc::now()),
            Err(NormalizeError::MissingRecords)
        );

        let empty = json!([{"page": 1}, []]);
        assert_eq!(
            normalize_at(&empty, Utc::now()),
            Err(NormalizeError::EmptyRecords)
        );
    }

    #[test]
    fn reports_index_of_malformed_record() {
        let payload = json!([{}, [record("Chad", "2015", json!(1)), {"date": "2015"}]]);
        let err = normalize_at(&payload, Utc::now())
            .expect_err("record without indicator must be rejected");
        assert!(matches!(err, NormalizeError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn value_text_preserves_number_spelling() {
        assert_eq!(value_to_text(&json!(42)), "42");
        assert_eq!(value_to_text(&json!(12.5)), "12.5");
        assert_eq!(value_to_text(&json!(null)), "None");
        assert_eq!(value_to_text(&json!("7.1")), "7.1");
    }

    #[test]
    fn long_and_exponent_values_are_stored_verbatim() {
        let raw = r#"[
            {"page": 1, "pages": 1, "per_page": 100, "total": 5},
            [
                {"indicator": {"id": "AG.LND.FRST.K2", "value": "Forest area (sq. km)"},
                 "country": {"id": "A1", "value": "A"}, "date": "2016", "value": 96022237830509.45},
                {"indicator": {"id": "AG.LND.FRST.K2", "value": "Forest area (sq. km)"},
                 "country": {"id": "B1", "value": "B"}, "date": "2016", "value": 94.59566101628769},
                {"indicator": {"id": "AG.LND.FRST.K2", "value": "Forest area (sq. km)"},
                 "country": {"id": "C1", "value": "C"}, "date": "2016", "value": 1.2345678901234567},
                {"indicator": {"id": "AG.LND.FRST.K2", "value": "Forest area (sq. km)"},
                 "country": {"id": "D1", "value": "D"}, "date": "2016", "value": 5e-05},
                {"indicator": {"id": "AG.LND.FRST.K2", "value": "Forest area (sq. km)"},
                 "country": {"id": "E1", "value": "E"}, "date": "2016", "value": 0.00005}
            ]
        ]"#;
        let payload: serde_json::Value =
            serde_json::from_str(raw).expect("fixture should be valid json");

        let collection = normalize_at(&payload, Utc::now()).expect("payload should normalize");

        let values: Vec<_> = collection
            .entries
            .iter()
            .map(|entry| entry.value.as_str())
            .collect();
        assert_eq!(
            values,
            [
                "96022237830509.45",
                "94.59566101628769",
                "1.2345678901234567",
                "5e-05",
                "0.00005",
            ]
        );
    }
}
