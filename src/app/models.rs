//! Data models for accessions, markers and paginated API responses
//!
//! Upstream records are stored exactly as received. A [`Marker`] keeps its
//! raw JSON object and exposes only the keys the canonical ordering needs, so
//! a sorted marker set serializes to the bytes the API sent, in the API's
//! field order and with every field it carried.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};

/// A chromosome-level dataset identifier from the upstream API
///
/// Only the fields the downloader needs are modelled; anything else the API
/// returns is ignored on read (the raw artifact keeps it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accession {
    /// Accession id, e.g. `NC_000001.10`
    pub id: String,
    /// Chromosome label, e.g. `1` or `MT`
    pub chromosome: String,
}

/// Error returned for a record that lacks the keys markers are sorted by
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid marker record: {reason}")]
pub struct InvalidMarker {
    pub reason: String,
}

/// A genomic position record identified by an RSID
///
/// `id`, `start` and `end` are read out of the record once; the record itself
/// is what gets written back.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Marker {
    id: String,
    start: i64,
    end: i64,
    record: Value,
}

impl Marker {
    /// Wrap a raw API record
    ///
    /// # Examples
    ///
    /// ```rust
    /// use marker_fetcher::app::Marker;
    /// use serde_json::json;
    ///
    /// let marker = Marker::from_record(json!({"id": "rs1", "start": 10.0, "end": 11}))?;
    /// assert_eq!(marker.start(), 10);
    /// assert_eq!(serde_json::to_string(&marker)?, r#"{"id":"rs1","start":10,"end":11}"#);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_record(mut record: Value) -> Result<Self, InvalidMarker> {
        normalize_numbers(&mut record);

        let id = record
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| InvalidMarker {
                reason: "missing string field 'id'".to_string(),
            })?
            .to_string();
        let position = |field: &str| {
            record
                .get(field)
                .and_then(Value::as_i64)
                .ok_or_else(|| InvalidMarker {
                    reason: format!("missing integer field '{}' on {}", field, id),
                })
        };
        let start = position("start")?;
        let end = position("end")?;

        Ok(Self {
            id,
            start,
            end,
            record,
        })
    }

    /// RSID-style identifier (`rs<digits>` or `i<digits>`)
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// The record as it will be stored
    pub fn record(&self) -> &Value {
        &self.record
    }
}

impl TryFrom<Value> for Marker {
    type Error = InvalidMarker;

    fn try_from(record: Value) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

impl Serialize for Marker {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.record.serialize(serializer)
    }
}

/// Largest integer an IEEE double holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Rewrite integral floats (`1.0`, `-0.0`) as integers, recursively
///
/// Published artifacts write such numbers without a fraction, so a record
/// must be normalized before it is stored or its bytes will not match.
pub fn normalize_numbers(value: &mut Value) {
    match value {
        Value::Number(number) if number.is_f64() => {
            if let Some(float) = number.as_f64() {
                if float.fract() == 0.0 && float.abs() <= MAX_SAFE_INTEGER {
                    *number = Number::from(float as i64);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_numbers),
        Value::Object(fields) => fields.values_mut().for_each(normalize_numbers),
        _ => {}
    }
}

/// Pagination links carried by every list response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    /// URL of the next page, `None` on the last page
    #[serde(default)]
    pub next: Option<String>,
}

/// A paginated response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub links: PageLinks,
}

impl<T> Page<T> {
    /// Whether this is the final page of the result set
    pub fn is_last(&self) -> bool {
        self.links.next.is_none()
    }
}

/// Outcome of a complete download run
///
/// Serialized with the camelCase keys consumers of the download endpoint
/// already depend on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Wall-clock duration of the run, floored to whole seconds
    pub runtime_duration_in_seconds: u64,
    /// Accession list downloads performed during acquisition
    pub accession_download_attempt_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn marker_json() -> &'static str {
        r#"{"id":"rs3094315","alternate_ids":[],"gene_names":["LINC01128"],"accession_id":"NC_000001.10","start":752565,"end":752566,"variants":[{"allele":"G","is_assayed":true}]}"#
    }

    #[test]
    fn test_marker_roundtrip_preserves_bytes() {
        let marker: Marker = serde_json::from_str(marker_json()).unwrap();
        assert_eq!(marker.id(), "rs3094315");
        assert_eq!(marker.start(), 752565);
        assert_eq!(marker.end(), 752566);

        let json = serde_json::to_string(&marker).unwrap();
        assert_eq!(json, marker_json());
    }

    #[test]
    fn test_marker_keeps_field_order_and_extra_fields() {
        let raw = r#"{"id":"rs1","accession_id":"NC_1","start":5,"end":6,"is_genotyped":true,"variants":[]}"#;
        let marker: Marker = serde_json::from_str(raw).unwrap();

        assert_eq!(serde_json::to_string(&marker).unwrap(), raw);
        assert_eq!(marker.record()["is_genotyped"], json!(true));
    }

    #[test]
    fn test_integral_floats_are_written_as_integers() {
        let raw = r#"{"id":"rs1","start":5.0,"end":6,"variants":[{"frequency":1.0,"score":0.25,"shift":-0.0}]}"#;
        let marker: Marker = serde_json::from_str(raw).unwrap();

        assert_eq!(marker.start(), 5);
        assert_eq!(
            serde_json::to_string(&marker).unwrap(),
            r#"{"id":"rs1","start":5,"end":6,"variants":[{"frequency":1,"score":0.25,"shift":0}]}"#
        );
    }

    #[test]
    fn test_marker_requires_sort_keys() {
        assert!(Marker::from_record(json!({"start": 1, "end": 2})).is_err());
        assert!(Marker::from_record(json!({"id": "rs1", "start": 1.5, "end": 2})).is_err());
        assert!(serde_json::from_str::<Marker>(r#"{"id":"rs1","start":1}"#).is_err());
    }

    #[test]
    fn test_accession_ignores_extra_fields() {
        let json = r#"{"id":"NC_000001.10","chromosome":"1","length":249250621}"#;
        let accession: Accession = serde_json::from_str(json).unwrap();
        assert_eq!(accession.id, "NC_000001.10");
        assert_eq!(accession.chromosome, "1");
    }

    #[test]
    fn test_page_links() {
        let json = r#"{"data":[],"links":{"next":"https://example.com/marker/?page=2"}}"#;
        let page: Page<Marker> = serde_json::from_str(json).unwrap();
        assert!(!page.is_last());

        let json = r#"{"data":[],"links":{"next":null}}"#;
        let page: Page<Marker> = serde_json::from_str(json).unwrap();
        assert!(page.is_last());
    }

    #[test]
    fn test_run_summary_serialization() {
        let summary = RunSummary {
            runtime_duration_in_seconds: 42,
            accession_download_attempt_count: 1,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(
            json,
            r#"{"runtimeDurationInSeconds":42,"accessionDownloadAttemptCount":1}"#
        );
    }
}
