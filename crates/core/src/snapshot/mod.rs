//! Payload snapshots handed over by the capture-ingestion side.
//!
//! A snapshot maps category keys to their delivered rows. Two JSON shapes
//! are accepted:
//!
//! ```text
//! { "power": [ {..}, {..} ], "routing": [ .. ] }
//!
//! { "capturedAt": "2026-10-01T08:00:00Z",
//!   "categories": {
//!     "power": { "rows": [..], "summary": {..}, "debugLog": "..", "totalRows": 12000 }
//!   } }
//! ```
//!
//! Parsing is lenient the same way classification is: rows that are not
//! objects and categories of an unexpected shape are skipped with a warning
//! instead of failing the whole snapshot.

mod summary;

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::warn;
use serde_json::Value;

use crate::errors::{Error, Result};
use crate::values::{as_display_text, Record};

pub use summary::CategorySummary;

/// Rows and side data delivered for one category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPayload {
    pub rows: Vec<Record>,
    /// Pre-aggregated counts from the upstream capture tool; display hint only
    pub summary: Option<CategorySummary>,
    /// Raw tool output, passed through untouched
    pub debug_log: Option<String>,
    /// Server-side row total when `rows` is a bounded preview
    pub total_rows: Option<usize>,
}

impl CategoryPayload {
    pub fn from_rows(rows: Vec<Record>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// True when the delivered rows are a subset of a larger dataset.
    pub fn is_preview(&self) -> bool {
        self.total_rows.is_some_and(|total| total > self.rows.len())
    }

    fn from_value(key: &str, value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Self::from_rows(collect_rows(key, items))),
            Value::Object(mut object) => {
                let rows = match object.remove("rows").or_else(|| object.remove("data")) {
                    Some(Value::Array(items)) => collect_rows(key, items),
                    Some(Value::Null) | None => Vec::new(),
                    Some(_) => {
                        warn!("Category '{}' rows are not an array; treating as empty", key);
                        Vec::new()
                    }
                };
                let summary = object.get("summary").and_then(CategorySummary::from_value);
                let debug_log = ["debugLog", "debug_log", "log"]
                    .iter()
                    .find_map(|name| object.get(*name))
                    .and_then(|log| as_display_text(Some(log)));
                let total_rows = ["totalRows", "total_rows", "totalCount", "total"]
                    .iter()
                    .find_map(|name| object.get(*name))
                    .and_then(Value::as_f64)
                    .filter(|total| total.is_finite() && *total >= 0.0)
                    .map(|total| total as usize);
                Some(Self {
                    rows,
                    summary,
                    debug_log,
                    total_rows,
                })
            }
            Value::Null => Some(Self::default()),
            _ => {
                warn!("Category '{}' has an unsupported payload shape; skipped", key);
                None
            }
        }
    }
}

fn collect_rows(key: &str, items: Vec<Value>) -> Vec<Record> {
    let total = items.len();
    let rows: Vec<Record> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect();
    if rows.len() < total {
        warn!(
            "Category '{}': skipped {} rows that are not objects",
            key,
            total - rows.len()
        );
    }
    rows
}

/// In-memory snapshot of one capture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayloadSnapshot {
    pub captured_at: Option<DateTime<Utc>>,
    categories: BTreeMap<String, CategoryPayload>,
}

impl PayloadSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a category's payload.
    pub fn with_category(mut self, key: impl Into<String>, payload: CategoryPayload) -> Self {
        self.categories.insert(key.into(), payload);
        self
    }

    pub fn with_rows(self, key: impl Into<String>, rows: Vec<Record>) -> Self {
        self.with_category(key, CategoryPayload::from_rows(rows))
    }

    /// Builds a snapshot from parsed JSON.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(Error::Snapshot("root must be a JSON object".to_string()));
        };

        let captured_at = root
            .get("capturedAt")
            .and_then(Value::as_str)
            .and_then(|raw| match DateTime::parse_from_rfc3339(raw) {
                Ok(ts) => Some(ts.with_timezone(&Utc)),
                Err(e) => {
                    warn!("Ignoring unparsable capturedAt '{}': {}", raw, e);
                    None
                }
            });

        let categories = match root.remove("categories") {
            Some(Value::Object(categories)) => categories,
            Some(_) => {
                return Err(Error::Snapshot(
                    "'categories' must be an object keyed by category".to_string(),
                ))
            }
            None => {
                root.remove("capturedAt");
                root
            }
        };

        let categories = categories
            .into_iter()
            .filter_map(|(key, value)| {
                CategoryPayload::from_value(&key, value).map(|payload| (key, payload))
            })
            .collect();

        Ok(Self {
            captured_at,
            categories,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::io(path.display().to_string(), e))?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, key: &str) -> Option<&CategoryPayload> {
        self.categories.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.categories.contains_key(key)
    }

    /// Rows of a category; empty when the category is absent.
    pub fn rows(&self, key: &str) -> &[Record] {
        self.categories
            .get(key)
            .map(|payload| payload.rows.as_slice())
            .unwrap_or(&[])
    }

    /// Category keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_shape() {
        let snapshot = PayloadSnapshot::from_value(json!({
            "power": [{"Status": "Failed", "PowerMW": 5000}, {"Status": "OK", "PowerMW": 3000}],
            "routing": []
        }))
        .unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.rows("power").len(), 2);
        assert!(snapshot.rows("routing").is_empty());
        assert!(snapshot.contains("routing"));
        assert!(snapshot.rows("pcie").is_empty());
        assert_eq!(snapshot.captured_at, None);
    }

    #[test]
    fn test_full_shape() {
        let snapshot = PayloadSnapshot::from_value(json!({
            "capturedAt": "2026-10-01T08:00:00Z",
            "categories": {
                "ber": {
                    "rows": [{"Port": 1}],
                    "summary": {"critical_count": 4, "warningCount": "2"},
                    "debugLog": "ibdiagnet: 1 warning",
                    "totalRows": 5000
                },
                "pcie": {"data": [{"Link Width": "x8"}]}
            }
        }))
        .unwrap();

        assert!(snapshot.captured_at.is_some());
        let ber = snapshot.get("ber").unwrap();
        assert_eq!(ber.rows.len(), 1);
        assert_eq!(ber.debug_log.as_deref(), Some("ibdiagnet: 1 warning"));
        assert_eq!(ber.total_rows, Some(5000));
        assert!(ber.is_preview());
        let summary = ber.summary.as_ref().unwrap();
        assert_eq!(summary.critical_count, Some(4));
        assert_eq!(summary.warning_count, Some(2));
        assert_eq!(snapshot.rows("pcie").len(), 1);
    }

    #[test]
    fn test_lenient_rows() {
        let snapshot = PayloadSnapshot::from_value(json!({
            "fans": [{"RPM": 9000}, 42, "garbage", null],
            "temperature": null,
            "cables": "not a payload"
        }))
        .unwrap();

        assert_eq!(snapshot.rows("fans").len(), 1);
        assert!(snapshot.contains("temperature"));
        assert!(!snapshot.contains("cables"));
    }

    #[test]
    fn test_malformed_roots_are_errors() {
        assert!(matches!(
            PayloadSnapshot::from_value(json!([1, 2])),
            Err(Error::Snapshot(_))
        ));
        assert!(matches!(
            PayloadSnapshot::from_value(json!({"categories": []})),
            Err(Error::Snapshot(_))
        ));
        assert!(matches!(
            PayloadSnapshot::from_json_str("{not json"),
            Err(Error::Json(_))
        ));
    }
}
