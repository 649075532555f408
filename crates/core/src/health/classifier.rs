//! Classification entry points.
//!
//! Every record goes through [`classify_tier`] / [`issue_reason`] rather than
//! a [`Classifier`] directly: both check the explicit per-record `Severity`
//! field first and only fall back to the category heuristic when it does not
//! name a critical or warning tier.

use serde_json::Value;

use super::model::{Classification, SeverityTier};
use super::rules::override_explanation;
use super::traits::Classifier;
use crate::constants::{REASON_FIELD, SEVERITY_FIELD_ALIASES, TIER_FIELD};
use crate::values::{text_field, Record};

/// Tier named by the record's own `Severity` field, if it names one.
///
/// `critical`/`error` map to critical, `warning`/`warn` to warning
/// (case-insensitive). Anything else is not an override.
pub fn explicit_severity(record: &Record) -> Option<SeverityTier> {
    let reported = text_field(record, SEVERITY_FIELD_ALIASES)?;
    match reported.trim().to_ascii_lowercase().as_str() {
        "critical" | "error" => Some(SeverityTier::Critical),
        "warning" | "warn" => Some(SeverityTier::Warning),
        _ => None,
    }
}

/// Classifies one record into a tier.
pub fn classify_tier(classifier: &dyn Classifier, record: &Record) -> SeverityTier {
    explicit_severity(record).unwrap_or_else(|| classifier.heuristic_tier(record))
}

/// Composes the issue reason of one record.
///
/// Recomputes from the record's fields and never relies on a tier computed
/// earlier. Returns `None` for a healthy record.
pub fn issue_reason(classifier: &dyn Classifier, record: &Record) -> Option<String> {
    if explicit_severity(record).is_some() {
        let explanation = override_explanation(record, classifier.reason_fields());
        return Some(explanation.unwrap_or_else(|| {
            let reported = text_field(record, SEVERITY_FIELD_ALIASES).unwrap_or_default();
            format!("reported severity: {}", reported.trim())
        }));
    }
    classifier.heuristic_reason(record)
}

/// Classifies one record into a tier plus its reason.
pub fn classify(classifier: &dyn Classifier, record: &Record) -> Classification {
    let tier = classify_tier(classifier, record);
    if !tier.is_issue() {
        return Classification::ok();
    }
    Classification {
        tier,
        reason: issue_reason(classifier, record),
    }
}

/// Copies records and stamps each with its tier and reason.
///
/// The stamps live in internal fields, so schema discovery keeps them out
/// of the visible columns while category pages can still read them back.
pub fn annotate_rows(classifier: &dyn Classifier, records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .map(|record| {
            let classification = classify(classifier, record);
            let mut annotated = record.clone();
            annotated.insert(
                TIER_FIELD.to_string(),
                Value::String(classification.tier.as_str().to_string()),
            );
            annotated.insert(
                REASON_FIELD.to_string(),
                classification.reason.map(Value::String).unwrap_or(Value::Null),
            );
            annotated
        })
        .collect()
}

/// Reads back the stamps written by [`annotate_rows`].
pub fn read_annotation(record: &Record) -> Option<Classification> {
    let tier = record
        .get(TIER_FIELD)
        .and_then(Value::as_str)
        .and_then(SeverityTier::parse)?;
    let reason = record
        .get(REASON_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(Classification { tier, reason })
}
