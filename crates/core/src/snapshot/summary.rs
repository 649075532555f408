use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::health::{CategoryEvaluation, SeverityTier};
use crate::values::{field, strict_number, Record};

/// Pre-aggregated counts supplied by the upstream capture tool.
///
/// Only ever a display hint: classification re-derives everything from raw
/// rows, and the summary may cover more rows than were delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
}

impl CategorySummary {
    /// Reads a summary object leniently: counts may be spelled in snake or
    /// camel case and arrive as numbers or numeric text. Returns `None` when
    /// no count is readable.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let summary = Self {
            critical_count: count(object, &["critical_count", "criticalCount", "critical"]),
            warning_count: count(object, &["warning_count", "warningCount", "warning"]),
            info_count: count(object, &["info_count", "infoCount", "info"]),
            issue_count: count(object, &["issue_count", "issueCount", "issues"]),
            total_count: count(object, &["total_count", "totalCount", "total"]),
        };
        (summary != Self::default()).then_some(summary)
    }

    /// Tier implied by the counts, worst first.
    pub fn implied_status(&self) -> SeverityTier {
        if self.critical_count.unwrap_or(0) > 0 {
            SeverityTier::Critical
        } else if self.warning_count.unwrap_or(0) > 0 {
            SeverityTier::Warning
        } else if self.info_count.unwrap_or(0) > 0 {
            SeverityTier::Info
        } else {
            SeverityTier::Ok
        }
    }

    /// Counts that disagree with a computed evaluation, as
    /// `(name, summary, computed)` triples.
    pub fn mismatches(&self, computed: &CategoryEvaluation) -> Vec<(&'static str, usize, usize)> {
        [
            ("criticalCount", self.critical_count, computed.critical_count),
            ("warningCount", self.warning_count, computed.warning_count),
            ("infoCount", self.info_count, computed.info_count),
            ("issueCount", self.issue_count, computed.issue_count),
            ("totalCount", self.total_count, computed.total_rows),
        ]
        .into_iter()
        .filter_map(|(name, supplied, computed)| {
            supplied
                .filter(|supplied| *supplied != computed)
                .map(|supplied| (name, supplied, computed))
        })
        .collect()
    }
}

fn count(object: &Record, aliases: &[&str]) -> Option<usize> {
    strict_number(field(object, aliases))
        .filter(|n| *n >= 0.0)
        .map(|n| n as usize)
}
