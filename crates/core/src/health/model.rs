//! Health domain models.
//!
//! This module contains the core data structures of the health rollup:
//! - Severity tiers and their ordering
//! - Per-record classification results
//! - Per-category evaluation counts

use serde::{Deserialize, Serialize};

// =============================================================================
// Severity Tier
// =============================================================================

/// Severity tier of a record or a whole category.
///
/// Ordered from lowest to highest: Ok < Info < Warning < Critical.
/// Rollups take the maximum, so the worst tier always wins.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    #[default]
    Ok,
    Info,
    Warning,
    Critical,
}

impl SeverityTier {
    /// All tiers, worst last.
    pub const ALL: [SeverityTier; 4] = [
        SeverityTier::Ok,
        SeverityTier::Info,
        SeverityTier::Warning,
        SeverityTier::Critical,
    ];

    /// Returns the machine-readable name of this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Ok => "ok",
            SeverityTier::Info => "info",
            SeverityTier::Warning => "warning",
            SeverityTier::Critical => "critical",
        }
    }

    /// Returns the label shown on dashboard cards.
    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Ok => "正常",
            SeverityTier::Info => "提示",
            SeverityTier::Warning => "警告",
            SeverityTier::Critical => "严重",
        }
    }

    /// Parses a machine-readable tier name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ok" => Some(SeverityTier::Ok),
            "info" => Some(SeverityTier::Info),
            "warning" => Some(SeverityTier::Warning),
            "critical" => Some(SeverityTier::Critical),
            _ => None,
        }
    }

    /// True for every tier except `Ok`.
    pub fn is_issue(&self) -> bool {
        *self != SeverityTier::Ok
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label shown for a category that has no rows in the snapshot.
pub const NO_DATA_LABEL: &str = "无数据";

// =============================================================================
// Classification
// =============================================================================

/// Outcome of classifying one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub tier: SeverityTier,
    /// Short advisory explanation. Never consumed by logic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Classification {
    pub fn ok() -> Self {
        Self {
            tier: SeverityTier::Ok,
            reason: None,
        }
    }
}

// =============================================================================
// Category Evaluation
// =============================================================================

/// Rolled-up health of one category for one snapshot.
///
/// Always rebuilt from raw records; never patched in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEvaluation {
    /// Highest tier with a non-zero count, `Ok` when there is none
    pub status: SeverityTier,
    /// Rows whose tier is not `Ok`
    pub issue_count: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub total_rows: usize,
}

impl CategoryEvaluation {
    /// Tallies a sequence of per-record tiers.
    pub fn from_tiers<I>(tiers: I) -> Self
    where
        I: IntoIterator<Item = SeverityTier>,
    {
        let mut evaluation = Self::default();

        for tier in tiers {
            evaluation.total_rows += 1;
            match tier {
                SeverityTier::Ok => {}
                SeverityTier::Info => evaluation.info_count += 1,
                SeverityTier::Warning => evaluation.warning_count += 1,
                SeverityTier::Critical => evaluation.critical_count += 1,
            }
            if tier > evaluation.status {
                evaluation.status = tier;
            }
        }

        evaluation.issue_count =
            evaluation.critical_count + evaluation.warning_count + evaluation.info_count;
        evaluation
    }

    /// Number of rows at the given tier.
    pub fn count(&self, tier: SeverityTier) -> usize {
        match tier {
            SeverityTier::Ok => self.total_rows - self.issue_count,
            SeverityTier::Info => self.info_count,
            SeverityTier::Warning => self.warning_count,
            SeverityTier::Critical => self.critical_count,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == SeverityTier::Ok
    }
}

// =============================================================================
// Tests
// =============================================================================
