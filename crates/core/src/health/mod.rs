//! Health module.
//!
//! Classifies diagnostic records into severity tiers and rolls them up into
//! per-category evaluations and dashboard cards.
//!
//! # Architecture
//!
//! ```text
//! CategoryRegistry → CategoryDefinition (RuleSet) ─┐
//!                                                  ↓
//! PayloadSnapshot ──────────────→ HealthEvaluator → EvaluationMap
//!                                                  ↓
//!                                              Dashboard (cards, filters)
//! ```
//!
//! - **Models** (`model.rs`) - SeverityTier, Classification, CategoryEvaluation
//! - **Traits** (`traits.rs`) - Classifier and CategoryNavigator seams
//! - **Rules** (`rules.rs`) - Data-driven threshold and flag rules
//! - **Classifier** (`classifier.rs`) - Explicit Severity override, reason composition
//! - **Aggregator** (`aggregator.rs`) - Per-category counts and rollup
//! - **Registry** (`registry.rs`) - Category definitions, embedded fabric catalog
//! - **Evaluator** (`evaluator.rs`) - Runs every category over a snapshot
//! - **Dashboard** (`dashboard.rs`) - Cards, group rollups, view filters
//!
//! # Severity Tiers
//!
//! - **Ok** - Healthy, not an issue
//! - **Info** - Informational, no action required
//! - **Warning** - Should be looked at
//! - **Critical** - Broken hardware or links, act now
//!
//! A record's own `Severity` field wins over the category heuristic when it
//! names a critical or warning tier.

pub mod aggregator;
pub mod classifier;
pub mod dashboard;
pub mod errors;
pub mod evaluator;
pub mod model;
pub mod registry;
pub mod rules;
pub mod traits;


// Re-export commonly used types
pub use errors::RegistryError;
pub use model::{CategoryEvaluation, Classification, SeverityTier, NO_DATA_LABEL};
pub use traits::{CategoryNavigator, Classifier};

pub use aggregator::aggregate;
pub use classifier::{
    annotate_rows, classify, classify_tier, explicit_severity, issue_reason, read_annotation,
};
pub use dashboard::{
    CardState, CategoryCard, Dashboard, DashboardFilter, GroupSummary, SummaryDivergence,
};
pub use evaluator::{EvaluationMap, HealthEvaluator};
pub use registry::{CategoryDefinition, CategoryRegistry, GroupDefinition};
pub use rules::{format_value, ClassificationRule, RuleCondition, RuleSet};
