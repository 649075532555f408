//! Health traits.
//!
//! This module defines the seams of the health rollup:
//! - `Classifier` - category-specific heuristic applied to one record
//! - `CategoryNavigator` - receiver of the dashboard's "select category" action

use super::model::SeverityTier;
use crate::values::Record;

// =============================================================================
// Classifier Trait
// =============================================================================

/// Category-specific heuristic mapping one record to a severity tier.
///
/// Implementations only describe the heuristic. The explicit per-record
/// `Severity` override is applied by [`classify`](super::classify) before any
/// implementation is consulted, so every category honors it the same way.
///
/// # Implementation Notes
///
/// - Never panic on malformed data; read fields through [`crate::values`]
///   so missing or unparsable values degrade to zero
/// - `heuristic_reason` must recompute from the record rather than assume
///   the tier `heuristic_tier` returned
///
/// # Example
///
/// ```
/// use fabricscope_core::health::{Classifier, SeverityTier};
/// use fabricscope_core::values::{number_field, Record};
///
/// struct FanSpeed;
///
/// impl Classifier for FanSpeed {
///     fn heuristic_tier(&self, record: &Record) -> SeverityTier {
///         if number_field(record, &["RPM", "Fan Speed"]) > 18_000.0 {
///             SeverityTier::Warning
///         } else {
///             SeverityTier::Ok
///         }
///     }
///
///     fn heuristic_reason(&self, record: &Record) -> Option<String> {
///         let rpm = number_field(record, &["RPM", "Fan Speed"]);
///         (rpm > 18_000.0).then(|| format!("fan at {rpm} rpm"))
///     }
/// }
/// ```
pub trait Classifier: Send + Sync {
    /// Worst tier any heuristic rule matches, `Ok` when none does.
    fn heuristic_tier(&self, record: &Record) -> SeverityTier;

    /// Explanation composed from the same fields the heuristic reads.
    fn heuristic_reason(&self, record: &Record) -> Option<String>;

    /// Fields whose text explains an explicit severity override
    /// (e.g. `Message`). Tried in order.
    fn reason_fields(&self) -> &[String] {
        &[]
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// Receiver of the dashboard's "select category" action.
///
/// The dashboard does not route by itself; a view switcher implements this
/// trait and decides what selecting a card means.
pub trait CategoryNavigator {
    fn navigate_to_category(&mut self, category_key: &str);
}
