//! Severity aggregation over one category's records.

use super::classifier::classify_tier;
use super::model::CategoryEvaluation;
use super::traits::Classifier;
use crate::values::Record;

/// Classifies every record once and rolls the tiers up.
///
/// The result only depends on how many rows land in each tier, never on
/// their order.
pub fn aggregate(records: &[Record], classifier: &dyn Classifier) -> CategoryEvaluation {
    CategoryEvaluation::from_tiers(
        records
            .iter()
            .map(|record| classify_tier(classifier, record)),
    )
}
