//! Cross-category health evaluation.
//!
//! The evaluator runs the aggregator once per category present in both the
//! registry and the snapshot. It is re-run wholesale for every new snapshot;
//! nothing is cached between passes.

use std::collections::{BTreeMap, HashMap};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, info, warn};

use super::aggregator::aggregate;
use super::model::CategoryEvaluation;
use super::registry::CategoryRegistry;
use super::traits::Classifier;
use crate::snapshot::PayloadSnapshot;

/// Category key → evaluation, ordered by key so serialization is stable.
pub type EvaluationMap = BTreeMap<String, CategoryEvaluation>;

/// Runs every registered category's classifier over a snapshot.
#[derive(Clone)]
pub struct HealthEvaluator {
    registry: Arc<CategoryRegistry>,
    /// Hand-written classifiers replacing a category's rule set
    overrides: HashMap<String, Arc<dyn Classifier>>,
}

impl HealthEvaluator {
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self {
            registry,
            overrides: HashMap::new(),
        }
    }

    /// Replaces the rule set of `key` with a custom classifier.
    ///
    /// For categories whose logic cannot be expressed as threshold rules.
    /// The explicit `Severity` override still applies first.
    pub fn with_classifier(mut self, key: impl Into<String>, classifier: Arc<dyn Classifier>) -> Self {
        self.overrides.insert(key.into(), classifier);
        self
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Classifier in effect for a registered category.
    pub fn classifier_for(&self, key: &str) -> Option<&dyn Classifier> {
        if let Some(custom) = self.overrides.get(key) {
            if self.registry.contains(key) {
                return Some(custom.as_ref());
            }
        }
        self.registry
            .get(key)
            .map(|definition| definition as &dyn Classifier)
    }

    /// Evaluates every registered category present in the snapshot.
    ///
    /// Categories missing from the snapshot get no entry, so callers can
    /// tell "no data" from "all healthy". Snapshot keys without a
    /// definition are skipped. A classifier that panics only loses its own
    /// category.
    pub fn evaluate(&self, snapshot: &PayloadSnapshot) -> EvaluationMap {
        let mut evaluations = EvaluationMap::new();

        for key in snapshot.keys() {
            if !self.registry.contains(key) {
                debug!("Skipping snapshot category '{}' with no definition", key);
            }
        }

        for definition in self.registry.definitions() {
            let Some(payload) = snapshot.get(&definition.key) else {
                continue;
            };
            let Some(classifier) = self.classifier_for(&definition.key) else {
                continue;
            };

            let outcome = catch_unwind(AssertUnwindSafe(|| aggregate(&payload.rows, classifier)));
            match outcome {
                Ok(evaluation) => {
                    debug!(
                        "Category '{}': {} rows, status {} ({} issues)",
                        definition.key,
                        evaluation.total_rows,
                        evaluation.status,
                        evaluation.issue_count
                    );
                    evaluations.insert(definition.key.clone(), evaluation);
                }
                Err(_) => {
                    warn!(
                        "Classifier for category '{}' panicked; category left unevaluated",
                        definition.key
                    );
                }
            }
        }

        info!(
            "Health evaluation complete: {} of {} categories evaluated, {} with issues",
            evaluations.len(),
            self.registry.len(),
            evaluations.values().filter(|e| !e.is_healthy()).count()
        );

        evaluations
    }
}

impl std::fmt::Debug for HealthEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut overridden: Vec<&String> = self.overrides.keys().collect();
        overridden.sort();
        f.debug_struct("HealthEvaluator")
            .field("categories", &self.registry.len())
            .field("overrides", &overridden)
            .finish()
    }
}
