//! Dashboard view over an evaluation pass.
//!
//! Cards follow registry order. Filters are pure view-state applied to the
//! cards; they never touch the evaluation map the cards were built from.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use super::evaluator::EvaluationMap;
use super::model::{CategoryEvaluation, SeverityTier, NO_DATA_LABEL};
use super::registry::{CategoryDefinition, CategoryRegistry};
use super::traits::CategoryNavigator;
use crate::snapshot::{CategoryPayload, CategorySummary, PayloadSnapshot};

const PENDING_LABEL: &str = "待评估";
const UNAVAILABLE_LABEL: &str = "不可用";

// =============================================================================
// Cards
// =============================================================================

/// What a card knows about its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "camelCase")]
pub enum CardState {
    /// Counts computed from the delivered rows
    Evaluated(CategoryEvaluation),
    /// Evaluator has not run yet; upstream summary shown as a fallback
    SummaryOnly(CategorySummary),
    /// Evaluator has not run yet and there is no summary
    Pending,
    /// Category is absent from the snapshot
    NoData,
    /// Category is in the snapshot but its evaluation failed
    Unavailable,
}

/// A supplied summary count that disagrees with the computed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDivergence {
    pub field: String,
    pub supplied: usize,
    pub computed: usize,
}

/// One category tile of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCard {
    pub key: String,
    pub label: String,
    pub description: String,
    pub group: String,
    pub state: CardState,
    /// Tier text shown on the card, e.g. "严重" or "无数据"
    pub tier_label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub divergences: Vec<SummaryDivergence>,
}

impl CategoryCard {
    fn build(
        definition: &CategoryDefinition,
        payload: Option<&CategoryPayload>,
        evaluations: Option<&EvaluationMap>,
    ) -> Self {
        let mut divergences = Vec::new();
        let state = match (payload, evaluations) {
            (None, _) => CardState::NoData,
            (Some(payload), None) => match &payload.summary {
                Some(summary) => CardState::SummaryOnly(summary.clone()),
                None => CardState::Pending,
            },
            (Some(payload), Some(evaluations)) => match evaluations.get(&definition.key) {
                Some(evaluation) => {
                    if let Some(summary) = &payload.summary {
                        divergences = divergences_of(&definition.key, summary, evaluation);
                    }
                    CardState::Evaluated(*evaluation)
                }
                None => CardState::Unavailable,
            },
        };

        let tier_label = match &state {
            CardState::Evaluated(evaluation) if evaluation.total_rows == 0 => NO_DATA_LABEL,
            CardState::Evaluated(evaluation) => evaluation.status.label(),
            CardState::SummaryOnly(summary) => summary.implied_status().label(),
            CardState::Pending => PENDING_LABEL,
            CardState::NoData => NO_DATA_LABEL,
            CardState::Unavailable => UNAVAILABLE_LABEL,
        };

        Self {
            key: definition.key.clone(),
            label: definition.label.clone(),
            description: definition.description.clone(),
            group: definition.group.clone(),
            state,
            tier_label: tier_label.to_string(),
            divergences,
        }
    }

    /// Rolled-up tier, if the card has one.
    pub fn status(&self) -> Option<SeverityTier> {
        match &self.state {
            CardState::Evaluated(evaluation) => Some(evaluation.status),
            CardState::SummaryOnly(summary) => Some(summary.implied_status()),
            CardState::Pending | CardState::NoData | CardState::Unavailable => None,
        }
    }

    pub fn evaluation(&self) -> Option<&CategoryEvaluation> {
        match &self.state {
            CardState::Evaluated(evaluation) => Some(evaluation),
            _ => None,
        }
    }
}

fn divergences_of(
    key: &str,
    summary: &CategorySummary,
    evaluation: &CategoryEvaluation,
) -> Vec<SummaryDivergence> {
    summary
        .mismatches(evaluation)
        .into_iter()
        .map(|(field, supplied, computed)| {
            warn!(
                "Category '{}': supplied {} {} differs from computed {}",
                key, field, supplied, computed
            );
            SummaryDivergence {
                field: field.to_string(),
                supplied,
                computed,
            }
        })
        .collect()
}

// =============================================================================
// Filters
// =============================================================================

/// View-state narrowing which cards are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilter {
    /// Only show categories of this group
    #[serde(default)]
    pub group: Option<String>,
    /// Hide categories whose status is ok
    #[serde(default)]
    pub issues_only: bool,
}

impl DashboardFilter {
    pub fn matches(&self, card: &CategoryCard) -> bool {
        if let Some(group) = &self.group {
            if &card.group != group {
                return false;
            }
        }
        !(self.issues_only && card.status() == Some(SeverityTier::Ok))
    }

    pub fn apply<'a>(&self, cards: &'a [CategoryCard]) -> Vec<&'a CategoryCard> {
        cards.iter().filter(|card| self.matches(card)).collect()
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Per-group rollup shown above the cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub key: String,
    pub label: String,
    pub category_count: usize,
    /// Categories whose status is above ok
    pub issue_categories: usize,
    /// Worst card status in the group, `None` when no card has one
    pub worst: Option<SeverityTier>,
}

/// All cards of one snapshot plus their group rollups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub captured_at: Option<DateTime<Utc>>,
    pub groups: Vec<GroupSummary>,
    pub cards: Vec<CategoryCard>,
}

impl Dashboard {
    /// Builds one card per registered category.
    ///
    /// Pass `None` for `evaluations` before the evaluator has run; cards then
    /// fall back to upstream summaries where available.
    pub fn build(
        registry: &CategoryRegistry,
        snapshot: &PayloadSnapshot,
        evaluations: Option<&EvaluationMap>,
    ) -> Self {
        let cards: Vec<CategoryCard> = registry
            .definitions()
            .iter()
            .map(|definition| {
                CategoryCard::build(definition, snapshot.get(&definition.key), evaluations)
            })
            .collect();

        let groups = registry
            .groups()
            .iter()
            .filter_map(|group| {
                let members: Vec<&CategoryCard> =
                    cards.iter().filter(|card| card.group == group.key).collect();
                if members.is_empty() {
                    return None;
                }
                Some(GroupSummary {
                    key: group.key.clone(),
                    label: group.label.clone(),
                    category_count: members.len(),
                    issue_categories: members
                        .iter()
                        .filter(|card| card.status().is_some_and(|s| s.is_issue()))
                        .count(),
                    worst: members.iter().filter_map(|card| card.status()).max(),
                })
            })
            .collect();

        Self {
            captured_at: snapshot.captured_at,
            groups,
            cards,
        }
    }

    pub fn card(&self, key: &str) -> Option<&CategoryCard> {
        self.cards.iter().find(|card| card.key == key)
    }

    /// Cards for a caller-chosen layout. Unknown keys are silently omitted.
    pub fn cards_for<S: AsRef<str>>(&self, keys: &[S]) -> Vec<&CategoryCard> {
        keys.iter().filter_map(|key| self.card(key.as_ref())).collect()
    }

    pub fn filtered(&self, filter: &DashboardFilter) -> Vec<&CategoryCard> {
        filter.apply(&self.cards)
    }

    /// Forwards a card selection to the navigator.
    ///
    /// Returns false, without navigating, when no card has this key.
    pub fn select_category(&self, key: &str, navigator: &mut dyn CategoryNavigator) -> bool {
        if self.card(key).is_none() {
            return false;
        }
        navigator.navigate_to_category(key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::evaluator::HealthEvaluator;
    use crate::health::registry::GroupDefinition;
    use crate::health::rules::{ClassificationRule, RuleCondition, RuleSet};
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingNavigator {
        visited: Vec<String>,
    }

    impl CategoryNavigator for RecordingNavigator {
        fn navigate_to_category(&mut self, category_key: &str) {
            self.visited.push(category_key.to_string());
        }
    }

    fn registry() -> Arc<CategoryRegistry> {
        let failed = RuleSet::new(vec![ClassificationRule::new(
            SeverityTier::Critical,
            RuleCondition::TextIn {
                fields: vec!["Status".to_string()],
                values: vec!["Failed".to_string()],
            },
        )]);
        Arc::new(
            CategoryRegistry::new(
                vec![
                    CategoryDefinition::new("power", "Power", "hardware").with_rules(failed.clone()),
                    CategoryDefinition::new("fans", "Fans", "hardware").with_rules(failed.clone()),
                    CategoryDefinition::new("routing", "Routing", "routing").with_rules(failed),
                    CategoryDefinition::new("pcie", "PCIe", "link"),
                ],
                vec![GroupDefinition {
                    key: "hardware".to_string(),
                    label: "Hardware".to_string(),
                }],
            )
            .unwrap(),
        )
    }

    fn snapshot() -> PayloadSnapshot {
        PayloadSnapshot::from_value(json!({
            "power": {
                "rows": [{"Status": "Failed"}, {"Status": "OK"}],
                "summary": {"critical_count": 7}
            },
            "fans": [{"Status": "OK"}],
            "routing": {"rows": [], "summary": {"warningCount": 2}}
        }))
        .unwrap()
    }

    #[test]
    fn test_card_states_after_evaluation() {
        let registry = registry();
        let snapshot = snapshot();
        let evaluations = HealthEvaluator::new(registry.clone()).evaluate(&snapshot);

        let dashboard = Dashboard::build(&registry, &snapshot, Some(&evaluations));

        let power = dashboard.card("power").unwrap();
        assert_eq!(power.status(), Some(SeverityTier::Critical));
        assert_eq!(power.tier_label, "严重");
        assert_eq!(
            power.divergences,
            vec![SummaryDivergence {
                field: "criticalCount".to_string(),
                supplied: 7,
                computed: 1,
            }]
        );

        assert_eq!(dashboard.card("fans").unwrap().tier_label, "正常");
        assert_eq!(dashboard.card("routing").unwrap().tier_label, NO_DATA_LABEL);

        let pcie = dashboard.card("pcie").unwrap();
        assert_eq!(pcie.state, CardState::NoData);
        assert_eq!(pcie.status(), None);
    }

    #[test]
    fn test_summary_fallback_before_evaluation() {
        let dashboard = Dashboard::build(&registry(), &snapshot(), None);

        let power = dashboard.card("power").unwrap();
        assert!(matches!(power.state, CardState::SummaryOnly(_)));
        assert_eq!(power.status(), Some(SeverityTier::Critical));
        assert_eq!(dashboard.card("fans").unwrap().state, CardState::Pending);
        assert_eq!(
            dashboard.card("routing").unwrap().status(),
            Some(SeverityTier::Warning)
        );
    }

    #[test]
    fn test_missing_evaluation_marks_card_unavailable() {
        let registry = registry();
        let snapshot = snapshot();
        let mut evaluations = HealthEvaluator::new(registry.clone()).evaluate(&snapshot);
        evaluations.remove("fans");

        let dashboard = Dashboard::build(&registry, &snapshot, Some(&evaluations));
        assert_eq!(dashboard.card("fans").unwrap().state, CardState::Unavailable);
    }

    #[test]
    fn test_filters_do_not_touch_evaluations() {
        let registry = registry();
        let snapshot = snapshot();
        let evaluations = HealthEvaluator::new(registry.clone()).evaluate(&snapshot);
        let before = evaluations.clone();
        let dashboard = Dashboard::build(&registry, &snapshot, Some(&evaluations));

        let hardware = DashboardFilter {
            group: Some("hardware".to_string()),
            issues_only: false,
        };
        let keys: Vec<&str> = dashboard
            .filtered(&hardware)
            .iter()
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(keys, vec!["power", "fans"]);

        let issues = DashboardFilter {
            group: None,
            issues_only: true,
        };
        let keys: Vec<&str> = dashboard
            .filtered(&issues)
            .iter()
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(keys, vec!["power", "pcie"]);

        assert_eq!(evaluations, before);
    }

    #[test]
    fn test_group_rollup() {
        let registry = registry();
        let snapshot = snapshot();
        let evaluations = HealthEvaluator::new(registry.clone()).evaluate(&snapshot);
        let dashboard = Dashboard::build(&registry, &snapshot, Some(&evaluations));

        let hardware = &dashboard.groups[0];
        assert_eq!(hardware.label, "Hardware");
        assert_eq!(hardware.category_count, 2);
        assert_eq!(hardware.issue_categories, 1);
        assert_eq!(hardware.worst, Some(SeverityTier::Critical));

        let link = dashboard.groups.iter().find(|g| g.key == "link").unwrap();
        assert_eq!(link.worst, None);
    }

    #[test]
    fn test_select_category_ignores_unknown_keys() {
        let dashboard = Dashboard::build(&registry(), &snapshot(), None);
        let mut navigator = RecordingNavigator::default();

        assert!(dashboard.select_category("power", &mut navigator));
        assert!(!dashboard.select_category("nonexistent", &mut navigator));
        assert_eq!(navigator.visited, vec!["power"]);

        let layout = dashboard.cards_for(&["fans", "nonexistent", "power"]);
        assert_eq!(layout.len(), 2);
    }
}
