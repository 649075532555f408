//! Per-category page: a category's rows classified and browsable.
//!
//! A page is configuration of the two engines. The classifier stamps every
//! row with its tier and reason, the browser pages over the stamped rows and
//! the view pairs each rendered row with its stamp again.

use serde::Serialize;

use crate::health::{
    aggregate, annotate_rows, read_annotation, CategoryDefinition, CategoryEvaluation,
    Classification, Classifier, NO_DATA_LABEL,
};
use crate::snapshot::CategoryPayload;
use crate::table::{BrowserOptions, BrowserState, BrowserView, TableBrowser};

/// Health stamp of one rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowHealth {
    pub source_index: usize,
    #[serde(flatten)]
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPageView {
    pub key: String,
    pub label: String,
    pub description: String,
    pub group: String,
    pub evaluation: CategoryEvaluation,
    pub tier_label: String,
    pub table: BrowserView,
    /// One entry per rendered table row, in the same order
    pub row_health: Vec<RowHealth>,
}

pub struct CategoryPage<'a> {
    definition: &'a CategoryDefinition,
    evaluation: CategoryEvaluation,
    browser: TableBrowser<'static>,
}

impl<'a> CategoryPage<'a> {
    /// Classifies the payload's rows with `classifier` and opens a browser
    /// over them. A missing payload yields an empty page.
    pub fn new(
        definition: &'a CategoryDefinition,
        classifier: &dyn Classifier,
        payload: Option<&CategoryPayload>,
        page_size: usize,
    ) -> Self {
        let rows = payload.map(|p| p.rows.as_slice()).unwrap_or(&[]);
        let evaluation = aggregate(rows, classifier);
        let annotated = annotate_rows(classifier, rows);

        let options = BrowserOptions {
            page_size,
            preferred_columns: definition.preferred_columns.clone(),
            hidden_columns: definition.hidden_columns.clone(),
            total_available: payload.and_then(|p| p.total_rows),
            debug_log: payload.and_then(|p| p.debug_log.clone()),
        };

        Self {
            definition,
            evaluation,
            browser: TableBrowser::new(annotated, options),
        }
    }

    pub fn definition(&self) -> &CategoryDefinition {
        self.definition
    }

    pub fn evaluation(&self) -> &CategoryEvaluation {
        &self.evaluation
    }

    pub fn browser(&self) -> &TableBrowser<'static> {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut TableBrowser<'static> {
        &mut self.browser
    }

    /// Replaces the computed evaluation with one already produced for the
    /// same rows, e.g. by the evaluator pass over the current snapshot.
    pub fn with_evaluation(mut self, evaluation: CategoryEvaluation) -> Self {
        self.evaluation = evaluation;
        self
    }

    /// Applies a browser state, e.g. decoded from a request.
    pub fn with_state(mut self, state: BrowserState) -> Self {
        self.browser.restore_state(state);
        self
    }

    pub fn view(&self) -> CategoryPageView {
        let table = self.browser.view();
        let row_health = match &table {
            BrowserView::Table(page) => page
                .rows
                .iter()
                .map(|row| RowHealth {
                    source_index: row.source_index,
                    classification: self
                        .browser
                        .records()
                        .get(row.source_index)
                        .and_then(read_annotation)
                        .unwrap_or_else(Classification::ok),
                })
                .collect(),
            _ => Vec::new(),
        };

        let tier_label = if self.evaluation.total_rows == 0 {
            NO_DATA_LABEL
        } else {
            self.evaluation.status.label()
        };

        CategoryPageView {
            key: self.definition.key.clone(),
            label: self.definition.label.clone(),
            description: self.definition.description.clone(),
            group: self.definition.group.clone(),
            evaluation: self.evaluation,
            tier_label: tier_label.to_string(),
            table,
            row_health,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{ClassificationRule, RuleCondition, RuleSet, SeverityTier};
    use crate::snapshot::PayloadSnapshot;
    use serde_json::json;

    fn fans() -> CategoryDefinition {
        CategoryDefinition::new("fans", "Fans", "hardware")
            .with_preferred_columns(["RPM"])
            .with_rules(RuleSet::new(vec![ClassificationRule::new(
                SeverityTier::Warning,
                RuleCondition::Below {
                    fields: vec!["RPM".to_string()],
                    threshold: 2000.0,
                },
            )
            .with_reason("fan slow ({value} rpm)")]))
    }

    fn snapshot() -> PayloadSnapshot {
        PayloadSnapshot::from_value(json!({
            "fans": {
                "rows": [
                    {"Node": "sw-01", "RPM": 9000},
                    {"Node": "sw-02", "RPM": 1500},
                    {"Node": "sw-03", "RPM": 8800, "Severity": "critical", "Message": "fan tray missing"}
                ],
                "debugLog": "fan scan ok"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_rows_are_paired_with_their_health() {
        let definition = fans();
        let snapshot = snapshot();
        let page = CategoryPage::new(&definition, &definition, snapshot.get("fans"), 100);

        let view = page.view();
        assert_eq!(view.tier_label, "严重");
        assert_eq!(view.evaluation.issue_count, 2);

        let BrowserView::Table(table) = &view.table else {
            panic!("expected a table");
        };
        assert_eq!(table.columns, vec!["RPM", "Node", "Severity", "Message"]);
        assert_eq!(view.row_health.len(), 3);
        assert_eq!(view.row_health[0].classification, Classification::ok());
        assert_eq!(
            view.row_health[1].classification.reason.as_deref(),
            Some("fan slow (1,500 rpm)")
        );
        assert_eq!(view.row_health[2].classification.tier, SeverityTier::Critical);
    }

    #[test]
    fn test_state_follows_sorted_rows() {
        let definition = fans();
        let snapshot = snapshot();
        let page = CategoryPage::new(&definition, &definition, snapshot.get("fans"), 100)
            .with_state(BrowserState::default().apply_sort("RPM"));

        let view = page.view();
        let indices: Vec<usize> = view.row_health.iter().map(|h| h.source_index).collect();
        assert_eq!(indices, vec![1, 2, 0]);
        assert_eq!(view.row_health[0].classification.tier, SeverityTier::Warning);
    }

    #[test]
    fn test_evaluation_matches_aggregate() {
        let definition = fans();
        let snapshot = snapshot();
        let page = CategoryPage::new(&definition, &definition, snapshot.get("fans"), 100);

        let expected = aggregate(snapshot.rows("fans"), &definition);
        assert_eq!(page.evaluation(), &expected);
        assert_eq!(expected.critical_count, 1);
        assert_eq!(expected.warning_count, 1);
        assert_eq!(expected.total_rows, 3);
    }

    #[test]
    fn test_cached_evaluation_is_used() {
        let definition = fans();
        let snapshot = snapshot();
        let cached = CategoryEvaluation {
            status: SeverityTier::Warning,
            issue_count: 7,
            warning_count: 7,
            total_rows: 40,
            ..CategoryEvaluation::default()
        };
        let page = CategoryPage::new(&definition, &definition, snapshot.get("fans"), 1)
            .with_evaluation(cached);

        let view = page.view();
        assert_eq!(view.evaluation, cached);
        assert_eq!(view.tier_label, "警告");
        assert_eq!(view.row_health.len(), 1);
    }

    #[test]
    fn test_missing_payload_is_an_empty_page() {
        let definition = fans();
        let page = CategoryPage::new(&definition, &definition, None, 100);

        let view = page.view();
        assert_eq!(view.tier_label, "无数据");
        assert_eq!(view.table, BrowserView::NoData { debug_log: None });
        assert!(view.row_health.is_empty());
    }
}
