//! Data-driven classification rules.
//!
//! A category is configured with a list of [`ClassificationRule`]s. Each rule
//! pairs a condition over aliased fields with the tier it yields and an
//! optional reason template. The heuristic tier of a record is the worst
//! tier of all matching rules.
//!
//! Reason templates understand two placeholders:
//! - `{value}` - the numeric reading, grouped (`1,204`), one decimal
//!   (`93.2`) or scientific for tiny magnitudes (`1.50e-12`)
//! - `{text}` - the case-preserved text of the field

use serde::{Deserialize, Serialize};

use super::errors::RegistryError;
use super::model::SeverityTier;
use super::traits::Classifier;
use crate::constants::REASON_SEPARATOR;
use crate::values::{bool_field, field, has_field, number_field, text_field, Record};

// =============================================================================
// Conditions
// =============================================================================

/// Condition a record must satisfy for a rule to match.
///
/// `fields` always lists aliases of one logical field, tried in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RuleCondition {
    /// Numeric reading is `>= threshold`. Absent fields read as zero.
    AtLeast { fields: Vec<String>, threshold: f64 },
    /// Numeric reading is `> threshold`. Absent fields read as zero.
    Above { fields: Vec<String>, threshold: f64 },
    /// Numeric reading is `< threshold`. Only fires when the field exists,
    /// otherwise every record missing it would read as zero and match.
    Below { fields: Vec<String>, threshold: f64 },
    /// Numeric reading falls outside `[min, max]`. Present fields only.
    Outside {
        fields: Vec<String>,
        min: f64,
        max: f64,
    },
    /// Boolean reading equals `expected`. Matching `false` requires the
    /// field to exist.
    Flag { fields: Vec<String>, expected: bool },
    /// A capability is supported but its enablement flag is off.
    SupportedNotEnabled {
        supported: Vec<String>,
        enabled: Vec<String>,
    },
    /// Text equals one of `values`, case-insensitively.
    TextIn {
        fields: Vec<String>,
        values: Vec<String>,
    },
    /// Text is present and equals none of `values`, case-insensitively.
    TextNotIn {
        fields: Vec<String>,
        values: Vec<String>,
    },
}

/// What a matching condition observed, for reason composition.
#[derive(Debug, Clone, PartialEq)]
struct Observation {
    number: Option<f64>,
    text: Option<String>,
}

impl RuleCondition {
    /// Primary field aliases this condition reads.
    pub fn fields(&self) -> &[String] {
        match self {
            RuleCondition::AtLeast { fields, .. }
            | RuleCondition::Above { fields, .. }
            | RuleCondition::Below { fields, .. }
            | RuleCondition::Outside { fields, .. }
            | RuleCondition::Flag { fields, .. }
            | RuleCondition::TextIn { fields, .. }
            | RuleCondition::TextNotIn { fields, .. } => fields,
            RuleCondition::SupportedNotEnabled { supported, .. } => supported,
        }
    }

    /// True when the record satisfies this condition.
    pub fn matches(&self, record: &Record) -> bool {
        self.observe(record).is_some()
    }

    fn observe(&self, record: &Record) -> Option<Observation> {
        match self {
            RuleCondition::AtLeast { fields, threshold } => {
                let value = number_field(record, fields);
                (value >= *threshold).then(|| numeric(record, fields, value))
            }
            RuleCondition::Above { fields, threshold } => {
                let value = number_field(record, fields);
                (value > *threshold).then(|| numeric(record, fields, value))
            }
            RuleCondition::Below { fields, threshold } => {
                if !has_field(record, fields) {
                    return None;
                }
                let value = number_field(record, fields);
                (value < *threshold).then(|| numeric(record, fields, value))
            }
            RuleCondition::Outside { fields, min, max } => {
                if !has_field(record, fields) {
                    return None;
                }
                let value = number_field(record, fields);
                (value < *min || value > *max).then(|| numeric(record, fields, value))
            }
            RuleCondition::Flag { fields, expected } => {
                if !*expected && !has_field(record, fields) {
                    return None;
                }
                (bool_field(record, fields) == *expected).then(|| Observation {
                    number: None,
                    text: text_field(record, fields),
                })
            }
            RuleCondition::SupportedNotEnabled { supported, enabled } => {
                (bool_field(record, supported) && !bool_field(record, enabled)).then(|| {
                    Observation {
                        number: None,
                        text: text_field(record, enabled),
                    }
                })
            }
            RuleCondition::TextIn { fields, values } => {
                let text = text_field(record, fields)?;
                contains_ignore_case(values, &text).then_some(Observation {
                    number: None,
                    text: Some(text),
                })
            }
            RuleCondition::TextNotIn { fields, values } => {
                let text = text_field(record, fields)?;
                (!contains_ignore_case(values, &text)).then_some(Observation {
                    number: None,
                    text: Some(text),
                })
            }
        }
    }

    fn default_reason(&self, observed: &Observation) -> String {
        let name = self.fields().first().map(String::as_str).unwrap_or("value");
        let value = observed.number.map(format_value).unwrap_or_default();
        let text = observed.text.clone().unwrap_or_default();
        match self {
            RuleCondition::AtLeast { .. } | RuleCondition::Above { .. } => {
                format!("{name}: {value}")
            }
            RuleCondition::Below { .. } => format!("{name} low ({value})"),
            RuleCondition::Outside { .. } => format!("{name} out of range ({value})"),
            RuleCondition::Flag { expected, .. } => format!("{name} is {expected}"),
            RuleCondition::SupportedNotEnabled { supported, enabled } => {
                let supported = supported.first().map(String::as_str).unwrap_or("feature");
                let enabled = enabled.first().map(String::as_str).unwrap_or("enabled");
                format!("{supported} but not {enabled}")
            }
            RuleCondition::TextIn { .. } | RuleCondition::TextNotIn { .. } => {
                format!("{name}: {text}")
            }
        }
    }

    fn validate(&self) -> Result<(), String> {
        let fields_ok = match self {
            RuleCondition::SupportedNotEnabled { supported, enabled } => {
                !supported.is_empty() && !enabled.is_empty()
            }
            other => !other.fields().is_empty(),
        };
        if !fields_ok {
            return Err("at least one field alias is required".to_string());
        }

        match self {
            RuleCondition::AtLeast { threshold, .. }
            | RuleCondition::Above { threshold, .. }
            | RuleCondition::Below { threshold, .. } => {
                if !threshold.is_finite() {
                    return Err("threshold must be finite".to_string());
                }
            }
            RuleCondition::Outside { min, max, .. } => {
                if !min.is_finite() || !max.is_finite() {
                    return Err("range bounds must be finite".to_string());
                }
                if min > max {
                    return Err(format!("range is empty ({min} > {max})"));
                }
            }
            RuleCondition::TextIn { values, .. } | RuleCondition::TextNotIn { values, .. } => {
                if values.is_empty() {
                    return Err("text rules need at least one value".to_string());
                }
            }
            RuleCondition::Flag { .. } | RuleCondition::SupportedNotEnabled { .. } => {}
        }
        Ok(())
    }
}

fn numeric(record: &Record, fields: &[String], value: f64) -> Observation {
    Observation {
        number: Some(value),
        text: text_field(record, fields),
    }
}

fn contains_ignore_case(values: &[String], text: &str) -> bool {
    let text = text.trim();
    values.iter().any(|v| v.trim().eq_ignore_ascii_case(text))
}

// =============================================================================
// Rules
// =============================================================================

/// One threshold or flag check of a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRule {
    /// Tier yielded when the condition matches
    pub tier: SeverityTier,
    #[serde(rename = "when")]
    pub condition: RuleCondition,
    /// Reason template; a generic one is composed when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ClassificationRule {
    pub fn new(tier: SeverityTier, condition: RuleCondition) -> Self {
        Self {
            tier,
            condition,
            reason: None,
        }
    }

    pub fn with_reason(mut self, template: impl Into<String>) -> Self {
        self.reason = Some(template.into());
        self
    }

    /// Reason text if the rule matches the record.
    pub fn reason_for(&self, record: &Record) -> Option<String> {
        let observed = self.condition.observe(record)?;
        Some(match &self.reason {
            Some(template) => render_template(template, &observed),
            None => self.condition.default_reason(&observed),
        })
    }

    pub(crate) fn validate(&self, category: &str, index: usize) -> Result<(), RegistryError> {
        if self.tier == SeverityTier::Ok {
            return Err(RegistryError::invalid_rule(
                category,
                index,
                "a rule must yield a tier above ok",
            ));
        }
        self.condition
            .validate()
            .map_err(|message| RegistryError::invalid_rule(category, index, message))
    }
}

fn render_template(template: &str, observed: &Observation) -> String {
    let value = observed.number.map(format_value).unwrap_or_default();
    let text = observed.text.as_deref().unwrap_or_default();
    template.replace("{value}", &value).replace("{text}", text)
}

/// Formats a number for reason text.
///
/// Integral values are grouped by thousands, tiny magnitudes (error rates)
/// use scientific notation, anything else keeps one decimal.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return group_thousands(value as i64);
    }
    if value.abs() < 1e-3 {
        return format!("{value:.2e}");
    }
    format!("{value:.1}")
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

// =============================================================================
// Rule Set
// =============================================================================

/// The data-driven classifier of one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<ClassificationRule>,
    /// Fields explaining an explicit severity override, tried in order
    #[serde(default)]
    pub reason_fields: Vec<String>,
}

impl RuleSet {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self {
            rules,
            reason_fields: Vec::new(),
        }
    }

    pub fn with_reason_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.reason_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn validate(&self, category: &str) -> Result<(), RegistryError> {
        self.rules
            .iter()
            .enumerate()
            .try_for_each(|(index, rule)| rule.validate(category, index))
    }
}

impl Classifier for RuleSet {
    fn heuristic_tier(&self, record: &Record) -> SeverityTier {
        self.rules
            .iter()
            .filter(|rule| rule.condition.matches(record))
            .map(|rule| rule.tier)
            .max()
            .unwrap_or_default()
    }

    fn heuristic_reason(&self, record: &Record) -> Option<String> {
        let mut matched: Vec<(&ClassificationRule, String)> = self
            .rules
            .iter()
            .filter_map(|rule| rule.reason_for(record).map(|reason| (rule, reason)))
            .collect();
        if matched.is_empty() {
            return None;
        }

        // Worst first; stable so rule order breaks ties.
        matched.sort_by(|a, b| b.0.tier.cmp(&a.0.tier));

        // A threshold ladder over one field reports only its worst step.
        let mut kept: Vec<(&[String], String)> = Vec::with_capacity(matched.len());
        for (rule, reason) in matched {
            let fields = rule.condition.fields();
            if kept.iter().any(|(f, r)| *f == fields || *r == reason) {
                continue;
            }
            kept.push((fields, reason));
        }
        let reasons: Vec<String> = kept.into_iter().map(|(_, reason)| reason).collect();
        Some(reasons.join(REASON_SEPARATOR))
    }

    fn reason_fields(&self) -> &[String] {
        &self.reason_fields
    }
}

/// Text of the first present reason field, used to explain an explicit
/// severity override.
pub(crate) fn override_explanation(record: &Record, reason_fields: &[String]) -> Option<String> {
    field(record, reason_fields)
        .and_then(|value| crate::values::as_display_text(Some(value)))
        .filter(|text| !text.trim().is_empty())
}
