use serde_json::Value;

use super::normalizer::{as_boolean, as_display_text, as_number};
use super::Record;

/// Looks up a logical field by its alias list.
///
/// Aliases are tried in order with an exact key match first. If none
/// matches, a loose match ignoring case, spaces, underscores and hyphens is
/// tried in the same alias order, so `"Node Name"`, `NodeName` and
/// `node_name` resolve to one field. Null values count as absent.
pub fn field<'a, S: AsRef<str>>(record: &'a Record, aliases: &[S]) -> Option<&'a Value> {
    for alias in aliases {
        if let Some(value) = record.get(alias.as_ref()) {
            if !value.is_null() {
                return Some(value);
            }
        }
    }

    for alias in aliases {
        let wanted = loose_key(alias.as_ref());
        if wanted.is_empty() {
            continue;
        }
        let found = record
            .iter()
            .find(|(key, value)| !value.is_null() && loose_key(key) == wanted);
        if let Some((_, value)) = found {
            return Some(value);
        }
    }

    None
}

/// Returns true when any alias resolves to a non-null value.
pub fn has_field<S: AsRef<str>>(record: &Record, aliases: &[S]) -> bool {
    field(record, aliases).is_some()
}

/// Numeric reading of an aliased field, `0.0` when absent or unparsable.
pub fn number_field<S: AsRef<str>>(record: &Record, aliases: &[S]) -> f64 {
    as_number(field(record, aliases))
}

/// Boolean reading of an aliased field, `false` when absent.
pub fn bool_field<S: AsRef<str>>(record: &Record, aliases: &[S]) -> bool {
    as_boolean(field(record, aliases))
}

/// Case-preserving text of an aliased field.
pub fn text_field<S: AsRef<str>>(record: &Record, aliases: &[S]) -> Option<String> {
    as_display_text(field(record, aliases))
}

/// Canonical spelling used for loose key matching.
pub fn loose_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
