use std::collections::HashSet;

use crate::constants::INTERNAL_FIELD_PREFIX;
use crate::values::Record;

/// Discovers the display columns of a record set.
///
/// Columns are the union of field names over all records in first-seen
/// order, minus `hidden` and internal (`__`-prefixed) names. Preferred names
/// that occur are emitted first in caller order; a preferred name that no
/// record carries is dropped.
pub fn discover_columns<P, H>(records: &[Record], preferred: &[P], hidden: &[H]) -> Vec<String>
where
    P: AsRef<str>,
    H: AsRef<str>,
{
    let hidden: HashSet<&str> = hidden.iter().map(AsRef::as_ref).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut discovered: Vec<&str> = Vec::new();

    for record in records {
        for key in record.keys() {
            let key = key.as_str();
            if key.starts_with(INTERNAL_FIELD_PREFIX) || hidden.contains(key) {
                continue;
            }
            if seen.insert(key) {
                discovered.push(key);
            }
        }
    }

    let mut columns: Vec<String> = Vec::with_capacity(discovered.len());
    let mut emitted: HashSet<&str> = HashSet::with_capacity(discovered.len());
    for name in preferred {
        let name = name.as_ref();
        if seen.contains(name) && emitted.insert(name) {
            columns.push(name.to_string());
        }
    }
    for name in discovered {
        if emitted.insert(name) {
            columns.push(name.to_string());
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    const NONE: &[&str] = &[];

    #[test]
    fn test_preferred_first_then_first_seen() {
        let rows = records(json!([{"A": 1, "B": 2}, {"B": 3, "C": 4}]));
        assert_eq!(discover_columns(&rows, &["C", "A"], NONE), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_hidden_internal_and_unknown_preferred_are_dropped() {
        let rows = records(json!([
            {"Node": "sw-01", "__tier": "ok", "Guid": "0x1"},
            {"Port": 3, "Node": "sw-02"}
        ]));

        let columns = discover_columns(&rows, &["Port", "Missing", "Port", "Guid"], &["Guid"]);
        assert_eq!(columns, vec!["Port", "Node"]);
    }

    #[test]
    fn test_empty_records() {
        assert!(discover_columns(&[], &["A"], NONE).is_empty());
        assert!(discover_columns(&records(json!([{}, {}])), NONE, NONE).is_empty());
    }
}
