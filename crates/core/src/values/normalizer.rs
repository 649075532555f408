use serde_json::Value;

/// Reads a value as a boolean.
///
/// True only for native `true`, the exact text `"true"` and the number `1`.
/// `"True"`, `"1"`, `0` and everything else read as false.
pub fn as_boolean(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Reads a value as a finite number, falling back to `0.0`.
///
/// Text is trimmed before parsing and booleans read as 1/0. Null, absent,
/// structured and non-finite values all read as zero.
pub fn as_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        other => strict_number(other).unwrap_or(0.0),
    }
}

/// Reads a value as a number only if it genuinely is one.
///
/// Unlike [`as_number`] this distinguishes "zero" from "not numeric": empty
/// text, booleans and structured values yield `None`. The sort comparator
/// uses it to decide whether two cells compare numerically.
pub fn strict_number(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()),
        Some(Value::String(s)) => parse_finite(s),
        _ => None,
    }
}

/// Renders a value as case-preserving text, or `None` when it is null or
/// absent. Structured values render as compact JSON.
pub fn as_display_text(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(structured) => Some(serde_json::to_string(structured).unwrap_or_default()),
    }
}

/// Renders a value as lower-cased text for search and text comparison.
/// Null and absent values render as the empty string.
pub fn as_search_text(value: Option<&Value>) -> String {
    as_display_text(value)
        .map(|text| text.to_lowercase())
        .unwrap_or_default()
}

fn parse_finite(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_boolean_accepts_exactly_three_spellings() {
        assert!(as_boolean(Some(&json!(true))));
        assert!(as_boolean(Some(&json!("true"))));
        assert!(as_boolean(Some(&json!(1))));
        assert!(as_boolean(Some(&json!(1.0))));

        assert!(!as_boolean(Some(&json!("1"))));
        assert!(!as_boolean(Some(&json!("True"))));
        assert!(!as_boolean(Some(&json!("TRUE"))));
        assert!(!as_boolean(Some(&json!(0))));
        assert!(!as_boolean(Some(&json!(2))));
        assert!(!as_boolean(Some(&json!(false))));
        assert!(!as_boolean(Some(&json!("yes"))));
        assert!(!as_boolean(Some(&json!(null))));
        assert!(!as_boolean(Some(&json!([true]))));
        assert!(!as_boolean(None));
    }

    #[test]
    fn test_as_number_degrades_to_zero() {
        assert_eq!(as_number(Some(&json!(5000))), 5000.0);
        assert_eq!(as_number(Some(&json!(93.2))), 93.2);
        assert_eq!(as_number(Some(&json!(" 42 "))), 42.0);
        assert_eq!(as_number(Some(&json!("1.5e-12"))), 1.5e-12);
        assert_eq!(as_number(Some(&json!(true))), 1.0);
        assert_eq!(as_number(Some(&json!(false))), 0.0);

        assert_eq!(as_number(Some(&json!("n/a"))), 0.0);
        assert_eq!(as_number(Some(&json!("1,204"))), 0.0);
        assert_eq!(as_number(Some(&json!("inf"))), 0.0);
        assert_eq!(as_number(Some(&json!("NaN"))), 0.0);
        assert_eq!(as_number(Some(&json!(""))), 0.0);
        assert_eq!(as_number(Some(&json!({"a": 1}))), 0.0);
        assert_eq!(as_number(Some(&json!(null))), 0.0);
        assert_eq!(as_number(None), 0.0);
    }

    #[test]
    fn test_strict_number_rejects_non_numeric() {
        assert_eq!(strict_number(Some(&json!("10"))), Some(10.0));
        assert_eq!(strict_number(Some(&json!(-3))), Some(-3.0));
        assert_eq!(strict_number(Some(&json!(""))), None);
        assert_eq!(strict_number(Some(&json!("   "))), None);
        assert_eq!(strict_number(Some(&json!("Port 2"))), None);
        assert_eq!(strict_number(Some(&json!(true))), None);
        assert_eq!(strict_number(None), None);
    }

    #[test]
    fn test_search_text_is_lowercased_and_deterministic() {
        assert_eq!(as_search_text(Some(&json!("Failed"))), "failed");
        assert_eq!(as_search_text(Some(&json!(5000))), "5000");
        assert_eq!(as_search_text(Some(&json!(false))), "false");
        assert_eq!(as_search_text(Some(&json!(null))), "");
        assert_eq!(as_search_text(None), "");

        let nested = json!({"Lane": 3, "Mode": "NRZ"});
        assert_eq!(as_search_text(Some(&nested)), r#"{"lane":3,"mode":"nrz"}"#);
        assert_eq!(
            as_search_text(Some(&nested)),
            as_search_text(Some(&nested.clone()))
        );
    }

    #[test]
    fn test_display_text_distinguishes_missing_from_empty() {
        assert_eq!(as_display_text(Some(&json!(""))), Some(String::new()));
        assert_eq!(as_display_text(Some(&json!(null))), None);
        assert_eq!(as_display_text(None), None);
        assert_eq!(
            as_display_text(Some(&json!([1, "a"]))),
            Some(r#"[1,"a"]"#.to_string())
        );
        assert_eq!(as_display_text(Some(&json!("Port 1"))), Some("Port 1".to_string()));
    }
}
