use serde_json::Value;

/// Renders a JSON value as display text. Containers are rendered as compact JSON.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(boolean) => Some(boolean.to_string()),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).ok(),
    }
}

/// Loose "has a usable value" check: null, false, zero and empty strings count as absent.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(boolean) => *boolean,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reads an integral number, accepting `3` and `3.0` alike.
pub fn value_as_integer(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    let float = value.as_f64()?;
    if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

/// Text used when a value has to be spliced into a sentence.
pub fn value_display(value: &Value) -> String {
    value_to_text(value).unwrap_or_else(|| "null".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn presence_follows_loose_truthiness() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!(false)));
        assert!(is_present(&json!("A0")));
        assert!(is_present(&json!(2)));
        assert!(is_present(&json!({})));
    }

    #[test]
    fn integers_accept_whole_floats() {
        assert_eq!(value_as_integer(&json!(3)), Some(3));
        assert_eq!(value_as_integer(&json!(3.0)), Some(3));
        assert_eq!(value_as_integer(&json!(2.5)), None);
        assert_eq!(value_as_integer(&json!("3")), None);
    }

    #[test]
    fn text_rendering() {
        assert_eq!(value_to_text(&json!("B+")).as_deref(), Some("B+"));
        assert_eq!(value_to_text(&json!(4)).as_deref(), Some("4"));
        assert_eq!(value_to_text(&json!(null)), None);
        assert_eq!(value_display(&json!(null)), "null");
    }
}
