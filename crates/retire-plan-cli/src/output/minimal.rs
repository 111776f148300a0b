use serde_json::Value;

use super::format_scalar;

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls
/// back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["recommendation", "net_income", "tax", "contribution"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

/// Recommendations print as `<account>: <yearly contribution>`.
fn format_minimal(value: &Value) -> String {
    match value {
        Value::Object(map) => match (map.get("account"), map.get("yearly_contribution")) {
            (Some(account), Some(yearly)) => {
                format!("{}: {}", format_scalar(account), format_scalar(yearly))
            }
            _ => format_scalar(value),
        },
        Value::Null => "null".to_string(),
        _ => format_scalar(value),
    }
}
