use serde_json::Value;

use super::format_scalar;

/// Most informative field first.
const PRIORITY_KEYS: [&str; 4] = ["ytm", "price", "currentYield", "totalInterest"];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                    return format_scalar(val);
                }
            }
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, format_scalar(val)),
                None => String::new(),
            }
        }
        // The schedule command: report the number of periods.
        Value::Array(rows) => rows.len().to_string(),
        other => format_scalar(other),
    }
}
