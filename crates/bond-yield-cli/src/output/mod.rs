pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Schedule columns, in display order, with their headings.
pub const SCHEDULE_COLUMNS: [(&str, &str); 5] = [
    ("period", "Period"),
    ("paymentDate", "Payment Date"),
    ("couponPayment", "Coupon Payment"),
    ("cumulativeInterest", "Cumulative Interest"),
    ("remainingPrincipal", "Remaining Principal"),
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-print JSON to stdout.
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// The cash-flow rows carried by a value: either the value itself (the
/// `schedule` command) or `result.cashFlows` inside an envelope.
pub fn schedule_rows(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(rows) => Some(rows),
        Value::Object(map) => map
            .get("result")
            .and_then(|r| r.get("cashFlows"))
            .and_then(Value::as_array),
        _ => None,
    }
}

pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
