use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{format_scalar, schedule_rows, SCHEDULE_COLUMNS};

/// Format output as tables: scalar result fields first, then the schedule.
pub fn print_table(value: &Value) {
    if let Some(Value::Object(res_map)) = value.get("result") {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in res_map.iter().filter(|(_, v)| !v.is_array()) {
            builder.push_record([key.as_str(), &format_scalar(val)]);
        }
        println!("{}", Table::from(builder));
    }

    if let Some(rows) = schedule_rows(value) {
        if rows.is_empty() {
            println!("(empty)");
        } else {
            println!("{}", schedule_table(rows));
        }
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn schedule_table(rows: &[Value]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(SCHEDULE_COLUMNS.iter().map(|(_, heading)| heading.to_string()));
    for row in rows {
        builder.push_record(
            SCHEDULE_COLUMNS
                .iter()
                .map(|(key, _)| row.get(*key).map(format_scalar).unwrap_or_default()),
        );
    }
    Table::from(builder)
}
