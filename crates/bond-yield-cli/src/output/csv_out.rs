use serde_json::Value;
use std::io;

use super::{format_scalar, schedule_rows, SCHEDULE_COLUMNS};

/// Write output as CSV to stdout. Anything carrying a schedule is exported as
/// the schedule; other results become two-column field/value rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let _ = write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    if let Some(rows) = schedule_rows(value) {
        return write_schedule(wtr, rows);
    }

    let fields = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match fields {
        Value::Object(map) => {
            wtr.write_record(["field", "value"])?;
            for (key, val) in map {
                wtr.write_record([key.as_str(), &format_scalar(val)])?;
            }
        }
        other => wtr.write_record([&format_scalar(other)])?,
    }
    Ok(())
}

fn write_schedule<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    wtr.write_record(SCHEDULE_COLUMNS.iter().map(|(_, heading)| *heading))?;
    for row in rows {
        let record: Vec<String> = SCHEDULE_COLUMNS
            .iter()
            .map(|(key, _)| row.get(*key).map(format_scalar).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    Ok(())
}
