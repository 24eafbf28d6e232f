use serde_json::Value;
use std::io;

use super::{cell, split_rows};

/// Write output as CSV to stdout.
///
/// Results carrying `rows` (schedules, rate listings) are written as one record per
/// row; anything else as two-column field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.as_object().and_then(|m| m.get("result")).unwrap_or(value);

    match result {
        Value::Object(map) => match split_rows(map) {
            (_, Some(rows)) => write_rows(&mut wtr, rows),
            (fields, None) => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in fields {
                    let _ = wtr.write_record([key, cell(val).as_str()]);
                }
            }
        },
        Value::Array(rows) => write_rows(&mut wtr, rows),
        other => {
            let _ = wtr.write_record([&cell(other)]);
        }
    }

    if let Err(e) = wtr.flush() {
        tracing::error!(error = %e, "failed to flush CSV output");
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([&cell(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}
