pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Split a result object into scalar fields and the optional `rows` listing.
pub(crate) fn split_rows(
    result: &serde_json::Map<String, Value>,
) -> (Vec<(&str, &Value)>, Option<&[Value]>) {
    let fields = result
        .iter()
        .filter(|(key, _)| key.as_str() != "rows")
        .map(|(key, val)| (key.as_str(), val))
        .collect();
    let rows = result.get("rows").and_then(Value::as_array).map(Vec::as_slice);
    (fields, rows)
}

/// Render a scalar for text output. Nulls render empty.
pub(crate) fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
