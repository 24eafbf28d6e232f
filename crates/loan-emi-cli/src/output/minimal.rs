use serde_json::Value;

use super::cell;

/// Print just the headline number of a result.
///
/// Picks the first non-null field from a priority list, then falls back to the first
/// field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["emi", "converted_amount", "matched"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", cell(val));
                    return;
                }
            }
        }

        // Conversion with no rate: say so rather than print an empty line
        if map.contains_key("converted_amount") {
            println!("unavailable");
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, cell(val));
            return;
        }
    }

    println!("{}", cell(result_obj));
}
