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

/// Render a scalar for plain-text formats; arrays are space separated.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(display_value).collect::<Vec<_>>().join(" "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// The list of debit rows in a schedule listing, if `value` is one.
pub(crate) fn schedule_debits(value: &Value) -> Option<&Vec<Value>> {
    value.get("result")?.get("debits")?.as_array()
}
