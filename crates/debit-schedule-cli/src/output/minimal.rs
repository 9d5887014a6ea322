use serde_json::Value;

use super::{display_value, schedule_debits};

/// Print only the debit dates and amounts, one per line.
pub fn print_minimal(value: &Value) {
    if let Some(debit) = value.get("debit") {
        println!("{}", debit_line(debit));
        return;
    }

    if let Some(debits) = schedule_debits(value) {
        for debit in debits {
            println!("{}", debit_line(debit));
        }
        return;
    }

    if let Some(Value::Array(months)) = value.get("months") {
        for month in months {
            println!(
                "{}: {}",
                display_value(&month["month"]),
                display_value(&month["dates"])
            );
        }
        return;
    }

    println!("{}", display_value(value));
}

fn debit_line(debit: &Value) -> String {
    format!("{} {}", display_value(&debit["date"]), display_value(&debit["amount"]))
}
