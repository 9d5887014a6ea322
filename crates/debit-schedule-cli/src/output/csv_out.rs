use serde_json::Value;
use std::io;

use super::{display_value, schedule_debits};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(debit) = value.get("debit") {
        let _ = wtr.write_record(["date", "amount"]);
        write_debit(&mut wtr, debit);
    } else if let Some(debits) = schedule_debits(value) {
        let _ = wtr.write_record(["date", "amount"]);
        for debit in debits {
            write_debit(&mut wtr, debit);
        }
    } else if let Some(Value::Array(months)) = value.get("months") {
        let _ = wtr.write_record(["month", "occurrences", "dates"]);
        for month in months {
            let _ = wtr.write_record([
                display_value(&month["month"]),
                display_value(&month["occurrences"]),
                display_value(&month["dates"]),
            ]);
        }
    } else if let Value::Object(map) = value {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &display_value(val)]);
        }
    } else {
        let _ = wtr.write_record([display_value(value)]);
    }

    let _ = wtr.flush();
}

fn write_debit(wtr: &mut StdoutWriter<'_>, debit: &Value) {
    let _ = wtr.write_record([display_value(&debit["date"]), display_value(&debit["amount"])]);
}
