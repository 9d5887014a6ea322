use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{display_value, schedule_debits};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    if let Some(debit) = value.get("debit") {
        print_debits(std::slice::from_ref(debit));
    } else if let Some(debits) = schedule_debits(value) {
        print_schedule(value, debits);
    } else if let Some(Value::Array(months)) = value.get("months") {
        print_occurrences(value, months);
    } else {
        print_flat_object(value);
    }
}

fn print_debits(debits: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(["Date", "Amount"]);
    for debit in debits {
        builder.push_record([display_value(&debit["date"]), display_value(&debit["amount"])]);
    }
    println!("{}", Table::from(builder));
}

fn print_schedule(envelope: &Value, debits: &[Value]) {
    if let Some(reference) = envelope["result"].get("reference_date") {
        println!("Reference date: {}\n", display_value(reference));
    }
    print_debits(debits);

    if let Some(Value::Array(totals)) = envelope["result"].get("monthly_totals") {
        let mut builder = Builder::default();
        builder.push_record(["Month", "Debits", "Per debit", "Total", "Overage"]);
        for month in totals {
            builder.push_record(
                ["month", "installments", "installment_amount", "total", "overage"]
                    .map(|key| display_value(&month[key])),
            );
        }
        println!("\n{}", Table::from(builder));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                println!("  - {}", display_value(w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_occurrences(value: &Value, months: &[Value]) {
    if let Some(reference) = value.get("reference_date") {
        println!("Reference date: {}\n", display_value(reference));
    }

    let mut builder = Builder::default();
    builder.push_record(["Month", "Debits", "Dates"]);
    for month in months {
        builder.push_record(["month", "occurrences", "dates"].map(|key| display_value(&month[key])));
    }
    println!("{}", Table::from(builder));
}

fn print_flat_object(value: &Value) {
    match value {
        Value::Object(map) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in map {
                builder.push_record([key.clone(), display_value(val)]);
            }
            println!("{}", Table::from(builder));
        }
        _ => println!("{}", display_value(value)),
    }
}
