use colored::Colorize;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

/// Render a computation envelope as tables: scalar fields first, then each
/// nested summary, then each list of rows (payments, debts, plans).
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        println!("{}", format_value(value));
        return;
    };

    match envelope.get("result") {
        Some(Value::Object(result)) => {
            print_result(result);
            print_notes(envelope);
        }
        Some(other) => println!("{}", format_value(other)),
        None => print_fields(envelope.iter()),
    }
}

fn print_result(result: &Map<String, Value>) {
    print_fields(result.iter().filter(|(_, v)| is_scalar(v)));

    for (key, val) in result {
        if let Value::Object(inner) = val {
            println!("\n{}", heading(key));
            print_fields(inner.iter().filter(|(_, v)| is_scalar(v)));
        }
    }

    for (key, val) in result {
        if let Value::Array(rows) = val {
            if rows.iter().all(Value::is_object) && !rows.is_empty() {
                println!("\n{}", heading(key));
                print_rows(rows);
            }
        }
    }
}

fn print_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow());
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields<'a>(fields: impl Iterator<Item = (&'a String, &'a Value)>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{}", table);
}

/// One row per object; nested values are left out to keep rows on one line.
fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first
        .iter()
        .filter(|(_, v)| is_scalar(v))
        .map(|(k, _)| k.as_str())
        .collect();

    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(*h).map(format_value).unwrap_or_default()),
        );
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{}", table);
}

fn heading(key: &str) -> String {
    key.replace('_', " ").to_uppercase().as_str().bold().to_string()
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
