use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout. Schedules become one line per payment,
/// plan comparisons one line per plan, anything else field/value pairs.
pub fn print_csv(value: &Value) {
    let mut wtr = csv::Writer::from_writer(io::stdout().lock());

    let result = match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => result,
            _ => map,
        },
        other => {
            let _ = wtr.write_record([format_csv_value(other)]);
            let _ = wtr.flush();
            return;
        }
    };

    let written = if let Some(Value::Array(payments)) = result.get("payments") {
        write_rows(&mut wtr, payments)
    } else if let Some(Value::Array(plans)) = result.get("plans") {
        write_rows(&mut wtr, plans)
    } else {
        write_fields(&mut wtr, result)
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_fields<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    fields: &Map<String, Value>,
) -> Result<(), csv::Error> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in fields {
        wtr.write_record([key.as_str(), &format_csv_value(val)])?;
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = rows.first() else {
        return Ok(());
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;

    for row in rows.iter().filter_map(Value::as_object) {
        wtr.write_record(
            headers
                .iter()
                .map(|h| row.get(*h).map(format_csv_value).unwrap_or_default()),
        )?;
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
