use serde_json::Value;

/// Headline figure per command, first match wins: terms report the
/// payment, schedules the payoff month, comparisons the cheapest plan.
const HEADLINE_KEYS: [&str; 4] = ["minimum_payment", "payoff_month", "lowest_interest", "totals"];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        println!("{}", format_minimal(result_obj));
        return;
    };

    let headline = HEADLINE_KEYS
        .iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()));
    match headline {
        Some(val) => println!("{}", format_minimal(val)),
        None => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_minimal(val));
            }
        }
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
