use serde_json::Value;

/// Walk a dotted property path (`a.b.0.c`) through a JSON document.
///
/// Object members are looked up by name; a numeric segment also indexes
/// into arrays. Returns `None` as soon as a segment is missing.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// String form used by text functions and the ordering fallback.
/// Null, arrays and objects have none.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        // 10.0 reads as "10", like an integer would
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
