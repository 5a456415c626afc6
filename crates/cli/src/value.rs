//! String → Value parsing for `let`.
//!
//! Rules, in order:
//! 1. JSON structures (`{`, `[`, `"`) → parsed as JSON
//! 2. `null` / `None` → `Value::Null`
//! 3. `true` / `True`, `false` / `False` → `Value::Bool`
//! 4. Integer pattern that fits i64 → `Value::Int`
//! 5. Float pattern → `Value::Float`
//! 6. Quoted with `'` → the unquoted string
//! 7. Everything else → `Value::String`

use vault_executor::Value;

/// Auto-detect the value of a `let` right-hand side.
pub fn parse_value(s: &str) -> Value {
    if s.starts_with('{') || s.starts_with('[') || s.starts_with('"') {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(s) {
            return Value::from(json);
        }
    }

    match s {
        "null" | "None" => return Value::Null,
        "true" | "True" => return Value::Bool(true),
        "false" | "False" => return Value::Bool(false),
        _ => {}
    }

    if is_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return Value::Int(i);
        }
    }
    if is_float(s) {
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
    }

    if let Some(inner) = s.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')) {
        return Value::from(inner);
    }
    Value::from(s)
}

fn is_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_float(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    if s.is_empty() || !s.contains(['.', 'e', 'E']) {
        return false;
    }
    s.bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
}
