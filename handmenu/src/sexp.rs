//! S-expression helpers shared by the config loader and event output.

use lexpr::Value;

/// Render a boolean the way elisp reads it.
pub fn bool_sexp(b: bool) -> &'static str {
    if b {
        "t"
    } else {
        "nil"
    }
}

/// Escape a string for s-expression output.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote and escape a string for s-expression output.
pub fn quote_string(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

/// Whether `car` is the plist key `key`.
///
/// Accepts both `Value::Keyword("key")` (elisp parser) and
/// `Value::Symbol(":key")` (default parser).
fn is_key(car: &Value, key: &str) -> bool {
    match car {
        Value::Keyword(k) => k.as_ref() == key,
        Value::Symbol(s) => s.strip_prefix(':') == Some(key),
        _ => false,
    }
}

/// Find the raw value following `:key` in a plist.
///
/// Walks key/value pairs, so a value that happens to be a keyword is never
/// mistaken for a key.
pub fn find_value<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = value;
    while let Value::Cons(pair) = current {
        let Value::Cons(next) = pair.cdr() else {
            return None;
        };
        if is_key(pair.car(), key) {
            return Some(next.car());
        }
        current = next.cdr();
    }
    None
}

/// All keys of a plist, without the leading colon, in order.
pub fn plist_keys(value: &Value) -> Vec<String> {
    let mut keys = Vec::new();
    let mut current = value;
    while let Value::Cons(pair) = current {
        match pair.car() {
            Value::Keyword(k) => keys.push(k.to_string()),
            Value::Symbol(s) => {
                if let Some(k) = s.strip_prefix(':') {
                    keys.push(k.to_string());
                }
            }
            _ => {}
        }
        // skip the value cell
        current = match pair.cdr() {
            Value::Cons(next) => next.cdr(),
            _ => break,
        };
    }
    keys
}

/// Extract a keyword value from a plist as a string.
///
/// Keywords and symbols lose their leading colon; `t`/`nil` and booleans
/// come back as `"t"`/`"nil"`.
pub fn get_keyword(value: &Value, key: &str) -> Option<String> {
    let val = find_value(value, key)?;
    Some(match val {
        Value::Keyword(v) => v.to_string(),
        Value::Symbol(v) => v.strip_prefix(':').unwrap_or(v).to_string(),
        Value::String(v) => v.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => bool_sexp(*b).to_string(),
        Value::Null | Value::Nil => "nil".to_string(),
        other => other.to_string(),
    })
}

/// Integer config value, e.g. `:cursor-offset-y 50`.  A value that does not
/// parse as an integer reads as absent.
pub fn get_int(value: &Value, key: &str) -> Option<i64> {
    get_keyword(value, key).and_then(|s| s.parse().ok())
}

/// Millisecond or threshold value, e.g. `:drag-hold-ms 400`.  Integers
/// are accepted too.
pub fn get_float(value: &Value, key: &str) -> Option<f64> {
    get_keyword(value, key).and_then(|s| s.parse().ok())
}

/// Switch such as `:debounce nil`.  Anything but `nil` is true.
pub fn get_bool(value: &Value, key: &str) -> Option<bool> {
    get_keyword(value, key).map(|s| s != "nil")
}

/// One menu event line, `(:type :event :event :NAME :KEY VAL ...)`.
///
/// Field values are written verbatim; quote strings with `quote_string`.
pub fn format_event(event_type: &str, fields: &[(&str, &str)]) -> String {
    let fields: String = fields
        .iter()
        .map(|(key, val)| format!(" :{} {}", key, val))
        .collect();
    format!("(:type :event :event :{}{})", event_type, fields)
}
