//! Record representation shared by the input table and the result store
//!
//! A record is an insertion-ordered JSON object so that column order survives
//! merging, persisting and serving.

use serde_json::{Map, Number, Value};

/// One table row: column name → cell value, in column order
pub type Record = Map<String, Value>;

/// Infer a typed value from a CSV cell
///
/// Empty (or whitespace-only) cells are `None`. Integers and finite floats
/// become numbers; everything else stays a string. Digit strings with a
/// leading zero (UPCs, EANs, zip codes) stay strings so the zeros survive.
pub fn parse_cell(cell: &str) -> Option<Value> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }

    if has_leading_zero(trimmed) {
        return Some(Value::String(cell.to_string()));
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Some(Value::Number(n));
        }
    }

    Some(Value::String(cell.to_string()))
}

/// Cell text for a cell that must never be type-inferred
///
/// Empty (or whitespace-only) cells are `None`, like in `parse_cell`.
pub fn text_cell(cell: &str) -> Option<Value> {
    if cell.trim().is_empty() {
        None
    } else {
        Some(Value::String(cell.to_string()))
    }
}

/// `0123`, `-007`: a zero followed by more digits
fn has_leading_zero(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let mut chars = digits.chars();
    chars.next() == Some('0') && chars.next().is_some_and(|c| c.is_ascii_digit())
}

/// Render a value as CSV cell text
///
/// Nulls render as an empty cell; nested values render as compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Numeric view of a record field, if it holds a number
pub fn numeric_field(record: &Record, field: &str) -> Option<f64> {
    record.get(field).and_then(Value::as_f64)
}
