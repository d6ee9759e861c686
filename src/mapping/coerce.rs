//! Coercion of stored values into declared field kinds.
//!
//! SQLite hands back only integers, reals, text and blobs, so booleans arrive
//! as `0`/`1` and timestamps as text. NULL is handled by callers; every
//! function here returns `None` for a value that cannot be read as its kind.

use chrono::NaiveDateTime;

use crate::types::RowValues;

#[must_use]
pub fn to_int(value: &RowValues) -> Option<i64> {
    match value {
        RowValues::Int(i) => Some(*i),
        RowValues::Bool(b) => Some(i64::from(*b)),
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        RowValues::Float(f)
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
        {
            Some(*f as i64)
        }
        RowValues::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[must_use]
pub fn to_float(value: &RowValues) -> Option<f64> {
    match value {
        RowValues::Float(f) => Some(*f),
        #[allow(clippy::cast_precision_loss)]
        RowValues::Int(i) => Some(*i as f64),
        RowValues::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[must_use]
pub fn to_text(value: &RowValues) -> Option<String> {
    match value {
        RowValues::Text(s) => Some(s.clone()),
        RowValues::Int(i) => Some(i.to_string()),
        RowValues::Float(f) => Some(f.to_string()),
        RowValues::Bool(b) => Some(b.to_string()),
        RowValues::Timestamp(dt) => Some(dt.format("%F %T%.f").to_string()),
        RowValues::Blob(bytes) => String::from_utf8(bytes.clone()).ok(),
        RowValues::Null => None,
    }
}

#[must_use]
pub fn to_bool(value: &RowValues) -> Option<bool> {
    if let Some(b) = value.as_bool() {
        return Some(*b);
    }
    match value.as_text()?.trim() {
        t if t.eq_ignore_ascii_case("true") || t == "1" => Some(true),
        t if t.eq_ignore_ascii_case("false") || t == "0" => Some(false),
        _ => None,
    }
}

#[must_use]
pub fn to_timestamp(value: &RowValues) -> Option<NaiveDateTime> {
    value.as_timestamp()
}
