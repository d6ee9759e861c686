//! Bare scalar targets: `select::<i64>(..)` yields a `Vec<i64>`, not a wrapper.
//!
//! A non-optional scalar rejects NULL; wrap it in `Option` to accept NULL.

use chrono::NaiveDateTime;

use crate::error::MappingError;
use crate::types::RowValues;

use super::coerce;
use super::materializer::{Record, coercion_error};
use super::shape::{FieldKind, FromRow, Shape};

fn read_scalar<V>(
    record: &Record<'_>,
    convert: fn(&RowValues) -> Option<V>,
) -> Result<Option<V>, MappingError> {
    let (value, kind, column) = record.scalar_value()?;
    if value.is_null() {
        return Ok(None);
    }
    convert(value)
        .map(Some)
        .ok_or_else(|| coercion_error(column, kind, value))
}

fn required<V>(record: &Record<'_>, value: Option<V>) -> Result<V, MappingError> {
    match value {
        Some(v) => Ok(v),
        None => {
            let (raw, kind, column) = record.scalar_value()?;
            Err(coercion_error(column, kind, raw))
        }
    }
}

fn to_i32(value: &RowValues) -> Option<i32> {
    coerce::to_int(value).and_then(|i| i32::try_from(i).ok())
}

macro_rules! impl_scalar_from_row {
    ($ty:ty, $kind:expr, $convert:path) => {
        impl FromRow for $ty {
            fn shape() -> Shape {
                Shape::Scalar($kind)
            }

            fn from_record(record: &Record<'_>) -> Result<Self, MappingError> {
                let value = read_scalar(record, $convert)?;
                required(record, value)
            }
        }

        impl FromRow for Option<$ty> {
            fn shape() -> Shape {
                Shape::Scalar($kind)
            }

            fn from_record(record: &Record<'_>) -> Result<Self, MappingError> {
                read_scalar(record, $convert)
            }
        }
    };
}

impl_scalar_from_row!(i64, FieldKind::Int, coerce::to_int);
impl_scalar_from_row!(i32, FieldKind::Int, to_i32);
impl_scalar_from_row!(f64, FieldKind::Float, coerce::to_float);
impl_scalar_from_row!(String, FieldKind::Text, coerce::to_text);
impl_scalar_from_row!(bool, FieldKind::Bool, coerce::to_bool);
impl_scalar_from_row!(NaiveDateTime, FieldKind::Timestamp, coerce::to_timestamp);
