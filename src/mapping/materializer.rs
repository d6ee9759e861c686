//! Builds one target object from one row.
//!
//! The materializer never looks at other rows: it takes the row's values, the
//! type's descriptor and the result set's [`ColumnPlan`], and hands the target
//! type a [`Record`] through which it reads its fields and nested slots.

use std::any::TypeId;

use chrono::NaiveDateTime;

use crate::error::MappingError;
use crate::types::RowValues;

use super::binder::{ColumnPlan, NestedPlan, RecordPlan};
use super::coerce;
use super::registry::{MappingDescriptor, RecordDescriptor};
use super::shape::{FieldKind, FromRow, check_kind};

/// Build a `T` from one row's values.
///
/// `descriptor` must be `T`'s descriptor and `plan` must have been bound from
/// it against the row's result set.
///
/// # Errors
///
/// Returns `MappingError` when a value cannot be coerced, a nested group with a
/// non-NULL key has a NULL column, or `plan` does not match `descriptor`.
pub fn materialize<T: FromRow>(
    descriptor: &MappingDescriptor,
    plan: &ColumnPlan,
    values: &[RowValues],
) -> Result<T, MappingError> {
    let view = match (descriptor, plan) {
        (MappingDescriptor::Scalar(kind), ColumnPlan::Scalar { index, column }) => {
            View::Scalar {
                kind: *kind,
                index: *index,
                column,
            }
        }
        (MappingDescriptor::Record(record), ColumnPlan::Record(record_plan)) => View::Fields {
            descriptor: record,
            plan: record_plan,
        },
        _ => return Err(plan_mismatch(descriptor.type_name())),
    };
    T::from_record(&Record { values, view })
}

#[derive(Debug, Clone, Copy)]
enum View<'a> {
    Scalar {
        kind: FieldKind,
        index: usize,
        column: &'a str,
    },
    Fields {
        descriptor: &'a RecordDescriptor,
        plan: &'a RecordPlan,
    },
}

/// One row as seen by a target type's [`FromRow::from_record`].
///
/// Field accessors return the field's zero value when its column was not
/// selected or holds NULL; the `opt_*` variants return `None` instead.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    values: &'a [RowValues],
    view: View<'a>,
}

impl<'a> Record<'a> {
    fn fields(&self) -> Result<(&'a RecordDescriptor, &'a RecordPlan), MappingError> {
        match self.view {
            View::Fields { descriptor, plan } => Ok((descriptor, plan)),
            View::Scalar { .. } => Err(MappingError::Descriptor {
                type_name: "scalar",
                reason: "named fields requested from a scalar row".to_string(),
            }),
        }
    }

    /// Raw value and column name of a declared field; `None` when unselected.
    fn lookup(
        &self,
        name: &str,
        kind: FieldKind,
    ) -> Result<Option<(&'a RowValues, &'a str)>, MappingError> {
        let (descriptor, plan) = self.fields()?;
        let (idx, binding) =
            descriptor
                .field(name)
                .ok_or_else(|| MappingError::UnknownField {
                    type_name: descriptor.type_name,
                    name: name.to_string(),
                })?;
        check_kind(descriptor.type_name, kind, binding.kind, name)?;
        let column = *plan
            .fields
            .get(idx)
            .ok_or_else(|| plan_mismatch(descriptor.type_name))?;
        Ok(column
            .and_then(|column| self.values.get(column))
            .map(|value| (value, binding.column.as_str())))
    }

    fn read<V>(
        &self,
        name: &str,
        kind: FieldKind,
        convert: fn(&RowValues) -> Option<V>,
    ) -> Result<Option<V>, MappingError> {
        match self.lookup(name, kind)? {
            None => Ok(None),
            Some((value, _)) if value.is_null() => Ok(None),
            Some((value, column)) => convert(value)
                .map(Some)
                .ok_or_else(|| coercion_error(column, kind, value)),
        }
    }

    /// # Errors
    /// Returns `MappingError::Coercion` if the stored value is not an integer.
    pub fn int(&self, name: &str) -> Result<i64, MappingError> {
        Ok(self.opt_int(name)?.unwrap_or_default())
    }

    /// # Errors
    /// Returns `MappingError::Coercion` if the stored value is not an integer.
    pub fn opt_int(&self, name: &str) -> Result<Option<i64>, MappingError> {
        self.read(name, FieldKind::Int, coerce::to_int)
    }

    /// # Errors
    /// Returns `MappingError::Coercion` if the stored value is not a number.
    pub fn float(&self, name: &str) -> Result<f64, MappingError> {
        Ok(self
            .read(name, FieldKind::Float, coerce::to_float)?
            .unwrap_or_default())
    }

    /// # Errors
    /// Returns `MappingError::Coercion` if the stored value cannot be read as text.
    pub fn text(&self, name: &str) -> Result<String, MappingError> {
        Ok(self.opt_text(name)?.unwrap_or_default())
    }

    /// # Errors
    /// Returns `MappingError::Coercion` if the stored value cannot be read as text.
    pub fn opt_text(&self, name: &str) -> Result<Option<String>, MappingError> {
        self.read(name, FieldKind::Text, coerce::to_text)
    }

    /// # Errors
    /// Returns `MappingError::Coercion` if the stored value is not a boolean.
    pub fn boolean(&self, name: &str) -> Result<bool, MappingError> {
        Ok(self
            .read(name, FieldKind::Bool, coerce::to_bool)?
            .unwrap_or_default())
    }

    /// Timestamps have no zero value, so an unselected or NULL column is `None`.
    ///
    /// # Errors
    /// Returns `MappingError::Coercion` if the stored value is not a timestamp.
    pub fn timestamp(&self, name: &str) -> Result<Option<NaiveDateTime>, MappingError> {
        self.read(name, FieldKind::Timestamp, coerce::to_timestamp)
    }

    /// Build the nested object in `slot`, or `None` when its key is NULL or was
    /// not selected.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::PartialNested` if the key is present but another
    /// column of the group is NULL, and `MappingError::Descriptor` if `N` is not
    /// the type the slot was declared with.
    pub fn nested<N: FromRow>(&self, slot: &str) -> Result<Option<N>, MappingError> {
        let (descriptor, plan) = self.fields()?;
        let (idx, nested) =
            descriptor
                .slot(slot)
                .ok_or_else(|| MappingError::UnknownField {
                    type_name: descriptor.type_name,
                    name: slot.to_string(),
                })?;
        if nested.type_id != TypeId::of::<N>() {
            return Err(MappingError::Descriptor {
                type_name: descriptor.type_name,
                reason: format!(
                    "slot `{slot}` holds {} but was read as another type",
                    nested.record.type_name
                ),
            });
        }

        let slot_plan = plan
            .nested
            .get(idx)
            .ok_or_else(|| plan_mismatch(descriptor.type_name))?;
        let NestedPlan::Bound { key, plan: inner } = slot_plan else {
            return Ok(None);
        };
        if inner.fields.len() != nested.record.fields.len()
            || inner.nested.len() != nested.record.nested.len()
        {
            return Err(plan_mismatch(nested.record.type_name));
        }
        if self.values.get(*key).is_none_or(RowValues::is_null) {
            return Ok(None);
        }
        for (binding, column) in nested.record.fields.iter().zip(&inner.fields) {
            let null = column
                .and_then(|c| self.values.get(c))
                .is_none_or(RowValues::is_null);
            if null {
                return Err(MappingError::PartialNested {
                    slot: slot.to_string(),
                    column: binding.column.clone(),
                });
            }
        }

        let record = Record {
            values: self.values,
            view: View::Fields {
                descriptor: &nested.record,
                plan: inner,
            },
        };
        N::from_record(&record).map(Some)
    }

    /// The selected value of a scalar row (NULL included), its kind and its
    /// column name.
    ///
    /// # Errors
    /// Returns `MappingError::NoColumns` if the row has no values, or
    /// `MappingError::Descriptor` for a record row.
    pub fn scalar_value(&self) -> Result<(&'a RowValues, FieldKind, &'a str), MappingError> {
        match self.view {
            View::Scalar {
                kind,
                index,
                column,
            } => self
                .values
                .get(index)
                .map(|value| (value, kind, column))
                .ok_or(MappingError::NoColumns),
            View::Fields { descriptor, .. } => Err(MappingError::Descriptor {
                type_name: descriptor.type_name,
                reason: "scalar value requested from a record row".to_string(),
            }),
        }
    }
}

fn plan_mismatch(type_name: &'static str) -> MappingError {
    MappingError::Descriptor {
        type_name,
        reason: "column plan was bound from a different descriptor".to_string(),
    }
}

pub(crate) fn coercion_error(column: &str, expected: FieldKind, value: &RowValues) -> MappingError {
    MappingError::Coercion {
        column: column.to_string(),
        expected,
        found: value.describe(),
    }
}
