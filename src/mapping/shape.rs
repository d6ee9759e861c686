use std::any::TypeId;
use std::fmt;

use crate::error::MappingError;

use super::materializer::Record;

/// Scalar kinds a mapped field can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Int,
    Float,
    Text,
    Bool,
    Timestamp,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Int => "integer",
            FieldKind::Float => "real",
            FieldKind::Text => "text",
            FieldKind::Bool => "boolean",
            FieldKind::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// A type that can be built from one result row.
///
/// Implementors declare their shape once; the registry turns it into a cached
/// [`MappingDescriptor`](super::MappingDescriptor) and the materializer hands
/// `from_record` a view of the row already routed through that descriptor.
///
/// ```rust
/// use household_tasks::mapping::{FieldKind, FromRow, Record, RecordShape, Shape};
/// use household_tasks::MappingError;
///
/// struct Chore {
///     id: i64,
///     title: String,
/// }
///
/// impl FromRow for Chore {
///     fn shape() -> Shape {
///         Shape::Record(
///             RecordShape::new("Chore")
///                 .key("id")
///                 .field("id", FieldKind::Int)
///                 .field_as("title", "chore_title", FieldKind::Text),
///         )
///     }
///
///     fn from_record(record: &Record<'_>) -> Result<Self, MappingError> {
///         Ok(Chore {
///             id: record.int("id")?,
///             title: record.text("title")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized + 'static {
    fn shape() -> Shape;

    /// # Errors
    ///
    /// Returns `MappingError` when a bound value cannot be coerced or a nested
    /// group is inconsistent.
    fn from_record(record: &Record<'_>) -> Result<Self, MappingError>;
}

/// What a target type looks like to the mapper.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Bare value read from the first selected column.
    Scalar(FieldKind),
    /// Object with named fields and nested slots.
    Record(RecordShape),
}

#[derive(Debug, Clone)]
pub(crate) struct FieldDecl {
    pub(crate) name: &'static str,
    pub(crate) column: Option<&'static str>,
    pub(crate) kind: FieldKind,
}

#[derive(Debug, Clone)]
pub(crate) struct NestedDecl {
    pub(crate) slot: &'static str,
    pub(crate) prefix: Option<&'static str>,
    pub(crate) type_id: TypeId,
    pub(crate) shape: fn() -> Shape,
}

/// Declared fields and nested slots of a record type.
#[derive(Debug, Clone)]
pub struct RecordShape {
    pub(crate) type_name: &'static str,
    pub(crate) key: Option<&'static str>,
    pub(crate) fields: Vec<FieldDecl>,
    pub(crate) nested: Vec<NestedDecl>,
}

impl RecordShape {
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            key: None,
            fields: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Name the field whose column decides whether a nested instance exists.
    #[must_use]
    pub fn key(mut self, field: &'static str) -> Self {
        self.key = Some(field);
        self
    }

    /// Field read from the column of the same name.
    #[must_use]
    pub fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldDecl {
            name,
            column: None,
            kind,
        });
        self
    }

    /// Field read from an explicitly named column.
    #[must_use]
    pub fn field_as(mut self, name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldDecl {
            name,
            column: Some(column),
            kind,
        });
        self
    }

    /// Nested slot whose columns are prefixed with `{slot}_`.
    #[must_use]
    pub fn nested<N: FromRow>(mut self, slot: &'static str) -> Self {
        self.nested.push(NestedDecl {
            slot,
            prefix: None,
            type_id: TypeId::of::<N>(),
            shape: N::shape,
        });
        self
    }

    /// Nested slot whose columns use `prefix` verbatim (include any separator).
    #[must_use]
    pub fn nested_with_prefix<N: FromRow>(
        mut self,
        slot: &'static str,
        prefix: &'static str,
    ) -> Self {
        self.nested.push(NestedDecl {
            slot,
            prefix: Some(prefix),
            type_id: TypeId::of::<N>(),
            shape: N::shape,
        });
        self
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

pub(crate) fn check_kind(
    type_name: &'static str,
    expected: FieldKind,
    declared: FieldKind,
    name: &str,
) -> Result<(), MappingError> {
    if expected == declared {
        Ok(())
    } else {
        Err(MappingError::Descriptor {
            type_name,
            reason: format!("field `{name}` is declared {declared} but read as {expected}"),
        })
    }
}
