use thiserror::Error;

use crate::mapping::FieldKind;

/// A row could not be turned into its target type.
///
/// Always attributable to a single row; the executor wraps it in
/// [`QueryError::Mapping`] together with the row's position.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    #[error("column `{column}` holds {found}, which cannot be read as {expected}")]
    Coercion {
        column: String,
        expected: FieldKind,
        found: String,
    },

    #[error("nested `{slot}` has a key but column `{column}` is NULL")]
    PartialNested { slot: String, column: String },

    #[error("nested `{slot}` selects key column `{key}` but not `{column}`")]
    IncompleteGroup {
        slot: String,
        key: String,
        column: String,
    },

    #[error("{type_name} has no declared field or slot named `{name}`")]
    UnknownField {
        type_name: &'static str,
        name: String,
    },

    #[error("scalar target needs at least one selected column")]
    NoColumns,

    #[error("invalid mapping for {type_name}: {reason}")]
    Descriptor {
        type_name: &'static str,
        reason: String,
    },
}

/// Anything that goes wrong at or below statement execution.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("Mapping error: {0}")]
    Binding(#[from] MappingError),

    /// `row` is 1-based, in result-set order.
    #[error("Mapping error on row {row}: {source}")]
    Mapping {
        row: usize,
        #[source]
        source: MappingError,
    },

    #[error("Background worker error: {0}")]
    WorkerError(String),
}

impl QueryError {
    /// The mapping failure behind this error, if there is one.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&MappingError> {
        match self {
            QueryError::Binding(source) | QueryError::Mapping { source, .. } => Some(source),
            _ => None,
        }
    }
}
