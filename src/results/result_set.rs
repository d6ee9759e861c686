use std::sync::Arc;

use super::row::ResultRow;
use crate::error::QueryError;
use crate::mapping::{ColumnBinder, FromRow, MappingRegistry, materialize};
use crate::types::RowValues;

/// A result set from a database query
///
/// This struct represents the result of a database query,
/// containing the rows returned by the query and metadata.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<ResultRow>,
    /// Column names shared by all rows (to avoid duplicating in each row)
    column_names: Arc<Vec<String>>,
}

impl ResultSet {
    /// Create an empty result set for the given columns.
    #[must_use]
    pub fn new(column_names: Vec<String>) -> ResultSet {
        ResultSet {
            results: Vec::new(),
            column_names: Arc::new(column_names),
        }
    }

    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(column_names: Vec<String>, capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            column_names: Arc::new(column_names),
        }
    }

    /// Get the column names for this result set
    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    /// Add a row to the result set
    ///
    /// # Arguments
    ///
    /// * `row_values` - The values for this row, in column order
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        self.results
            .push(ResultRow::new(Arc::clone(&self.column_names), row_values));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Map every row into `T`, in order, binding columns once.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Binding` if the columns cannot be bound to `T`, or
    /// `QueryError::Mapping` for the first row that fails; no partial list is
    /// returned.
    pub fn map_rows<T: FromRow>(&self, registry: &MappingRegistry) -> Result<Vec<T>, QueryError> {
        let descriptor = registry.descriptor::<T>()?;
        let plan = ColumnBinder::new(self.column_names.as_slice()).bind(&descriptor)?;
        self.results
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                materialize(&descriptor, &plan, &row.values)
                    .map_err(|source| QueryError::Mapping { row: idx + 1, source })
            })
            .collect()
    }
}
