use std::sync::Arc;

use crate::error::MappingError;
use crate::mapping::{ColumnBinder, FromRow, MappingRegistry, materialize};
use crate::types::RowValues;

/// A row from a database query result
///
/// This struct represents a single row from a database query result,
/// with access to both the column names and the values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub values: Vec<RowValues>,
}

impl ResultRow {
    /// Create a new database row
    ///
    /// # Arguments
    ///
    /// * `column_names` - The column names
    /// * `values` - The values for this row, in column order
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        Self {
            column_names,
            values,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_names
            .iter()
            .position(|col| col == column_name)
            .or_else(|| {
                self.column_names
                    .iter()
                    .position(|col| col.eq_ignore_ascii_case(column_name))
            })
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// Map this single row into `T` using the process-wide registry.
    ///
    /// When mapping many rows that share column names, prefer
    /// [`ResultSet::map_rows`](super::ResultSet::map_rows), which binds once.
    ///
    /// # Errors
    ///
    /// Returns `MappingError` if the columns cannot be bound to `T` or a value
    /// cannot be coerced.
    pub fn map<T: FromRow>(&self) -> Result<T, MappingError> {
        let descriptor = MappingRegistry::global().descriptor::<T>()?;
        let plan = ColumnBinder::new(self.column_names.as_slice()).bind(&descriptor)?;
        materialize(&descriptor, &plan, &self.values)
    }
}
