//! Helpers for building rows by hand in tests and tools.

use std::sync::Arc;

use crate::results::{ResultRow, ResultSet};
use crate::types::RowValues;

/// Create a row with the given column names and values.
#[must_use]
pub fn create_test_row(column_names: Vec<String>, values: Vec<RowValues>) -> ResultRow {
    ResultRow::new(Arc::new(column_names), values)
}

/// Create a result set from column names and rows of values.
#[must_use]
pub fn create_test_result_set(column_names: &[&str], rows: Vec<Vec<RowValues>>) -> ResultSet {
    let columns = column_names.iter().map(|c| (*c).to_string()).collect();
    let mut result_set = ResultSet::with_capacity(columns, rows.len());
    for values in rows {
        result_set.add_row_values(values);
    }
    result_set
}
