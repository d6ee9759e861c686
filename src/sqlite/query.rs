use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::QueryError;
use crate::mapping::{ColumnBinder, FromRow, MappingDescriptor, materialize};
use crate::results::ResultSet;
use crate::types::RowValues;

use super::params::Params;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `QueryError::SqliteError` if the value cannot be read.
pub fn sqlite_extract_value_sync(row: &rusqlite::Row, idx: usize) -> Result<RowValues, QueryError> {
    let value: Value = row.get(idx)?;
    match value {
        Value::Null => Ok(RowValues::Null),
        Value::Integer(i) => Ok(RowValues::Int(i)),
        Value::Real(f) => Ok(RowValues::Float(f)),
        Value::Text(s) => Ok(RowValues::Text(s)),
        Value::Blob(b) => Ok(RowValues::Blob(b)),
    }
}

fn column_names(stmt: &Statement) -> Vec<String> {
    stmt.column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect()
}

/// Build an untyped result set from a prepared `SQLite` statement.
///
/// # Errors
/// Returns `QueryError::SqliteError` if query execution or value extraction fails.
pub fn build_result_set(stmt: &mut Statement, params: &Params) -> Result<ResultSet, QueryError> {
    let mut result_set = ResultSet::with_capacity(column_names(stmt), 10);
    let col_count = result_set.column_names().len();

    let param_refs = params.as_refs();
    let mut rows_iter = stmt.query(&param_refs[..])?;
    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value_sync(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Stream a prepared statement's rows straight through the materializer.
///
/// Columns are bound once; each row's values are read into a reused buffer and
/// turned into a `T`. The first failing row aborts the whole call.
///
/// # Errors
///
/// Returns `QueryError::SqliteError` for execution failures,
/// `QueryError::Binding` if the columns cannot be bound to `T`, and
/// `QueryError::Mapping` (with the 1-based row number) if a row cannot be
/// materialized.
pub fn map_rows<T: FromRow>(
    stmt: &mut Statement,
    params: &Params,
    descriptor: &MappingDescriptor,
) -> Result<Vec<T>, QueryError> {
    let columns = column_names(stmt);
    let plan = ColumnBinder::new(columns.as_slice()).bind(descriptor)?;

    let param_refs = params.as_refs();
    let mut rows_iter = stmt.query(&param_refs[..])?;
    let mut out = Vec::new();
    let mut buffer = Vec::with_capacity(columns.len());
    while let Some(row) = rows_iter.next()? {
        buffer.clear();
        for i in 0..columns.len() {
            buffer.push(sqlite_extract_value_sync(row, i)?);
        }
        let item = materialize::<T>(descriptor, &plan, &buffer).map_err(|source| {
            QueryError::Mapping {
                row: out.len() + 1,
                source,
            }
        })?;
        out.push(item);
    }
    Ok(out)
}
