//! The only component that talks to the store.
//!
//! Every call opens its own connection, prepares the caller's SQL, binds the
//! parameters positionally and either streams rows through the mapper or
//! reports what a write changed. There is no transaction spanning calls.

mod background;

use std::sync::Arc;

use tracing::debug;

use crate::error::QueryError;
use crate::mapping::{FromRow, MappingRegistry};
use crate::results::ResultSet;
use crate::sqlite::{self, Params, SqliteOptions};
use crate::types::RowValues;

pub use background::BackgroundExecutor;

/// Outcome of a write that may have inserted a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub rows_affected: usize,
    /// Store-assigned key of the inserted row; `None` when nothing was written.
    pub generated_key: Option<i64>,
}

/// Executes caller-supplied SQL against `SQLite` and maps the results.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    options: SqliteOptions,
    registry: Arc<MappingRegistry>,
}

impl QueryExecutor {
    /// Create an executor sharing the process-wide mapping registry.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::ConfigError` if `options` fail validation.
    pub fn new(options: SqliteOptions) -> Result<Self, QueryError> {
        Self::with_registry(options, MappingRegistry::global())
    }

    /// Create an executor with its own mapping registry.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::ConfigError` if `options` fail validation.
    pub fn with_registry(
        options: SqliteOptions,
        registry: Arc<MappingRegistry>,
    ) -> Result<Self, QueryError> {
        options.validate()?;
        Ok(Self { options, registry })
    }

    #[must_use]
    pub fn options(&self) -> &SqliteOptions {
        &self.options
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<MappingRegistry> {
        &self.registry
    }

    /// Run a query and map every row into `T`, in result-set order.
    ///
    /// `T` may be a record type or a bare scalar (`i64`, `String`, ...), in
    /// which case the first selected column of each row is returned.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the connection, statement or mapping fails. No
    /// partial list is ever returned.
    pub fn select<T: FromRow>(&self, query: &str, params: &[RowValues]) -> Result<Vec<T>, QueryError> {
        let descriptor = self.registry.descriptor::<T>()?;
        let params = Params::convert(params);
        let conn = self.options.open()?;
        let mut stmt = conn.prepare(query)?;
        let rows = sqlite::map_rows::<T>(&mut stmt, &params, &descriptor)?;
        debug!(
            target_type = descriptor.type_name(),
            params = params.as_values().len(),
            rows = rows.len(),
            "select"
        );
        Ok(rows)
    }

    /// Run a query and return its rows untyped.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the connection or statement fails.
    pub fn select_rows(&self, query: &str, params: &[RowValues]) -> Result<ResultSet, QueryError> {
        let params = Params::convert(params);
        let conn = self.options.open()?;
        let mut stmt = conn.prepare(query)?;
        let result_set = sqlite::build_result_set(&mut stmt, &params)?;
        debug!(rows = result_set.len(), "select_rows");
        Ok(result_set)
    }

    /// Execute an INSERT/UPDATE/DELETE and return the number of rows changed.
    ///
    /// Zero is a normal outcome, e.g. deleting an id that does not exist.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the connection or statement fails, including
    /// constraint violations.
    pub fn update(&self, query: &str, params: &[RowValues]) -> Result<usize, QueryError> {
        let params = Params::convert(params);
        let conn = self.options.open()?;
        let affected = Self::execute(&conn, query, &params)?;
        debug!(params = params.as_values().len(), affected, "update");
        Ok(affected)
    }

    /// Execute a write and also report the key the store assigned to the
    /// inserted row.
    ///
    /// `generated_key` is `None` when the statement inserted nothing, e.g. an
    /// UPDATE, a DELETE or a write that matched no row.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the connection or statement fails.
    pub fn update_returning_key(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<WriteOutcome, QueryError> {
        let params = Params::convert(params);
        let conn = self.options.open()?;
        let before = conn.last_insert_rowid();
        let rows_affected = Self::execute(&conn, query, &params)?;
        let after = conn.last_insert_rowid();
        // UPDATE and DELETE leave the rowid untouched
        let generated_key = (rows_affected > 0 && after != before).then_some(after);
        debug!(rows_affected, ?generated_key, "update_returning_key");
        Ok(WriteOutcome {
            rows_affected,
            generated_key,
        })
    }

    /// Execute a script of `;`-separated statements, e.g. schema setup.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the connection or any statement fails.
    pub fn execute_batch(&self, sql: &str) -> Result<(), QueryError> {
        let conn = self.options.open()?;
        conn.execute_batch(sql)?;
        debug!("execute_batch");
        Ok(())
    }

    fn execute(
        conn: &rusqlite::Connection,
        query: &str,
        params: &Params,
    ) -> Result<usize, QueryError> {
        let mut stmt = conn.prepare(query)?;
        let param_refs = params.as_refs();
        Ok(stmt.execute(&param_refs[..])?)
    }
}
