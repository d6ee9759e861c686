use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

fn default_true() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Options for opening `SQLite` connections.
///
/// Every executor call opens its own connection with these options, so the
/// database must outlive a single connection: plain `:memory:` databases are
/// rejected by [`SqliteOptions::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteOptions {
    pub db_path: String,
    #[serde(default = "default_true")]
    pub foreign_keys: bool,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            foreign_keys: true,
            busy_timeout_ms: default_busy_timeout_ms(),
            create_if_missing: true,
        }
    }

    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Load options from a JSON file such as
    /// `{"db_path": "household.db", "busy_timeout_ms": 2000}`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::ConfigError` if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, QueryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            QueryError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| QueryError::ConfigError(format!("invalid {}: {e}", path.display())))
    }

    /// # Errors
    ///
    /// Returns `QueryError::ConfigError` for an empty path or a private
    /// in-memory database.
    pub fn validate(&self) -> Result<(), QueryError> {
        let path = self.db_path.trim();
        if path.is_empty() {
            return Err(QueryError::ConfigError(
                "database path must not be empty".to_string(),
            ));
        }
        if path == ":memory:" || path.starts_with("file::memory:") || path.contains("mode=memory")
        {
            return Err(QueryError::ConfigError(format!(
                "`{path}` is an in-memory database; each call opens a new connection and would see an empty store"
            )));
        }
        Ok(())
    }

    /// Open one connection with these options applied.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::ConnectionError` if the database cannot be opened or
    /// configured.
    pub fn open(&self) -> Result<Connection, QueryError> {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        let conn = Connection::open_with_flags(&self.db_path, flags).map_err(|e| {
            QueryError::ConnectionError(format!("Failed to open {}: {e}", self.db_path))
        })?;
        conn.busy_timeout(Duration::from_millis(self.busy_timeout_ms))
            .map_err(|e| QueryError::ConnectionError(format!("Failed to set busy timeout: {e}")))?;
        if self.foreign_keys {
            conn.execute_batch("PRAGMA foreign_keys = ON;").map_err(|e| {
                QueryError::ConnectionError(format!("Failed to enable foreign keys: {e}"))
            })?;
        }
        Ok(conn)
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn foreign_keys(mut self, enabled: bool) -> Self {
        self.opts.foreign_keys = enabled;
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.busy_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.opts.create_if_missing = create;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Build a `QueryExecutor` over these options.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::ConfigError` if the options fail validation.
    pub fn build(self) -> Result<crate::executor::QueryExecutor, QueryError> {
        crate::executor::QueryExecutor::new(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_memory_databases() {
        for path in [":memory:", "file::memory:?cache=shared", "file:x?mode=memory", "  "] {
            let err = SqliteOptions::new(path).validate().unwrap_err();
            assert!(matches!(err, QueryError::ConfigError(_)), "{path}");
        }
        assert!(SqliteOptions::new("household.db").validate().is_ok());
    }

    #[test]
    fn json_defaults() {
        let opts: SqliteOptions = serde_json::from_str(r#"{"db_path": "h.db"}"#).unwrap();
        assert_eq!(opts, SqliteOptions::new("h.db"));

        let opts: SqliteOptions =
            serde_json::from_str(r#"{"db_path": "h.db", "foreign_keys": false, "busy_timeout_ms": 10}"#)
                .unwrap();
        assert!(!opts.foreign_keys);
        assert_eq!(opts.busy_timeout_ms, 10);
    }

    #[test]
    fn builder_sets_fields() {
        let opts = SqliteOptions::builder("h.db")
            .foreign_keys(false)
            .busy_timeout(Duration::from_secs(2))
            .create_if_missing(false)
            .finish();
        assert!(!opts.foreign_keys);
        assert_eq!(opts.busy_timeout_ms, 2_000);
        assert!(!opts.create_if_missing);
    }
}
