use std::sync::Arc;

use tokio::task::spawn_blocking;

use super::{QueryExecutor, WriteOutcome};
use crate::error::QueryError;
use crate::mapping::FromRow;
use crate::types::RowValues;

/// Runs executor calls on tokio's blocking pool so async callers (a UI event
/// loop, a server task) are never stalled by `SQLite`.
///
/// Each call still opens its own connection. Two calls issued concurrently
/// are not ordered; await a write before issuing a read that depends on it.
#[derive(Debug, Clone)]
pub struct BackgroundExecutor {
    inner: Arc<QueryExecutor>,
}

impl BackgroundExecutor {
    #[must_use]
    pub fn new(executor: QueryExecutor) -> Self {
        Self {
            inner: Arc::new(executor),
        }
    }

    #[must_use]
    pub fn executor(&self) -> &QueryExecutor {
        &self.inner
    }

    /// # Errors
    /// See [`QueryExecutor::select`]; also `QueryError::WorkerError` if the
    /// blocking task panics.
    pub async fn select<T>(&self, query: &str, params: &[RowValues]) -> Result<Vec<T>, QueryError>
    where
        T: FromRow + Send,
    {
        let sql_owned = query.to_owned();
        let params_owned = params.to_vec();
        run_blocking(Arc::clone(&self.inner), move |exec| {
            exec.select::<T>(&sql_owned, &params_owned)
        })
        .await
    }

    /// # Errors
    /// See [`QueryExecutor::update`].
    pub async fn update(&self, query: &str, params: &[RowValues]) -> Result<usize, QueryError> {
        let sql_owned = query.to_owned();
        let params_owned = params.to_vec();
        run_blocking(Arc::clone(&self.inner), move |exec| {
            exec.update(&sql_owned, &params_owned)
        })
        .await
    }

    /// # Errors
    /// See [`QueryExecutor::update_returning_key`].
    pub async fn update_returning_key(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<WriteOutcome, QueryError> {
        let sql_owned = query.to_owned();
        let params_owned = params.to_vec();
        run_blocking(Arc::clone(&self.inner), move |exec| {
            exec.update_returning_key(&sql_owned, &params_owned)
        })
        .await
    }

    /// # Errors
    /// See [`QueryExecutor::execute_batch`].
    pub async fn execute_batch(&self, sql: &str) -> Result<(), QueryError> {
        let sql_owned = sql.to_owned();
        run_blocking(Arc::clone(&self.inner), move |exec| {
            exec.execute_batch(&sql_owned)
        })
        .await
    }
}

async fn run_blocking<F, R>(exec: Arc<QueryExecutor>, func: F) -> Result<R, QueryError>
where
    F: FnOnce(&QueryExecutor) -> Result<R, QueryError> + Send + 'static,
    R: Send + 'static,
{
    spawn_blocking(move || func(&exec))
        .await
        .map_err(|e| QueryError::WorkerError(format!("spawn_blocking join error: {e}")))?
}
