use std::sync::Arc;
use std::thread;

use household_tasks::prelude::*;
use tempfile::tempdir;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn background_calls_map_like_blocking_ones() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("background.db");
    let exec = BackgroundExecutor::new(QueryExecutor::new(SqliteOptions::new(
        path.to_string_lossy(),
    ))?);

    exec.execute_batch("CREATE TABLE households (id INTEGER PRIMARY KEY, name TEXT NOT NULL);")
        .await?;
    let outcome = exec
        .update_returning_key(
            "INSERT INTO households (name) VALUES (?)",
            &row_params!["Smiths"],
        )
        .await?;
    assert_eq!(outcome.rows_affected, 1);
    let id = outcome.generated_key.ok_or("no key")?;

    let households: Vec<Household> = exec
        .select("SELECT id, name FROM households WHERE id = ?", &row_params![id])
        .await?;
    assert_eq!(
        households,
        vec![Household {
            id,
            name: "Smiths".to_string()
        }]
    );

    assert_eq!(
        exec.update("DELETE FROM households WHERE id = ?", &row_params![id])
            .await?,
        1
    );
    let err = exec
        .select::<i64>("SELECT nope FROM households", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::SqliteError(_)));
    Ok(())
}

#[test]
fn background_executor_runs_inside_a_built_runtime() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("runtime.db");
    let exec = BackgroundExecutor::new(QueryExecutor::new(SqliteOptions::new(
        path.to_string_lossy(),
    ))?);

    let rt = tokio::runtime::Runtime::new()?;
    let names: Vec<String> = rt.block_on(async {
        exec.execute_batch("CREATE TABLE t (name TEXT); INSERT INTO t VALUES ('a'), ('b');")
            .await?;
        exec.select("SELECT name FROM t", &[]).await
    })?;
    assert_eq!(names, vec!["a", "b"]);
    Ok(())
}

#[test]
fn concurrent_first_use_shares_one_descriptor() {
    let registry = Arc::new(MappingRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.descriptor::<Task>().expect("descriptor"))
        })
        .collect();
    let descriptors: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread"))
        .collect();

    for d in &descriptors[1..] {
        assert!(Arc::ptr_eq(&descriptors[0], d));
    }
    // Task pulls in its nested types' shapes but caches only itself
    assert_eq!(registry.len(), 1);
}
