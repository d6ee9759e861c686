use household_tasks::prelude::*;
use tempfile::{TempDir, tempdir};

fn setup(prefix: &str) -> Result<(TempDir, QueryExecutor), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join(format!("{prefix}.db"));
    let executor = SqliteOptions::builder(path.to_string_lossy()).build()?;
    executor.execute_batch(
        "CREATE TABLE items (id INTEGER PRIMARY KEY, label TEXT NOT NULL UNIQUE, qty);",
    )?;
    Ok((dir, executor))
}

#[test]
fn update_of_nothing_is_zero_rows() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, exec) = setup("zero")?;
    let affected = exec.update("DELETE FROM items WHERE id = ?", &row_params![99_i64])?;
    assert_eq!(affected, 0);

    let outcome = exec.update_returning_key("UPDATE items SET qty = 1 WHERE id = ?", &row_params![99_i64])?;
    assert_eq!(
        outcome,
        WriteOutcome {
            rows_affected: 0,
            generated_key: None
        }
    );
    Ok(())
}

#[test]
fn insert_reports_the_assigned_key() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, exec) = setup("key")?;
    exec.update(
        "INSERT INTO items (id, label, qty) VALUES (?, ?, ?)",
        &row_params![40_i64, "seed", 1_i64],
    )?;

    let outcome = exec.update_returning_key(
        "INSERT INTO items (label, qty) VALUES (?, ?)",
        &row_params!["next", 2_i64],
    )?;
    assert_eq!(outcome.rows_affected, 1);
    assert_eq!(outcome.generated_key, Some(41));

    let labels: Vec<String> = exec.select(
        "SELECT label FROM items WHERE id = ?",
        &row_params![outcome.generated_key],
    )?;
    assert_eq!(labels, vec!["next".to_string()]);
    Ok(())
}

#[test]
fn rows_come_back_in_store_order() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, exec) = setup("order")?;
    // no key, no index: SQLite scans in insertion order
    exec.execute_batch("CREATE TABLE q (v INTEGER);")?;
    for v in [5_i64, 2, 9, 1] {
        exec.update("INSERT INTO q (v) VALUES (?)", &row_params![v])?;
    }

    let values: Vec<i64> = exec.select("SELECT v FROM q", &[])?;
    assert_eq!(values, vec![5, 2, 9, 1]);

    let labels: Vec<String> = exec.select("SELECT CAST(v AS TEXT) FROM q", &[])?;
    assert_eq!(labels, vec!["5", "2", "9", "1"]);
    Ok(())
}

#[test]
fn updates_and_deletes_report_no_generated_key() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, exec) = setup("no_key")?;
    exec.update(
        "INSERT INTO items (id, label) VALUES (?, ?)",
        &row_params![5_i64, "a"],
    )?;

    let outcome = exec.update_returning_key(
        "UPDATE items SET label = ? WHERE id = ?",
        &row_params!["b", 5_i64],
    )?;
    assert_eq!(
        outcome,
        WriteOutcome {
            rows_affected: 1,
            generated_key: None
        }
    );

    let outcome =
        exec.update_returning_key("DELETE FROM items WHERE id = ?", &row_params![5_i64])?;
    assert_eq!(outcome.rows_affected, 1);
    assert_eq!(outcome.generated_key, None);
    Ok(())
}

#[test]
fn one_bad_row_fails_the_whole_select() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, exec) = setup("bad_row")?;
    let qty = [
        RowValues::Int(1),
        RowValues::Int(2),
        RowValues::Text("lots".to_string()),
        RowValues::Int(4),
        RowValues::Int(5),
    ];
    for (i, q) in qty.into_iter().enumerate() {
        exec.update(
            "INSERT INTO items (id, label, qty) VALUES (?, ?, ?)",
            &row_params![i64::try_from(i)? + 1, format!("item-{i}"), q],
        )?;
    }

    let err = exec
        .select::<i64>("SELECT qty FROM items ORDER BY id", &[])
        .unwrap_err();
    match err {
        QueryError::Mapping { row, source } => {
            assert_eq!(row, 3);
            assert!(matches!(source, MappingError::Coercion { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn huge_reals_do_not_saturate_into_integers() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, exec) = setup("huge_real")?;
    let err = exec.select::<i64>("SELECT 1e30", &[]).unwrap_err();
    assert!(matches!(
        err,
        QueryError::Mapping {
            row: 1,
            source: MappingError::Coercion { .. }
        }
    ));

    let err = exec
        .select::<Household>("SELECT 1e30 AS id, 'x' AS name", &[])
        .unwrap_err();
    assert!(matches!(err.as_mapping(), Some(MappingError::Coercion { .. })));

    let whole: Vec<i64> = exec.select("SELECT 2.0", &[])?;
    assert_eq!(whole, vec![2]);
    Ok(())
}

#[test]
fn empty_results_are_empty_vectors() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, exec) = setup("empty")?;
    let ids: Vec<i64> = exec.select("SELECT id FROM items", &[])?;
    assert!(ids.is_empty());
    let households: Vec<Household> = exec.select("SELECT id, label AS name FROM items", &[])?;
    assert!(households.is_empty());
    Ok(())
}

#[test]
fn malformed_sql_and_constraints_are_query_errors() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, exec) = setup("errors")?;
    let err = exec.select::<i64>("SELEC id FROM items", &[]).unwrap_err();
    assert!(matches!(err, QueryError::SqliteError(_)));

    exec.update("INSERT INTO items (label) VALUES (?)", &row_params!["dup"])?;
    let err = exec
        .update("INSERT INTO items (label) VALUES (?)", &row_params!["dup"])
        .unwrap_err();
    assert!(matches!(err, QueryError::SqliteError(_)));
    assert!(err.as_mapping().is_none());
    Ok(())
}

#[test]
fn untyped_rows_keep_column_names() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, exec) = setup("untyped")?;
    exec.update(
        "INSERT INTO items (id, label, qty) VALUES (?, ?, ?)",
        &row_params![1_i64, "one", 1.5_f64],
    )?;
    let rs = exec.select_rows("SELECT id, label, qty FROM items", &[])?;
    assert_eq!(rs.len(), 1);
    let row = &rs.results[0];
    assert_eq!(row.get("label").and_then(RowValues::as_text), Some("one"));
    assert_eq!(row.get("QTY").and_then(RowValues::as_float), Some(1.5));
    Ok(())
}

#[test]
fn in_memory_databases_are_rejected() {
    let err = QueryExecutor::new(SqliteOptions::new(":memory:")).unwrap_err();
    assert!(matches!(err, QueryError::ConfigError(_)));
}

#[test]
fn options_load_from_json() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let db = dir.path().join("cfg.db");
    let cfg = dir.path().join("options.json");
    std::fs::write(
        &cfg,
        serde_json::json!({ "db_path": db.to_string_lossy(), "busy_timeout_ms": 250 }).to_string(),
    )?;

    let options = SqliteOptions::from_json_file(&cfg)?;
    assert_eq!(options.busy_timeout_ms, 250);
    assert!(options.foreign_keys);
    let exec = QueryExecutor::new(options)?;
    let one: Vec<i64> = exec.select("SELECT 1", &[])?;
    assert_eq!(one, vec![1]);
    Ok(())
}
