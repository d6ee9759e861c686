use chrono::{NaiveDate, NaiveDateTime};
use household_tasks::helpers::{create_test_result_set, create_test_row};
use household_tasks::prelude::*;

fn task_columns() -> Vec<&'static str> {
    vec![
        "id",
        "description",
        "household_id",
        "household_name",
        "status_id",
        "status_name",
        "priority_id",
        "priority_name",
        "user_id",
        "user_name",
    ]
}

#[test]
fn task_round_trip_with_unassigned_user() -> Result<(), Box<dyn std::error::Error>> {
    let rs = create_test_result_set(
        &task_columns(),
        vec![row_params![
            7_i64,
            "Buy milk",
            1_i64,
            "Smiths",
            2_i64,
            "In Progress",
            3_i64,
            "High",
            RowValues::Null,
            RowValues::Null
        ]],
    );

    let tasks: Vec<Task> = rs.map_rows(&MappingRegistry::global())?;
    assert_eq!(
        tasks,
        vec![Task {
            id: 7,
            description: "Buy milk".to_string(),
            household: Some(Household {
                id: 1,
                name: "Smiths".to_string()
            }),
            status: Some(Status {
                id: 2,
                name: "In Progress".to_string()
            }),
            priority: Some(Priority {
                id: 3,
                name: "High".to_string()
            }),
            user: None,
        }]
    );
    assert_eq!(tasks[0].owner_label(), "Unassigned");
    assert_eq!(tasks[0].priority_label(), "High");
    Ok(())
}

#[test]
fn null_key_hides_nested_object_even_with_other_columns_set() -> Result<(), Box<dyn std::error::Error>>
{
    let rs = create_test_result_set(
        &task_columns(),
        vec![row_params![
            8_i64,
            "Vacuum",
            1_i64,
            "Smiths",
            RowValues::Null,
            "Stale status name",
            RowValues::Null,
            RowValues::Null,
            4_i64,
            "Ann"
        ]],
    );

    let tasks: Vec<Task> = rs.map_rows(&MappingRegistry::global())?;
    let task = &tasks[0];
    assert_eq!(task.status, None);
    assert_eq!(task.status_label(), "N/A");
    assert_eq!(task.priority, None);
    let user = task.user.as_ref().expect("user present");
    assert_eq!(user.id, 4);
    assert_eq!(user.name, "Ann");
    // the user's household group was not selected
    assert_eq!(user.household, None);
    Ok(())
}

#[test]
fn present_key_with_null_member_is_a_partial_nested_error() {
    let rs = create_test_result_set(
        &["id", "name", "household_id", "household_name"],
        vec![
            row_params![1_i64, "Ann", 1_i64, "Smiths"],
            row_params![2_i64, "Bob", 1_i64, RowValues::Null],
        ],
    );

    let err = rs
        .map_rows::<User>(&MappingRegistry::global())
        .unwrap_err();
    match err {
        QueryError::Mapping { row, source } => {
            assert_eq!(row, 2);
            assert_eq!(
                source,
                MappingError::PartialNested {
                    slot: "household".to_string(),
                    column: "household_name".to_string(),
                }
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn column_order_does_not_matter() -> Result<(), Box<dyn std::error::Error>> {
    let forward = create_test_row(
        vec!["id".into(), "name".into(), "household_id".into(), "household_name".into()],
        row_params![3_i64, "Cy", 9_i64, "Joneses"],
    );
    let shuffled = create_test_row(
        vec!["household_name".into(), "NAME".into(), "household_id".into(), "Id".into()],
        row_params!["Joneses", "Cy", 9_i64, 3_i64],
    );

    let a: User = forward.map()?;
    let b: User = shuffled.map()?;
    assert_eq!(a, b);
    assert_eq!(a.household_id(), Some(9));
    Ok(())
}

#[test]
fn unselected_root_fields_take_zero_values() -> Result<(), Box<dyn std::error::Error>> {
    let row = create_test_row(vec!["id".into()], row_params![5_i64]);
    let household: Household = row.map()?;
    assert_eq!(
        household,
        Household {
            id: 5,
            name: String::new()
        }
    );
    Ok(())
}

#[test]
fn text_digits_coerce_to_integers() -> Result<(), Box<dyn std::error::Error>> {
    let row = create_test_row(
        vec!["id".into(), "name".into()],
        row_params!["42", "Medium"],
    );
    let priority: Priority = row.map()?;
    assert_eq!(priority.id, 42);
    Ok(())
}

#[test]
fn uncoercible_value_names_the_column() {
    let row = create_test_row(
        vec!["id".into(), "name".into()],
        row_params!["forty-two", "Medium"],
    );
    let err = row.map::<Priority>().unwrap_err();
    match err {
        MappingError::Coercion {
            column, expected, ..
        } => {
            assert_eq!(column, "id");
            assert_eq!(expected, FieldKind::Int);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn scalars_read_the_first_column() -> Result<(), Box<dyn std::error::Error>> {
    let rs = create_test_result_set(
        &["name", "id"],
        vec![
            row_params!["Smiths", 1_i64],
            row_params![RowValues::Null, 2_i64],
        ],
    );
    let names: Vec<Option<String>> = rs.map_rows(&MappingRegistry::global())?;
    assert_eq!(names, vec![Some("Smiths".to_string()), None]);

    let err = rs
        .map_rows::<String>(&MappingRegistry::global())
        .unwrap_err();
    assert!(matches!(err, QueryError::Mapping { row: 2, .. }));

    let empty = create_test_result_set(&["id"], Vec::new());
    let ids: Vec<i64> = empty.map_rows(&MappingRegistry::global())?;
    assert!(ids.is_empty());
    Ok(())
}

#[test]
fn timestamps_parse_from_text() -> Result<(), Box<dyn std::error::Error>> {
    let row = create_test_row(vec!["due".into()], row_params!["2024-03-01 08:30:00"]);
    let due: NaiveDateTime = row.map()?;
    let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(8, 30, 0))
        .expect("valid date");
    assert_eq!(due, expected);
    Ok(())
}

#[test]
fn missing_columns_reports_the_incomplete_task_query() -> Result<(), Box<dyn std::error::Error>> {
    let descriptor = MappingRegistry::global().descriptor::<Task>()?;
    let mut selected = task_columns();
    selected.retain(|c| *c != "priority_name");
    let missing = descriptor.missing_columns(&selected);
    assert!(missing.contains(&"priority_name".to_string()));
    assert!(missing.contains(&"user_household_id".to_string()));
    assert!(!missing.contains(&"user_name".to_string()));
    Ok(())
}

#[test]
fn key_without_its_group_fails_before_any_row() {
    let rs = create_test_result_set(
        &["id", "name", "household_id"],
        vec![row_params![1_i64, "Ann", 1_i64]],
    );
    let err = rs
        .map_rows::<User>(&MappingRegistry::global())
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Binding(MappingError::IncompleteGroup { .. })
    ));
}
