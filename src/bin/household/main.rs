mod args;

use clap::Parser;
use household_tasks::prelude::*;
use serde::Serialize;
use tracing::Level;

use crate::args::{Args, Command};

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), QueryError> {
    let options = match &args.config {
        Some(path) => SqliteOptions::from_json_file(path)?,
        None => SqliteOptions::new(args.db.clone()),
    };
    let store = HouseholdStore::new(QueryExecutor::new(options)?);

    match args.command {
        Command::Init => {
            store.init_schema()?;
            print_json(&store.households()?);
        }
        Command::Households => print_json(&store.households()?),
        Command::AddHousehold {
            name,
            password_hash,
        } => print_json(&store.add_household(&name, &password_hash)?),
        Command::Lookups => {
            #[derive(Serialize)]
            struct Lookups {
                statuses: Vec<Status>,
                priorities: Vec<Priority>,
            }
            print_json(&Lookups {
                statuses: store.statuses()?,
                priorities: store.priorities()?,
            });
        }
        Command::Users { household } => {
            let household_id = household_id(&store, &household)?;
            print_json(&store.users(household_id)?);
        }
        Command::AddUser { household, name } => {
            let household_id = household_id(&store, &household)?;
            print_json(&store.add_user(&name, household_id)?);
        }
        Command::RenameUser { id, name } => print_json(&store.rename_user(id, &name)?),
        Command::DeleteUser { id } => print_json(&store.delete_user(id)?),
        Command::Tasks {
            household,
            search,
            limit,
            offset,
        } => {
            let household_id = household_id(&store, &household)?;
            let tasks = match (limit, offset) {
                (Some(limit), Some(offset)) => store.task_page(household_id, limit, offset)?,
                _ => store.tasks(household_id, search.as_deref())?,
            };
            print_json(&tasks);
        }
        Command::AddTask {
            household,
            description,
            status,
            priority,
            owner,
        } => {
            let household_id = household_id(&store, &household)?;
            let task = Task::new(
                description,
                Household {
                    id: household_id,
                    name: household,
                },
            )
            .with_status(lookup(store.statuses()?, status, |s| s.id)?)
            .with_priority(lookup(store.priorities()?, priority, |p| p.id)?)
            .with_user(lookup(store.users(household_id)?, owner, |u| u.id)?);
            print_json(&store.add_task(&task)?);
        }
        Command::SetTask {
            household,
            id,
            description,
            status,
            priority,
            owner,
            unassign,
        } => {
            let household_id = household_id(&store, &household)?;
            let mut task = store
                .tasks(household_id, None)?
                .into_iter()
                .find(|t| t.id == id)
                .ok_or_else(|| {
                    QueryError::ParameterError(format!("no task {id} in household `{household}`"))
                })?;
            if let Some(description) = description {
                task.description = description;
            }
            if status.is_some() {
                task.status = lookup(store.statuses()?, status, |s| s.id)?;
            }
            if priority.is_some() {
                task.priority = lookup(store.priorities()?, priority, |p| p.id)?;
            }
            if unassign {
                task.user = None;
            } else if owner.is_some() {
                task.user = lookup(store.users(household_id)?, owner, |u| u.id)?;
            }
            store.update_task(&task)?;
            print_json(&task);
        }
        Command::DeleteTask { id } => print_json(&store.delete_task(id)?),
    }
    Ok(())
}

fn household_id(store: &HouseholdStore, name: &str) -> Result<i64, QueryError> {
    store
        .household_id_by_name(name)?
        .ok_or_else(|| QueryError::ParameterError(format!("unknown household `{name}`")))
}

fn lookup<T>(
    items: Vec<T>,
    wanted: Option<i64>,
    id_of: impl Fn(&T) -> i64,
) -> Result<Option<T>, QueryError> {
    let Some(wanted) = wanted else {
        return Ok(None);
    };
    items
        .into_iter()
        .find(|item| id_of(item) == wanted)
        .map(Some)
        .ok_or_else(|| QueryError::ParameterError(format!("no entry with id {wanted}")))
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}
