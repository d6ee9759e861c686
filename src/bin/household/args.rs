use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Household task tracker")]
pub(crate) struct Args {
    /// `SQLite` database file.
    #[arg(long, default_value = "household.db")]
    pub(crate) db: String,
    /// JSON file with connection options; overrides `--db`.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Log statement execution.
    #[arg(long, short)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create tables and seed statuses and priorities.
    Init,
    /// List households.
    Households,
    AddHousehold {
        name: String,
        /// Already-hashed password.
        #[arg(long)]
        password_hash: String,
    },
    /// List statuses and priorities.
    Lookups,
    Users {
        household: String,
    },
    AddUser {
        household: String,
        name: String,
    },
    RenameUser {
        id: i64,
        name: String,
    },
    /// Delete a user; their tasks become unassigned.
    DeleteUser {
        id: i64,
    },
    Tasks {
        household: String,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, requires = "offset", conflicts_with = "search")]
        limit: Option<i64>,
        #[arg(long, requires = "limit")]
        offset: Option<i64>,
    },
    AddTask {
        household: String,
        description: String,
        #[arg(long)]
        status: Option<i64>,
        #[arg(long)]
        priority: Option<i64>,
        #[arg(long)]
        owner: Option<i64>,
    },
    /// Change fields of an existing task; unspecified fields are kept.
    SetTask {
        household: String,
        id: i64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<i64>,
        #[arg(long)]
        priority: Option<i64>,
        #[arg(long, conflicts_with = "unassign")]
        owner: Option<i64>,
        #[arg(long)]
        unassign: bool,
    },
    DeleteTask {
        id: i64,
    },
}
