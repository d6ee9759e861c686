//! Table layout and the seeded status/priority enumerations.

/// Names seeded into `status`, in id order.
pub const STATUS_NAMES: [&str; 3] = ["Not Started", "In Progress", "Done"];

/// Names seeded into `priorities`, in id order.
pub const PRIORITY_NAMES: [&str; 3] = ["Low", "Medium", "High"];

pub(crate) const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS households (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS status (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS priorities (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    householdId INTEGER NOT NULL REFERENCES households(id) ON DELETE CASCADE
);
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    householdId INTEGER NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    statusId INTEGER REFERENCES status(id),
    priorityId INTEGER REFERENCES priorities(id),
    ownerId INTEGER REFERENCES users(id) ON DELETE SET NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_household ON tasks(householdId);
CREATE INDEX IF NOT EXISTS idx_users_household ON users(householdId);
";

/// The full setup script: tables plus `INSERT OR IGNORE` seeds, safe to rerun.
pub(crate) fn setup_script() -> String {
    let mut script = String::from(CREATE_TABLES);
    push_seed(&mut script, "status", &STATUS_NAMES);
    push_seed(&mut script, "priorities", &PRIORITY_NAMES);
    script
}

fn push_seed(script: &mut String, table: &str, names: &[&str]) {
    for (idx, name) in names.iter().enumerate() {
        script.push_str(&format!(
            "INSERT OR IGNORE INTO {table} (id, name) VALUES ({}, '{}');\n",
            idx + 1,
            name.replace('\'', "''")
        ));
    }
}
