//! Household use cases expressed as SQL over the [`QueryExecutor`].
//!
//! Every task query joins its household, status, priority and owner under
//! the `household_`, `status_`, `priority_` and `user_` prefixes, so the rows
//! map straight into [`Task`].

pub mod schema;

use tracing::{info, warn};

use crate::error::QueryError;
use crate::executor::QueryExecutor;
use crate::model::{Household, Priority, Status, Task, User};

pub use schema::{PRIORITY_NAMES, STATUS_NAMES};

const TASK_COLUMNS: &str = "SELECT \
    t.id, t.description, \
    h.id AS household_id, h.name AS household_name, \
    s.id AS status_id, s.name AS status_name, \
    p.id AS priority_id, p.name AS priority_name, \
    u.id AS user_id, u.name AS user_name \
    FROM tasks t \
    LEFT JOIN households h ON t.householdId = h.id \
    LEFT JOIN status s ON t.statusId = s.id \
    LEFT JOIN priorities p ON t.priorityId = p.id \
    LEFT JOIN users u ON t.ownerId = u.id \
    WHERE t.householdId = ?";

const USER_COLUMNS: &str = "SELECT u.id, u.name, h.id AS household_id, h.name AS household_name \
    FROM users u \
    JOIN households h ON h.id = u.householdId";

/// The household application's data access.
#[derive(Debug, Clone)]
pub struct HouseholdStore {
    executor: QueryExecutor,
}

impl HouseholdStore {
    #[must_use]
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    #[must_use]
    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Create missing tables and seed the status and priority sets.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the script fails.
    pub fn init_schema(&self) -> Result<(), QueryError> {
        self.executor.execute_batch(&schema::setup_script())?;
        info!("schema ready");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `QueryError` if the query or mapping fails.
    pub fn households(&self) -> Result<Vec<Household>, QueryError> {
        self.executor
            .select("SELECT id, name FROM households ORDER BY id", &[])
    }

    /// # Errors
    ///
    /// Returns `QueryError` if the query or mapping fails.
    pub fn statuses(&self) -> Result<Vec<Status>, QueryError> {
        self.executor.select("SELECT id, name FROM status ORDER BY id", &[])
    }

    /// # Errors
    ///
    /// Returns `QueryError` if the query or mapping fails.
    pub fn priorities(&self) -> Result<Vec<Priority>, QueryError> {
        self.executor
            .select("SELECT id, name FROM priorities ORDER BY id", &[])
    }

    /// Tasks of a household, newest first.
    ///
    /// A non-empty `search` keeps only tasks whose description contains it.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the query or mapping fails.
    pub fn tasks(&self, household_id: i64, search: Option<&str>) -> Result<Vec<Task>, QueryError> {
        match search.filter(|s| !s.is_empty()) {
            Some(term) => {
                let query = format!("{TASK_COLUMNS} AND t.description LIKE ? ORDER BY t.id DESC");
                self.executor
                    .select(&query, &row_params![household_id, format!("%{term}%")])
            }
            None => {
                let query = format!("{TASK_COLUMNS} ORDER BY t.id DESC");
                self.executor.select(&query, &row_params![household_id])
            }
        }
    }

    /// One page of a household's tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the query or mapping fails.
    pub fn task_page(
        &self,
        household_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Task>, QueryError> {
        let query = format!("{TASK_COLUMNS} ORDER BY t.id DESC LIMIT ? OFFSET ?");
        self.executor
            .select(&query, &row_params![household_id, limit, offset])
    }

    /// # Errors
    ///
    /// Returns `QueryError` if the query or mapping fails.
    pub fn users(&self, household_id: i64) -> Result<Vec<User>, QueryError> {
        let query = format!("{USER_COLUMNS} WHERE u.householdId = ? ORDER BY u.id");
        self.executor.select(&query, &row_params![household_id])
    }

    /// # Errors
    ///
    /// Returns `QueryError` if the query fails.
    pub fn household_id_by_name(&self, name: &str) -> Result<Option<i64>, QueryError> {
        let ids: Vec<i64> = self
            .executor
            .select("SELECT id FROM households WHERE name = ?", &row_params![name])?;
        Ok(ids.into_iter().next())
    }

    /// Look a household up by name and an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the query or mapping fails.
    pub fn find_household(
        &self,
        name: &str,
        password_hash: &str,
    ) -> Result<Option<Household>, QueryError> {
        let found: Vec<Household> = self.executor.select(
            "SELECT id, name FROM households WHERE name = ? AND password = ?",
            &row_params![name, password_hash],
        )?;
        Ok(found.into_iter().next())
    }

    /// Insert a household and return its key.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the insert fails, e.g. the name is taken.
    pub fn add_household(&self, name: &str, password_hash: &str) -> Result<Option<i64>, QueryError> {
        let outcome = self.executor.update_returning_key(
            "INSERT INTO households (name, password) VALUES (?, ?)",
            &row_params![name, password_hash],
        )?;
        info!(name, id = ?outcome.generated_key, "household added");
        Ok(outcome.generated_key)
    }

    /// Insert a user into `household_id` and return the new user's key.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the insert fails.
    pub fn add_user(&self, name: &str, household_id: i64) -> Result<Option<i64>, QueryError> {
        let outcome = self.executor.update_returning_key(
            "INSERT INTO users (name, householdId) VALUES (?, ?)",
            &row_params![name, household_id],
        )?;
        info!(name, id = ?outcome.generated_key, "user added");
        Ok(outcome.generated_key)
    }

    /// # Errors
    ///
    /// Returns `QueryError` if the update fails.
    pub fn rename_user(&self, user_id: i64, name: &str) -> Result<usize, QueryError> {
        let affected = self.executor.update(
            "UPDATE users SET name = ? WHERE id = ?",
            &row_params![name, user_id],
        )?;
        log_write(affected, user_id, "user renamed");
        Ok(affected)
    }

    /// Delete a user; the tasks they own become unassigned.
    ///
    /// With foreign keys enforced the schema's `ON DELETE SET NULL` clears
    /// `tasks.ownerId` in the same statement. Without them the tasks are
    /// unassigned first.
    ///
    /// Returns the number of users deleted.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if a statement fails.
    pub fn delete_user(&self, user_id: i64) -> Result<usize, QueryError> {
        if !self.executor.options().foreign_keys {
            self.executor.update(
                "UPDATE tasks SET ownerId = NULL WHERE ownerId = ?",
                &row_params![user_id],
            )?;
        }
        let affected = self
            .executor
            .update("DELETE FROM users WHERE id = ?", &row_params![user_id])?;
        log_write(affected, user_id, "user deleted");
        Ok(affected)
    }

    /// Insert `task` into its household and return the new key.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::ParameterError` if the task has no household, or
    /// the insert's error.
    pub fn add_task(&self, task: &Task) -> Result<Option<i64>, QueryError> {
        let household_id = task.household_id().ok_or_else(|| {
            QueryError::ParameterError("a task needs a household".to_string())
        })?;
        let outcome = self.executor.update_returning_key(
            "INSERT INTO tasks (householdId, description, statusId, priorityId, ownerId) \
             VALUES (?, ?, ?, ?, ?)",
            &row_params![
                household_id,
                task.description.as_str(),
                task.status_id(),
                task.priority_id(),
                task.user_id()
            ],
        )?;
        info!(description = %task.description, id = ?outcome.generated_key, "task added");
        Ok(outcome.generated_key)
    }

    /// Write back a task's description, status, priority and owner.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the update fails.
    pub fn update_task(&self, task: &Task) -> Result<usize, QueryError> {
        let affected = self.executor.update(
            "UPDATE tasks SET description = ?, statusId = ?, priorityId = ?, ownerId = ? \
             WHERE id = ?",
            &row_params![
                task.description.as_str(),
                task.status_id(),
                task.priority_id(),
                task.user_id(),
                task.id
            ],
        )?;
        log_write(affected, task.id, "task updated");
        Ok(affected)
    }

    /// # Errors
    ///
    /// Returns `QueryError` if the delete fails.
    pub fn delete_task(&self, task_id: i64) -> Result<usize, QueryError> {
        let affected = self
            .executor
            .update("DELETE FROM tasks WHERE id = ?", &row_params![task_id])?;
        log_write(affected, task_id, "task deleted");
        Ok(affected)
    }
}

fn log_write(affected: usize, id: i64, what: &'static str) {
    if affected == 0 {
        warn!(id, "{what}: no matching row");
    } else {
        info!(id, "{what}");
    }
}
