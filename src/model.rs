//! Household value objects and their row shapes.
//!
//! | Type | Root columns | Nested slots |
//! |------|--------------|--------------|
//! | [`Household`] | `id`, `name` | |
//! | [`Status`] | `id`, `name` | |
//! | [`Priority`] | `id`, `name` | |
//! | [`User`] | `id`, `name` | `household_*` |
//! | [`Task`] | `id`, `description` | `household_*`, `status_*`, `priority_*`, `user_*` (and `user_household_*`) |
//!
//! Nested references are `None` whenever the key column of their group is
//! NULL or not selected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MappingError;
use crate::mapping::{FieldKind, FromRow, Record, RecordShape, Shape};

/// Label shown for a task with no status or priority.
pub const NOT_SET_LABEL: &str = "N/A";
/// Label shown for a task nobody owns.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

fn id_name_shape(type_name: &'static str) -> Shape {
    Shape::Record(
        RecordShape::new(type_name)
            .key("id")
            .field("id", FieldKind::Int)
            .field("name", FieldKind::Text),
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    pub id: i64,
    pub name: String,
}

impl FromRow for Household {
    fn shape() -> Shape {
        id_name_shape("Household")
    }

    fn from_record(record: &Record<'_>) -> Result<Self, MappingError> {
        Ok(Household {
            id: record.int("id")?,
            name: record.text("name")?,
        })
    }
}

/// One of the closed set of task states (`status` table).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: i64,
    pub name: String,
}

impl FromRow for Status {
    fn shape() -> Shape {
        id_name_shape("Status")
    }

    fn from_record(record: &Record<'_>) -> Result<Self, MappingError> {
        Ok(Status {
            id: record.int("id")?,
            name: record.text("name")?,
        })
    }
}

/// One of the closed set of task priorities (`priorities` table).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub id: i64,
    pub name: String,
}

impl FromRow for Priority {
    fn shape() -> Shape {
        id_name_shape("Priority")
    }

    fn from_record(record: &Record<'_>) -> Result<Self, MappingError> {
        Ok(Priority {
            id: record.int("id")?,
            name: record.text("name")?,
        })
    }
}

/// A household member.
///
/// `household` is filled when the query joins the household columns; the
/// household listing queries always do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub household: Option<Household>,
}

impl User {
    #[must_use]
    pub fn household_id(&self) -> Option<i64> {
        self.household.as_ref().map(|h| h.id)
    }
}

impl FromRow for User {
    fn shape() -> Shape {
        Shape::Record(
            RecordShape::new("User")
                .key("id")
                .field("id", FieldKind::Int)
                .field("name", FieldKind::Text)
                .nested::<Household>("household"),
        )
    }

    fn from_record(record: &Record<'_>) -> Result<Self, MappingError> {
        Ok(User {
            id: record.int("id")?,
            name: record.text("name")?,
            household: record.nested("household")?,
        })
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub description: String,
    pub household: Option<Household>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub user: Option<User>,
}

impl Task {
    /// A task not yet stored; `id` is assigned on insert.
    #[must_use]
    pub fn new(description: impl Into<String>, household: Household) -> Self {
        Self {
            description: description.into(),
            household: Some(household),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: Option<Status>) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: Option<User>) -> Self {
        self.user = user;
        self
    }

    #[must_use]
    pub fn household_id(&self) -> Option<i64> {
        self.household.as_ref().map(|h| h.id)
    }

    #[must_use]
    pub fn status_id(&self) -> Option<i64> {
        self.status.as_ref().map(|s| s.id)
    }

    #[must_use]
    pub fn priority_id(&self) -> Option<i64> {
        self.priority.as_ref().map(|p| p.id)
    }

    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }

    #[must_use]
    pub fn status_label(&self) -> &str {
        self.status.as_ref().map_or(NOT_SET_LABEL, |s| s.name.as_str())
    }

    #[must_use]
    pub fn priority_label(&self) -> &str {
        self.priority
            .as_ref()
            .map_or(NOT_SET_LABEL, |p| p.name.as_str())
    }

    #[must_use]
    pub fn owner_label(&self) -> &str {
        self.user
            .as_ref()
            .map_or(UNASSIGNED_LABEL, |u| u.name.as_str())
    }
}

impl FromRow for Task {
    fn shape() -> Shape {
        Shape::Record(
            RecordShape::new("Task")
                .key("id")
                .field("id", FieldKind::Int)
                .field("description", FieldKind::Text)
                .nested::<Household>("household")
                .nested::<Status>("status")
                .nested::<Priority>("priority")
                .nested::<User>("user"),
        )
    }

    fn from_record(record: &Record<'_>) -> Result<Self, MappingError> {
        Ok(Task {
            id: record.int("id")?,
            description: record.text("description")?,
            household: record.nested("household")?,
            status: record.nested("status")?,
            priority: record.nested("priority")?,
            user: record.nested("user")?,
        })
    }
}
