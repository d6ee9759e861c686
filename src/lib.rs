#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

pub mod prelude;

#[macro_use]
mod macros;

pub mod error;
pub mod executor;
pub mod helpers;
pub mod household;
pub mod mapping;
pub mod model;
pub mod results;
pub mod sqlite;
pub mod types;

pub use error::{MappingError, QueryError};
pub use executor::{BackgroundExecutor, QueryExecutor, WriteOutcome};
pub use household::HouseholdStore;
pub use mapping::{FieldKind, FromRow, MappingRegistry, Record, RecordShape, Shape};
pub use model::{Household, Priority, Status, Task, User};
pub use results::{ResultRow, ResultSet};
pub use sqlite::{SqliteOptions, SqliteOptionsBuilder};
pub use types::RowValues;
