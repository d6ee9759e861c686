//! Convenient imports for common functionality.

pub use crate::error::{MappingError, QueryError};
pub use crate::executor::{BackgroundExecutor, QueryExecutor, WriteOutcome};
pub use crate::household::HouseholdStore;
pub use crate::mapping::{FieldKind, FromRow, MappingRegistry, Record, RecordShape, Shape};
pub use crate::model::{Household, Priority, Status, Task, User};
pub use crate::results::{ResultRow, ResultSet};
pub use crate::row_params;
pub use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder};
pub use crate::types::RowValues;
