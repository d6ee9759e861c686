//! Routes physical result columns to descriptor fields.
//!
//! Binding happens once per result set: column names are shared by every row,
//! so the resulting [`ColumnPlan`] is reused for each of them.

use std::collections::HashMap;

use crate::error::MappingError;

use super::registry::{MappingDescriptor, RecordDescriptor};

/// Where each field of a descriptor finds its value in a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPlan {
    /// Bare scalar read from the first selected column.
    Scalar { index: usize, column: String },
    Record(RecordPlan),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPlan {
    /// Parallel to `RecordDescriptor::fields`; `None` when the column was not selected.
    pub fields: Vec<Option<usize>>,
    /// Parallel to `RecordDescriptor::nested`.
    pub nested: Vec<NestedPlan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestedPlan {
    /// Key column not selected; the slot is empty on every row.
    Unbound,
    /// Key column at `key`, the rest of the group in `plan`.
    Bound { key: usize, plan: RecordPlan },
}

/// Column name lookup with exact matches first, then ASCII case-insensitive.
///
/// When a name occurs more than once (two joined tables both exposing `id`)
/// the leftmost column wins.
#[derive(Debug)]
pub struct ColumnBinder<'a> {
    first: Option<&'a str>,
    exact: HashMap<&'a str, usize>,
    folded: HashMap<String, usize>,
}

impl<'a> ColumnBinder<'a> {
    #[must_use]
    pub fn new<S: AsRef<str>>(columns: &'a [S]) -> Self {
        let mut exact = HashMap::with_capacity(columns.len());
        let mut folded = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            let name = name.as_ref();
            exact.entry(name).or_insert(idx);
            folded.entry(name.to_ascii_lowercase()).or_insert(idx);
        }
        Self {
            first: columns.first().map(AsRef::as_ref),
            exact,
            folded,
        }
    }

    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.exact
            .get(column)
            .or_else(|| self.folded.get(&column.to_ascii_lowercase()))
            .copied()
    }

    /// Bind a descriptor against this result set's columns.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::NoColumns` for a scalar target over an empty column
    /// list, and `MappingError::IncompleteGroup` when a nested group's key column
    /// is selected but one of its other columns is not.
    pub fn bind(&self, descriptor: &MappingDescriptor) -> Result<ColumnPlan, MappingError> {
        match descriptor {
            MappingDescriptor::Scalar(_) => match self.first {
                Some(column) => Ok(ColumnPlan::Scalar {
                    index: 0,
                    column: column.to_string(),
                }),
                None => Err(MappingError::NoColumns),
            },
            MappingDescriptor::Record(record) => Ok(ColumnPlan::Record(self.bind_record(record)?)),
        }
    }

    fn bind_record(&self, record: &RecordDescriptor) -> Result<RecordPlan, MappingError> {
        Ok(RecordPlan {
            fields: self.bind_fields(record),
            nested: self.bind_nested(record)?,
        })
    }

    fn bind_fields(&self, record: &RecordDescriptor) -> Vec<Option<usize>> {
        record
            .fields
            .iter()
            .map(|f| self.position(&f.column))
            .collect()
    }

    fn bind_nested(&self, record: &RecordDescriptor) -> Result<Vec<NestedPlan>, MappingError> {
        let mut plans = Vec::with_capacity(record.nested.len());
        for nested in &record.nested {
            let key = nested
                .record
                .key_binding()
                .and_then(|binding| self.position(&binding.column).map(|pos| (binding, pos)));
            let Some((key_binding, key)) = key else {
                plans.push(NestedPlan::Unbound);
                continue;
            };

            let fields = self.bind_fields(&nested.record);
            for (binding, position) in nested.record.fields.iter().zip(&fields) {
                if position.is_none() {
                    return Err(MappingError::IncompleteGroup {
                        slot: nested.slot.to_string(),
                        key: key_binding.column.clone(),
                        column: binding.column.clone(),
                    });
                }
            }
            let plan = RecordPlan {
                fields,
                nested: self.bind_nested(&nested.record)?,
            };
            plans.push(NestedPlan::Bound { key, plan });
        }
        Ok(plans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::FromRow;
    use crate::model::{Task, User};

    fn task_descriptor() -> MappingDescriptor {
        MappingDescriptor::resolve(&Task::shape()).unwrap()
    }

    #[test]
    fn binds_regardless_of_column_order() {
        let columns = [
            "user_name",
            "user_id",
            "description",
            "household_name",
            "household_id",
            "id",
        ];
        let plan = ColumnBinder::new(&columns[..]).bind(&task_descriptor()).unwrap();
        let ColumnPlan::Record(root) = plan else {
            panic!("expected a record plan");
        };
        assert_eq!(root.fields, vec![Some(5), Some(2)]);
        assert!(matches!(root.nested[0], NestedPlan::Bound { key: 4, .. }));
        assert_eq!(root.nested[1], NestedPlan::Unbound);
        assert_eq!(root.nested[2], NestedPlan::Unbound);
        match &root.nested[3] {
            NestedPlan::Bound { key, plan } => {
                assert_eq!(*key, 1);
                assert_eq!(plan.fields, vec![Some(1), Some(0)]);
                // user_household_* not selected
                assert_eq!(plan.nested, vec![NestedPlan::Unbound]);
            }
            NestedPlan::Unbound => panic!("user slot should be bound"),
        }
    }

    #[test]
    fn tolerates_subset_of_root_columns() {
        let columns = ["id"];
        let plan = ColumnBinder::new(&columns[..]).bind(&task_descriptor()).unwrap();
        let ColumnPlan::Record(root) = plan else {
            panic!("expected a record plan");
        };
        assert_eq!(root.fields, vec![Some(0), None]);
        assert!(root.nested.iter().all(|n| *n == NestedPlan::Unbound));
    }

    #[test]
    fn key_without_rest_of_group_is_incomplete() {
        let descriptor = MappingDescriptor::resolve(&User::shape()).unwrap();
        let columns = ["id", "name", "household_id"];
        let err = ColumnBinder::new(&columns[..]).bind(&descriptor).unwrap_err();
        assert_eq!(
            err,
            MappingError::IncompleteGroup {
                slot: "household".into(),
                key: "household_id".into(),
                column: "household_name".into(),
            }
        );
    }

    #[test]
    fn case_insensitive_fallback_and_leftmost_duplicate() {
        let columns = ["ID", "id", "Name"];
        let binder = ColumnBinder::new(&columns[..]);
        assert_eq!(binder.position("id"), Some(1));
        assert_eq!(binder.position("name"), Some(2));
        let dup = ["name", "name"];
        assert_eq!(ColumnBinder::new(&dup[..]).position("name"), Some(0));
    }

    #[test]
    fn scalar_binds_first_column() {
        let columns = ["id", "name"];
        let plan = ColumnBinder::new(&columns[..])
            .bind(&MappingDescriptor::Scalar(crate::mapping::FieldKind::Int))
            .unwrap();
        assert_eq!(
            plan,
            ColumnPlan::Scalar {
                index: 0,
                column: "id".to_string()
            }
        );

        let none: [&str; 0] = [];
        let err = ColumnBinder::new(&none[..])
            .bind(&MappingDescriptor::Scalar(crate::mapping::FieldKind::Int))
            .unwrap_err();
        assert_eq!(err, MappingError::NoColumns);
    }
}
