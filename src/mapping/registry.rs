//! Cached mapping descriptors, one per target type.
//!
//! A descriptor is the resolved form of a [`Shape`]: every field carries the
//! physical column it reads from, and every nested slot carries its full column
//! prefix (prefixes compose, so `Task.user.household.id` reads
//! `user_household_id`).

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock, RwLock};

use crate::error::MappingError;

use super::shape::{FieldKind, FromRow, RecordShape, Shape};

const MAX_NESTING: usize = 8;

static GLOBAL_REGISTRY: LazyLock<Arc<MappingRegistry>> =
    LazyLock::new(|| Arc::new(MappingRegistry::new()));

/// One declared field and the column it is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub name: &'static str,
    pub kind: FieldKind,
    pub column: String,
}

/// A nested slot with its resolved prefix and fields.
#[derive(Debug, Clone)]
pub struct NestedDescriptor {
    pub slot: &'static str,
    pub prefix: String,
    pub(crate) type_id: TypeId,
    pub record: RecordDescriptor,
}

#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    pub type_name: &'static str,
    pub fields: Vec<FieldBinding>,
    /// Index into `fields` of the key field, if one was declared.
    pub key: Option<usize>,
    pub nested: Vec<NestedDescriptor>,
}

/// Resolved mapping rules for a target type.
#[derive(Debug, Clone)]
pub enum MappingDescriptor {
    Scalar(FieldKind),
    Record(RecordDescriptor),
}

impl RecordDescriptor {
    fn resolve(shape: &RecordShape, prefix: &str, depth: usize) -> Result<Self, MappingError> {
        if depth > MAX_NESTING {
            return Err(MappingError::Descriptor {
                type_name: shape.type_name,
                reason: format!("nesting deeper than {MAX_NESTING} levels"),
            });
        }

        let mut seen_names = HashSet::new();
        let mut fields = Vec::with_capacity(shape.fields.len());
        for decl in &shape.fields {
            if !seen_names.insert(decl.name) {
                return Err(MappingError::Descriptor {
                    type_name: shape.type_name,
                    reason: format!("field `{}` declared twice", decl.name),
                });
            }
            fields.push(FieldBinding {
                name: decl.name,
                kind: decl.kind,
                column: format!("{prefix}{}", decl.column.unwrap_or(decl.name)),
            });
        }

        let key = match shape.key {
            Some(key_name) => Some(
                fields
                    .iter()
                    .position(|f| f.name == key_name)
                    .ok_or_else(|| MappingError::Descriptor {
                        type_name: shape.type_name,
                        reason: format!("key `{key_name}` is not a declared field"),
                    })?,
            ),
            None => None,
        };

        let mut nested = Vec::with_capacity(shape.nested.len());
        for decl in &shape.nested {
            if !seen_names.insert(decl.slot) {
                return Err(MappingError::Descriptor {
                    type_name: shape.type_name,
                    reason: format!("slot `{}` clashes with another field or slot", decl.slot),
                });
            }
            let Shape::Record(inner) = (decl.shape)() else {
                return Err(MappingError::Descriptor {
                    type_name: shape.type_name,
                    reason: format!("slot `{}` must hold a record type", decl.slot),
                });
            };
            let slot_prefix = match decl.prefix {
                Some(p) => format!("{prefix}{p}"),
                None => format!("{prefix}{}_", decl.slot),
            };
            let record = RecordDescriptor::resolve(&inner, &slot_prefix, depth + 1)?;
            if record.key.is_none() {
                return Err(MappingError::Descriptor {
                    type_name: shape.type_name,
                    reason: format!(
                        "slot `{}` holds {}, which declares no key field",
                        decl.slot, record.type_name
                    ),
                });
            }
            nested.push(NestedDescriptor {
                slot: decl.slot,
                prefix: slot_prefix,
                type_id: decl.type_id,
                record,
            });
        }

        Ok(RecordDescriptor {
            type_name: shape.type_name,
            fields,
            key,
            nested,
        })
    }

    /// The key field's binding.
    #[must_use]
    pub fn key_binding(&self) -> Option<&FieldBinding> {
        self.key.map(|idx| &self.fields[idx])
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<(usize, &FieldBinding)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }

    #[must_use]
    pub fn slot(&self, slot: &str) -> Option<(usize, &NestedDescriptor)> {
        self.nested.iter().enumerate().find(|(_, n)| n.slot == slot)
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.extend(self.fields.iter().map(|f| f.column.as_str()));
        for nested in &self.nested {
            nested.record.collect_columns(out);
        }
    }
}

impl MappingDescriptor {
    /// Resolve a shape into a descriptor, validating it on the way.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::Descriptor` when the shape is inconsistent: duplicate
    /// names or columns, a key that is not a field, a nested slot without a key,
    /// or runaway nesting.
    pub fn resolve(shape: &Shape) -> Result<Self, MappingError> {
        match shape {
            Shape::Scalar(kind) => Ok(MappingDescriptor::Scalar(*kind)),
            Shape::Record(record_shape) => {
                let record = RecordDescriptor::resolve(record_shape, "", 0)?;
                let mut columns = Vec::new();
                record.collect_columns(&mut columns);
                let mut seen = HashSet::new();
                for column in &columns {
                    if !seen.insert(column.to_ascii_lowercase()) {
                        return Err(MappingError::Descriptor {
                            type_name: record.type_name,
                            reason: format!("column `{column}` is mapped more than once"),
                        });
                    }
                }
                Ok(MappingDescriptor::Record(record))
            }
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            MappingDescriptor::Scalar(_) => "scalar",
            MappingDescriptor::Record(record) => record.type_name,
        }
    }

    /// Every column this descriptor can read, root fields first.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let MappingDescriptor::Record(record) = self {
            record.collect_columns(&mut out);
        }
        out
    }

    /// Declared columns a query's column list does not provide.
    ///
    /// Handy for checking, once in a test, that a query selects the full shape
    /// of its target type.
    #[must_use]
    pub fn missing_columns(&self, selected: &[&str]) -> Vec<String> {
        self.columns()
            .into_iter()
            .filter(|column| !selected.iter().any(|s| s.eq_ignore_ascii_case(column)))
            .map(str::to_owned)
            .collect()
    }
}

/// Per-type descriptor cache.
///
/// Lookups take a read lock. On a miss the descriptor is resolved without any
/// lock held and then inserted; if another caller got there first its value is
/// kept, so every caller sees the same `Arc`.
#[derive(Debug, Default)]
pub struct MappingRegistry {
    cache: RwLock<HashMap<TypeId, Arc<MappingDescriptor>>>,
}

impl MappingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry shared by executors that are not given their own.
    #[must_use]
    pub fn global() -> Arc<MappingRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Descriptor for `T`, resolving and caching it on first use.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::Descriptor` if `T`'s shape is invalid. Failures are
    /// not cached.
    pub fn descriptor<T: FromRow>(&self) -> Result<Arc<MappingDescriptor>, MappingError> {
        let type_id = TypeId::of::<T>();
        {
            let cache = match self.cache.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(found) = cache.get(&type_id) {
                return Ok(Arc::clone(found));
            }
        }

        let resolved = Arc::new(MappingDescriptor::resolve(&T::shape())?);

        let mut cache = match self.cache.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(Arc::clone(cache.entry(type_id).or_insert(resolved)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self.cache.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
