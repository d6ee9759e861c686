// Row mapping - turns flat result rows into typed objects
//
// - shape: the `FromRow` trait and the builder types declares its shape with
// - registry: resolves shapes into cached descriptors (column names, prefixes)
// - binder: matches a result set's columns against a descriptor
// - materializer: builds one object per row from the bound columns
// - coerce / scalars: value coercion and bare scalar targets

pub mod binder;
pub mod coerce;
pub mod materializer;
pub mod registry;
mod scalars;
pub mod shape;

pub use binder::{ColumnBinder, ColumnPlan, NestedPlan, RecordPlan};
pub use materializer::{Record, materialize};
pub use registry::{
    FieldBinding, MappingDescriptor, MappingRegistry, NestedDescriptor, RecordDescriptor,
};
pub use shape::{FieldKind, FromRow, RecordShape, Shape};
