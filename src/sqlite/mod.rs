// SQLite module - the store behind the query executor
//
// - config: connection options and how a per-call connection is opened
// - params: conversion of `RowValues` parameters into rusqlite values
// - query: value extraction and row streaming through the mapper

pub mod config;
pub mod params;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use params::Params;
pub use query::{build_result_set, map_rows, sqlite_extract_value_sync};
