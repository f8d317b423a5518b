//! Records module - Filtering and stable ordering of JSON records
//!
//! Provides:
//! - predicate: `<field><op><value>` filters
//! - sort: stable merge sort by a key (default `priority`)
//! - api: the `filter` command

pub mod api;
pub mod predicate;
pub mod sort;
