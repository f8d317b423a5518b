//! Sheet module - A toy spreadsheet persisted as JSON
//!
//! Provides:
//! - grid: cells, preview, row/column sums
//! - store: `{"row,col": value}` state file
//! - api: the `sheet` subcommands

pub mod api;
pub mod grid;
pub mod store;
