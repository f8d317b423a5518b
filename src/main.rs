//! tilde - Accent-insensitive text tools
//!
//! tilde provides:
//! - Overlapping phrase counting that ignores case and diacritics
//! - Predicate filtering and stable sorting of JSON records
//! - A small spreadsheet persisted as JSON
//! - Unified output format (text/jsonl/json/md)

use anyhow::Result;
use clap::Parser;

mod cli;
mod core;
mod records;
mod search;
mod sheet;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
