//! Filter API - `tilde filter`

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

use crate::core::diag::Reporter;
use crate::core::file_reader::{read_text, ReadConfig};
use crate::core::model::{Meta, ResultItem, ResultSet};
use crate::core::paths::{display_path, resolve};
use crate::core::render::{RenderConfig, Renderer};
use crate::records::predicate::{matches_all, Predicate};
use crate::records::sort::{sort_records, SortOrder};

pub type Record = Map<String, Value>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordsError {
    #[error("expected a JSON array of records, found {0}")]
    NotAnArray(&'static str),

    #[error("record #{index} is not a JSON object (found {found})")]
    NotAnObject { index: usize, found: &'static str },
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Validate that `value` is an array of objects and take the records out of it
pub fn into_records(value: Value) -> Result<Vec<Record>, RecordsError> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(RecordsError::NotAnArray(type_name(&other))),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(RecordsError::NotAnObject {
                index,
                found: type_name(&other),
            }),
        })
        .collect()
}

/// Partition records into (matching every predicate, the rest); both keep input order
pub fn split_by_predicates(records: Vec<Record>, predicates: &[Predicate]) -> (Vec<Record>, Vec<Record>) {
    records
        .into_iter()
        .partition(|record| matches_all(record, predicates))
}

/// Filtered and ordered records, tagged with whether they matched
#[derive(Debug, Clone, PartialEq)]
pub struct Arranged {
    pub record: Record,
    pub matched: bool,
}

/// Matching records sorted by `key`, followed by the rest in their original order
pub fn arrange(records: Vec<Record>, predicates: &[Predicate], key: &str, order: SortOrder) -> Vec<Arranged> {
    let (matched, rest) = split_by_predicates(records, predicates);
    let matched = sort_records(&matched, key, order);

    matched
        .into_iter()
        .map(|record| Arranged {
            record,
            matched: true,
        })
        .chain(rest.into_iter().map(|record| Arranged {
            record,
            matched: false,
        }))
        .collect()
}

/// Run the filter command
pub fn run_filter(
    root: &Path,
    input: &Path,
    filters: &[String],
    sort_key: &str,
    order: SortOrder,
    config: RenderConfig,
    reporter: &Reporter,
) -> Result<()> {
    let predicates = filters
        .iter()
        .map(|f| f.parse::<Predicate>())
        .collect::<Result<Vec<_>, _>>()?;

    let resolved = resolve(root, input);
    let shown = display_path(root, &resolved);
    let loaded = read_text(&resolved, &ReadConfig::default())?;
    let value: Value = serde_json::from_str(&loaded.content)
        .with_context(|| format!("Failed to parse JSON records from {}", shown))?;
    let records = into_records(value).with_context(|| format!("Invalid records in {}", shown))?;

    let shown_predicates: Vec<String> = predicates.iter().map(ToString::to_string).collect();
    reporter.debug(format!(
        "{} records, filters [{}], sort by {:?} {:?}",
        records.len(),
        shown_predicates.join(", "),
        sort_key,
        order
    ));

    let arranged = arrange(records, &predicates, sort_key, order);
    let matched = arranged.iter().filter(|a| a.matched).count();
    reporter.debug(format!("{} matched, {} passed through", matched, arranged.len() - matched));

    let result_set: ResultSet = arranged
        .into_iter()
        .map(|a| {
            ResultItem::record(Value::Object(a.record)).with_meta(Meta {
                matched: Some(a.matched),
                ..Default::default()
            })
        })
        .collect();

    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;
    Ok(())
}
