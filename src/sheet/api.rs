//! Sheet API - `tilde sheet <action>`

use anyhow::Result;
use serde_json::{json, Value};
use std::path::Path;

use crate::core::diag::Reporter;
use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::sheet::grid::{demo_sheet, format_number, CellValue, LineSummary, Sheet};
use crate::sheet::store::{delete_state, load_state, save_state};

/// One sheet operation
#[derive(Debug, Clone, PartialEq)]
pub enum SheetAction {
    Insert { row: u32, col: u32, value: String },
    Update { row: u32, col: u32, value: String },
    Has { row: u32, col: u32 },
    Preview,
    Row { row: u32 },
    Col { col: u32 },
    Reset,
}

/// Load persisted state, falling back to the demo sheet when nothing usable exists
fn open_sheet(state_path: &Path, reporter: &Reporter) -> Sheet {
    match load_state(state_path) {
        Ok(Some(sheet)) => {
            reporter.debug(format!("loaded {} cells from {:?}", sheet.len(), state_path));
            sheet
        }
        Ok(None) => {
            reporter.debug(format!("no state at {:?}; using demo data", state_path));
            demo_sheet()
        }
        Err(e) => {
            reporter.warn(format!("could not load sheet state: {:#}", e));
            demo_sheet()
        }
    }
}

/// Persist the sheet; failures are reported but do not fail the command
fn persist(state_path: &Path, sheet: &Sheet, reporter: &Reporter) {
    match save_state(state_path, sheet) {
        Ok(()) => reporter.debug(format!("saved {} cells to {:?}", sheet.len(), state_path)),
        Err(e) => reporter.warn(format!("could not save sheet state: {:#}", e)),
    }
}

fn values_json(summary: &LineSummary) -> Value {
    Value::Array(
        summary
            .values
            .iter()
            .map(|v| v.as_ref().map_or(Value::Null, |cell| json!(cell)))
            .collect(),
    )
}

fn summary_item(summary: &LineSummary) -> ResultItem {
    let values = values_json(summary);
    ResultItem::cell(format!(
        "Values: {}\nSum: {}",
        values,
        format_number(summary.sum)
    ))
    .with_data(json!({
        "values": values,
        "sum": summary.sum,
    }))
}

fn write_item(row: u32, col: u32, ok: bool, failure: &str) -> ResultItem {
    ResultItem::cell(if ok { "OK" } else { failure }).with_data(json!({
        "row": row,
        "col": col,
        "ok": ok,
    }))
}

/// Apply one action to the sheet, persisting it when the action changed something
pub fn apply(state_path: &Path, action: SheetAction, reporter: &Reporter) -> Result<ResultItem> {
    let mut sheet = open_sheet(state_path, reporter);

    let item = match action {
        SheetAction::Insert { row, col, value } => {
            let ok = sheet.insert(row, col, CellValue::parse(&value));
            if ok {
                persist(state_path, &sheet, reporter);
            }
            write_item(row, col, ok, "Cell occupied")
        }
        SheetAction::Update { row, col, value } => {
            let ok = sheet.update(row, col, CellValue::parse(&value));
            if ok {
                persist(state_path, &sheet, reporter);
            }
            write_item(row, col, ok, "Cell missing")
        }
        SheetAction::Has { row, col } => {
            let has = sheet.has_value(row, col);
            ResultItem::cell(if has { "True" } else { "False" }).with_data(json!({
                "row": row,
                "col": col,
                "has_value": has,
            }))
        }
        SheetAction::Preview => {
            let (rows, cols) = sheet.bounds();
            ResultItem::sheet(sheet.preview()).with_data(json!({
                "rows": rows,
                "cols": cols,
                "cells": sheet.len(),
            }))
        }
        SheetAction::Row { row } => summary_item(&sheet.row_values_and_sum(row)),
        SheetAction::Col { col } => summary_item(&sheet.col_values_and_sum(col)),
        SheetAction::Reset => {
            if let Err(e) = delete_state(state_path) {
                reporter.warn(format!("could not delete sheet state: {:#}", e));
            }
            sheet = demo_sheet();
            persist(state_path, &sheet, reporter);
            ResultItem::sheet("State reset to demo data.")
        }
    };

    Ok(item)
}

/// Run a sheet command
pub fn run_sheet(
    state_path: &Path,
    action: SheetAction,
    config: RenderConfig,
    reporter: &Reporter,
) -> Result<()> {
    let item = apply(state_path, action, reporter)?;

    let mut result_set = ResultSet::new();
    result_set.push(item);

    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn excerpt(item: &ResultItem) -> &str {
        item.excerpt.as_deref().unwrap()
    }

    #[test]
    fn test_first_command_uses_demo_data() {
        let temp = tempdir().unwrap();
        let state = temp.path().join("sheet_state.json");

        let item = apply(&state, SheetAction::Row { row: 1 }, &Reporter::silent()).unwrap();
        assert_eq!(excerpt(&item), "Values: [10,25,null]\nSum: 35.0");
        // read-only commands don't persist
        assert!(!state.exists());
    }

    #[test]
    fn test_insert_persists_only_on_success() {
        let temp = tempdir().unwrap();
        let state = temp.path().join("sheet_state.json");
        let reporter = Reporter::silent();

        let occupied = SheetAction::Insert {
            row: 1,
            col: 1,
            value: "99".into(),
        };
        assert_eq!(excerpt(&apply(&state, occupied, &reporter).unwrap()), "Cell occupied");
        assert!(!state.exists());

        let fresh = SheetAction::Insert {
            row: 4,
            col: 2,
            value: "3.5".into(),
        };
        assert_eq!(excerpt(&apply(&state, fresh, &reporter).unwrap()), "OK");

        let saved = load_state(&state).unwrap().unwrap();
        assert_eq!(saved.get(4, 2), Some(&CellValue::Float(3.5)));
        assert_eq!(saved.get(1, 2), Some(&CellValue::Int(25)));
    }

    #[test]
    fn test_update_missing_cell() {
        let temp = tempdir().unwrap();
        let state = temp.path().join("sheet_state.json");

        let action = SheetAction::Update {
            row: 4,
            col: 1,
            value: "nueva".into(),
        };
        let item = apply(&state, action, &Reporter::silent()).unwrap();
        assert_eq!(excerpt(&item), "Cell missing");
        assert_eq!(item.data.unwrap()["ok"], false);
    }

    #[test]
    fn test_has_and_col() {
        let temp = tempdir().unwrap();
        let state = temp.path().join("sheet_state.json");
        let reporter = Reporter::silent();

        let has = apply(&state, SheetAction::Has { row: 1, col: 1 }, &reporter).unwrap();
        assert_eq!(excerpt(&has), "True");
        let has = apply(&state, SheetAction::Has { row: 4, col: 4 }, &reporter).unwrap();
        assert_eq!(excerpt(&has), "False");

        let col = apply(&state, SheetAction::Col { col: 3 }, &reporter).unwrap();
        assert_eq!(excerpt(&col), "Values: [null,null,7.5]\nSum: 7.5");
    }

    #[test]
    fn test_out_of_range_row() {
        let temp = tempdir().unwrap();
        let state = temp.path().join("sheet_state.json");
        let item = apply(&state, SheetAction::Row { row: 7 }, &Reporter::silent()).unwrap();
        assert_eq!(excerpt(&item), "Values: []\nSum: 0.0");
    }

    #[test]
    fn test_reset_restores_demo() {
        let temp = tempdir().unwrap();
        let state = temp.path().join("sheet_state.json");
        let reporter = Reporter::silent();

        let insert = SheetAction::Insert {
            row: 9,
            col: 9,
            value: "x".into(),
        };
        apply(&state, insert, &reporter).unwrap();

        let item = apply(&state, SheetAction::Reset, &reporter).unwrap();
        assert_eq!(excerpt(&item), "State reset to demo data.");
        assert_eq!(load_state(&state).unwrap().unwrap(), demo_sheet());
    }

    #[test]
    fn test_corrupt_state_falls_back_to_demo() {
        let temp = tempdir().unwrap();
        let state = temp.path().join("sheet_state.json");
        std::fs::write(&state, "not json").unwrap();

        let item = apply(&state, SheetAction::Preview, &Reporter::silent()).unwrap();
        assert_eq!(item.data.unwrap()["cells"], 4);
    }

    #[test]
    fn test_reset_survives_undeletable_state() {
        let temp = tempdir().unwrap();
        // a non-empty directory where the state file should be
        let state = temp.path().join("state");
        std::fs::create_dir_all(state.join("inner")).unwrap();

        let item = apply(&state, SheetAction::Reset, &Reporter::silent()).unwrap();
        assert_eq!(excerpt(&item), "State reset to demo data.");
        assert!(state.is_dir());
    }
}
