//! Sheet persistence as a flat JSON object: `{"row,col": value}`

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::sheet::grid::{CellValue, Position, Sheet};

/// Encode a position as a state key
pub fn position_key((row, col): Position) -> String {
    format!("{},{}", row, col)
}

/// Decode a state key; `None` for anything that isn't `row,col` with both >= 1
pub fn parse_position_key(key: &str) -> Option<Position> {
    let (r, c) = key.split_once(',')?;
    let row: u32 = r.trim().parse().ok()?;
    let col: u32 = c.trim().parse().ok()?;
    (row >= 1 && col >= 1).then_some((row, col))
}

/// Serialize the sheet into its JSON state object
pub fn to_state(sheet: &Sheet) -> Map<String, Value> {
    sheet
        .cells()
        .filter_map(|(pos, value)| {
            serde_json::to_value(value)
                .ok()
                .map(|v| (position_key(pos), v))
        })
        .collect()
}

/// Rebuild a sheet from a JSON state object, skipping keys or values it cannot use
pub fn from_state(state: &Map<String, Value>) -> Sheet {
    let mut sheet = Sheet::new();
    for (key, value) in state {
        let Some((row, col)) = parse_position_key(key) else {
            continue;
        };
        if let Ok(cell) = serde_json::from_value::<CellValue>(value.clone()) {
            sheet.insert(row, col, cell);
        }
    }
    sheet
}

/// Load the state file. `Ok(None)` when it does not exist.
pub fn load_state(path: &Path) -> Result<Option<Sheet>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read sheet state: {:?}", path));
        }
    };

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse sheet state: {:?}", path))?;
    let Value::Object(state) = value else {
        bail!("Sheet state {:?} is not a JSON object", path);
    };

    Ok(Some(from_state(&state)))
}

/// Write the state file, creating parent directories as needed
pub fn save_state(path: &Path, sheet: &Sheet) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let json = serde_json::to_string(&to_state(sheet))?;
    fs::write(path, json).with_context(|| format!("Failed to write sheet state: {:?}", path))?;
    Ok(())
}

/// Remove the state file; a missing file is not an error
pub fn delete_state(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove sheet state: {:?}", path)),
    }
}
