//! Sparse sheet of cells addressed by 1-based (row, col)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Text shown by `preview` for a sheet without cells
pub const EMPTY_PREVIEW: &str = "(empty sheet)";

/// Value stored in a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Parse user input: integer first, then float, then plain text
    pub fn parse(raw: &str) -> Self {
        if let Ok(i) = raw.trim().parse::<i64>() {
            return CellValue::Int(i);
        }
        match raw.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => CellValue::Float(f),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    /// Numeric value, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Text(_) => None,
        }
    }
}

/// Format a float with at least one decimal place (`35.0`, `7.5`)
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => f.write_str(&format_number(*x)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Cell position, both coordinates starting at 1
pub type Position = (u32, u32);

/// Values along one row or column plus the sum of its numeric cells
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineSummary {
    pub values: Vec<Option<CellValue>>,
    pub sum: f64,
}

impl LineSummary {
    fn from_values(values: Vec<Option<CellValue>>) -> Self {
        let sum = values
            .iter()
            .flatten()
            .filter_map(CellValue::as_number)
            .sum();
        Self { values, sum }
    }
}

/// In-memory sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    cells: BTreeMap<Position, CellValue>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert into an empty cell; returns false if the cell is occupied
    pub fn insert(&mut self, row: u32, col: u32, value: CellValue) -> bool {
        if self.has_value(row, col) {
            return false;
        }
        self.cells.insert((row, col), value);
        true
    }

    /// Replace an existing cell; returns false if the cell is empty
    pub fn update(&mut self, row: u32, col: u32, value: CellValue) -> bool {
        match self.cells.get_mut(&(row, col)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn has_value(&self, row: u32, col: u32) -> bool {
        self.cells.contains_key(&(row, col))
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupied cells in (row, col) order
    pub fn cells(&self) -> impl Iterator<Item = (Position, &CellValue)> {
        self.cells.iter().map(|(pos, value)| (*pos, value))
    }

    /// (max_row, max_col) over existing cells, (0, 0) when empty
    pub fn bounds(&self) -> (u32, u32) {
        self.cells
            .keys()
            .fold((0, 0), |(max_r, max_c), &(r, c)| (max_r.max(r), max_c.max(c)))
    }

    /// Text grid of the whole sheet
    pub fn preview(&self) -> String {
        let (max_r, max_c) = self.bounds();
        if max_r == 0 || max_c == 0 {
            return EMPTY_PREVIEW.to_string();
        }

        let mut lines = Vec::with_capacity(max_r as usize + 1);

        let mut header = vec!["   ".to_string()];
        header.extend((1..=max_c).map(|c| format!("[{:>3}]", c)));
        lines.push(header.join(" "));

        for r in 1..=max_r {
            let mut row = vec![format!("[{:>3}]", r)];
            row.extend((1..=max_c).map(|c| {
                let shown = self.get(r, c).map(ToString::to_string).unwrap_or_default();
                format!("{:>4}", shown)
            }));
            lines.push(row.join(" "));
        }

        lines.join("\n")
    }

    /// Values across the full width of `row` and their numeric sum
    pub fn row_values_and_sum(&self, row: u32) -> LineSummary {
        let (max_r, max_c) = self.bounds();
        if row < 1 || row > max_r {
            return LineSummary::default();
        }
        LineSummary::from_values((1..=max_c).map(|c| self.get(row, c).cloned()).collect())
    }

    /// Values across the full height of `col` and their numeric sum
    pub fn col_values_and_sum(&self, col: u32) -> LineSummary {
        let (max_r, max_c) = self.bounds();
        if col < 1 || col > max_c {
            return LineSummary::default();
        }
        LineSummary::from_values((1..=max_r).map(|r| self.get(r, col).cloned()).collect())
    }
}

/// Sheet seeded with the demo cells
pub fn demo_sheet() -> Sheet {
    let mut sheet = Sheet::new();
    sheet.insert(1, 1, CellValue::Int(10));
    sheet.insert(1, 2, CellValue::Int(20));
    sheet.insert(2, 1, CellValue::Text("hola".to_string()));
    sheet.insert(3, 3, CellValue::Float(7.5));
    sheet.update(1, 2, CellValue::Int(25));
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_parse() {
        assert_eq!(CellValue::parse("42"), CellValue::Int(42));
        assert_eq!(CellValue::parse("-3"), CellValue::Int(-3));
        assert_eq!(CellValue::parse("7.5"), CellValue::Float(7.5));
        assert_eq!(CellValue::parse("hola"), CellValue::Text("hola".to_string()));
        assert_eq!(CellValue::parse("nan"), CellValue::Text("nan".to_string()));
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Int(10).to_string(), "10");
        assert_eq!(CellValue::Float(7.5).to_string(), "7.5");
        assert_eq!(CellValue::Float(25.0).to_string(), "25.0");
        assert_eq!(CellValue::Text("hola".into()).to_string(), "hola");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(35.0), "35.0");
        assert_eq!(format_number(0.0), "0.0");
        assert_eq!(format_number(-2.25), "-2.25");
    }

    #[test]
    fn test_insert_only_into_empty_cell() {
        let mut sheet = Sheet::new();
        assert!(sheet.insert(1, 1, CellValue::Int(1)));
        assert!(!sheet.insert(1, 1, CellValue::Int(2)));
        assert_eq!(sheet.get(1, 1), Some(&CellValue::Int(1)));
    }

    #[test]
    fn test_update_only_existing_cell() {
        let mut sheet = Sheet::new();
        assert!(!sheet.update(4, 1, CellValue::Text("nueva".into())));
        assert!(!sheet.has_value(4, 1));

        sheet.insert(1, 2, CellValue::Int(20));
        assert!(sheet.update(1, 2, CellValue::Int(25)));
        assert_eq!(sheet.get(1, 2), Some(&CellValue::Int(25)));
    }

    #[test]
    fn test_bounds() {
        assert_eq!(Sheet::new().bounds(), (0, 0));
        assert_eq!(demo_sheet().bounds(), (3, 3));
    }

    #[test]
    fn test_preview_empty() {
        assert_eq!(Sheet::new().preview(), EMPTY_PREVIEW);
    }

    #[test]
    fn test_preview_demo() {
        let expected = [
            "    [  1] [  2] [  3]",
            "[  1]   10   25     ",
            "[  2] hola          ",
            "[  3]            7.5",
        ]
        .join("\n");
        assert_eq!(demo_sheet().preview(), expected);
    }

    #[test]
    fn test_row_values_and_sum() {
        let sheet = demo_sheet();
        let summary = sheet.row_values_and_sum(1);
        assert_eq!(
            summary.values,
            vec![Some(CellValue::Int(10)), Some(CellValue::Int(25)), None]
        );
        assert_eq!(summary.sum, 35.0);
    }

    #[test]
    fn test_col_values_and_sum_ignores_text() {
        let sheet = demo_sheet();
        let summary = sheet.col_values_and_sum(1);
        assert_eq!(
            summary.values,
            vec![
                Some(CellValue::Int(10)),
                Some(CellValue::Text("hola".into())),
                None
            ]
        );
        assert_eq!(summary.sum, 10.0);
    }

    #[test]
    fn test_out_of_range_lines_are_empty() {
        let sheet = demo_sheet();
        assert_eq!(sheet.row_values_and_sum(0), LineSummary::default());
        assert_eq!(sheet.row_values_and_sum(4), LineSummary::default());
        assert_eq!(sheet.col_values_and_sum(9), LineSummary::default());
    }

    #[test]
    fn test_cells_in_order() {
        let positions: Vec<_> = demo_sheet().cells().map(|(pos, _)| pos).collect();
        assert_eq!(positions, vec![(1, 1), (1, 2), (2, 1), (3, 3)]);
    }
}
