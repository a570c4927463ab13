use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};

use crate::error::{ConsolidationError, Result};

pub type Workbook = Xlsx<BufReader<File>>;

/// Opens an `.xlsx` workbook, mapping a missing path to
/// [`ConsolidationError::InputNotFound`] and an unreadable file to
/// [`ConsolidationError::InputMalformed`].
pub fn open(path: &Path) -> Result<Workbook> {
    if !path.exists() {
        return Err(ConsolidationError::InputNotFound(path.to_path_buf()));
    }
    open_workbook(path).map_err(|error: calamine::XlsxError| {
        ConsolidationError::malformed(path, format!("not a readable workbook: {error}"))
    })
}

pub fn read_required_sheet(
    workbook: &mut Workbook,
    path: &Path,
    name: &str,
) -> Result<Range<DataType>> {
    read_optional_sheet(workbook, path, name)?
        .ok_or_else(|| ConsolidationError::malformed(path, format!("missing sheet '{name}'")))
}

pub fn read_optional_sheet(
    workbook: &mut Workbook,
    path: &Path,
    name: &str,
) -> Result<Option<Range<DataType>>> {
    match workbook.worksheet_range(name) {
        Some(range) => range
            .map(Some)
            .map_err(|error| ConsolidationError::malformed(path, format!("sheet '{name}': {error}"))),
        None => Ok(None),
    }
}

pub fn read_first_sheet(workbook: &mut Workbook, path: &Path) -> Result<Range<DataType>> {
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConsolidationError::malformed(path, "workbook has no sheets"))?
        .map_err(|error| ConsolidationError::malformed(path, format!("first sheet: {error}")))
}

/// Renders a cell the way a person reading the sheet would see it, trimmed.
pub fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.trim().to_string(),
        Some(DataType::Float(value)) if value.fract() == 0.0 => format!("{value:.0}"),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Header row of a sheet, lower-cased for keyword matching.
#[derive(Debug, Clone, Default)]
pub struct HeaderRow {
    headers: Vec<String>,
    claimed: BTreeSet<usize>,
}

impl HeaderRow {
    pub fn from_cells(cells: &[DataType]) -> Self {
        Self {
            headers: cells
                .iter()
                .map(|cell| cell_to_string(Some(cell)).to_lowercase())
                .collect(),
            claimed: BTreeSet::new(),
        }
    }

    /// Whether any header contains any of the keywords.
    pub fn mentions(&self, keywords: &[&str]) -> bool {
        self.headers
            .iter()
            .any(|header| keywords.iter().any(|keyword| header.contains(keyword)))
    }

    /// Claims the first unclaimed column whose header contains one of the
    /// keywords, or else `fallback` if nothing has claimed that position.
    pub fn claim(&mut self, keywords: &[&str], fallback: Option<usize>) -> Option<usize> {
        let matched = self.headers.iter().enumerate().find(|(index, header)| {
            !self.claimed.contains(index) && keywords.iter().any(|keyword| header.contains(keyword))
        });
        let column = match matched {
            Some((index, _)) => Some(index),
            None => fallback.filter(|index| !self.claimed.contains(index)),
        }?;
        self.claimed.insert(column);
        Some(column)
    }
}

/// 1-based spreadsheet row of the first row in `range`. Ranges start at the
/// first non-empty cell, not at A1.
pub fn first_row_number(range: &Range<DataType>) -> usize {
    range.start().map_or(1, |(row, _)| row as usize + 1)
}

/// Reads a resolved column of a row; unresolved columns read as empty.
pub fn column(row: &[DataType], index: Option<usize>) -> String {
    index.map(|index| cell_to_string(row.get(index))).unwrap_or_default()
}
