use crate::model::{ConsolidatedDataset, SpotState};

pub const ASSIGNMENTS_SHEET: &str = "Assignments";
pub const ZONES_SHEET: &str = "Zones";
pub const SPOTS_SHEET: &str = "Spots";
pub const WARNINGS_SHEET: &str = "Warnings";

/// A table that will be materialised as an Excel sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// All tables of the exported workbook, in sheet order.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    pub tables: Vec<SheetTable>,
}

/// Lays a consolidated dataset out as spreadsheet tables: one row per
/// assignment, per zone, per spot and per warning.
pub fn build_workbook(dataset: &ConsolidatedDataset) -> WorkbookData {
    WorkbookData {
        tables: vec![
            assignments_table(dataset),
            zones_table(dataset),
            spots_table(dataset),
            warnings_table(dataset),
        ],
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn assignments_table(dataset: &ConsolidatedDataset) -> SheetTable {
    let rows: Vec<Vec<Cell>> = dataset
        .records
        .iter()
        .map(|record| {
            vec![
                record.spot_code.as_str().into(),
                record.zone.display_name().into(),
                record.employee_name.as_str().into(),
                record.plates.join(" / ").into(),
                record.vehicle_ownership.to_string().into(),
                record.plate_registration.to_string().into(),
                match record.is_free {
                    Some(true) => "yes".into(),
                    Some(false) => "no".into(),
                    None => "unknown".into(),
                },
            ]
        })
        .collect();

    SheetTable {
        sheet_name: ASSIGNMENTS_SHEET.to_string(),
        columns: columns(&[
            "spot",
            "zone",
            "employee",
            "plates",
            "ownership",
            "plate_registration",
            "free",
        ]),
        rows,
    }
}

fn zones_table(dataset: &ConsolidatedDataset) -> SheetTable {
    let summary = &dataset.summary;
    let mut rows: Vec<Vec<Cell>> = summary
        .zones
        .iter()
        .map(|zone| {
            vec![
                zone.zone.display_name().into(),
                zone.allocated_count.into(),
                zone.free_count.into(),
                zone.unknown_count.into(),
                zone.percentage_of_total.into(),
            ]
        })
        .collect();
    rows.push(vec![
        "Total".into(),
        summary.allocated.into(),
        summary.free.into(),
        summary.unknown.into(),
        Cell::Number(100.0),
    ]);

    SheetTable {
        sheet_name: ZONES_SHEET.to_string(),
        columns: columns(&["zone", "allocated", "free", "unknown", "percentage"]),
        rows,
    }
}

fn spots_table(dataset: &ConsolidatedDataset) -> SheetTable {
    let rows: Vec<Vec<Cell>> = dataset
        .spots
        .iter()
        .map(|spot| {
            let status = match spot.status {
                SpotState::Occupied => "occupied",
                SpotState::Free => "free",
                SpotState::Unknown => "unknown",
            };
            vec![
                spot.spot_code.as_str().into(),
                spot.zone.display_name().into(),
                status.into(),
            ]
        })
        .collect();

    SheetTable {
        sheet_name: SPOTS_SHEET.to_string(),
        columns: columns(&["spot", "zone", "status"]),
        rows,
    }
}

fn warnings_table(dataset: &ConsolidatedDataset) -> SheetTable {
    let rows: Vec<Vec<Cell>> = dataset
        .warnings
        .iter()
        .map(|warning| {
            vec![
                format!("{:?}", warning.kind).into(),
                warning.sheet.as_str().into(),
                warning
                    .row
                    .map(Cell::from)
                    .unwrap_or_else(|| Cell::Text(String::new())),
                warning.message.as_str().into(),
            ]
        })
        .collect();

    SheetTable {
        sheet_name: WARNINGS_SHEET.to_string(),
        columns: columns(&["kind", "sheet", "row", "message"]),
        rows,
    }
}
