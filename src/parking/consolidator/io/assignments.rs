use std::path::Path;

use calamine::{DataType, Range};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::io::excel_read::{self, HeaderRow, column};
use crate::model::{AssignmentRow, AssignmentTable, DeletedRow};

/// Sheet holding the current assignments.
pub const ACTIVE_SHEET: &str = "Постоянни паркоместа";
/// Sheet holding former employees and the spots they used to hold.
pub const DELETED_SHEET: &str = "Изтрити";

const REGISTRATION_KEYWORDS: &[&str] = &["рег", "номер", "plate", "registration"];
const NAME_KEYWORDS: &[&str] = &["име", "служител", "name", "employee"];
const LOCATION_KEYWORDS: &[&str] = &["място", "локация", "location", "spot"];
const OWNERSHIP_KEYWORDS: &[&str] = &["собств", "тип", "вид", "ownership", "type"];
const FREE_KEYWORDS: &[&str] = &["free", "свобод"];

/// Reads the assignment workbook.
///
/// The active sheet is required; the former-employee sheet is optional.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn read_assignment_table(path: &Path) -> Result<AssignmentTable> {
    let mut workbook = excel_read::open(path)?;

    let active_range = excel_read::read_required_sheet(&mut workbook, path, ACTIVE_SHEET)?;
    let active = parse_active(&active_range);

    let deleted = match excel_read::read_optional_sheet(&mut workbook, path, DELETED_SHEET)? {
        Some(range) => parse_deleted(&range),
        None => {
            debug!("no '{DELETED_SHEET}' sheet; skipping former employees");
            Vec::new()
        }
    };

    info!(
        active = active.len(),
        deleted = deleted.len(),
        "read assignment table"
    );
    Ok(AssignmentTable { active, deleted })
}

fn parse_active(range: &Range<DataType>) -> Vec<AssignmentRow> {
    let first_row = excel_read::first_row_number(range);
    let mut rows = range.rows();
    let Some(header_cells) = rows.next() else {
        return Vec::new();
    };

    // "Free" first: its header often also says "място".
    let mut header = HeaderRow::from_cells(header_cells);
    let free = header.claim(FREE_KEYWORDS, Some(4));
    let registration = header.claim(REGISTRATION_KEYWORDS, Some(0));
    let name = header.claim(NAME_KEYWORDS, Some(1));
    let location = header.claim(LOCATION_KEYWORDS, Some(2));
    let ownership = header.claim(OWNERSHIP_KEYWORDS, Some(3));
    debug!(?registration, ?name, ?location, ?ownership, ?free, "resolved active columns");

    rows.enumerate()
        .map(|(index, row)| AssignmentRow {
            row: first_row + index + 1,
            registration: column(row, registration),
            name: column(row, name),
            location: column(row, location),
            ownership: column(row, ownership),
            free_location: column(row, free),
        })
        .filter(|row| !is_blank_active(row))
        .collect()
}

fn parse_deleted(range: &Range<DataType>) -> Vec<DeletedRow> {
    let first_row = excel_read::first_row_number(range);
    let mut rows = range.rows();
    let Some(header_cells) = rows.next() else {
        return Vec::new();
    };

    let mut header = HeaderRow::from_cells(header_cells);
    let registration = header.claim(REGISTRATION_KEYWORDS, Some(0));
    let name = header.claim(NAME_KEYWORDS, Some(1));
    let location = header.claim(LOCATION_KEYWORDS, Some(3));

    rows.enumerate()
        .map(|(index, row)| DeletedRow {
            row: first_row + index + 1,
            registration: column(row, registration),
            name: column(row, name),
            location: column(row, location),
        })
        .filter(|row| {
            !(row.registration.is_empty() && row.name.is_empty() && row.location.is_empty())
        })
        .collect()
}

fn is_blank_active(row: &AssignmentRow) -> bool {
    row.registration.is_empty()
        && row.name.is_empty()
        && row.location.is_empty()
        && row.ownership.is_empty()
        && row.free_location.is_empty()
}
