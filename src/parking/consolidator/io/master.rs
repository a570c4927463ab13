use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::{ConsolidationError, Result};
use crate::io::excel_read::{self, HeaderRow, column};
use crate::model::MasterRow;

const SPOT_KEYWORDS: &[&str] = &["място", "код", "spot", "code"];
const ZONE_KEYWORDS: &[&str] = &["зона", "локация", "zone", "area", "location"];
const FREE_KEYWORDS: &[&str] = &["free", "свобод"];

/// Reads the master parking table from the first sheet of the workbook.
///
/// Fails with [`ConsolidationError::InputMalformed`] when the sheet is empty
/// or its header names neither a spot nor a zone column.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn read_master_table(path: &Path) -> Result<Vec<MasterRow>> {
    let mut workbook = excel_read::open(path)?;
    let range = excel_read::read_first_sheet(&mut workbook, path)?;

    let first_row = excel_read::first_row_number(&range);
    let mut rows = range.rows();
    let header_cells = rows
        .next()
        .ok_or_else(|| ConsolidationError::malformed(path, "master table is empty"))?;

    let mut header = HeaderRow::from_cells(header_cells);
    if !header.mentions(SPOT_KEYWORDS) && !header.mentions(ZONE_KEYWORDS) {
        return Err(ConsolidationError::malformed(
            path,
            "master table header has no spot or zone column",
        ));
    }

    let free = header.claim(FREE_KEYWORDS, Some(2));
    let spot = header.claim(SPOT_KEYWORDS, Some(0));
    let zone = header.claim(ZONE_KEYWORDS, Some(1));
    debug!(?spot, ?zone, ?free, "resolved master columns");

    let master: Vec<MasterRow> = rows
        .enumerate()
        .map(|(index, row)| MasterRow {
            row: first_row + index + 1,
            spot: column(row, spot),
            zone: column(row, zone),
            free: column(row, free),
        })
        .filter(|row| !(row.spot.is_empty() && row.zone.is_empty() && row.free.is_empty()))
        .collect();

    info!(rows = master.len(), "read master parking table");
    Ok(master)
}
