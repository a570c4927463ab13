use std::path::Path;

use rust_xlsxwriter::{Format, Table, Workbook};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::flatten::{Cell, WorkbookData};

/// Writes the provided workbook data to the given path, one Excel table per
/// sheet with an autofilter header.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let header_format = Format::new().set_bold();

    for table in &workbook.tables {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;

        for (col_idx, header) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let row_number = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_number, col_idx as u16, text)?;
                    }
                    Cell::Number(number) => {
                        worksheet.write_number(row_number, col_idx as u16, *number)?;
                    }
                }
            }
        }

        let col_end = (table.columns.len() as u16).saturating_sub(1);
        let row_end = table.rows.len().max(1) as u32;
        worksheet.add_table(0, 0, row_end, col_end, &Table::new().set_autofilter(true))?;
        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofit();
        debug!(sheet = %table.sheet_name, rows = table.rows.len(), "sheet written");
    }

    workbook_writer.save(path)?;
    Ok(())
}
