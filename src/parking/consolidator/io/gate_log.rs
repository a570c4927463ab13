use std::path::Path;

use calamine::DataType;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tracing::{debug, info, instrument, warn};

use crate::error::{ConsolidationError, Result};
use crate::io::excel_read::{self, HeaderRow, cell_to_string};
use crate::model::{Direction, GateEvent};
use crate::normalize::normalize_plate;

/// Rows scanned for the header before giving up.
pub const HEADER_SCAN_ROWS: usize = 50;
const HEADER_MARKER: &str = "време";

const DATETIME_FORMATS: [&str; 4] = [
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Gate events read from an export, plus how many rows were unusable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateLog {
    pub events: Vec<GateEvent>,
    pub skipped: usize,
}

/// Reads a barrier export. The export has a free-form preamble, so the header
/// is located by scanning for the `Време` column.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn read_gate_log(path: &Path) -> Result<GateLog> {
    let mut workbook = excel_read::open(path)?;
    let range = excel_read::read_first_sheet(&mut workbook, path)?;

    let first_row = excel_read::first_row_number(&range);
    let rows: Vec<&[DataType]> = range.rows().collect();
    let header_index = rows
        .iter()
        .take(HEADER_SCAN_ROWS)
        .position(|row| {
            row.iter()
                .any(|cell| cell_to_string(Some(cell)).to_lowercase().contains(HEADER_MARKER))
        })
        .ok_or_else(|| {
            ConsolidationError::malformed(path, "could not find header row with 'Време' column")
        })?;
    debug!(header_row = first_row + header_index, "found gate log header");

    let mut header = HeaderRow::from_cells(rows[header_index]);
    let datetime = header.claim(&[HEADER_MARKER], Some(0));
    let direction = header.claim(&["направление", "direction"], Some(1));
    let plate = header.claim(&["автомобил", "номер", "plate"], Some(2));

    let mut log = GateLog::default();
    for (offset, row) in rows.iter().enumerate().skip(header_index + 1) {
        match parse_event(row, datetime, direction, plate) {
            Some(event) => log.events.push(event),
            None => {
                log.skipped += 1;
                if log.skipped <= 5 {
                    warn!(row = first_row + offset, "skipping unusable gate log row");
                }
            }
        }
    }
    log.events.sort_by_key(|event| event.timestamp);

    info!(
        events = log.events.len(),
        skipped = log.skipped,
        "read gate log"
    );
    Ok(log)
}

fn parse_event(
    row: &[DataType],
    datetime: Option<usize>,
    direction: Option<usize>,
    plate: Option<usize>,
) -> Option<GateEvent> {
    let moment = parse_datetime(row.get(datetime?)?)?;
    let direction_text = cell_to_string(row.get(direction?));
    if direction_text.is_empty() {
        return None;
    }
    let plate = normalize_plate(&cell_to_string(row.get(plate?)));
    if plate.is_empty() {
        return None;
    }

    Some(GateEvent {
        timestamp: moment.and_utc().timestamp(),
        datetime: moment.format("%Y-%m-%d %H:%M:%S").to_string(),
        direction: parse_direction(&direction_text),
        plate,
    })
}

/// Reads either an Excel serial date or a text timestamp such as
/// `20.10.2025 г. 23:45:37`.
pub fn parse_datetime(cell: &DataType) -> Option<NaiveDateTime> {
    match cell {
        DataType::DateTime(serial) | DataType::Float(serial) => from_excel_serial(*serial),
        other => {
            let text = cell_to_string(Some(other)).replace(" г.", "");
            let text = text.trim();
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        }
    }
}

fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial <= 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

pub fn parse_direction(text: &str) -> Direction {
    let lower = text.to_lowercase();
    if lower.contains("излизане") || lower.contains("изход") || lower.contains("exit") {
        Direction::Exit
    } else if lower.contains("влизане") || lower.contains("вход") || lower.contains("enter") {
        Direction::Enter
    } else {
        Direction::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulgarian_text_timestamps() {
        let parsed = parse_datetime(&DataType::String("20.10.2025 г. 23:45:37".into()))
            .expect("timestamp parsed");
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-10-20 23:45:37");
        assert_eq!(parsed.and_utc().timestamp(), 1_761_003_937);
    }

    #[test]
    fn excel_serial_timestamps() {
        let parsed = parse_datetime(&DataType::DateTime(45_950.5)).expect("serial parsed");
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-10-20 12:00:00");
    }

    #[test]
    fn garbage_timestamps_are_rejected() {
        assert_eq!(parse_datetime(&DataType::String("вчера".into())), None);
        assert_eq!(parse_datetime(&DataType::Empty), None);
    }

    #[test]
    fn directions() {
        assert_eq!(parse_direction("Влизане"), Direction::Enter);
        assert_eq!(parse_direction("Изход 2"), Direction::Exit);
        assert_eq!(parse_direction("???"), Direction::Unknown);
    }
}
