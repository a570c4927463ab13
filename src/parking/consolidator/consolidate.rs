use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::error::{ConsolidationError, Result};
use crate::flatten::build_workbook;
use crate::io::assignments::read_assignment_table;
use crate::io::excel_write;
use crate::io::gate_log::{GateLog, read_gate_log};
use crate::io::json_write::write_json;
use crate::io::master::read_master_table;
use crate::merge::merge;
use crate::model::ConsolidatedDataset;
use crate::quality::WarningLog;
use crate::registry::build_registry;
use crate::summary::{DEFAULT_CAPACITY, locations, summarize};

/// Knobs of a consolidation run beyond the two required inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidateOptions {
    /// Number of spots on the site.
    pub capacity: usize,
    /// Optional barrier export merged into the vehicle registry.
    pub gate_log: Option<PathBuf>,
    /// Optional Excel export of the consolidated tables.
    pub workbook: Option<PathBuf>,
    /// Fail instead of emitting output when any quality warning was recorded.
    pub strict: bool,
}

impl Default for ConsolidateOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            gate_log: None,
            workbook: None,
            strict: false,
        }
    }
}

/// Reads and merges the inputs without writing anything.
#[instrument(
    level = "info",
    skip_all,
    fields(assignments = %assignments.display(), master = %master.display())
)]
pub fn consolidate(
    assignments: &Path,
    master: &Path,
    options: &ConsolidateOptions,
) -> Result<ConsolidatedDataset> {
    let table = read_assignment_table(assignments)?;
    let master_rows = read_master_table(master)?;
    let gate = match &options.gate_log {
        Some(path) => read_gate_log(path)?,
        None => GateLog::default(),
    };

    let mut warnings = WarningLog::new();
    let outcome = merge(&table, &master_rows, &mut warnings);
    let summary = summarize(&outcome.records, &outcome.spots, options.capacity)?;
    let vehicles = build_registry(&table, &gate.events);
    let locations = locations(&outcome.spots, &table.deleted, &vehicles);

    if options.strict && !warnings.is_empty() {
        return Err(ConsolidationError::StrictWarnings(warnings.len()));
    }

    info!(
        allocated = summary.allocated,
        free = summary.free,
        unknown = summary.unknown,
        capacity = summary.capacity,
        warnings = warnings.len(),
        "consolidation complete"
    );

    Ok(ConsolidatedDataset {
        summary,
        records: outcome.records,
        spots: outcome.spots,
        vehicles,
        events: gate.events,
        locations,
        warnings: warnings.into_inner(),
    })
}

/// Consolidates the inputs and writes the JSON record file, plus the Excel
/// export when one was requested. Nothing is left on disk if any step fails:
/// the export goes first and is removed again if the record file cannot be
/// written.
#[instrument(level = "info", skip_all, fields(output = %output.display()))]
pub fn consolidate_to_file(
    assignments: &Path,
    master: &Path,
    output: &Path,
    options: &ConsolidateOptions,
) -> Result<ConsolidatedDataset> {
    let dataset = consolidate(assignments, master, options)?;

    if let Some(path) = &options.workbook {
        let workbook = build_workbook(&dataset);
        debug!(sheet_count = workbook.tables.len(), "workbook constructed");
        excel_write::write_workbook(path, &workbook)?;
    }

    if let Err(error) = write_json(output, &dataset) {
        if let Some(path) = &options.workbook {
            let _ = fs::remove_file(path);
        }
        return Err(error);
    }
    Ok(dataset)
}
