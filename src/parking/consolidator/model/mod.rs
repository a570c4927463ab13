use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical spot identifier: a Cyrillic sector letter followed by the spot
/// number, e.g. `А26`.
pub type SpotCode = String;

/// Normalized licence plate using Latin letters, e.g. `CB5347HX`.
pub type Plate = String;

/// Named physical parking area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Underground,
    Covered,
    EnglishYardSmall,
    EnglishYardLarge,
    PrintingArea,
    Depot,
    EntranceAlley,
    /// Bucket for zone texts that match none of the known areas.
    Unclassified,
}

impl Zone {
    /// Every zone in reporting order.
    pub const ALL: [Zone; 8] = [
        Zone::Underground,
        Zone::Covered,
        Zone::EnglishYardSmall,
        Zone::EnglishYardLarge,
        Zone::PrintingArea,
        Zone::Depot,
        Zone::EntranceAlley,
        Zone::Unclassified,
    ];

    /// Stable key used in the JSON output.
    pub fn key(self) -> &'static str {
        match self {
            Zone::Underground => "underground",
            Zone::Covered => "covered",
            Zone::EnglishYardSmall => "english_yard_small",
            Zone::EnglishYardLarge => "english_yard_large",
            Zone::PrintingArea => "printing_area",
            Zone::Depot => "depot",
            Zone::EntranceAlley => "entrance_alley",
            Zone::Unclassified => "unclassified",
        }
    }

    /// Name of the area as it appears on the site signage.
    pub fn display_name(self) -> &'static str {
        match self {
            Zone::Underground => "Подземен",
            Zone::Covered => "Покрит паркинг",
            Zone::EnglishYardSmall => "Малък английски двор",
            Zone::EnglishYardLarge => "Голям английски двор",
            Zone::PrintingArea => "Паркинг печатница",
            Zone::Depot => "Депо",
            Zone::EntranceAlley => "Входна алея",
            Zone::Unclassified => "Некласифицирани",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleOwnership {
    Personal,
    Company,
}

impl fmt::Display for VehicleOwnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleOwnership::Personal => f.write_str("personal"),
            VehicleOwnership::Company => f.write_str("company"),
        }
    }
}

/// Origin of the plates registered for an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateRegistration {
    Domestic,
    Foreign,
    /// The holder has used both domestic and foreign plates.
    Mixed,
}

impl fmt::Display for PlateRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlateRegistration::Domestic => f.write_str("domestic"),
            PlateRegistration::Foreign => f.write_str("foreign"),
            PlateRegistration::Mixed => f.write_str("mixed"),
        }
    }
}

/// One employee holding one spot. Records are unique by `spot_code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingAssignment {
    pub employee_name: String,
    pub spot_code: SpotCode,
    pub zone: Zone,
    pub vehicle_ownership: VehicleOwnership,
    pub plate_registration: PlateRegistration,
    /// Reconciled "Free" marker. Absent markers on assigned spots resolve to
    /// `Some(false)`.
    pub is_free: Option<bool>,
    pub plates: Vec<Plate>,
    /// Location text as written in the source sheet, whitespace-normalized.
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotState {
    Occupied,
    Free,
    /// No marker and no assignment: the sources do not say.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotStatus {
    pub spot_code: SpotCode,
    pub zone: Zone,
    pub status: SpotState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub zone: Zone,
    pub allocated_count: usize,
    pub free_count: usize,
    pub unknown_count: usize,
    /// Share of all assignments held in this zone, rounded to one decimal.
    pub percentage_of_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipShare {
    pub ownership: VehicleOwnership,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateOriginCount {
    pub registration: PlateRegistration,
    pub count: usize,
}

/// Aggregates computed over a consolidated record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub capacity: usize,
    pub allocated: usize,
    pub free: usize,
    pub unknown: usize,
    /// Allocated spots as a percentage of capacity.
    pub utilization_rate: f64,
    pub zones: Vec<ZoneSummary>,
    pub ownership: Vec<OwnershipShare>,
    pub plate_origin: Vec<PlateOriginCount>,
}

impl Summary {
    /// Looks up the summary row of a zone.
    pub fn zone(&self, zone: Zone) -> Option<&ZoneSummary> {
        self.zones.iter().find(|summary| summary.zone == zone)
    }
}

/// Entry of the vehicle registry, keyed by normalized plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleEntry {
    pub name: String,
    pub active_employee: bool,
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Enter,
    Exit,
    Unknown,
}

/// Barrier event read from the gate log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateEvent {
    pub timestamp: i64,
    pub datetime: String,
    pub direction: Direction,
    pub plate: Plate,
}

/// Spots seen in one zone, with the zone's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationGroup {
    pub name: String,
    pub spots: Vec<SpotCode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    RowDropped,
    RowIncomplete,
    UnclassifiedZone,
    DuplicateSpot,
    FreeMarkerConflict,
}

/// Recoverable data-quality problem found while consolidating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityWarning {
    pub kind: WarningKind,
    pub sheet: String,
    /// 1-based spreadsheet row, when the problem belongs to a row.
    pub row: Option<usize>,
    pub message: String,
}

/// Everything a run emits. Serialized as the output record file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedDataset {
    pub summary: Summary,
    pub records: Vec<ParkingAssignment>,
    pub spots: Vec<SpotStatus>,
    pub vehicles: BTreeMap<Plate, VehicleEntry>,
    pub events: Vec<GateEvent>,
    pub locations: BTreeMap<String, LocationGroup>,
    pub warnings: Vec<QualityWarning>,
}

/// Row of the active-assignment sheet, trimmed but otherwise raw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentRow {
    pub row: usize,
    pub registration: String,
    pub name: String,
    pub location: String,
    pub ownership: String,
    /// Location of a free spot listed on the same row, if any.
    pub free_location: String,
}

/// Row of the former-employee sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeletedRow {
    pub row: usize,
    pub registration: String,
    pub name: String,
    pub location: String,
}

/// Contents of the assignment workbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentTable {
    pub active: Vec<AssignmentRow>,
    pub deleted: Vec<DeletedRow>,
}

/// Row of the master parking table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterRow {
    pub row: usize,
    pub spot: String,
    pub zone: String,
    pub free: String,
}
