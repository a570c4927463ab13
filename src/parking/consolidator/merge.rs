//! Aligns the assignment table with the master parking table.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument};

use crate::io::assignments::ACTIVE_SHEET;
use crate::model::{
    AssignmentTable, MasterRow, ParkingAssignment, PlateRegistration, SpotCode, SpotState,
    SpotStatus, WarningKind, Zone,
};
use crate::normalize::{
    extract_spot_code, normalize_location, normalize_name, parse_free_marker, plate_registration,
    split_registrations, vehicle_ownership,
};
use crate::quality::WarningLog;
use crate::registry::UNKNOWN_NAME;
use crate::zone::classify;

/// Sheet label used in warnings about the master table.
pub const MASTER_SHEET: &str = "master";

/// Result of aligning the two tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// One assignment per spot, ordered by spot code.
    pub records: Vec<ParkingAssignment>,
    /// Status of every spot either table mentions, ordered by spot code.
    pub spots: Vec<SpotStatus>,
}

#[derive(Debug, Clone, Copy)]
struct MasterSpot {
    zone: Zone,
    free: Option<bool>,
}

/// Merges assignments with the master table.
///
/// Records are unique by spot code; the first row claiming a spot wins. A
/// spot with no "Free" marker is occupied only when someone is assigned to
/// it; otherwise its status is unknown. Zone texts that match no known area
/// land in [`Zone::Unclassified`] with a warning.
#[instrument(level = "info", skip_all)]
pub fn merge(
    table: &AssignmentTable,
    master: &[MasterRow],
    warnings: &mut WarningLog,
) -> MergeOutcome {
    let master_spots = index_master(master, warnings);
    let listed_free = collect_listed_free(table, &master_spots, warnings);

    let mut records: BTreeMap<SpotCode, ParkingAssignment> = BTreeMap::new();
    let mut unassigned: BTreeMap<SpotCode, Zone> = BTreeMap::new();

    for row in &table.active {
        let name = normalize_name(&row.name);
        let plates = split_registrations(&row.registration);
        let has_identity = !name.is_empty() || !plates.is_empty();
        let spot = extract_spot_code(&row.location);

        let Some(spot) = spot else {
            if has_identity {
                warnings.record(
                    WarningKind::RowIncomplete,
                    ACTIVE_SHEET,
                    Some(row.row),
                    format!("no spot code in location '{}'; not assigned", row.location),
                );
            } else if row.free_location.is_empty() {
                warnings.record(
                    WarningKind::RowDropped,
                    ACTIVE_SHEET,
                    Some(row.row),
                    "row has neither an employee/vehicle nor a spot",
                );
            }
            continue;
        };

        let zone = resolve_zone(&row.location, &spot, &master_spots, row.row, warnings);

        if !has_identity {
            warnings.record(
                WarningKind::RowIncomplete,
                ACTIVE_SHEET,
                Some(row.row),
                format!("spot {spot} listed without an employee or vehicle"),
            );
            unassigned.entry(spot).or_insert(zone);
            continue;
        }

        if records.contains_key(&spot) {
            warnings.record(
                WarningKind::DuplicateSpot,
                ACTIVE_SHEET,
                Some(row.row),
                format!("spot {spot} already assigned; keeping the first assignment"),
            );
            continue;
        }

        let marker = master_spots
            .get(&spot)
            .and_then(|entry| entry.free)
            .or_else(|| listed_free.contains_key(&spot).then_some(true));
        if marker == Some(true) {
            warnings.record(
                WarningKind::FreeMarkerConflict,
                ACTIVE_SHEET,
                Some(row.row),
                format!("spot {spot} is marked free but assigned to '{name}'"),
            );
        }

        let plate_registration = plate_registration(&plates).unwrap_or_else(|| {
            warnings.record(
                WarningKind::RowIncomplete,
                ACTIVE_SHEET,
                Some(row.row),
                format!("no plate registered for spot {spot}; assuming domestic"),
            );
            PlateRegistration::Domestic
        });

        let employee_name = if name.is_empty() {
            UNKNOWN_NAME.to_string()
        } else {
            name
        };

        records.insert(
            spot.clone(),
            ParkingAssignment {
                employee_name,
                spot_code: spot,
                zone,
                vehicle_ownership: vehicle_ownership(&row.ownership),
                plate_registration,
                is_free: Some(marker.unwrap_or(false)),
                plates,
                location: normalize_location(&row.location),
            },
        );
    }

    let spots = spot_statuses(&records, &master_spots, &listed_free, &unassigned, warnings);
    info!(
        records = records.len(),
        spots = spots.len(),
        "merged assignments with master table"
    );

    MergeOutcome {
        records: records.into_values().collect(),
        spots,
    }
}

fn index_master(
    master: &[MasterRow],
    warnings: &mut WarningLog,
) -> BTreeMap<SpotCode, MasterSpot> {
    let mut spots: BTreeMap<SpotCode, MasterSpot> = BTreeMap::new();

    for row in master {
        let Some(spot) = extract_spot_code(&row.spot) else {
            warnings.record(
                WarningKind::RowDropped,
                MASTER_SHEET,
                Some(row.row),
                format!("no spot code in '{}'", row.spot),
            );
            continue;
        };

        if spots.contains_key(&spot) {
            warnings.record(
                WarningKind::DuplicateSpot,
                MASTER_SHEET,
                Some(row.row),
                format!("spot {spot} listed more than once; keeping the first row"),
            );
            continue;
        }

        let zone = classify(&row.zone)
            .or_else(|| classify(&row.spot))
            .unwrap_or_else(|| {
                if row.zone.is_empty() {
                    warnings.record(
                        WarningKind::RowIncomplete,
                        MASTER_SHEET,
                        Some(row.row),
                        format!("no zone given for spot {spot}"),
                    );
                } else {
                    warnings.record(
                        WarningKind::UnclassifiedZone,
                        MASTER_SHEET,
                        Some(row.row),
                        format!("unrecognized zone '{}' for spot {spot}", row.zone),
                    );
                }
                Zone::Unclassified
            });

        let free = parse_free_marker(&row.free);
        if free.is_none() && !row.free.is_empty() {
            debug!(
                row = row.row,
                marker = %row.free,
                "unrecognized free marker; treating as absent"
            );
        }

        spots.insert(spot, MasterSpot { zone, free });
    }

    spots
}

/// Free spots named in the active sheet's "Free" column. These form a table of
/// their own and are not reconciled arithmetically with the assignments.
fn collect_listed_free(
    table: &AssignmentTable,
    master_spots: &BTreeMap<SpotCode, MasterSpot>,
    warnings: &mut WarningLog,
) -> BTreeMap<SpotCode, Zone> {
    let mut listed: BTreeMap<SpotCode, Zone> = BTreeMap::new();

    for row in table.active.iter().filter(|row| !row.free_location.is_empty()) {
        let Some(spot) = extract_spot_code(&row.free_location) else {
            warnings.record(
                WarningKind::RowIncomplete,
                ACTIVE_SHEET,
                Some(row.row),
                format!("no spot code in free location '{}'", row.free_location),
            );
            continue;
        };
        if listed.contains_key(&spot) {
            continue;
        }
        let zone = resolve_zone(&row.free_location, &spot, master_spots, row.row, warnings);
        listed.insert(spot, zone);
    }

    listed
}

/// Zone from the location text, else from the master table, else unclassified.
fn resolve_zone(
    location: &str,
    spot: &str,
    master_spots: &BTreeMap<SpotCode, MasterSpot>,
    row: usize,
    warnings: &mut WarningLog,
) -> Zone {
    if let Some(zone) = classify(location) {
        return zone;
    }
    match master_spots.get(spot) {
        Some(entry) => entry.zone,
        None => {
            warnings.record(
                WarningKind::UnclassifiedZone,
                ACTIVE_SHEET,
                Some(row),
                format!("unrecognized zone in '{location}' for spot {spot}"),
            );
            Zone::Unclassified
        }
    }
}

fn spot_statuses(
    records: &BTreeMap<SpotCode, ParkingAssignment>,
    master_spots: &BTreeMap<SpotCode, MasterSpot>,
    listed_free: &BTreeMap<SpotCode, Zone>,
    unassigned: &BTreeMap<SpotCode, Zone>,
    warnings: &mut WarningLog,
) -> Vec<SpotStatus> {
    let mut statuses: BTreeMap<SpotCode, SpotStatus> = BTreeMap::new();

    for (spot, entry) in master_spots {
        let status = match (records.contains_key(spot), entry.free) {
            (true, _) => SpotState::Occupied,
            (false, Some(true)) => SpotState::Free,
            (false, None) if listed_free.contains_key(spot) => SpotState::Free,
            (false, Some(false)) => {
                warnings.record(
                    WarningKind::RowIncomplete,
                    MASTER_SHEET,
                    None,
                    format!("spot {spot} is marked taken but nobody is assigned to it"),
                );
                SpotState::Unknown
            }
            (false, None) => SpotState::Unknown,
        };
        statuses.insert(
            spot.clone(),
            SpotStatus {
                spot_code: spot.clone(),
                zone: entry.zone,
                status,
            },
        );
    }

    for (spot, record) in records {
        statuses.insert(
            spot.clone(),
            SpotStatus {
                spot_code: spot.clone(),
                zone: record.zone,
                status: SpotState::Occupied,
            },
        );
    }

    for (spot, zone) in listed_free {
        statuses.entry(spot.clone()).or_insert_with(|| SpotStatus {
            spot_code: spot.clone(),
            zone: *zone,
            status: SpotState::Free,
        });
    }

    for (spot, zone) in unassigned {
        statuses.entry(spot.clone()).or_insert_with(|| SpotStatus {
            spot_code: spot.clone(),
            zone: *zone,
            status: SpotState::Unknown,
        });
    }

    statuses.into_values().collect()
}
