//! Vehicle registry: who a plate belongs to and where they park.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info, instrument};

use crate::model::{AssignmentTable, GateEvent, Plate, VehicleEntry};
use crate::normalize::{normalize_location, normalize_name, split_registrations};

/// Name given to plates that no sheet accounts for.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Builds the plate registry from both assignment sheets and the gate log.
///
/// Active plates carry their location. Plates found only among former
/// employees are inactive; their location is then recovered by employee name,
/// and failing that by plate, from either sheet. Gate plates nobody claims are
/// registered as unknown.
#[instrument(level = "debug", skip_all)]
pub fn build_registry(
    table: &AssignmentTable,
    events: &[GateEvent],
) -> BTreeMap<Plate, VehicleEntry> {
    let mut registry: BTreeMap<Plate, VehicleEntry> = BTreeMap::new();
    let mut active_plates: HashSet<Plate> = HashSet::new();

    for row in &table.active {
        let name = display_name(&row.name);
        let location = normalize_location(&row.location);
        for plate in split_registrations(&row.registration) {
            active_plates.insert(plate.clone());
            registry.insert(
                plate,
                VehicleEntry {
                    name: name.clone(),
                    active_employee: true,
                    location: location.clone(),
                },
            );
        }
    }

    for row in &table.deleted {
        let name = display_name(&row.name);
        for plate in split_registrations(&row.registration) {
            if !active_plates.contains(&plate) {
                registry.insert(
                    plate,
                    VehicleEntry {
                        name: name.clone(),
                        active_employee: false,
                        location: String::new(),
                    },
                );
            }
        }
    }

    let recovered = recover_locations(table, &mut registry);
    debug!(recovered, "recovered locations of inactive vehicles");

    let mut unknown = 0usize;
    for event in events {
        registry.entry(event.plate.clone()).or_insert_with(|| {
            unknown += 1;
            VehicleEntry {
                name: UNKNOWN_NAME.to_string(),
                active_employee: false,
                location: String::new(),
            }
        });
    }

    info!(
        vehicles = registry.len(),
        active = active_plates.len(),
        unknown,
        "vehicle registry built"
    );
    registry
}

fn display_name(raw: &str) -> String {
    let name = normalize_name(raw);
    if name.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        name
    }
}

/// Fills empty locations of inactive vehicles. Active-sheet entries take
/// precedence over former-employee entries for the same key.
fn recover_locations(
    table: &AssignmentTable,
    registry: &mut BTreeMap<Plate, VehicleEntry>,
) -> usize {
    let mut lookup: HashMap<String, String> = HashMap::new();

    let active = table
        .active
        .iter()
        .map(|row| (&row.registration, &row.name, &row.location));
    let deleted = table
        .deleted
        .iter()
        .map(|row| (&row.registration, &row.name, &row.location));

    for (registration, name, location) in active.chain(deleted) {
        let name = normalize_name(name);
        let location = normalize_location(location);
        if name.is_empty() || location.is_empty() {
            continue;
        }
        for plate in split_registrations(registration) {
            lookup.entry(plate).or_insert_with(|| location.clone());
        }
        lookup.entry(name).or_insert(location);
    }

    let mut recovered = 0;
    for (plate, entry) in registry.iter_mut() {
        if entry.active_employee || !entry.location.is_empty() {
            continue;
        }
        let found = lookup.get(&entry.name).or_else(|| lookup.get(plate));
        if let Some(location) = found {
            debug!(%plate, name = %entry.name, %location, "recovered vehicle location");
            entry.location = location.clone();
            recovered += 1;
        }
    }
    recovered
}
