use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::error::{ConsolidationError, Result};
use crate::model::{
    DeletedRow, LocationGroup, OwnershipShare, ParkingAssignment, PlateOriginCount,
    PlateRegistration, SpotState, SpotStatus, Summary, VehicleEntry, VehicleOwnership, Zone,
    ZoneSummary,
};
use crate::normalize::extract_spot_code;
use crate::zone::classify;

/// Number of spots on the site.
pub const DEFAULT_CAPACITY: usize = 80;

/// Computes the aggregates for a merged record set.
///
/// Allocation counts come from the records and free counts from the spot
/// statuses; the two are independent sources. Fails with
/// [`ConsolidationError::CapacityExceeded`] when together they exceed
/// `capacity`.
#[instrument(level = "debug", skip(records, spots))]
pub fn summarize(
    records: &[ParkingAssignment],
    spots: &[SpotStatus],
    capacity: usize,
) -> Result<Summary> {
    let allocated = records.len();
    let free = count_state(spots, SpotState::Free);
    let unknown = count_state(spots, SpotState::Unknown);

    if allocated + free > capacity {
        return Err(ConsolidationError::CapacityExceeded {
            allocated,
            free,
            capacity,
        });
    }

    let zones = Zone::ALL
        .into_iter()
        .filter_map(|zone| {
            let allocated_count = records.iter().filter(|record| record.zone == zone).count();
            let in_zone = |state: SpotState| {
                spots
                    .iter()
                    .filter(|spot| spot.zone == zone && spot.status == state)
                    .count()
            };
            let free_count = in_zone(SpotState::Free);
            let unknown_count = in_zone(SpotState::Unknown);
            if zone == Zone::Unclassified && allocated_count + free_count + unknown_count == 0 {
                return None;
            }
            Some(ZoneSummary {
                zone,
                allocated_count,
                free_count,
                unknown_count,
                percentage_of_total: percentage(allocated_count, allocated),
            })
        })
        .collect();

    let ownership = [VehicleOwnership::Personal, VehicleOwnership::Company]
        .into_iter()
        .map(|ownership| {
            let count = records
                .iter()
                .filter(|record| record.vehicle_ownership == ownership)
                .count();
            OwnershipShare {
                ownership,
                count,
                percentage: percentage(count, allocated),
            }
        })
        .collect();

    let plate_origin = [
        PlateRegistration::Domestic,
        PlateRegistration::Foreign,
        PlateRegistration::Mixed,
    ]
    .into_iter()
    .map(|registration| PlateOriginCount {
        registration,
        count: records
            .iter()
            .filter(|record| record.plate_registration == registration)
            .count(),
    })
    .collect();

    let summary = Summary {
        capacity,
        allocated,
        free,
        unknown,
        utilization_rate: percentage(allocated, capacity),
        zones,
        ownership,
        plate_origin,
    };
    debug!(?summary, "computed summary");
    Ok(summary)
}

/// Groups every spot seen in any input by zone: the spot statuses, the
/// former-employee sheet and the vehicle registry. A spot already known from
/// the statuses keeps that zone; otherwise its location text decides, and a
/// text naming no known area lands in [`Zone::Unclassified`].
pub fn locations(
    spots: &[SpotStatus],
    deleted: &[DeletedRow],
    vehicles: &BTreeMap<String, VehicleEntry>,
) -> BTreeMap<String, LocationGroup> {
    let known: BTreeMap<&str, Zone> = spots
        .iter()
        .map(|spot| (spot.spot_code.as_str(), spot.zone))
        .collect();
    let mut groups: BTreeMap<Zone, Vec<String>> = BTreeMap::new();

    for spot in spots {
        groups.entry(spot.zone).or_default().push(spot.spot_code.clone());
    }

    let texts = deleted
        .iter()
        .map(|row| row.location.as_str())
        .chain(vehicles.values().map(|entry| entry.location.as_str()));
    for text in texts {
        let Some(spot) = extract_spot_code(text) else {
            continue;
        };
        let zone = known
            .get(spot.as_str())
            .copied()
            .or_else(|| classify(text))
            .unwrap_or(Zone::Unclassified);
        groups.entry(zone).or_default().push(spot);
    }

    groups
        .into_iter()
        .map(|(zone, mut spots)| {
            spots.sort();
            spots.dedup();
            (
                zone.key().to_string(),
                LocationGroup {
                    name: zone.display_name().to_string(),
                    spots,
                },
            )
        })
        .collect()
}

fn count_state(spots: &[SpotStatus], state: SpotState) -> usize {
    spots.iter().filter(|spot| spot.status == state).count()
}

/// `part / whole` as a percentage rounded to one decimal; zero when `whole` is.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / whole as f64).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(spot: &str, zone: Zone) -> ParkingAssignment {
        ParkingAssignment {
            employee_name: "Иван Петров".into(),
            spot_code: spot.into(),
            zone,
            vehicle_ownership: VehicleOwnership::Personal,
            plate_registration: PlateRegistration::Domestic,
            is_free: Some(false),
            plates: vec!["CB1234AB".into()],
            location: spot.into(),
        }
    }

    fn spot(code: &str, zone: Zone, status: SpotState) -> SpotStatus {
        SpotStatus {
            spot_code: code.into(),
            zone,
            status,
        }
    }

    #[test]
    fn percentages_round_to_one_decimal() {
        assert_eq!(percentage(19, 53), 35.8);
        assert_eq!(percentage(53, 80), 66.3);
        assert_eq!(percentage(1, 0), 0.0);
    }

    #[test]
    fn zone_allocations_sum_to_record_count() {
        let records = vec![
            record("А1", Zone::Underground),
            record("А2", Zone::Underground),
            record("В1", Zone::Depot),
            record("Х1", Zone::Unclassified),
        ];
        let spots = vec![spot("А3", Zone::Underground, SpotState::Free)];

        let summary = summarize(&records, &spots, 10).expect("within capacity");

        let total: usize = summary.zones.iter().map(|zone| zone.allocated_count).sum();
        assert_eq!(total, records.len());
        assert_eq!(summary.zone(Zone::Unclassified).map(|z| z.allocated_count), Some(1));
        assert_eq!(summary.zone(Zone::Underground).map(|z| z.free_count), Some(1));
    }

    #[test]
    fn unclassified_row_is_omitted_when_empty() {
        let summary = summarize(&[record("А1", Zone::Covered)], &[], 10).expect("summary");
        assert!(summary.zone(Zone::Unclassified).is_none());
        assert_eq!(summary.zones.len(), Zone::ALL.len() - 1);
    }

    #[test]
    fn capacity_is_enforced() {
        let records = vec![record("А1", Zone::Covered), record("А2", Zone::Covered)];
        let spots = vec![spot("А3", Zone::Covered, SpotState::Free)];

        let error = summarize(&records, &spots, 2).expect_err("over capacity");
        assert!(matches!(
            error,
            ConsolidationError::CapacityExceeded {
                allocated: 2,
                free: 1,
                capacity: 2
            }
        ));
    }

    #[test]
    fn locations_cover_former_employees_and_unzoned_vehicles() {
        let spots = vec![spot("А1", Zone::Underground, SpotState::Occupied)];
        let deleted = vec![
            DeletedRow {
                row: 2,
                registration: "CB1234AB".into(),
                name: "Иван Петров".into(),
                location: "В7 - Депо".into(),
            },
            DeletedRow {
                row: 3,
                registration: String::new(),
                name: "Мария Иванова".into(),
                location: "A1".into(),
            },
        ];
        let mut vehicles = BTreeMap::new();
        vehicles.insert(
            "PB2222BB".to_string(),
            VehicleEntry {
                name: "Петър Иванов".into(),
                active_employee: false,
                location: "Ж2".into(),
            },
        );

        let index = locations(&spots, &deleted, &vehicles);

        assert_eq!(index["underground"].spots, vec!["А1".to_string()]);
        assert_eq!(index["depot"].spots, vec!["В7".to_string()]);
        assert_eq!(index["depot"].name, "Депо");
        assert_eq!(index["unclassified"].spots, vec!["Ж2".to_string()]);
    }
}
