//! Text normalization for sector codes, plates, names and markers.
//!
//! Source sheets are typed by hand and freely mix Cyrillic and Latin letters
//! that look the same. Sector letters are folded to Cyrillic, plates to
//! Latin, so that `A26`/`А26` and `СВ5347НХ`/`CB5347HX` compare equal.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::model::{Plate, PlateRegistration, SpotCode, VehicleOwnership};

/// Latin capitals with a Cyrillic twin, paired with that twin.
const HOMOGLYPHS: [(char, char); 12] = [
    ('A', 'А'),
    ('B', 'В'),
    ('C', 'С'),
    ('E', 'Е'),
    ('H', 'Н'),
    ('K', 'К'),
    ('M', 'М'),
    ('O', 'О'),
    ('P', 'Р'),
    ('T', 'Т'),
    ('X', 'Х'),
    ('Y', 'У'),
];

static SPOT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\p{L})\s?-?\s?(\d{1,4})\b").expect("valid spot pattern"));

static DOMESTIC_PLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ABEKMHOPCTYX]{1,2}\d{4}[ABEKMHOPCTYX]{1,2}$").expect("valid plate pattern")
});

const FREE_MARKERS: [&str; 8] = ["да", "yes", "y", "free", "свободно", "свободен", "1", "true"];
const TAKEN_MARKERS: [&str; 9] = ["не", "no", "n", "зает", "заето", "taken", "occupied", "0", "false"];

/// Folds a sector letter to its Cyrillic form.
pub fn canonical_sector_letter(letter: char) -> char {
    let upper = letter.to_uppercase().next().unwrap_or(letter);
    HOMOGLYPHS
        .iter()
        .find(|(latin, _)| *latin == upper)
        .map(|(_, cyrillic)| *cyrillic)
        .unwrap_or(upper)
}

fn latin_plate_letter(letter: char) -> char {
    let upper = letter.to_uppercase().next().unwrap_or(letter);
    HOMOGLYPHS
        .iter()
        .find(|(_, cyrillic)| *cyrillic == upper)
        .map(|(latin, _)| *latin)
        .unwrap_or(upper)
}

fn spot_from_captures(captures: &Captures<'_>) -> Option<SpotCode> {
    let letter = captures.get(1)?.as_str().chars().next()?;
    let number: u32 = captures.get(2)?.as_str().parse().ok()?;
    Some(format!("{}{number}", canonical_sector_letter(letter)))
}

/// Extracts the first spot code from a location text such as
/// `"A26 - МАЛЪК АНГЛИЙСКИ ДВОР"`, returning it in canonical form (`А26`).
pub fn extract_spot_code(text: &str) -> Option<SpotCode> {
    SPOT_PATTERN
        .captures_iter(text)
        .find_map(|captures| spot_from_captures(&captures))
}

/// Collapses whitespace and rewrites every embedded spot code canonically.
pub fn normalize_location(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    SPOT_PATTERN
        .replace_all(&collapsed, |captures: &Captures<'_>| {
            spot_from_captures(captures).unwrap_or_else(|| captures[0].to_string())
        })
        .into_owned()
}

/// Trims and collapses inner runs of whitespace to one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a person name for grouping and lookups.
pub fn normalize_name(text: &str) -> String {
    collapse_whitespace(text)
}

/// Folds a plate to upper-case Latin letters without separators.
pub fn normalize_plate(text: &str) -> Plate {
    text.chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-')
        .map(latin_plate_letter)
        .collect()
}

/// Splits a registration cell that may hold several plates (`CB1234AB / W-123`).
pub fn split_registrations(text: &str) -> Vec<Plate> {
    let mut plates: Vec<Plate> = Vec::new();
    for part in text.split(['/', ',', ';']) {
        let trimmed = part.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            continue;
        }
        let plate = normalize_plate(trimmed);
        if !plate.is_empty() && !plates.contains(&plate) {
            plates.push(plate);
        }
    }
    plates
}

/// Whether a normalized plate follows the Bulgarian format.
pub fn is_domestic_plate(plate: &str) -> bool {
    DOMESTIC_PLATE.is_match(plate)
}

/// Classifies a plate set. `None` when there are no plates.
pub fn plate_registration(plates: &[Plate]) -> Option<PlateRegistration> {
    let domestic = plates.iter().filter(|plate| is_domestic_plate(plate)).count();
    match (domestic, plates.len() - domestic) {
        (0, 0) => None,
        (_, 0) => Some(PlateRegistration::Domestic),
        (0, _) => Some(PlateRegistration::Foreign),
        _ => Some(PlateRegistration::Mixed),
    }
}

pub fn vehicle_ownership(text: &str) -> VehicleOwnership {
    let lower = text.to_lowercase();
    if ["служеб", "фирм", "company", "corporate"]
        .iter()
        .any(|keyword| lower.contains(keyword))
    {
        VehicleOwnership::Company
    } else {
        VehicleOwnership::Personal
    }
}

/// Reads a "Free" marker cell. Blank or unrecognized text yields `None`.
pub fn parse_free_marker(text: &str) -> Option<bool> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        None
    } else if FREE_MARKERS.contains(&lower.as_str()) || lower == "x" {
        Some(true)
    } else if TAKEN_MARKERS.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}
