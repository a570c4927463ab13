use crate::model::Zone;

/// Keyword table checked in order; the first zone whose keyword occurs in the
/// lower-cased text wins.
const ZONE_KEYWORDS: [(Zone, &[&str]); 7] = [
    (Zone::Underground, &["подземен", "underground"]),
    (Zone::PrintingArea, &["печатница", "print"]),
    (Zone::Covered, &["покрит", "covered"]),
    (
        Zone::EnglishYardSmall,
        &["малък англ", "small english", "small yard", "small courtyard"],
    ),
    (
        Zone::EnglishYardLarge,
        &["голям англ", "large english", "large yard", "large courtyard"],
    ),
    (Zone::Depot, &["депо", "depot"]),
    (Zone::EntranceAlley, &["алея", "вход", "alley", "entrance"]),
];

/// Maps a zone or location text to a known zone.
///
/// Returns `None` when nothing matches; callers decide whether that means
/// "look elsewhere" or [`Zone::Unclassified`].
pub fn classify(text: &str) -> Option<Zone> {
    let lower = text.to_lowercase();
    if lower.trim().is_empty() {
        return None;
    }
    ZONE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(zone, _)| *zone)
        .or_else(|| classify_key(&lower))
}

/// Accepts the output keys themselves (`english_yard_small`), so a
/// previously emitted file can be fed back as a master table.
fn classify_key(lower: &str) -> Option<Zone> {
    let key = lower.trim().replace([' ', '-'], "_");
    Zone::ALL
        .into_iter()
        .filter(|zone| *zone != Zone::Unclassified)
        .find(|zone| zone.key() == key)
}
