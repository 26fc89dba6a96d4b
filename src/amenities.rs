// Amenity term normalization and the amenity half of the merge engine
use std::collections::HashSet;

use crate::models::Amenities;

// Normalized key -> display form that replaces whatever a supplier sent
const PREFERRED_TERMS: &[(&str, &str)] = &[
    ("businesscenter", "business center"),
    ("drycleaning", "dry cleaning"),
    ("tub", "bathtub"),
];

// Normalized keys that always belong to the room list
const ROOM_ONLY: &[&str] = &["aircon", "bathtub"];

// Generic term -> specific terms that make it redundant in the general list
const EXCLUDE_IF_SPECIFIC: &[(&str, &[&str])] = &[("pool", &["outdoor pool", "indoor pool"])];

/// Comparison key for an amenity: lower-cased, trimmed and stripped of spaces,
/// so "Business Center" and "business  center" collide.
pub fn normalize_amenity(amenity: &str) -> String {
    amenity.trim().to_lowercase().replace(' ', "")
}

/// Display form stored in merged records.
pub fn preferred_term(amenity: &str) -> String {
    let normalized = normalize_amenity(amenity);
    PREFERRED_TERMS
        .iter()
        .find(|(key, _)| *key == normalized)
        .map_or_else(|| amenity.to_lowercase(), |(_, term)| term.to_string())
}

pub fn is_room_only(normalized: &str) -> bool {
    ROOM_ONLY.contains(&normalized)
}

/// Merge two amenity sets, `existing` entries taking precedence for display form.
///
/// When only one side is present it is returned as-is, without normalization.
pub fn merge_amenities(existing: Option<&Amenities>, incoming: Option<&Amenities>) -> Amenities {
    match (existing, incoming) {
        (None, None) => Amenities::default(),
        (Some(only), None) | (None, Some(only)) => only.clone(),
        (Some(existing), Some(incoming)) => merge_both(existing, incoming),
    }
}

fn merge_both(existing: &Amenities, incoming: &Amenities) -> Amenities {
    let mut room_keys = HashSet::new();
    let mut general_keys = HashSet::new();
    let mut room = Vec::new();
    let mut general = Vec::new();

    for item in existing.room.iter().chain(&incoming.room) {
        if room_keys.insert(normalize_amenity(item)) {
            room.push(preferred_term(item));
        }
    }

    for item in existing.general.iter().chain(&incoming.general) {
        let normalized = normalize_amenity(item);
        if room_keys.contains(&normalized) {
            continue;
        }
        if is_room_only(&normalized) {
            room.push(preferred_term(item));
            room_keys.insert(normalized);
            continue;
        }
        if general_keys.insert(normalized) {
            general.push(preferred_term(item));
        }
    }

    Amenities {
        general: filter_generic_terms(general),
        room,
    }
}

// Drop generic terms (e.g. "pool") when a more specific one is in the same list
fn filter_generic_terms(amenities: Vec<String>) -> Vec<String> {
    let present: HashSet<String> = amenities.iter().map(|a| normalize_amenity(a)).collect();

    let excluded: HashSet<String> = EXCLUDE_IF_SPECIFIC
        .iter()
        .filter(|(_, specifics)| {
            specifics
                .iter()
                .any(|specific| present.contains(&normalize_amenity(specific)))
        })
        .map(|(generic, _)| normalize_amenity(generic))
        .collect();

    if excluded.is_empty() {
        return amenities;
    }

    amenities
        .into_iter()
        .filter(|a| !excluded.contains(&normalize_amenity(a)))
        .collect()
}
