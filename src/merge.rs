// Merge engine: reconciles two partial views of the same hotel into one record
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::amenities::merge_amenities;
use crate::models::{Hotel, ImageItem, Images, Location};

/// Strategy used by the repository when a hotel id is seen more than once.
///
/// Callers guarantee that `existing.id == incoming.id`; implementations do not
/// check it.
pub trait MergeStrategy {
    fn merge(&self, existing: &Hotel, incoming: &Hotel) -> Hotel;
}

// Last supplier with data wins for scalars, collections are unioned
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMergeStrategy;

impl DefaultMergeStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl MergeStrategy for DefaultMergeStrategy {
    fn merge(&self, existing: &Hotel, incoming: &Hotel) -> Hotel {
        debug!(hotel_id = %existing.id, "merging hotel records");

        Hotel {
            id: existing.id.clone(),
            destination_id: merge_value(&existing.destination_id, &incoming.destination_id),
            name: merge_value(&existing.name, &incoming.name),
            location: merge_location(existing.location.as_ref(), incoming.location.as_ref()),
            description: merge_value(&existing.description, &incoming.description),
            amenities: Some(merge_amenities(
                existing.amenities.as_ref(),
                incoming.amenities.as_ref(),
            )),
            images: merge_images(&existing.images, &incoming.images),
            booking_conditions: merge_booking_conditions(
                &existing.booking_conditions,
                &incoming.booking_conditions,
            ),
        }
    }
}

// Empty string counts as "no data"
pub fn merge_value(existing: &str, incoming: &str) -> String {
    if incoming.is_empty() {
        existing.to_string()
    } else {
        incoming.to_string()
    }
}

pub fn merge_location(existing: Option<&Location>, incoming: Option<&Location>) -> Option<Location> {
    let (existing, incoming) = match (existing, incoming) {
        (None, None) => return None,
        (Some(only), None) | (None, Some(only)) => return Some(only.clone()),
        (Some(existing), Some(incoming)) => (existing, incoming),
    };

    Some(Location {
        lat: incoming.lat.or(existing.lat),
        lng: incoming.lng.or(existing.lng),
        address: merge_value(&existing.address, &incoming.address),
        city: merge_value(&existing.city, &incoming.city),
        country: merge_value(&existing.country, &incoming.country),
    })
}

pub fn merge_images(existing: &Images, incoming: &Images) -> Images {
    Images {
        rooms: merge_image_list(&existing.rooms, &incoming.rooms),
        site: merge_image_list(&existing.site, &incoming.site),
        amenities: merge_image_list(&existing.amenities, &incoming.amenities),
    }
}

/// One entry per URL. A later duplicate replaces the earlier entry in place, so
/// the incoming description wins while the first position is kept.
pub fn merge_image_list(existing: &[ImageItem], incoming: &[ImageItem]) -> Vec<ImageItem> {
    let mut merged: Vec<ImageItem> = Vec::with_capacity(existing.len() + incoming.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for image in existing.iter().chain(incoming) {
        match positions.get(image.url.as_str()) {
            Some(&pos) => merged[pos] = image.clone(),
            None => {
                positions.insert(image.url.as_str(), merged.len());
                merged.push(image.clone());
            }
        }
    }

    merged
}

pub fn merge_booking_conditions(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    existing
        .iter()
        .chain(incoming)
        .filter(|condition| seen.insert(condition.as_str()))
        .cloned()
        .collect()
}
