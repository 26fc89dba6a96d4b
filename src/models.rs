// Canonical hotel model shared by suppliers, the merge engine and the repository
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Location {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ImageItem {
    pub url: String,
    pub description: Option<String>,
}

impl ImageItem {
    pub fn new(url: impl Into<String>, description: Option<String>) -> Self {
        Self {
            url: url.into(),
            description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Images {
    pub rooms: Vec<ImageItem>,
    pub site: Vec<ImageItem>,
    pub amenities: Vec<ImageItem>,
}

// `general` and `room` are kept disjoint by the merge engine
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Amenities {
    pub general: Vec<String>,
    pub room: Vec<String>,
}

/// A hotel in supplier-independent form.
///
/// `id` is the key shared across suppliers. Every other field may be partial;
/// an empty string means the supplier had nothing to say about it.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Hotel {
    pub id: String,
    pub destination_id: String,
    pub name: String,
    pub location: Option<Location>,
    pub description: String,
    pub amenities: Option<Amenities>,
    pub images: Images,
    pub booking_conditions: Vec<String>,
}

impl Hotel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}
