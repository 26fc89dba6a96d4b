use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::models::{Amenities, Hotel, ImageItem, Images, Location};

// Error types for supplier retrieval
#[derive(Error, Debug)]
pub enum SupplierError {
    #[error("Network error from {supplier}: {source}")]
    NetworkError {
        supplier: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected status {status} from {supplier}")]
    StatusError { supplier: &'static str, status: u16 },

    #[error("JSON parse error from {supplier}: {message}")]
    JsonParseError {
        supplier: &'static str,
        message: String,
    },
}

/// A hotel data source with its own record shape.
///
/// `parse_hotel` never fails: fields it cannot find or read become empty
/// strings, empty lists or `None`.
#[async_trait]
pub trait Supplier: Send + Sync {
    fn name(&self) -> &'static str;

    fn endpoint(&self) -> &str;

    fn parse_hotel(&self, raw: Value) -> Hotel;

    // Fetch the raw records as a JSON array
    async fn fetch_hotels(&self, client: &reqwest::Client) -> Result<Vec<Value>, SupplierError> {
        let supplier = self.name();
        debug!(supplier, endpoint = self.endpoint(), "fetching hotels");

        let response = client
            .get(self.endpoint())
            .send()
            .await
            .map_err(|source| SupplierError::NetworkError { supplier, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SupplierError::StatusError {
                supplier,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| SupplierError::NetworkError { supplier, source })?;

        serde_json::from_str(&body).map_err(|e| SupplierError::JsonParseError {
            supplier,
            message: e.to_string(),
        })
    }
}

// The three suppliers in their fetch order
pub fn suppliers_from_config(config: &AppConfig) -> Vec<Box<dyn Supplier>> {
    vec![
        Box::new(AcmeSupplier::new(config.acme_url.clone())),
        Box::new(PatagoniaSupplier::new(config.patagonia_url.clone())),
        Box::new(PaperfliesSupplier::new(config.paperflies_url.clone())),
    ]
}

fn decode_record<T>(supplier: &'static str, raw: Value) -> T
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_value(raw) {
        Ok(record) => record,
        Err(e) => {
            warn!(supplier, error = %e, "unreadable record, using empty defaults");
            T::default()
        }
    }
}

// Strings, numbers and null all become a trimmed string
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    })
}

// Numbers and numeric strings; anything else is absent
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite()))
}

// Captions and descriptions: strings are kept, anything else is absent
fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

// Nested objects and lists that are null or malformed fall back to their default
fn lenient_nested<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(error = %e, "unreadable nested field, using empty default");
        T::default()
    }))
}

// Lists decoded item by item, so one bad entry only drops itself
fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!(value = %other, "expected a list, using empty default");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(error = %e, "unreadable list item, skipping");
                None
            }
        })
        .collect())
}

fn images_from<I>(items: I) -> Vec<ImageItem>
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    items
        .into_iter()
        .filter(|(url, _)| !url.is_empty())
        .map(|(url, description)| ImageItem::new(url, description))
        .collect()
}

// Acme: flat PascalCase records, no images or booking conditions

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AcmeHotel {
    #[serde(deserialize_with = "lenient_string")]
    id: String,
    #[serde(deserialize_with = "lenient_string")]
    destination_id: String,
    #[serde(deserialize_with = "lenient_string")]
    name: String,
    #[serde(deserialize_with = "lenient_f64")]
    latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    longitude: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    address: String,
    #[serde(deserialize_with = "lenient_string")]
    city: String,
    #[serde(deserialize_with = "lenient_string")]
    country: String,
    #[serde(deserialize_with = "lenient_string")]
    description: String,
    #[serde(deserialize_with = "lenient_list")]
    facilities: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AcmeSupplier {
    endpoint: String,
}

impl AcmeSupplier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Supplier for AcmeSupplier {
    fn name(&self) -> &'static str {
        "acme"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn parse_hotel(&self, raw: Value) -> Hotel {
        let record: AcmeHotel = decode_record(self.name(), raw);

        Hotel {
            id: record.id,
            destination_id: record.destination_id,
            name: record.name,
            location: Some(Location {
                lat: record.latitude,
                lng: record.longitude,
                address: record.address,
                city: record.city,
                country: record.country,
            }),
            description: record.description,
            amenities: Some(Amenities {
                general: record
                    .facilities
                    .iter()
                    .map(|f| f.trim().to_string())
                    .collect(),
                room: Vec::new(),
            }),
            images: Images::default(),
            booking_conditions: Vec::new(),
        }
    }
}

// Patagonia: coordinates, one amenity list, room and amenity images

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PatagoniaHotel {
    #[serde(deserialize_with = "lenient_string")]
    id: String,
    #[serde(deserialize_with = "lenient_string")]
    destination: String,
    #[serde(deserialize_with = "lenient_string")]
    name: String,
    #[serde(deserialize_with = "lenient_f64")]
    lat: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    lng: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    address: String,
    #[serde(deserialize_with = "lenient_string")]
    info: String,
    #[serde(deserialize_with = "lenient_list")]
    amenities: Vec<String>,
    #[serde(deserialize_with = "lenient_nested")]
    images: PatagoniaImages,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PatagoniaImages {
    #[serde(deserialize_with = "lenient_items")]
    rooms: Vec<PatagoniaImage>,
    #[serde(deserialize_with = "lenient_items")]
    amenities: Vec<PatagoniaImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PatagoniaImage {
    #[serde(deserialize_with = "lenient_string")]
    url: String,
    #[serde(deserialize_with = "lenient_optional_string")]
    description: Option<String>,
}

impl PatagoniaImage {
    fn into_pair(self) -> (String, Option<String>) {
        (self.url, self.description)
    }
}

#[derive(Debug, Clone)]
pub struct PatagoniaSupplier {
    endpoint: String,
}

impl PatagoniaSupplier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Supplier for PatagoniaSupplier {
    fn name(&self) -> &'static str {
        "patagonia"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn parse_hotel(&self, raw: Value) -> Hotel {
        let record: PatagoniaHotel = decode_record(self.name(), raw);

        Hotel {
            id: record.id,
            destination_id: record.destination,
            name: record.name,
            location: Some(Location {
                lat: record.lat,
                lng: record.lng,
                address: record.address,
                city: String::new(),
                country: String::new(),
            }),
            description: record.info,
            amenities: Some(Amenities {
                general: record.amenities,
                room: Vec::new(),
            }),
            images: Images {
                rooms: images_from(record.images.rooms.into_iter().map(PatagoniaImage::into_pair)),
                site: Vec::new(),
                amenities: images_from(
                    record
                        .images
                        .amenities
                        .into_iter()
                        .map(PatagoniaImage::into_pair),
                ),
            },
            booking_conditions: Vec::new(),
        }
    }
}

// Paperflies: nested location/amenities, captioned images, booking conditions

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PaperfliesHotel {
    #[serde(deserialize_with = "lenient_string")]
    hotel_id: String,
    #[serde(deserialize_with = "lenient_string")]
    destination_id: String,
    #[serde(deserialize_with = "lenient_string")]
    hotel_name: String,
    #[serde(deserialize_with = "lenient_nested")]
    location: PaperfliesLocation,
    #[serde(deserialize_with = "lenient_string")]
    details: String,
    #[serde(deserialize_with = "lenient_nested")]
    amenities: PaperfliesAmenities,
    #[serde(deserialize_with = "lenient_nested")]
    images: PaperfliesImages,
    #[serde(deserialize_with = "lenient_list")]
    booking_conditions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PaperfliesLocation {
    #[serde(deserialize_with = "lenient_string")]
    address: String,
    #[serde(deserialize_with = "lenient_string")]
    country: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PaperfliesAmenities {
    #[serde(deserialize_with = "lenient_list")]
    general: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    room: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PaperfliesImages {
    #[serde(deserialize_with = "lenient_items")]
    rooms: Vec<PaperfliesImage>,
    #[serde(deserialize_with = "lenient_items")]
    site: Vec<PaperfliesImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PaperfliesImage {
    #[serde(deserialize_with = "lenient_string")]
    link: String,
    #[serde(deserialize_with = "lenient_optional_string")]
    caption: Option<String>,
}

impl PaperfliesImage {
    fn into_pair(self) -> (String, Option<String>) {
        (self.link, self.caption)
    }
}

#[derive(Debug, Clone)]
pub struct PaperfliesSupplier {
    endpoint: String,
}

impl PaperfliesSupplier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Supplier for PaperfliesSupplier {
    fn name(&self) -> &'static str {
        "paperflies"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn parse_hotel(&self, raw: Value) -> Hotel {
        let record: PaperfliesHotel = decode_record(self.name(), raw);

        Hotel {
            id: record.hotel_id,
            destination_id: record.destination_id,
            name: record.hotel_name,
            location: Some(Location {
                lat: None,
                lng: None,
                address: record.location.address,
                city: String::new(),
                country: record.location.country,
            }),
            description: record.details,
            amenities: Some(Amenities {
                general: record.amenities.general,
                room: record.amenities.room,
            }),
            images: Images {
                rooms: images_from(record.images.rooms.into_iter().map(PaperfliesImage::into_pair)),
                site: images_from(record.images.site.into_iter().map(PaperfliesImage::into_pair)),
                amenities: Vec::new(),
            },
            booking_conditions: record.booking_conditions,
        }
    }
}

// Sample supplier payloads (the actual files are stored in the samples directory)
pub const SAMPLE_ACME_JSON: &str = include_str!("../samples/acme.json");
pub const SAMPLE_PATAGONIA_JSON: &str = include_str!("../samples/patagonia.json");
pub const SAMPLE_PAPERFLIES_JSON: &str = include_str!("../samples/paperflies.json");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn parse_sample(supplier: &dyn Supplier, sample: &str) -> Vec<Hotel> {
        let records: Vec<Value> = serde_json::from_str(sample).unwrap();
        records.into_iter().map(|r| supplier.parse_hotel(r)).collect()
    }

    #[test]
    fn test_parse_acme_sample() {
        let hotels = parse_sample(&AcmeSupplier::new("unused"), SAMPLE_ACME_JSON);
        assert_eq!(hotels.len(), 3);

        let hotel = &hotels[0];
        assert_eq!(hotel.id, "iJhz");
        assert_eq!(hotel.destination_id, "5432");
        assert_eq!(hotel.name, "Beach Villas Singapore");
        assert_eq!(
            hotel.description,
            "This 5 star hotel is located on the coastline of Singapore."
        );

        let location = hotel.location.as_ref().unwrap();
        assert_eq!(location.lat, Some(1.264751));
        assert_eq!(location.lng, Some(103.824006));
        assert_eq!(location.address, "8 Sentosa Gateway, Beach Villas");
        assert_eq!(location.city, "Singapore");
        assert_eq!(location.country, "SG");

        let amenities = hotel.amenities.as_ref().unwrap();
        assert_eq!(
            amenities.general,
            vec!["Pool", "BusinessCenter", "WiFi", "DryCleaning", "Breakfast"]
        );
        assert!(amenities.room.is_empty());
        assert_eq!(hotel.images, Images::default());
        assert!(hotel.booking_conditions.is_empty());
    }

    #[test]
    fn test_acme_blank_and_null_coordinates_are_absent() {
        let hotels = parse_sample(&AcmeSupplier::new("unused"), SAMPLE_ACME_JSON);

        for hotel in &hotels[1..] {
            let location = hotel.location.as_ref().unwrap();
            assert_eq!(location.lat, None, "{}", hotel.id);
            assert_eq!(location.lng, None, "{}", hotel.id);
        }
    }

    #[test]
    fn test_parse_patagonia_sample() {
        let hotels = parse_sample(&PatagoniaSupplier::new("unused"), SAMPLE_PATAGONIA_JSON);
        assert_eq!(hotels.len(), 2);

        let hotel = &hotels[0];
        assert_eq!(hotel.id, "iJhz");
        assert_eq!(hotel.destination_id, "5432");
        assert_eq!(hotel.location.as_ref().unwrap().lat, Some(1.264751));
        assert_eq!(hotel.location.as_ref().unwrap().city, "");
        assert_eq!(hotel.amenities.as_ref().unwrap().general.len(), 7);
        assert_eq!(hotel.images.rooms.len(), 2);
        assert_eq!(hotel.images.amenities.len(), 1);
        assert_eq!(
            hotel.images.amenities[0].description.as_deref(),
            Some("RWS")
        );
        assert!(hotel.images.site.is_empty());

        // null info and amenities
        let tokyo = &hotels[1];
        assert_eq!(tokyo.description, "");
        assert!(tokyo.amenities.as_ref().unwrap().general.is_empty());
    }

    #[test]
    fn test_parse_paperflies_sample() {
        let hotels = parse_sample(&PaperfliesSupplier::new("unused"), SAMPLE_PAPERFLIES_JSON);
        assert_eq!(hotels.len(), 2);

        let hotel = &hotels[0];
        assert_eq!(hotel.id, "iJhz");
        assert_eq!(hotel.name, "Beach Villas Singapore");

        let location = hotel.location.as_ref().unwrap();
        assert_eq!(location.lat, None);
        assert_eq!(location.country, "Singapore");

        let amenities = hotel.amenities.as_ref().unwrap();
        assert_eq!(amenities.general.len(), 4);
        assert_eq!(amenities.room.len(), 5);
        assert_eq!(hotel.images.rooms[1].description.as_deref(), Some("Bathroom"));
        assert_eq!(hotel.images.site.len(), 1);
        assert_eq!(hotel.booking_conditions.len(), 3);
    }

    #[test_case(json!({"Id": 42, "DestinationId": "7"}), "42", "7"; "numeric id")]
    #[test_case(json!({"Id": "abc", "DestinationId": null}), "abc", ""; "null destination")]
    #[test_case(json!({}), "", ""; "empty record")]
    #[test_case(json!("not an object"), "", ""; "wrong shape")]
    fn test_acme_ids_are_lenient(raw: Value, id: &str, destination_id: &str) {
        let hotel = AcmeSupplier::new("unused").parse_hotel(raw);
        assert_eq!(hotel.id, id);
        assert_eq!(hotel.destination_id, destination_id);
    }

    #[test_case(json!(1.5), Some(1.5); "number")]
    #[test_case(json!("2.25"), Some(2.25); "numeric string")]
    #[test_case(json!(""), None; "empty string")]
    #[test_case(json!(null), None; "null")]
    #[test_case(json!(true), None; "bool")]
    #[test_case(json!("NaN"), None; "nan string")]
    #[test_case(json!("inf"), None; "infinite string")]
    fn test_patagonia_coordinates(lat: Value, expected: Option<f64>) {
        let hotel = PatagoniaSupplier::new("unused").parse_hotel(json!({"id": "h1", "lat": lat}));
        assert_eq!(hotel.location.unwrap().lat, expected);
    }

    #[test_case(
        json!([{"url": "http://x/a.jpg", "description": 5}, {"url": "http://x/b.jpg", "description": "ok"}]),
        vec![ImageItem::new("http://x/a.jpg", None), ImageItem::new("http://x/b.jpg", Some("ok".to_string()))];
        "non-string description only clears that description")]
    #[test_case(
        json!(["not an image", {"url": "http://x/b.jpg"}]),
        vec![ImageItem::new("http://x/b.jpg", None)];
        "bad entry skipped, neighbours kept")]
    #[test_case(json!({"url": "http://x/a.jpg"}), vec![]; "object instead of list")]
    #[test_case(json!(null), vec![]; "null list")]
    fn test_patagonia_room_images_are_lenient(rooms: Value, expected: Vec<ImageItem>) {
        let hotel = PatagoniaSupplier::new("unused")
            .parse_hotel(json!({"id": "h1", "images": {"rooms": rooms}}));

        assert_eq!(hotel.images.rooms, expected);
    }

    #[test]
    fn test_paperflies_bad_caption_keeps_site_images() {
        let hotel = PaperfliesSupplier::new("unused").parse_hotel(json!({
            "hotel_id": "h1",
            "images": {
                "site": [{"link": "http://x/1.jpg", "caption": ["Front"]}, {"link": "http://x/2.jpg", "caption": "Lobby"}]
            }
        }));

        assert_eq!(
            hotel.images.site,
            vec![
                ImageItem::new("http://x/1.jpg", None),
                ImageItem::new("http://x/2.jpg", Some("Lobby".to_string()))
            ]
        );
    }

    #[test]
    fn test_images_without_url_are_dropped() {
        let hotel = PaperfliesSupplier::new("unused").parse_hotel(json!({
            "hotel_id": "h1",
            "images": {
                "rooms": [{"caption": "no link"}, {"link": "http://x/1.jpg"}]
            }
        }));

        assert_eq!(hotel.images.rooms, vec![ImageItem::new("http://x/1.jpg", None)]);
    }

    #[test]
    fn test_suppliers_from_config_order() {
        let suppliers = suppliers_from_config(&AppConfig::default());
        let names: Vec<_> = suppliers.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["acme", "patagonia", "paperflies"]);
        assert_eq!(suppliers[0].endpoint(), crate::config::DEFAULT_ACME_URL);
    }

    #[tokio::test]
    async fn test_fetch_hotels_returns_raw_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/suppliers/acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"Id": "iJhz", "Name": "Beach Villas"},
                {"Id": "SjyX"}
            ])))
            .mount(&server)
            .await;

        let supplier = AcmeSupplier::new(format!("{}/suppliers/acme", server.uri()));
        let records = supplier.fetch_hotels(&reqwest::Client::new()).await;

        assert!(records.is_ok(), "expected Ok, got: {records:?}");
        assert_eq!(records.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_hotels_fails_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let supplier = PatagoniaSupplier::new(server.uri());
        let result = supplier.fetch_hotels(&reqwest::Client::new()).await;

        assert!(matches!(
            result,
            Err(SupplierError::StatusError {
                supplier: "patagonia",
                status: 503
            })
        ));
    }

    #[tokio::test]
    async fn test_fetch_hotels_fails_on_non_array_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"oops\": true}"))
            .mount(&server)
            .await;

        let supplier = PaperfliesSupplier::new(server.uri());
        let result = supplier.fetch_hotels(&reqwest::Client::new()).await;

        assert!(matches!(
            result,
            Err(SupplierError::JsonParseError { supplier: "paperflies", .. })
        ));
    }
}
