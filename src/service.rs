// Hotel service: pulls every supplier into the repository and answers filtered queries
use tracing::info;

use crate::models::Hotel;
use crate::repository::HotelRepository;
use crate::supplier::{Supplier, SupplierError};

// Literal accepted on the command line for "no filter on this axis"
pub const NO_FILTER: &str = "none";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub hotel_ids: Vec<String>,
    pub destination_ids: Vec<String>,
}

impl FilterCriteria {
    /// Build criteria from the two comma-separated CLI arguments.
    pub fn from_args(hotel_ids: &str, destination_ids: &str) -> Self {
        Self {
            hotel_ids: parse_id_list(hotel_ids),
            destination_ids: parse_id_list(destination_ids),
        }
    }
}

// "none" (any case) means no filter; blank items are dropped
pub fn parse_id_list(arg: &str) -> Vec<String> {
    if arg.trim().eq_ignore_ascii_case(NO_FILTER) {
        return Vec::new();
    }

    arg.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct HotelService<R: HotelRepository> {
    repository: R,
    suppliers: Vec<Box<dyn Supplier>>,
    client: reqwest::Client,
}

impl<R: HotelRepository> HotelService<R> {
    pub fn new(repository: R, suppliers: Vec<Box<dyn Supplier>>, client: reqwest::Client) -> Self {
        Self {
            repository,
            suppliers,
            client,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    // Suppliers are fetched one after another; the first failure aborts the run
    pub async fn process_hotels(&mut self) -> Result<usize, SupplierError> {
        let mut ingested = 0;

        for supplier in &self.suppliers {
            let raw = supplier.fetch_hotels(&self.client).await?;
            let hotels: Vec<Hotel> = raw.into_iter().map(|r| supplier.parse_hotel(r)).collect();

            info!(
                supplier = supplier.name(),
                records = hotels.len(),
                "ingesting supplier hotels"
            );
            ingested += hotels.len();
            self.repository.save_all(hotels);
        }

        info!(
            records = ingested,
            hotels = self.repository.len(),
            "all suppliers processed"
        );
        Ok(ingested)
    }

    pub fn find_hotels(&self, criteria: &FilterCriteria) -> Vec<Hotel> {
        self.repository
            .find_by_criteria(&criteria.hotel_ids, &criteria.destination_ids)
    }
}
