// Hotel record store keyed by hotel id
use std::collections::HashMap;

use tracing::debug;

use crate::merge::{DefaultMergeStrategy, MergeStrategy};
use crate::models::Hotel;

pub trait HotelRepository {
    // Insert new ids as-is, merge colliding ids into the stored record
    fn save_all(&mut self, hotels: Vec<Hotel>);

    // Empty criteria lists do not restrict that axis
    fn find_by_criteria(&self, hotel_ids: &[String], destination_ids: &[String]) -> Vec<Hotel>;

    fn get(&self, hotel_id: &str) -> Option<&Hotel>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps hotels in first-seen order so query output is stable across runs.
pub struct InMemoryHotelRepository<M: MergeStrategy = DefaultMergeStrategy> {
    hotels: Vec<Hotel>,
    index: HashMap<String, usize>,
    merge_strategy: M,
}

impl InMemoryHotelRepository {
    pub fn new() -> Self {
        Self::with_strategy(DefaultMergeStrategy::new())
    }
}

impl Default for InMemoryHotelRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MergeStrategy> InMemoryHotelRepository<M> {
    pub fn with_strategy(merge_strategy: M) -> Self {
        Self {
            hotels: Vec::new(),
            index: HashMap::new(),
            merge_strategy,
        }
    }
}

impl<M: MergeStrategy> HotelRepository for InMemoryHotelRepository<M> {
    fn save_all(&mut self, hotels: Vec<Hotel>) {
        for hotel in hotels {
            match self.index.get(&hotel.id) {
                Some(&pos) => {
                    let merged = self.merge_strategy.merge(&self.hotels[pos], &hotel);
                    self.hotels[pos] = merged;
                }
                None => {
                    debug!(hotel_id = %hotel.id, "storing new hotel");
                    self.index.insert(hotel.id.clone(), self.hotels.len());
                    self.hotels.push(hotel);
                }
            }
        }
    }

    fn find_by_criteria(&self, hotel_ids: &[String], destination_ids: &[String]) -> Vec<Hotel> {
        self.hotels
            .iter()
            .filter(|hotel| hotel_ids.is_empty() || hotel_ids.contains(&hotel.id))
            .filter(|hotel| {
                destination_ids.is_empty() || destination_ids.contains(&hotel.destination_id)
            })
            .cloned()
            .collect()
    }

    fn get(&self, hotel_id: &str) -> Option<&Hotel> {
        self.index.get(hotel_id).map(|&pos| &self.hotels[pos])
    }

    fn len(&self) -> usize {
        self.hotels.len()
    }
}
