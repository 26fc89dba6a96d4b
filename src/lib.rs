// Main library file for the hotel data merger

// Export modules for each stage of the pipeline
pub mod amenities;
pub mod config;
pub mod merge;
pub mod models;
pub mod repository;
pub mod service;
pub mod supplier;

// Re-export key types for convenience
pub use amenities::{merge_amenities, normalize_amenity, preferred_term};
pub use config::{AppConfig, ConfigError};
pub use merge::{DefaultMergeStrategy, MergeStrategy};
pub use models::{Amenities, Hotel, ImageItem, Images, Location};
pub use repository::{HotelRepository, InMemoryHotelRepository};
pub use service::{FilterCriteria, HotelService};
pub use supplier::{
    suppliers_from_config, AcmeSupplier, PaperfliesSupplier, PatagoniaSupplier, Supplier,
    SupplierError,
};
