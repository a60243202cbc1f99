//! Repository implementations for database operations.

pub mod attendee;
pub mod branding_asset;
pub mod catalog_entry;
pub mod exhibition;

pub use attendee::AttendeeRepository;
pub use branding_asset::BrandingAssetRepository;
pub use catalog_entry::CatalogEntryRepository;
pub use exhibition::ExhibitionRepository;
