mod version_listing_service;
mod virtual_object_service;

pub use version_listing_service::VersionListingService;
pub use virtual_object_service::VirtualObjectService;
