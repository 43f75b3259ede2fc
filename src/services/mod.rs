mod version_listing_service_impl;
mod virtual_object_service_impl;

pub use version_listing_service_impl::VersionListingServiceImpl;
pub use virtual_object_service_impl::{VirtualObjectServiceImpl, is_known_backup_client};
