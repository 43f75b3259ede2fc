pub mod descriptor;
pub mod listing;
pub mod object;
pub mod version;

pub use descriptor::{
    ApiEndpoints, CAPACITY_XML_SUFFIX, SYSTEM_FOLDER, SYSTEM_XML_SUFFIX, XML_CONTENT_TYPE, CapacityDescriptor, ProtocolCapabilities, SyntheticKind, SyntheticObject,
    SystemDescriptor, SystemRecommendations,
};
pub use listing::{
    ListObjectsParams, ListVersionsRequest, ListingCursor, ListingPage, MaxKeys, ObjectListItem,
    ObjectListing,
};
pub use object::StoredObject;
pub use version::{ObjectVersionRecord, Owner, StorageClass, VersionKind};
