pub mod context;
pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use context::RequestContext;
pub use services::{VersionListingService, VirtualObjectService};
pub use storage::{DiskUsage, DiskUsageProbe, VersionedBucketStore};
