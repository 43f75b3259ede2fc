mod disk_usage;
mod versioned_bucket_store;

pub use disk_usage::{DiskUsage, DiskUsageProbe};
pub use versioned_bucket_store::VersionedBucketStore;
