use async_trait::async_trait;

use crate::{
    domain::{
        errors::StorageResult,
        models::{ListObjectsParams, ObjectListing, ObjectVersionRecord, StoredObject},
        value_objects::{BucketName, ObjectKey},
    },
    ports::context::RequestContext,
};

/// Port for the object store the gateway fronts
///
/// Implementations should return promptly once `ctx` is cancelled.
#[async_trait]
pub trait VersionedBucketStore: Send + Sync + 'static {
    /// List keys (with their current state) in ascending order, strictly after
    /// `params.marker`, grouping by `params.delimiter` when set.
    async fn list_objects(
        &self,
        ctx: &RequestContext,
        bucket: &BucketName,
        params: &ListObjectsParams,
    ) -> StorageResult<ObjectListing>;

    /// Full version history of one key, newest first
    async fn get_object_versions(
        &self,
        ctx: &RequestContext,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<Vec<ObjectVersionRecord>>;

    /// Read the current state of an object
    async fn get_object(
        &self,
        ctx: &RequestContext,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<StoredObject>;
}
