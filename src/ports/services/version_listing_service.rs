use async_trait::async_trait;

use crate::{
    domain::{
        errors::StorageResult,
        models::{ListVersionsRequest, ListingPage},
    },
    ports::context::RequestContext,
};

/// Service port for S3 ListObjectVersions
#[async_trait]
pub trait VersionListingService: Send + Sync + 'static {
    /// Produce one page of versions and delete markers across every matching key.
    ///
    /// Only a failed key listing (or cancellation) is an error; keys whose
    /// history cannot be read are reported from their current state instead.
    async fn list_object_versions(
        &self,
        ctx: &RequestContext,
        request: ListVersionsRequest,
    ) -> StorageResult<ListingPage>;
}
