#![allow(dead_code)]

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use object_gateway::{
    BucketName, InMemoryVersionedStore, ObjectKey, RequestContext, StorageError, StorageResult,
    VersionedBucketStore,
    domain::models::{ListObjectsParams, ObjectListing, ObjectVersionRecord, StoredObject},
};

pub const BUCKET: &str = "b";

pub fn bucket() -> BucketName {
    BucketName::new(BUCKET).unwrap()
}

pub fn key(value: &str) -> ObjectKey {
    ObjectKey::new(value).unwrap()
}

/// `a`: live version over a delete marker; `c`: one live version
pub async fn seeded_store() -> Arc<InMemoryVersionedStore> {
    let store = Arc::new(InMemoryVersionedStore::new());
    store.create_bucket(&bucket()).await;
    store.delete_object(&bucket(), &key("a")).await.unwrap();
    store
        .put_object(&bucket(), &key("a"), Bytes::from_static(b"alpha"), None)
        .await
        .unwrap();
    store
        .put_object(&bucket(), &key("c"), Bytes::from_static(b"charlie"), Some("text/plain"))
        .await
        .unwrap();
    store
}

/// Wraps a store and fails version-history reads for selected keys
pub struct FlakyHistoryStore {
    pub inner: Arc<dyn VersionedBucketStore>,
    pub broken_keys: HashSet<String>,
}

#[async_trait]
impl VersionedBucketStore for FlakyHistoryStore {
    async fn list_objects(
        &self,
        ctx: &RequestContext,
        bucket: &BucketName,
        params: &ListObjectsParams,
    ) -> StorageResult<ObjectListing> {
        self.inner.list_objects(ctx, bucket, params).await
    }

    async fn get_object_versions(
        &self,
        ctx: &RequestContext,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<Vec<ObjectVersionRecord>> {
        if self.broken_keys.contains(key.as_str()) {
            return Err(StorageError::InfrastructureError {
                message: "version metadata unreadable".to_string(),
                detail: None,
            });
        }
        self.inner.get_object_versions(ctx, bucket, key).await
    }

    async fn get_object(
        &self,
        ctx: &RequestContext,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<StoredObject> {
        self.inner.get_object(ctx, bucket, key).await
    }
}
