use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use object_store::{ObjectMeta, ObjectStore, PutPayload, path::Path as ObjectPath};

use super::{error::StoreError, paging::paginate};
use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{
            ListObjectsParams, ObjectListItem, ObjectListing, ObjectVersionRecord, StoredObject,
        },
        value_objects::{BucketName, ObjectKey, VersionId},
    },
    ports::{context::RequestContext, storage::VersionedBucketStore},
};

/// Adapter exposing any `object_store` implementation as an unversioned bucket store.
///
/// Buckets are the first path segment. Every key has exactly one version, `null`.
pub struct ObjectStoreBackend {
    inner: Arc<dyn ObjectStore>,
}

impl ObjectStoreBackend {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { inner: store }
    }

    fn bucket_path(bucket: &BucketName) -> ObjectPath {
        ObjectPath::from_iter([bucket.as_str()])
    }

    /// Map a key to a store path, one path part per `/`-separated segment.
    ///
    /// Store paths cannot hold empty segments, so keys with a leading, trailing
    /// or doubled `/` are rejected rather than aliased onto another key.
    fn object_path(bucket: &BucketName, key: &ObjectKey) -> Result<ObjectPath, StoreError> {
        if key.as_str().split('/').any(str::is_empty) {
            return Err(StoreError::InvalidPath(key.to_string()));
        }
        Ok(ObjectPath::from_iter(
            std::iter::once(bucket.as_str()).chain(key.as_str().split('/')),
        ))
    }

    /// Write an object, replacing whatever was stored under the key.
    pub async fn put_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        data: bytes::Bytes,
    ) -> StorageResult<()> {
        self.inner
            .put(&Self::object_path(bucket, key)?, PutPayload::from(data))
            .await
            .map_err(StoreError::from)?;
        Ok(())
    }

    fn to_list_item(bucket: &BucketName, meta: &ObjectMeta) -> Result<ObjectListItem, StoreError> {
        let invalid = || StoreError::InvalidPath(meta.location.to_string());
        let bucket_path = Self::bucket_path(bucket);
        let segments = meta
            .location
            .prefix_match(&bucket_path)
            .ok_or_else(invalid)?
            .map(|part| {
                urlencoding::decode(part.as_ref())
                    .map(|segment| segment.into_owned())
                    .map_err(|_| invalid())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ObjectListItem {
            key: ObjectKey::new(segments.join("/")).map_err(|_| invalid())?,
            size: meta.size,
            etag: meta.e_tag.as_deref().map(unquote),
            last_modified: meta.last_modified,
            version_id: Some(VersionId::null()),
        })
    }

    fn not_found(err: object_store::Error, key: &ObjectKey) -> StorageError {
        match err {
            object_store::Error::NotFound { .. } => StorageError::ObjectNotFound { key: key.clone() },
            other => other.into(),
        }
    }
}

fn unquote(etag: &str) -> String {
    etag.trim_matches('"').to_string()
}

#[async_trait]
impl VersionedBucketStore for ObjectStoreBackend {
    async fn list_objects(
        &self,
        _ctx: &RequestContext,
        bucket: &BucketName,
        params: &ListObjectsParams,
    ) -> StorageResult<ObjectListing> {
        let bucket_path = Self::bucket_path(bucket);
        let metas: Vec<ObjectMeta> = self
            .inner
            .list(Some(&bucket_path))
            .try_collect()
            .await
            .map_err(StoreError::from)?;

        // Listing order is backend specific
        let mut items = metas
            .iter()
            .map(|meta| Self::to_list_item(bucket, meta))
            .collect::<Result<Vec<_>, _>>()?;
        items.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(paginate(params, items))
    }

    async fn get_object_versions(
        &self,
        _ctx: &RequestContext,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<Vec<ObjectVersionRecord>> {
        let meta = self
            .inner
            .head(&Self::object_path(bucket, key)?)
            .await
            .map_err(|err| Self::not_found(err, key))?;

        let item = Self::to_list_item(bucket, &meta)?;
        Ok(vec![item.to_latest_record()])
    }

    async fn get_object(
        &self,
        _ctx: &RequestContext,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<StoredObject> {
        let result = self
            .inner
            .get(&Self::object_path(bucket, key)?)
            .await
            .map_err(|err| Self::not_found(err, key))?;

        let meta = result.meta.clone();
        let data = result.bytes().await.map_err(StoreError::from)?;

        Ok(StoredObject {
            key: key.clone(),
            version_id: Some(VersionId::null()),
            data,
            content_type: None,
            etag: meta.e_tag.as_deref().map(unquote),
            last_modified: meta.last_modified,
        })
    }
}
