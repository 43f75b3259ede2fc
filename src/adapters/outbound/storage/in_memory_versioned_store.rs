use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::paging::paginate;
use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{
            ListObjectsParams, ObjectListItem, ObjectListing, ObjectVersionRecord, StoredObject,
            VersionKind,
        },
        value_objects::{BucketName, ObjectKey, VersionId},
    },
    ports::{context::RequestContext, storage::VersionedBucketStore},
};

#[derive(Debug, Clone)]
struct StoredVersion {
    version_id: VersionId,
    last_modified: DateTime<Utc>,
    /// `None` for delete markers
    content: Option<StoredContent>,
}

#[derive(Debug, Clone)]
struct StoredContent {
    data: Bytes,
    etag: String,
    content_type: Option<String>,
}

impl StoredVersion {
    fn to_record(&self, key: &ObjectKey, is_latest: bool) -> ObjectVersionRecord {
        ObjectVersionRecord {
            key: key.clone(),
            version_id: self.version_id.clone(),
            is_latest,
            last_modified: self.last_modified,
            kind: match &self.content {
                Some(content) => VersionKind::live(&content.etag, content.data.len() as u64),
                None => VersionKind::DeleteMarker,
            },
        }
    }
}

/// Newest first
type History = Vec<StoredVersion>;

/// Versioned bucket store kept entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryVersionedStore {
    buckets: RwLock<BTreeMap<BucketName, BTreeMap<ObjectKey, History>>>,
}

impl InMemoryVersionedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bucket; creating an existing bucket is a no-op.
    pub async fn create_bucket(&self, bucket: &BucketName) {
        self.buckets
            .write()
            .await
            .entry(bucket.clone())
            .or_default();
    }

    /// Store a new live version, which becomes the latest.
    pub async fn put_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<ObjectVersionRecord> {
        let etag = format!("{:x}", md5::compute(&data));
        let version = StoredVersion {
            version_id: VersionId::generate(),
            last_modified: Utc::now(),
            content: Some(StoredContent {
                data,
                etag,
                content_type: content_type.map(str::to_string),
            }),
        };

        self.push_version(bucket, key, version).await
    }

    /// Place a delete marker on top of the key's history.
    pub async fn delete_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<ObjectVersionRecord> {
        let marker = StoredVersion {
            version_id: VersionId::generate(),
            last_modified: Utc::now(),
            content: None,
        };

        self.push_version(bucket, key, marker).await
    }

    async fn push_version(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        version: StoredVersion,
    ) -> StorageResult<ObjectVersionRecord> {
        let mut buckets = self.buckets.write().await;
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| StorageError::BucketNotFound {
                bucket: bucket.clone(),
            })?;

        let record = version.to_record(key, true);
        objects.entry(key.clone()).or_default().insert(0, version);
        Ok(record)
    }
}

#[async_trait]
impl VersionedBucketStore for InMemoryVersionedStore {
    /// Keys whose latest version is a delete marker are still enumerated so
    /// that their history stays reachable.
    async fn list_objects(
        &self,
        _ctx: &RequestContext,
        bucket: &BucketName,
        params: &ListObjectsParams,
    ) -> StorageResult<ObjectListing> {
        let buckets = self.buckets.read().await;
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| StorageError::BucketNotFound {
                bucket: bucket.clone(),
            })?;

        let items = objects.iter().filter_map(|(key, history)| {
            let latest = history.first()?;
            Some(ObjectListItem {
                key: key.clone(),
                size: latest
                    .content
                    .as_ref()
                    .map_or(0, |content| content.data.len() as u64),
                etag: latest.content.as_ref().map(|content| content.etag.clone()),
                last_modified: latest.last_modified,
                version_id: Some(latest.version_id.clone()),
            })
        });

        Ok(paginate(params, items))
    }

    async fn get_object_versions(
        &self,
        _ctx: &RequestContext,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<Vec<ObjectVersionRecord>> {
        let buckets = self.buckets.read().await;
        let history = buckets
            .get(bucket)
            .ok_or_else(|| StorageError::BucketNotFound {
                bucket: bucket.clone(),
            })?
            .get(key)
            .ok_or_else(|| StorageError::ObjectNotFound { key: key.clone() })?;

        Ok(history
            .iter()
            .enumerate()
            .map(|(idx, version)| version.to_record(key, idx == 0))
            .collect())
    }

    async fn get_object(
        &self,
        _ctx: &RequestContext,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<StoredObject> {
        let buckets = self.buckets.read().await;
        let latest = buckets
            .get(bucket)
            .ok_or_else(|| StorageError::BucketNotFound {
                bucket: bucket.clone(),
            })?
            .get(key)
            .and_then(|history| history.first())
            .ok_or_else(|| StorageError::ObjectNotFound { key: key.clone() })?;

        let content = latest
            .content
            .as_ref()
            .ok_or_else(|| StorageError::ObjectNotFound { key: key.clone() })?;

        Ok(StoredObject {
            key: key.clone(),
            version_id: Some(latest.version_id.clone()),
            data: content.data.clone(),
            content_type: content.content_type.clone(),
            etag: Some(content.etag.clone()),
            last_modified: latest.last_modified,
        })
    }
}
