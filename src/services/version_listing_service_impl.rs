use std::{
    collections::{BTreeSet, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    domain::{
        errors::StorageResult,
        models::{ListObjectsParams, ListVersionsRequest, ListingPage, ObjectVersionRecord},
        value_objects::{BucketName, ObjectKey},
    },
    ports::{context::RequestContext, services::VersionListingService, storage::VersionedBucketStore},
};

/// Aggregates per-key version histories into S3 ListObjectVersions pages
#[derive(Clone)]
pub struct VersionListingServiceImpl {
    store: Arc<dyn VersionedBucketStore>,
}

impl VersionListingServiceImpl {
    pub fn new(store: Arc<dyn VersionedBucketStore>) -> Self {
        Self { store }
    }

    /// Remainder of the key whose history the previous page stopped inside.
    async fn resume_history(
        &self,
        ctx: &RequestContext,
        request: &ListVersionsRequest,
        key: &str,
    ) -> StorageResult<Vec<ObjectVersionRecord>> {
        let version_id_marker = request.cursor.version_id_marker.as_str();
        let Ok(key) = ObjectKey::new(key) else {
            debug!(key_marker = key, "Ignoring invalid key marker");
            return Ok(Vec::new());
        };

        let history = match self.fetch_history(ctx, &request.bucket, &key).await {
            Ok(history) => history,
            Err(err) if err.is_cancellation() => return Err(err),
            Err(err) => {
                debug!(
                    bucket = %request.bucket,
                    key = %key,
                    error = %err,
                    "Cannot resume inside key, skipping its remaining versions"
                );
                return Ok(Vec::new());
            }
        };

        match history
            .iter()
            .position(|record| record.version_id.as_str() == version_id_marker)
        {
            Some(idx) => Ok(history.into_iter().skip(idx + 1).collect()),
            None => {
                debug!(
                    bucket = %request.bucket,
                    key = %key,
                    version_id_marker,
                    "Version id marker no longer exists, skipping remaining versions of key"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn fetch_history(
        &self,
        ctx: &RequestContext,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<Vec<ObjectVersionRecord>> {
        ctx.run(
            "get_object_versions",
            self.store.get_object_versions(ctx, bucket, key),
        )
        .await
    }
}

#[async_trait]
impl VersionListingService for VersionListingServiceImpl {
    async fn list_object_versions(
        &self,
        ctx: &RequestContext,
        request: ListVersionsRequest,
    ) -> StorageResult<ListingPage> {
        let max_keys = request.max_keys.get();
        let key_marker = request.cursor.key_marker.as_str();

        debug!(
            bucket = %request.bucket,
            prefix = request.prefix(),
            delimiter = request.delimiter(),
            key_marker,
            version_id_marker = %request.cursor.version_id_marker,
            max_keys,
            "Listing object versions"
        );

        let mut entries: Vec<ObjectVersionRecord> = Vec::new();
        let mut common_prefixes = BTreeSet::new();

        if let Some(resume_key) = request
            .cursor
            .resume_key()
            .filter(|key| key.starts_with(request.prefix()))
        {
            entries.extend(self.resume_history(ctx, &request, resume_key).await?);
        }

        let mut seen = HashSet::new();
        let mut marker = (!key_marker.is_empty()).then(|| key_marker.to_string());

        while entries.len() <= max_keys {
            let params = ListObjectsParams {
                prefix: request.prefix.clone(),
                delimiter: request.delimiter().map(str::to_string),
                marker: marker.clone(),
                limit: max_keys + 1,
            };
            let listing = ctx
                .run(
                    "list_objects",
                    self.store.list_objects(ctx, &request.bucket, &params),
                )
                .await?;

            common_prefixes.extend(listing.common_prefixes);

            for item in listing.objects {
                if entries.len() > max_keys {
                    break;
                }
                if !key_marker.is_empty() && item.key.as_str() <= key_marker {
                    continue;
                }
                if !seen.insert(item.key.clone()) {
                    continue;
                }

                match self.fetch_history(ctx, &request.bucket, &item.key).await {
                    Ok(history) => entries.extend(history),
                    Err(err) if err.is_cancellation() => return Err(err),
                    Err(err) => {
                        debug!(
                            bucket = %request.bucket,
                            key = %item.key,
                            error = %err,
                            "Version history unavailable, reporting current state"
                        );
                        entries.push(item.to_latest_record());
                    }
                }
            }

            let next_marker = match listing.next_marker {
                Some(next) if listing.is_truncated => next,
                _ => break,
            };
            if marker.as_deref() == Some(next_marker.as_str()) {
                warn!(
                    bucket = %request.bucket,
                    marker = %next_marker,
                    "Backend returned a non-advancing marker, stopping key listing"
                );
                break;
            }
            marker = Some(next_marker);
        }

        let is_truncated = entries.len() > max_keys;
        entries.truncate(max_keys);

        if is_truncated {
            if let Some(last) = entries.last() {
                let next_key = last.key.as_str();
                common_prefixes.retain(|prefix| prefix.as_str() <= next_key);
            }
        }

        let page = ListingPage::from_entries(
            request.owner,
            entries,
            common_prefixes.into_iter().collect(),
            is_truncated,
        );

        debug!(
            bucket = %request.bucket,
            versions = page.versions.len(),
            delete_markers = page.delete_markers.len(),
            common_prefixes = page.common_prefixes.len(),
            is_truncated = page.is_truncated,
            "Listed object versions"
        );

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{
        errors::StorageError,
        models::{
            ListingCursor, MaxKeys, ObjectListItem, ObjectListing, StoredObject, VersionKind,
        },
        value_objects::VersionId,
    };

    /// Scripted backend: fixed key set, optional broken histories, small pages
    #[derive(Default)]
    struct ScriptedStore {
        histories: BTreeMap<String, Vec<ObjectVersionRecord>>,
        broken: HashSet<String>,
        page_size: Option<usize>,
        fail_listing: bool,
        cancel_on_history: bool,
    }

    impl ScriptedStore {
        fn with_key(mut self, key: &str, versions: &[(&str, bool)]) -> Self {
            let records = versions
                .iter()
                .enumerate()
                .map(|(idx, (version, delete_marker))| ObjectVersionRecord {
                    key: ObjectKey::new(key).unwrap(),
                    version_id: VersionId::new(*version).unwrap(),
                    is_latest: idx == 0,
                    last_modified: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    kind: if *delete_marker {
                        VersionKind::DeleteMarker
                    } else {
                        VersionKind::live("etag", 10)
                    },
                })
                .collect();
            self.histories.insert(key.to_string(), records);
            self
        }
    }

    #[async_trait]
    impl VersionedBucketStore for ScriptedStore {
        async fn list_objects(
            &self,
            _ctx: &RequestContext,
            _bucket: &BucketName,
            params: &ListObjectsParams,
        ) -> StorageResult<ObjectListing> {
            if self.fail_listing {
                return Err(StorageError::InfrastructureError {
                    message: "listing unavailable".to_string(),
                    detail: None,
                });
            }

            let limit = self.page_size.unwrap_or(params.limit).min(params.limit);
            let matching: Vec<_> = self
                .histories
                .keys()
                .filter(|key| params.matches_prefix(key) && params.is_after_marker(key))
                .collect();
            let objects: Vec<_> = matching
                .iter()
                .take(limit)
                .map(|key| ObjectListItem {
                    key: ObjectKey::new(key.as_str()).unwrap(),
                    size: 7,
                    etag: Some("current".to_string()),
                    last_modified: Utc::now(),
                    version_id: None,
                })
                .collect();
            let is_truncated = matching.len() > objects.len();

            Ok(ObjectListing {
                next_marker: objects
                    .last()
                    .filter(|_| is_truncated)
                    .map(|item| item.key.to_string()),
                objects,
                common_prefixes: vec![],
                is_truncated,
            })
        }

        async fn get_object_versions(
            &self,
            ctx: &RequestContext,
            _bucket: &BucketName,
            key: &ObjectKey,
        ) -> StorageResult<Vec<ObjectVersionRecord>> {
            if self.cancel_on_history {
                ctx.cancellation_token().cancel();
                return std::future::pending().await;
            }
            if self.broken.contains(key.as_str()) {
                return Err(StorageError::InfrastructureError {
                    message: "metadata corrupted".to_string(),
                    detail: None,
                });
            }
            Ok(self.histories.get(key.as_str()).cloned().unwrap_or_default())
        }

        async fn get_object(
            &self,
            _ctx: &RequestContext,
            _bucket: &BucketName,
            key: &ObjectKey,
        ) -> StorageResult<StoredObject> {
            Err(StorageError::ObjectNotFound { key: key.clone() })
        }
    }

    fn request(max_keys: usize, cursor: ListingCursor) -> ListVersionsRequest {
        ListVersionsRequest::builder()
            .bucket(BucketName::new("b").unwrap())
            .max_keys(MaxKeys::from(max_keys))
            .cursor(cursor)
            .build()
    }

    fn ids(records: &[ObjectVersionRecord]) -> Vec<(String, String)> {
        records
            .iter()
            .map(|r| (r.key.to_string(), r.version_id.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_broken_history_degrades_to_current_state() {
        let mut store = ScriptedStore::default()
            .with_key("a", &[("v1", false)])
            .with_key("c", &[("v9", false)]);
        store.broken.insert("c".to_string());
        let service = VersionListingServiceImpl::new(Arc::new(store));

        let page = service
            .list_object_versions(&RequestContext::default(), request(10, ListingCursor::default()))
            .await
            .unwrap();

        assert_eq!(page.versions.len(), 2);
        let fallback = &page.versions[1];
        assert_eq!(fallback.key.as_str(), "c");
        assert!(fallback.version_id.is_null());
        assert!(fallback.is_latest);
        assert_eq!(fallback.kind, VersionKind::live("current", 7));
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let store = ScriptedStore {
            fail_listing: true,
            ..Default::default()
        };
        let service = VersionListingServiceImpl::new(Arc::new(store));

        let err = service
            .list_object_versions(&RequestContext::default(), request(10, ListingCursor::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InfrastructureError { .. }));
    }

    #[tokio::test]
    async fn test_cancellation_during_history_is_fatal() {
        let mut store = ScriptedStore::default().with_key("a", &[("v1", false)]);
        store.cancel_on_history = true;
        let service = VersionListingServiceImpl::new(Arc::new(store));

        let err = service
            .list_object_versions(&RequestContext::default(), request(10, ListingCursor::default()))
            .await
            .unwrap_err();
        assert!(err.is_cancellation());
    }

    #[tokio::test]
    async fn test_small_backend_pages_are_followed() {
        let mut store = ScriptedStore::default();
        for key in ["k1", "k2", "k3", "k4", "k5"] {
            store = store.with_key(key, &[("v1", false)]);
        }
        store.page_size = Some(2);
        let service = VersionListingServiceImpl::new(Arc::new(store));

        let page = service
            .list_object_versions(&RequestContext::default(), request(4, ListingCursor::default()))
            .await
            .unwrap();

        assert!(page.is_truncated);
        assert_eq!(page.len(), 4);
        assert_eq!(page.next_cursor, Some(ListingCursor::new("k4", "v1")));
    }

    #[tokio::test]
    async fn test_resume_inside_key_is_positional() {
        let store = ScriptedStore::default()
            .with_key("a", &[("v3", false), ("v2", true), ("v1", false)])
            .with_key("b", &[("v1", false)]);
        let service = VersionListingServiceImpl::new(Arc::new(store));

        let page = service
            .list_object_versions(
                &RequestContext::default(),
                request(10, ListingCursor::new("a", "v2")),
            )
            .await
            .unwrap();

        assert_eq!(
            ids(&page.versions),
            vec![
                ("a".to_string(), "v1".to_string()),
                ("b".to_string(), "v1".to_string())
            ]
        );
        assert!(page.delete_markers.is_empty());
        assert!(!page.is_truncated);
    }

    #[tokio::test]
    async fn test_missing_version_marker_skips_rest_of_key() {
        let store = ScriptedStore::default()
            .with_key("a", &[("v3", false), ("v1", false)])
            .with_key("b", &[("v1", false)]);
        let service = VersionListingServiceImpl::new(Arc::new(store));

        let page = service
            .list_object_versions(
                &RequestContext::default(),
                request(10, ListingCursor::new("a", "gone")),
            )
            .await
            .unwrap();

        assert_eq!(ids(&page.versions), vec![("b".to_string(), "v1".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_histories_contribute_nothing() {
        let store = ScriptedStore::default()
            .with_key("x", &[])
            .with_key("y", &[("v1", true)]);
        let service = VersionListingServiceImpl::new(Arc::new(store));

        let page = service
            .list_object_versions(&RequestContext::default(), request(1, ListingCursor::default()))
            .await
            .unwrap();

        assert!(page.versions.is_empty());
        assert_eq!(ids(&page.delete_markers), vec![("y".to_string(), "v1".to_string())]);
        assert!(!page.is_truncated);
    }
}
