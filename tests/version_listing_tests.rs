mod common;

use std::{collections::HashSet, sync::Arc, time::Duration};

use bytes::Bytes;
use common::{FlakyHistoryStore, bucket, key, seeded_store};
use object_gateway::{
    InMemoryVersionedStore, ListVersionsRequest, ListingCursor, MaxKeys, RequestContext,
    StorageError, VersionListingService, VersionListingServiceImpl, VersionedBucketStore,
};
use tokio_util::sync::CancellationToken;

fn request(max_keys: usize, cursor: ListingCursor) -> ListVersionsRequest {
    ListVersionsRequest::builder()
        .bucket(bucket())
        .max_keys(MaxKeys::from(max_keys))
        .cursor(cursor)
        .build()
}

#[tokio::test]
async fn test_full_listing_splits_versions_and_delete_markers() {
    let store = seeded_store().await;
    let service = VersionListingServiceImpl::new(store);

    let page = service
        .list_object_versions(&RequestContext::default(), request(10, ListingCursor::default()))
        .await
        .unwrap();

    assert_eq!(page.versions.len(), 2);
    assert_eq!(page.delete_markers.len(), 1);
    assert!(!page.is_truncated);
    assert!(page.next_cursor.is_none());

    assert_eq!(page.versions[0].key.as_str(), "a");
    assert!(page.versions[0].is_latest);
    assert_eq!(page.versions[1].key.as_str(), "c");
    assert_eq!(page.delete_markers[0].key.as_str(), "a");
    assert!(!page.delete_markers[0].is_latest);
    assert_eq!(page.owner.display_name, "MaxIOFS");
}

#[tokio::test]
async fn test_single_entry_page_is_truncated() {
    let store = seeded_store().await;
    let service = VersionListingServiceImpl::new(store);

    let page = service
        .list_object_versions(&RequestContext::default(), request(1, ListingCursor::default()))
        .await
        .unwrap();

    assert_eq!(page.versions.len(), 1);
    assert!(page.delete_markers.is_empty());
    assert!(page.is_truncated);

    let newest = &page.versions[0];
    assert_eq!(
        page.next_cursor,
        Some(ListingCursor::new(newest.key.as_str(), newest.version_id.as_str()))
    );
}

/// Alternate live versions and delete markers, `writes` records per key
async fn versioned_store(keys: &[(&str, usize)]) -> Arc<InMemoryVersionedStore> {
    let store = Arc::new(InMemoryVersionedStore::new());
    store.create_bucket(&bucket()).await;
    for &(name, writes) in keys {
        for n in 0..writes {
            if n % 2 == 1 {
                store.delete_object(&bucket(), &key(name)).await.unwrap();
            } else {
                store
                    .put_object(&bucket(), &key(name), Bytes::from(format!("{name}-{n}")), None)
                    .await
                    .unwrap();
            }
        }
    }
    store
}

#[derive(Debug, Default, PartialEq)]
struct Collected {
    records: Vec<(String, String)>,
    common_prefixes: Vec<String>,
}

/// Follow next cursors until the listing is exhausted.
async fn list_all(
    service: &VersionListingServiceImpl,
    page_size: usize,
    delimiter: Option<&str>,
) -> Collected {
    let ctx = RequestContext::default();
    let mut cursor = ListingCursor::default();
    let mut collected = Collected::default();

    loop {
        let page = service
            .list_object_versions(
                &ctx,
                ListVersionsRequest::builder()
                    .bucket(bucket())
                    .maybe_delimiter(delimiter)
                    .max_keys(MaxKeys::from(page_size))
                    .cursor(cursor.clone())
                    .build(),
            )
            .await
            .unwrap();
        assert!(page.len() <= page_size);
        collected.records.extend(
            page.versions
                .iter()
                .chain(&page.delete_markers)
                .map(|r| (r.key.to_string(), r.version_id.to_string())),
        );
        collected.common_prefixes.extend(page.common_prefixes);
        match page.next_cursor {
            Some(next) => cursor = next,
            None => return collected,
        }
    }
}

#[tokio::test]
async fn test_paged_listing_matches_unbounded_listing() {
    let store = versioned_store(&[("a", 3), ("b", 1), ("d/1", 2), ("e", 4)]).await;
    let service = VersionListingServiceImpl::new(store);

    let mut expected = list_all(&service, 1000, None).await.records;
    expected.sort();
    assert_eq!(expected.len(), 10);

    for page_size in 1..=4 {
        let mut seen = list_all(&service, page_size, None).await.records;

        let unique: HashSet<_> = seen.iter().cloned().collect();
        assert_eq!(unique.len(), seen.len(), "duplicates with page size {page_size}");
        seen.sort();
        assert_eq!(seen, expected, "gaps with page size {page_size}");
    }
}

#[tokio::test]
async fn test_paged_delimiter_listing_reports_each_prefix_once() {
    let store = versioned_store(&[
        ("a", 2),
        ("b/1", 1),
        ("b/2", 2),
        ("c", 3),
        ("d/x/1", 1),
        ("e", 1),
    ])
    .await;
    let service = VersionListingServiceImpl::new(store);

    let full = list_all(&service, 1000, Some("/")).await;
    assert_eq!(full.common_prefixes, vec!["b/", "d/"]);
    assert_eq!(full.records.len(), 6);
    assert!(full.records.iter().all(|(key, _)| !key.contains('/')));

    for page_size in 1..=4 {
        let paged = list_all(&service, page_size, Some("/")).await;
        assert_eq!(
            paged.common_prefixes, full.common_prefixes,
            "prefixes with page size {page_size}"
        );
        assert_eq!(paged.records, full.records, "records with page size {page_size}");
    }
}

#[tokio::test]
async fn test_unreadable_history_falls_back_to_current_state() {
    let inner = seeded_store().await;
    let store = FlakyHistoryStore {
        inner,
        broken_keys: HashSet::from(["a".to_string()]),
    };
    let service = VersionListingServiceImpl::new(Arc::new(store));

    let page = service
        .list_object_versions(&RequestContext::default(), request(10, ListingCursor::default()))
        .await
        .unwrap();

    let a: Vec<_> = page
        .versions
        .iter()
        .filter(|r| r.key.as_str() == "a")
        .collect();
    assert_eq!(a.len(), 1);
    assert!(a[0].is_latest);
    assert!(page.delete_markers.is_empty());
    assert_eq!(page.versions.len(), 2);
}

#[tokio::test]
async fn test_missing_bucket_is_fatal() {
    let service = VersionListingServiceImpl::new(Arc::new(InMemoryVersionedStore::new()));

    let err = service
        .list_object_versions(&RequestContext::default(), request(10, ListingCursor::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::BucketNotFound { .. }));
}

#[tokio::test]
async fn test_cancelled_request_is_fatal() {
    let store = seeded_store().await;
    let service = VersionListingServiceImpl::new(store);
    let shutdown = CancellationToken::new();
    let ctx = RequestContext::new(shutdown.child_token());
    shutdown.cancel();

    let err = service
        .list_object_versions(&ctx, request(10, ListingCursor::default()))
        .await
        .unwrap_err();

    assert!(err.is_cancellation());
}

#[tokio::test]
async fn test_expired_deadline_is_fatal() {
    let store = seeded_store().await;
    let service = VersionListingServiceImpl::new(store);
    let ctx = RequestContext::default().with_timeout(Duration::ZERO);

    let err = service
        .list_object_versions(&ctx, request(10, ListingCursor::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Cancelled { .. }));
}

#[tokio::test]
async fn test_delimiter_groups_common_prefixes() {
    let store = Arc::new(InMemoryVersionedStore::new());
    store.create_bucket(&bucket()).await;
    for name in ["photos/2023/a.jpg", "photos/2024/b.jpg", "photos/c.jpg", "readme"] {
        store
            .put_object(&bucket(), &key(name), Bytes::from_static(b"x"), None)
            .await
            .unwrap();
    }
    let service = VersionListingServiceImpl::new(store.clone() as Arc<dyn VersionedBucketStore>);

    let page = service
        .list_object_versions(
            &RequestContext::default(),
            ListVersionsRequest::builder()
                .bucket(bucket())
                .prefix("photos/")
                .delimiter("/")
                .build(),
        )
        .await
        .unwrap();

    let keys: Vec<_> = page.versions.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["photos/c.jpg"]);
    assert_eq!(page.common_prefixes, vec!["photos/2023/", "photos/2024/"]);
}
