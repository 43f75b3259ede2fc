use bon::Builder;
use chrono::{DateTime, Utc};

use crate::domain::{
    models::version::{ObjectVersionRecord, Owner, VersionKind},
    value_objects::{BucketName, ObjectKey, VersionId},
};

/// Upper bound (and default) for entries returned in one listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxKeys(usize);

impl MaxKeys {
    pub const LIMIT: usize = 1000;

    /// Parse the `max-keys` query parameter.
    ///
    /// Missing, unparsable and non-positive values select the default; anything
    /// above the limit is capped.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|&value| value > 0)
            .map(|value| Self(value.min(Self::LIMIT as i64) as usize))
            .unwrap_or_default()
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for MaxKeys {
    fn default() -> Self {
        Self(Self::LIMIT)
    }
}

impl From<usize> for MaxKeys {
    fn from(value: usize) -> Self {
        match value {
            0 => Self::default(),
            value => Self(value.min(Self::LIMIT)),
        }
    }
}

/// Pagination position carried between listing requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingCursor {
    pub key_marker: String,
    pub version_id_marker: String,
}

impl ListingCursor {
    pub fn new(key_marker: impl Into<String>, version_id_marker: impl Into<String>) -> Self {
        Self {
            key_marker: key_marker.into(),
            version_id_marker: version_id_marker.into(),
        }
    }

    /// Key whose history was only partially returned by the previous page
    pub fn resume_key(&self) -> Option<&str> {
        (!self.key_marker.is_empty() && !self.version_id_marker.is_empty())
            .then_some(self.key_marker.as_str())
    }
}

/// Parameters of one ListObjectVersions call
#[derive(Debug, Clone, Builder)]
pub struct ListVersionsRequest {
    pub bucket: BucketName,
    #[builder(default)]
    pub owner: Owner,
    #[builder(into)]
    pub prefix: Option<String>,
    #[builder(into)]
    pub delimiter: Option<String>,
    #[builder(default)]
    pub cursor: ListingCursor,
    #[builder(default)]
    pub max_keys: MaxKeys,
}

impl ListVersionsRequest {
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or_default()
    }

    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref().filter(|d| !d.is_empty())
    }
}

/// One page of a version listing
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub owner: Owner,
    pub versions: Vec<ObjectVersionRecord>,
    pub delete_markers: Vec<ObjectVersionRecord>,
    pub common_prefixes: Vec<String>,
    pub is_truncated: bool,
    pub next_cursor: Option<ListingCursor>,
}

impl ListingPage {
    /// Build a page from the merged, already truncated entry sequence.
    ///
    /// `next_cursor` is only kept when `is_truncated` is set.
    pub fn from_entries(
        owner: Owner,
        entries: Vec<ObjectVersionRecord>,
        common_prefixes: Vec<String>,
        is_truncated: bool,
    ) -> Self {
        let next_cursor = entries
            .last()
            .filter(|_| is_truncated)
            .map(|last| ListingCursor::new(last.key.as_str(), last.version_id.as_str()));

        let (delete_markers, versions) = entries
            .into_iter()
            .partition(ObjectVersionRecord::is_delete_marker);

        Self {
            owner,
            versions,
            delete_markers,
            common_prefixes,
            is_truncated: next_cursor.is_some(),
            next_cursor,
        }
    }

    pub fn len(&self) -> usize {
        self.versions.len() + self.delete_markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Key listing parameters passed to the storage backend
#[derive(Debug, Clone, Default)]
pub struct ListObjectsParams {
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    /// Exclusive lower bound on returned keys and common prefixes
    pub marker: Option<String>,
    pub limit: usize,
}

impl ListObjectsParams {
    /// Group `key` under a common prefix if the delimiter occurs after the prefix.
    pub fn common_prefix_of<'k>(&self, key: &'k str) -> Option<&'k str> {
        let prefix = self.prefix.as_deref().unwrap_or_default();
        let delimiter = self.delimiter.as_deref().filter(|d| !d.is_empty())?;
        let rest = key.strip_prefix(prefix)?;
        rest.find(delimiter)
            .map(|idx| &key[..prefix.len() + idx + delimiter.len()])
    }

    pub fn matches_prefix(&self, key: &str) -> bool {
        key.starts_with(self.prefix.as_deref().unwrap_or_default())
    }

    pub fn is_after_marker(&self, item: &str) -> bool {
        self.marker.as_deref().map_or(true, |marker| item > marker)
    }
}

/// Current-state metadata for a key, as returned by a key listing
#[derive(Debug, Clone)]
pub struct ObjectListItem {
    pub key: ObjectKey,
    pub size: u64,
    pub etag: Option<String>,
    pub last_modified: DateTime<Utc>,
    pub version_id: Option<VersionId>,
}

impl ObjectListItem {
    /// Stand-in history for a key whose version history could not be read
    pub fn to_latest_record(&self) -> ObjectVersionRecord {
        ObjectVersionRecord {
            key: self.key.clone(),
            version_id: self.version_id.clone().unwrap_or_else(VersionId::null),
            is_latest: true,
            last_modified: self.last_modified,
            kind: VersionKind::infer(self.size, self.etag.as_deref()),
        }
    }
}

/// Result of one backend key listing call
#[derive(Debug, Clone, Default)]
pub struct ObjectListing {
    pub objects: Vec<ObjectListItem>,
    pub common_prefixes: Vec<String>,
    pub is_truncated: bool,
    /// Marker to pass to the next call, set when truncated
    pub next_marker: Option<String>,
}
