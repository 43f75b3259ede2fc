use chrono::{DateTime, Utc};

use crate::domain::value_objects::{ObjectKey, VersionId};

/// Identity reported as the owner of every listed version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: String,
    pub display_name: String,
}

impl Owner {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

impl Default for Owner {
    fn default() -> Self {
        Self::new("maxiofs", "MaxIOFS")
    }
}

/// Storage classes for object versions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageClass {
    #[default]
    Standard,
}

impl StorageClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageClass::Standard => "STANDARD",
        }
    }
}

/// What a version record stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionKind {
    Live {
        etag: String,
        size: u64,
        storage_class: StorageClass,
    },
    DeleteMarker,
}

impl VersionKind {
    pub fn live(etag: impl Into<String>, size: u64) -> Self {
        VersionKind::Live {
            etag: etag.into(),
            size,
            storage_class: StorageClass::Standard,
        }
    }

    /// Classify a record coming from a backend that has no explicit tombstone flag.
    ///
    /// An empty payload with no content hash is taken to be a delete marker. This
    /// cannot tell a tombstone apart from a legitimately empty object that was
    /// stored without a hash, so tagged backends should never go through here.
    pub fn infer(size: u64, etag: Option<&str>) -> Self {
        match etag.filter(|etag| !etag.is_empty()) {
            None if size == 0 => VersionKind::DeleteMarker,
            etag => VersionKind::live(etag.unwrap_or_default(), size),
        }
    }

    pub fn is_delete_marker(&self) -> bool {
        matches!(self, VersionKind::DeleteMarker)
    }
}

/// One historical state of a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectVersionRecord {
    pub key: ObjectKey,
    pub version_id: VersionId,
    pub is_latest: bool,
    pub last_modified: DateTime<Utc>,
    pub kind: VersionKind,
}

impl ObjectVersionRecord {
    pub fn is_delete_marker(&self) -> bool {
        self.kind.is_delete_marker()
    }
}
