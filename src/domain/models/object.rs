use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::domain::value_objects::{ObjectKey, VersionId};

/// Current state of an object, as read through to the backend
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: ObjectKey,
    pub version_id: Option<VersionId>,
    pub data: Bytes,
    pub content_type: Option<String>,
    pub etag: Option<String>,
    pub last_modified: DateTime<Utc>,
}
