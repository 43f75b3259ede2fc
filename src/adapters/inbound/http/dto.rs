use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::models::{ListingPage, ObjectVersionRecord, Owner, VersionKind},
    xml::S3_NAMESPACE,
};

/// XML body of a ListObjectVersions response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename = "ListVersionsResult")]
pub struct ListVersionsResultDto {
    #[serde(rename = "@xmlns", default)]
    pub xmlns: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Prefix", default)]
    pub prefix: String,
    #[serde(rename = "KeyMarker", default)]
    pub key_marker: String,
    #[serde(rename = "VersionIdMarker", default)]
    pub version_id_marker: String,
    #[serde(rename = "NextKeyMarker", skip_serializing_if = "Option::is_none", default)]
    pub next_key_marker: Option<String>,
    #[serde(
        rename = "NextVersionIdMarker",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub next_version_id_marker: Option<String>,
    #[serde(rename = "MaxKeys")]
    pub max_keys: usize,
    #[serde(rename = "Delimiter", skip_serializing_if = "Option::is_none", default)]
    pub delimiter: Option<String>,
    #[serde(rename = "IsTruncated")]
    pub is_truncated: bool,
    #[serde(rename = "Version", default)]
    pub versions: Vec<VersionDto>,
    #[serde(rename = "DeleteMarker", default)]
    pub delete_markers: Vec<DeleteMarkerDto>,
    #[serde(rename = "CommonPrefixes", default)]
    pub common_prefixes: Vec<CommonPrefixDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDto {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "VersionId")]
    pub version_id: String,
    #[serde(rename = "IsLatest")]
    pub is_latest: bool,
    #[serde(rename = "LastModified")]
    pub last_modified: String,
    #[serde(rename = "ETag")]
    pub etag: String,
    #[serde(rename = "Size")]
    pub size: u64,
    #[serde(rename = "Owner")]
    pub owner: OwnerDto,
    #[serde(rename = "StorageClass")]
    pub storage_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteMarkerDto {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "VersionId")]
    pub version_id: String,
    #[serde(rename = "IsLatest")]
    pub is_latest: bool,
    #[serde(rename = "LastModified")]
    pub last_modified: String,
    #[serde(rename = "Owner")]
    pub owner: OwnerDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerDto {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "DisplayName")]
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonPrefixDto {
    #[serde(rename = "Prefix")]
    pub prefix: String,
}

/// Request parameters echoed back in the listing document
#[derive(Debug, Clone, Default)]
pub struct ListVersionsEcho {
    pub bucket: String,
    pub prefix: String,
    pub key_marker: String,
    pub version_id_marker: String,
    pub delimiter: Option<String>,
    pub max_keys: usize,
}

/// S3 timestamp format, millisecond precision in UTC
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<&Owner> for OwnerDto {
    fn from(owner: &Owner) -> Self {
        Self {
            id: owner.id.clone(),
            display_name: owner.display_name.clone(),
        }
    }
}

impl VersionDto {
    fn from_record(record: &ObjectVersionRecord, owner: &Owner) -> Option<Self> {
        match &record.kind {
            VersionKind::Live {
                etag,
                size,
                storage_class,
            } => Some(Self {
                key: record.key.to_string(),
                version_id: record.version_id.to_string(),
                is_latest: record.is_latest,
                last_modified: format_timestamp(&record.last_modified),
                etag: format!("\"{}\"", etag),
                size: *size,
                owner: owner.into(),
                storage_class: storage_class.as_str().to_string(),
            }),
            VersionKind::DeleteMarker => None,
        }
    }
}

impl DeleteMarkerDto {
    fn from_record(record: &ObjectVersionRecord, owner: &Owner) -> Self {
        Self {
            key: record.key.to_string(),
            version_id: record.version_id.to_string(),
            is_latest: record.is_latest,
            last_modified: format_timestamp(&record.last_modified),
            owner: owner.into(),
        }
    }
}

impl ListVersionsResultDto {
    pub fn from_page(echo: ListVersionsEcho, page: &ListingPage) -> Self {
        let next = page.next_cursor.as_ref().filter(|_| page.is_truncated);

        Self {
            xmlns: S3_NAMESPACE.to_string(),
            name: echo.bucket,
            prefix: echo.prefix,
            key_marker: echo.key_marker,
            version_id_marker: echo.version_id_marker,
            next_key_marker: next.map(|cursor| cursor.key_marker.clone()),
            next_version_id_marker: next.map(|cursor| cursor.version_id_marker.clone()),
            max_keys: echo.max_keys,
            delimiter: echo.delimiter,
            is_truncated: page.is_truncated,
            versions: page
                .versions
                .iter()
                .filter_map(|record| VersionDto::from_record(record, &page.owner))
                .collect(),
            delete_markers: page
                .delete_markers
                .iter()
                .map(|record| DeleteMarkerDto::from_record(record, &page.owner))
                .collect(),
            common_prefixes: page
                .common_prefixes
                .iter()
                .map(|prefix| CommonPrefixDto {
                    prefix: prefix.clone(),
                })
                .collect(),
        }
    }

    pub fn to_xml(&self) -> Result<String, quick_xml::DeError> {
        crate::xml::to_document(self, Some(2))
    }

    pub fn from_xml(xml: &str) -> Result<Self, quick_xml::DeError> {
        quick_xml::de::from_str(xml)
    }
}
