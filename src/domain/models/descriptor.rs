use bytes::Bytes;
use quick_xml::DeError;
use serde::Serialize;

use crate::xml;

/// Hidden folder that backup software probes for storage capabilities
pub const SYSTEM_FOLDER: &str = ".system-d26a9498-cb7c-4a87-a44a-8ae204f5ba6c";
pub const SYSTEM_XML_SUFFIX: &str = ".system-d26a9498-cb7c-4a87-a44a-8ae204f5ba6c/system.xml";
pub const CAPACITY_XML_SUFFIX: &str = ".system-d26a9498-cb7c-4a87-a44a-8ae204f5ba6c/capacity.xml";

pub const XML_CONTENT_TYPE: &str = "application/xml";

/// The reserved objects that are generated instead of read from storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticKind {
    SystemInfo,
    CapacityInfo,
}

impl SyntheticKind {
    /// Match a key against the reserved suffixes, under any prefix.
    pub fn from_key(key: &str) -> Option<Self> {
        if key.ends_with(SYSTEM_XML_SUFFIX) {
            Some(SyntheticKind::SystemInfo)
        } else if key.ends_with(CAPACITY_XML_SUFFIX) {
            Some(SyntheticKind::CapacityInfo)
        } else {
            None
        }
    }
}

/// Generated body of a synthetic object
#[derive(Debug, Clone)]
pub struct SyntheticObject {
    pub kind: SyntheticKind,
    pub data: Bytes,
    pub content_type: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolCapabilities {
    pub capacity_info: bool,
    pub upload_sessions: bool,
    pub iam_sts: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    pub iam_endpoint: String,
    pub sts_endpoint: String,
}

/// Tuning hints; unset limits are left out of the document entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemRecommendations {
    pub kb_block_size: u32,
    pub s3_concurrent_task_limit: Option<u32>,
    pub s3_multi_object_delete_limit: Option<u32>,
    pub storage_current_task_limit: Option<u32>,
}

/// Contents of the `system.xml` capability document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemDescriptor {
    pub protocol_version: String,
    pub model_name: String,
    pub capabilities: ProtocolCapabilities,
    pub endpoints: Option<ApiEndpoints>,
    pub recommendations: SystemRecommendations,
}

impl SystemDescriptor {
    pub const PROTOCOL_VERSION: &'static str = "1.0";
    pub const KB_BLOCK_SIZE: u32 = 1024;

    /// Capacity reporting only: no upload sessions, no IAM/STS endpoints.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            protocol_version: Self::PROTOCOL_VERSION.to_string(),
            model_name: model_name.into(),
            capabilities: ProtocolCapabilities {
                capacity_info: true,
                upload_sessions: false,
                iam_sts: false,
            },
            endpoints: None,
            recommendations: SystemRecommendations {
                kb_block_size: Self::KB_BLOCK_SIZE,
                s3_concurrent_task_limit: None,
                s3_multi_object_delete_limit: None,
                storage_current_task_limit: None,
            },
        }
    }

    /// Compact XML rendering
    pub fn to_xml(&self) -> Result<String, DeError> {
        let recommendations = &self.recommendations;
        let document = SystemInfoXml {
            protocol_version: &self.protocol_version,
            model_name: &self.model_name,
            capabilities: CapabilitiesXml {
                capacity_info: self.capabilities.capacity_info,
                upload_sessions: self.capabilities.upload_sessions,
                iam_sts: self.capabilities.iam_sts,
            },
            endpoints: self
                .endpoints
                .as_ref()
                .filter(|_| self.capabilities.iam_sts)
                .map(|endpoints| EndpointsXml {
                    iam_endpoint: &endpoints.iam_endpoint,
                    sts_endpoint: &endpoints.sts_endpoint,
                }),
            recommendations: RecommendationsXml {
                s3_concurrent_task_limit: recommendations.s3_concurrent_task_limit,
                s3_multi_object_delete_limit: recommendations.s3_multi_object_delete_limit,
                storage_current_task_limit: recommendations.storage_current_task_limit,
                kb_block_size: recommendations.kb_block_size,
            },
        };

        xml::to_document(&document, None)
    }
}

/// Contents of the `capacity.xml` document, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityDescriptor {
    pub capacity: u64,
    pub available: u64,
    pub used: u64,
}

impl CapacityDescriptor {
    /// 1 TiB
    pub const FALLBACK_CAPACITY: u64 = 1024 * 1024 * 1024 * 1024;
    /// 900 GiB
    pub const FALLBACK_AVAILABLE: u64 = 900 * 1024 * 1024 * 1024;

    /// `used` never goes negative when the two readings disagree.
    pub fn new(capacity: u64, available: u64) -> Self {
        Self {
            capacity,
            available,
            used: capacity.saturating_sub(available),
        }
    }

    pub fn fallback() -> Self {
        Self::new(Self::FALLBACK_CAPACITY, Self::FALLBACK_AVAILABLE)
    }

    /// Two-space indented XML rendering
    pub fn to_xml(&self) -> Result<String, DeError> {
        let document = CapacityInfoXml {
            capacity: self.capacity,
            available: self.available,
            used: self.used,
        };

        xml::to_document(&document, Some(2))
    }
}

#[derive(Serialize)]
#[serde(rename = "SystemInfo")]
struct SystemInfoXml<'a> {
    #[serde(rename = "ProtocolVersion")]
    protocol_version: &'a str,
    #[serde(rename = "ModelName")]
    model_name: &'a str,
    #[serde(rename = "ProtocolCapabilities")]
    capabilities: CapabilitiesXml,
    #[serde(rename = "APIEndpoints", skip_serializing_if = "Option::is_none")]
    endpoints: Option<EndpointsXml<'a>>,
    #[serde(rename = "SystemRecommendations")]
    recommendations: RecommendationsXml,
}

#[derive(Serialize)]
struct CapabilitiesXml {
    #[serde(rename = "CapacityInfo")]
    capacity_info: bool,
    #[serde(rename = "UploadSessions")]
    upload_sessions: bool,
    #[serde(rename = "IAMSTS")]
    iam_sts: bool,
}

#[derive(Serialize)]
struct EndpointsXml<'a> {
    #[serde(rename = "IAMEndpoint")]
    iam_endpoint: &'a str,
    #[serde(rename = "STSEndpoint")]
    sts_endpoint: &'a str,
}

#[derive(Serialize)]
struct RecommendationsXml {
    #[serde(rename = "S3ConcurrentTaskLimit", skip_serializing_if = "Option::is_none")]
    s3_concurrent_task_limit: Option<u32>,
    #[serde(rename = "S3MultiObjectDeleteLimit", skip_serializing_if = "Option::is_none")]
    s3_multi_object_delete_limit: Option<u32>,
    #[serde(rename = "StorageCurrentTaskLimit", skip_serializing_if = "Option::is_none")]
    storage_current_task_limit: Option<u32>,
    #[serde(rename = "KbBlockSize")]
    kb_block_size: u32,
}

#[derive(Serialize)]
#[serde(rename = "CapacityInfo")]
struct CapacityInfoXml {
    #[serde(rename = "Capacity")]
    capacity: u64,
    #[serde(rename = "Available")]
    available: u64,
    #[serde(rename = "Used")]
    used: u64,
}
