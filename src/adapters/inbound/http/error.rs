use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{domain::errors::StorageError, xml};

/// S3 `<Error>` document returned for failed requests
#[derive(Debug, Clone)]
pub struct S3ErrorResponse {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub resource: String,
    pub request_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "Error")]
pub struct S3ErrorDto {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Resource")]
    pub resource: String,
    #[serde(rename = "RequestId")]
    pub request_id: String,
}

impl S3ErrorResponse {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            resource: resource.into(),
            request_id: Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn internal(message: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "InternalError",
            message,
            resource,
        )
    }

    pub fn not_implemented(resource: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_IMPLEMENTED,
            "NotImplemented",
            "A header or query you provided implies functionality that is not implemented",
            resource,
        )
    }

    pub fn invalid_bucket_name(message: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "InvalidBucketName", message, resource)
    }

    pub fn invalid_argument(message: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "InvalidArgument", message, resource)
    }

    pub fn from_storage_error(err: &StorageError, resource: impl Into<String>) -> Self {
        let code = match err {
            StorageError::BucketNotFound { .. } => "NoSuchBucket",
            StorageError::ObjectNotFound { .. } => "NoSuchKey",
            StorageError::ValidationError { .. } => "InvalidArgument",
            StorageError::Cancelled { .. } => "ServiceUnavailable",
            StorageError::InfrastructureError { .. } => "InternalError",
        };
        Self::new(StatusCode::from(err), code, err.to_string(), resource)
    }

    fn to_dto(&self) -> S3ErrorDto {
        S3ErrorDto {
            code: self.code.to_string(),
            message: self.message.clone(),
            resource: self.resource.clone(),
            request_id: self.request_id.clone(),
        }
    }
}

impl IntoResponse for S3ErrorResponse {
    fn into_response(self) -> Response {
        let body = match xml::to_document(&self.to_dto(), None) {
            Ok(body) => body,
            Err(err) => {
                error!(error = %err, code = self.code, "Failed to render error document");
                return (StatusCode::INTERNAL_SERVER_ERROR, self.message).into_response();
            }
        };

        (
            self.status,
            [
                (header::CONTENT_TYPE, "application/xml".to_string()),
                (header::HeaderName::from_static("x-amz-request-id"), self.request_id),
            ],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ObjectKey;

    #[test]
    fn test_storage_error_codes() {
        let err = StorageError::ObjectNotFound {
            key: ObjectKey::new("a").unwrap(),
        };
        let response = S3ErrorResponse::from_storage_error(&err, "/b/a");
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.code, "NoSuchKey");
        assert_eq!(response.request_id.len(), 32);
    }

    #[test]
    fn test_error_document() {
        let response = S3ErrorResponse::not_implemented("/b");
        let xml = xml::to_document(&response.to_dto(), None).unwrap();
        assert!(xml.contains("<Code>NotImplemented</Code>"));
        assert!(xml.contains("<Resource>/b</Resource>"));

        let response = response.into_response();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/xml"
        );
    }
}
