use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use super::log_request;
use crate::{
    adapters::inbound::http::{
        dto::{ListVersionsEcho, ListVersionsResultDto},
        error::S3ErrorResponse,
        router::AppState,
    },
    domain::{
        models::{ListVersionsRequest, ListingCursor, MaxKeys},
        value_objects::BucketName,
    },
};

/// Handle `GET /{bucket}`; only the `versions` sub-resource is supported
pub async fn get_bucket(
    State(app_state): State<AppState>,
    Path(bucket): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let resource = format!("/{}", bucket);
    log_request(&headers, "GetBucket", &bucket, "");

    if !query.contains_key("versions") {
        return S3ErrorResponse::not_implemented(resource).into_response();
    }

    let bucket_name = match BucketName::new(&bucket) {
        Ok(bucket_name) => bucket_name,
        Err(e) => return S3ErrorResponse::invalid_bucket_name(e.to_string(), resource).into_response(),
    };

    let param = |name: &str| query.get(name).cloned().unwrap_or_default();
    let request = ListVersionsRequest::builder()
        .bucket(bucket_name)
        .owner(app_state.owner.clone())
        .maybe_prefix(query.get("prefix").cloned())
        .maybe_delimiter(query.get("delimiter").cloned())
        .cursor(ListingCursor::new(
            param("key-marker"),
            param("version-id-marker"),
        ))
        .max_keys(MaxKeys::parse(query.get("max-keys").map(String::as_str)))
        .build();

    let echo = ListVersionsEcho {
        bucket,
        prefix: request.prefix().to_string(),
        key_marker: request.cursor.key_marker.clone(),
        version_id_marker: request.cursor.version_id_marker.clone(),
        delimiter: request.delimiter().map(str::to_string),
        max_keys: request.max_keys.get(),
    };

    let ctx = app_state.request_context();
    let page = match app_state
        .version_listing
        .list_object_versions(&ctx, request)
        .await
    {
        Ok(page) => page,
        Err(e) => {
            error!(bucket = %echo.bucket, error = %e, "Failed to list object versions");
            return S3ErrorResponse::internal(e.to_string(), resource).into_response();
        }
    };

    match ListVersionsResultDto::from_page(echo, &page).to_xml() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/xml")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render version listing");
            S3ErrorResponse::internal("Failed to render version listing", resource).into_response()
        }
    }
}
