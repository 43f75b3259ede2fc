use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use super::log_request;
use crate::{
    adapters::inbound::http::{error::S3ErrorResponse, router::AppState},
    domain::{
        errors::ResolveError,
        models::{StoredObject, SyntheticObject},
        value_objects::{BucketName, ObjectKey},
    },
};

const VERSION_ID_HEADER: HeaderName = HeaderName::from_static("x-amz-version-id");

/// Handle `GET /{bucket}/{*key}`: synthetic documents first, then storage
pub async fn get_object(
    State(app_state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let resource = format!("/{}/{}", bucket, key);
    log_request(&headers, "GetObject", &bucket, &key);

    if app_state.virtual_objects.is_synthetic_object(&key) {
        match app_state.virtual_objects.resolve(&key).await {
            Ok(object) => return synthetic_response(object),
            Err(ResolveError::NotSynthetic { .. }) => {}
            Err(e) => {
                error!(%bucket, %key, error = %e, "Failed to generate synthetic object");
                return S3ErrorResponse::internal(e.to_string(), resource).into_response();
            }
        }
    }

    let bucket_name = match BucketName::new(&bucket) {
        Ok(bucket_name) => bucket_name,
        Err(e) => return S3ErrorResponse::invalid_bucket_name(e.to_string(), resource).into_response(),
    };
    let object_key = match ObjectKey::new(&key) {
        Ok(object_key) => object_key,
        Err(e) => return S3ErrorResponse::invalid_argument(e.to_string(), resource).into_response(),
    };

    let ctx = app_state.request_context();
    let store = &app_state.store;
    match ctx
        .run("get_object", store.get_object(&ctx, &bucket_name, &object_key))
        .await
    {
        Ok(object) => stored_response(object),
        Err(e) => S3ErrorResponse::from_storage_error(&e, resource).into_response(),
    }
}

fn synthetic_response(object: SyntheticObject) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, object.content_type)],
        Body::from(object.data),
    )
        .into_response()
}

fn stored_response(object: StoredObject) -> Response {
    let mut headers = HeaderMap::new();
    let content_type = object
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    let values = [
        (header::CONTENT_TYPE, Some(content_type.to_string())),
        (header::ETAG, object.etag.as_ref().map(|etag| format!("\"{}\"", etag))),
        (
            header::LAST_MODIFIED,
            Some(
                object
                    .last_modified
                    .format("%a, %d %b %Y %H:%M:%S GMT")
                    .to_string(),
            ),
        ),
        (
            VERSION_ID_HEADER,
            object.version_id.as_ref().map(ToString::to_string),
        ),
    ];
    for (name, value) in values {
        if let Some(value) = value.and_then(|v| HeaderValue::from_str(&v).ok()) {
            headers.insert(name, value);
        }
    }

    (StatusCode::OK, headers, Body::from(object.data)).into_response()
}
