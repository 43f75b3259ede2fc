use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use super::handlers::{get_bucket, get_object};
use crate::{
    domain::models::Owner,
    ports::{
        context::RequestContext,
        services::{VersionListingService, VirtualObjectService},
        storage::VersionedBucketStore,
    },
};

/// Application state containing all services
#[derive(Clone)]
pub struct AppState {
    pub version_listing: Arc<dyn VersionListingService>,
    pub virtual_objects: Arc<dyn VirtualObjectService>,
    /// Backend for reads that are not synthetic
    pub store: Arc<dyn VersionedBucketStore>,
    pub owner: Owner,
    pub backend_timeout: Option<Duration>,
    /// Cancelled on server shutdown
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Cancellation scope for one request
    pub fn request_context(&self) -> RequestContext {
        let ctx = RequestContext::new(self.shutdown.child_token());
        match self.backend_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/{bucket}", get(get_bucket))
        .route("/{bucket}/{*key}", get(get_object))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::app::create_in_memory_app;

    #[tokio::test]
    async fn test_bucket_listing_without_versions_is_not_implemented() {
        let app = create_in_memory_app().await.unwrap();
        let router = create_router(app.state);

        let response = router
            .oneshot(Request::get("/b").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_request_contexts() {
        let app = create_in_memory_app().await.unwrap();
        let ctx = app.state.request_context();
        assert!(!ctx.is_cancelled());

        app.state.shutdown.cancel();
        assert!(ctx.is_cancelled());
    }
}
