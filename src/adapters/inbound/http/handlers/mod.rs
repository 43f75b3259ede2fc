pub mod object_handlers;
pub mod versioning_handlers;

pub use object_handlers::*;
pub use versioning_handlers::*;

use axum::http::{HeaderMap, header};
use tracing::{debug, info};

use crate::services::is_known_backup_client;

fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Backup software traffic is logged at info, everything else at debug.
fn log_request(headers: &HeaderMap, operation: &str, bucket: &str, key: &str) {
    let user_agent = user_agent(headers);
    if is_known_backup_client(user_agent) {
        info!(operation, bucket, key, user_agent, "Backup client request");
    } else {
        debug!(operation, bucket, key, user_agent, "Request");
    }
}
