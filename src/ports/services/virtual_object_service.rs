use async_trait::async_trait;

use crate::domain::{errors::ResolveError, models::SyntheticObject};

/// Service port for the reserved objects that are generated on read
#[async_trait]
pub trait VirtualObjectService: Send + Sync + 'static {
    fn is_synthetic_object(&self, key: &str) -> bool;

    /// Generate the body of a synthetic object.
    ///
    /// Fails with [`ResolveError::NotSynthetic`] for any other key, in which case
    /// the caller should read the object from storage instead.
    async fn resolve(&self, key: &str) -> Result<SyntheticObject, ResolveError>;
}
