pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;
pub mod xml;

// Re-export key types for convenience

// Domain types - core business entities and value objects
pub use domain::{
    // Value objects
    BucketName,
    // Models
    CapacityDescriptor,
    DomainValidationError,
    ResolveError,
    ListVersionsRequest,
    ListingCursor,
    ListingPage,
    MaxKeys,
    ObjectKey,
    ObjectVersionRecord,
    Owner,
    // Errors
    StorageError,
    StorageResult,
    SyntheticObject,
    SystemDescriptor,
    VersionId,
    VersionKind,
};

// Port types - interfaces for external systems
pub use ports::{
    DiskUsage,
    // Storage ports
    DiskUsageProbe,
    RequestContext,
    VersionedBucketStore,
    // Service ports
    VersionListingService,
    VirtualObjectService,
};

// Service implementations - business logic
pub use services::{VersionListingServiceImpl, VirtualObjectServiceImpl, is_known_backup_client};

// Application factory and configuration
pub use app::{
    AppBuilder, AppConfig, AppDependencies, AppError, AppServices, StorageBackend,
    create_app_from_env, create_in_memory_app, create_object_store_app,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{InMemoryVersionedStore, ObjectStoreBackend};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        AppBuilder, AppServices, BucketName, InMemoryVersionedStore, ListVersionsRequest,
        ObjectKey, ObjectStoreBackend, RequestContext, VersionId, VersionListingService,
        VersionedBucketStore, VirtualObjectService, create_in_memory_app,
    };
}
