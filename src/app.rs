use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::Router;
use object_store::{local::LocalFileSystem, memory::InMemory};
use tokio_util::sync::CancellationToken;

use crate::{
    adapters::{
        inbound::http::{AppState, create_router},
        outbound::{
            storage::{InMemoryVersionedStore, ObjectStoreBackend},
            system::Fs2DiskUsage,
        },
    },
    domain::models::Owner,
    ports::storage::{DiskUsageProbe, VersionedBucketStore},
    services::{VersionListingServiceImpl, VirtualObjectServiceImpl},
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    /// Directory whose filesystem is reported in `capacity.xml`
    pub data_dir: Option<PathBuf>,
    pub owner: Owner,
    pub model_name: String,
    /// Upper bound for each request's backend work
    pub backend_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::InMemory,
            data_dir: None,
            owner: Owner::default(),
            model_name: VirtualObjectServiceImpl::DEFAULT_MODEL_NAME.to_string(),
            backend_timeout: None,
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Versioned in-process store
    InMemory,
    /// Unversioned objects on the local filesystem, one directory per bucket
    LocalFileSystem { root: PathBuf },
}

/// Application dependencies container
pub struct AppDependencies {
    pub store: Arc<dyn VersionedBucketStore>,
    pub disk_usage: Arc<dyn DiskUsageProbe>,
}

/// Application services container
pub struct AppServices {
    pub version_listing_service: Arc<VersionListingServiceImpl>,
    pub virtual_object_service: Arc<VirtualObjectServiceImpl>,
    pub state: AppState,
}

impl AppServices {
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
    store: Option<Arc<dyn VersionedBucketStore>>,
    disk_usage: Option<Arc<dyn DiskUsageProbe>>,
    shutdown: CancellationToken,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            store: None,
            disk_usage: None,
            shutdown: CancellationToken::new(),
        }
    }

    /// Configure with custom config
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = Some(data_dir.into());
        self
    }

    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.config.owner = owner;
        self
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.config.model_name = model_name.into();
        self
    }

    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.config.backend_timeout = Some(timeout);
        self
    }

    /// Use an already constructed store instead of `storage_backend`
    pub fn with_store(mut self, store: Arc<dyn VersionedBucketStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_disk_usage_probe(mut self, probe: Arc<dyn DiskUsageProbe>) -> Self {
        self.disk_usage = Some(probe);
        self
    }

    /// Token whose cancellation aborts all in-flight backend work
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Build the application dependencies
    pub async fn build_dependencies(&self) -> Result<AppDependencies, AppError> {
        let store = match &self.store {
            Some(store) => store.clone(),
            None => self.create_store()?,
        };
        let disk_usage = self
            .disk_usage
            .clone()
            .unwrap_or_else(|| Arc::new(Fs2DiskUsage) as Arc<dyn DiskUsageProbe>);

        Ok(AppDependencies { store, disk_usage })
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let deps = self.build_dependencies().await?;

        let data_dir = self.config.data_dir.clone().or_else(|| match &self.config.storage_backend {
            StorageBackend::LocalFileSystem { root } => Some(root.clone()),
            StorageBackend::InMemory => None,
        });

        let version_listing_service = Arc::new(VersionListingServiceImpl::new(deps.store.clone()));
        let virtual_object_service = Arc::new(VirtualObjectServiceImpl::new(
            self.config.model_name.clone(),
            data_dir,
            deps.disk_usage,
        ));

        let state = AppState {
            version_listing: version_listing_service.clone(),
            virtual_objects: virtual_object_service.clone(),
            store: deps.store,
            owner: self.config.owner,
            backend_timeout: self.config.backend_timeout,
            shutdown: self.shutdown,
        };

        Ok(AppServices {
            version_listing_service,
            virtual_object_service,
            state,
        })
    }

    /// Create the storage backend based on configuration
    fn create_store(&self) -> Result<Arc<dyn VersionedBucketStore>, AppError> {
        match &self.config.storage_backend {
            StorageBackend::InMemory => Ok(Arc::new(InMemoryVersionedStore::new())),
            StorageBackend::LocalFileSystem { root } => {
                std::fs::create_dir_all(root).map_err(|e| AppError::StorageInit {
                    message: format!("Cannot create {}: {}", root.display(), e),
                })?;
                let local =
                    LocalFileSystem::new_with_prefix(root).map_err(|e| AppError::StorageInit {
                        message: e.to_string(),
                    })?;
                Ok(Arc::new(ObjectStoreBackend::new(Arc::new(local))))
            }
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },
}

/// Convenience functions for common configurations
///
/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .build()
        .await
}

/// Create an application over an unversioned store, for tests against `object_store` directly
pub async fn create_object_store_app(
    store: Arc<dyn object_store::ObjectStore>,
) -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_store(Arc::new(ObjectStoreBackend::new(store)))
        .build()
        .await
}

/// Create application from environment variables
pub async fn create_app_from_env() -> Result<AppServices, AppError> {
    let mut config = AppConfig::default();
    let data_dir = std::env::var("DATA_DIR").ok().map(PathBuf::from);

    config.storage_backend = match std::env::var("STORAGE_BACKEND").as_deref() {
        Ok("local") => StorageBackend::LocalFileSystem {
            root: data_dir.clone().ok_or_else(|| AppError::Configuration {
                message: "DATA_DIR environment variable required".to_string(),
            })?,
        },
        Ok("memory") | Err(_) => StorageBackend::InMemory,
        Ok(other) => {
            return Err(AppError::Configuration {
                message: format!("Unknown STORAGE_BACKEND '{}'", other),
            });
        }
    };
    config.data_dir = data_dir;

    if let Ok(id) = std::env::var("OWNER_ID") {
        let display_name = std::env::var("OWNER_DISPLAY_NAME").unwrap_or_else(|_| id.clone());
        config.owner = Owner::new(id, display_name);
    }
    if let Ok(model_name) = std::env::var("MODEL_NAME") {
        config.model_name = model_name;
    }
    if let Ok(secs) = std::env::var("BACKEND_TIMEOUT_SECS") {
        let secs: u64 = secs.parse().map_err(|_| AppError::Configuration {
            message: format!("BACKEND_TIMEOUT_SECS must be a number of seconds, got '{}'", secs),
        })?;
        config.backend_timeout = Some(Duration::from_secs(secs));
    }

    AppBuilder::new().with_config(config).build().await
}
