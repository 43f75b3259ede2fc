// Infrastructure error types
pub mod error;

// Storage implementations
pub mod in_memory_versioned_store;
pub mod object_store_backend;

mod paging;

// Re-export key types
pub use error::StoreError;
pub use in_memory_versioned_store::InMemoryVersionedStore;
pub use object_store_backend::ObjectStoreBackend;
