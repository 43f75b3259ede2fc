use std::{io, path::Path};

/// Filesystem usage figures, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub total: u64,
    pub free: u64,
    pub used: u64,
}

/// Port for querying the filesystem that backs the data directory.
///
/// Implementations may block; callers run them off the async executor.
pub trait DiskUsageProbe: Send + Sync + 'static {
    fn usage(&self, path: &Path) -> io::Result<DiskUsage>;
}
