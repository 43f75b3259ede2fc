use std::{io, path::Path};

use crate::ports::storage::{DiskUsage, DiskUsageProbe};

/// Disk usage of the filesystem containing a path, via `statvfs`/`GetDiskFreeSpaceEx`
#[derive(Debug, Clone, Copy, Default)]
pub struct Fs2DiskUsage;

impl DiskUsageProbe for Fs2DiskUsage {
    fn usage(&self, path: &Path) -> io::Result<DiskUsage> {
        let total = fs2::total_space(path)?;
        let free = fs2::available_space(path)?;

        Ok(DiskUsage {
            total,
            free,
            used: total.saturating_sub(free),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_usage_for_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let usage = Fs2DiskUsage.usage(dir.path()).unwrap();

        assert!(usage.total > 0);
        assert!(usage.free <= usage.total);
        assert_eq!(usage.used, usage.total - usage.free);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-there");

        assert!(Fs2DiskUsage.usage(&missing).is_err());
    }
}
