mod fs2_disk_usage;

pub use fs2_disk_usage::Fs2DiskUsage;
