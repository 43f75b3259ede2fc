use std::{io, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{info, warn};

use crate::{
    domain::{
        errors::ResolveError,
        models::{
            CapacityDescriptor, SyntheticKind, SyntheticObject, SystemDescriptor, XML_CONTENT_TYPE,
        },
    },
    ports::{
        services::VirtualObjectService,
        storage::{DiskUsage, DiskUsageProbe},
    },
};

/// Detect the user agents sent by Veeam Backup & Replication
pub fn is_known_backup_client(user_agent: &str) -> bool {
    user_agent.contains("APN/1.0 Veeam/1.0") || user_agent.to_lowercase().contains("veeam")
}

/// Serves the smart object storage documents without touching the backend
#[derive(Clone)]
pub struct VirtualObjectServiceImpl {
    model_name: String,
    data_dir: Option<PathBuf>,
    probe: Arc<dyn DiskUsageProbe>,
}

impl VirtualObjectServiceImpl {
    pub const DEFAULT_MODEL_NAME: &'static str = "MaxIOFS";

    pub fn new(
        model_name: impl Into<String>,
        data_dir: Option<PathBuf>,
        probe: Arc<dyn DiskUsageProbe>,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            data_dir,
            probe,
        }
    }

    fn system_info(&self) -> Result<Bytes, ResolveError> {
        let descriptor = SystemDescriptor::new(&self.model_name);
        let xml = descriptor.to_xml()?;

        info!(
            protocol_version = %descriptor.protocol_version,
            model_name = %descriptor.model_name,
            bytes = xml.len(),
            "Generated system.xml"
        );
        Ok(Bytes::from(xml))
    }

    async fn capacity_info(&self) -> Result<Bytes, ResolveError> {
        let descriptor = match &self.data_dir {
            Some(dir) => match self.probe_usage(dir.clone()).await {
                Ok(usage) => {
                    info!(
                        total = usage.total,
                        free = usage.free,
                        used = usage.used,
                        data_dir = %dir.display(),
                        "Computed storage capacity"
                    );
                    CapacityDescriptor::new(usage.total, usage.free)
                }
                Err(err) => {
                    warn!(
                        data_dir = %dir.display(),
                        error = %err,
                        "Failed to read disk usage, reporting default capacity"
                    );
                    CapacityDescriptor::fallback()
                }
            },
            None => {
                info!("No data directory configured, reporting default capacity");
                CapacityDescriptor::fallback()
            }
        };

        Ok(Bytes::from(descriptor.to_xml()?))
    }

    async fn probe_usage(&self, dir: PathBuf) -> io::Result<DiskUsage> {
        let probe = Arc::clone(&self.probe);
        tokio::task::spawn_blocking(move || probe.usage(&dir))
            .await
            .map_err(io::Error::other)?
    }
}

#[async_trait]
impl VirtualObjectService for VirtualObjectServiceImpl {
    fn is_synthetic_object(&self, key: &str) -> bool {
        SyntheticKind::from_key(key).is_some()
    }

    async fn resolve(&self, key: &str) -> Result<SyntheticObject, ResolveError> {
        let kind = SyntheticKind::from_key(key).ok_or_else(|| ResolveError::NotSynthetic {
            key: key.to_string(),
        })?;

        let data = match kind {
            SyntheticKind::SystemInfo => self.system_info()?,
            SyntheticKind::CapacityInfo => self.capacity_info().await?,
        };

        Ok(SyntheticObject {
            kind,
            data,
            content_type: XML_CONTENT_TYPE,
        })
    }
}
