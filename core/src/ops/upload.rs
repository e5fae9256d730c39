use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use reactorctl_common::config::Credentials;
use reactorctl_common::device::Device;

use crate::executor::DeviceAction;
use crate::session::SessionFactory;

use super::OpsError;

/// Copies one local file to the same remote path on every device.
pub struct UploadFile {
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
    local: PathBuf,
    remote: PathBuf,
}

impl UploadFile {
    /// Fails before any device contact when the local path is missing;
    /// the path is resolved to an absolute one up front so every device
    /// sees the same source.
    pub fn new(
        factory: Arc<dyn SessionFactory>,
        credentials: Credentials,
        local: impl Into<PathBuf>,
        remote: impl Into<PathBuf>,
    ) -> Result<Self, OpsError> {
        let local: PathBuf = local.into();
        if !local.exists() {
            return Err(OpsError::LocalFileMissing(local));
        }
        let local = match local.canonicalize() {
            Ok(absolute) => absolute,
            Err(e) => {
                return Err(OpsError::LocalPath {
                    path: local,
                    reason: e.to_string(),
                });
            }
        };

        Ok(Self {
            factory,
            credentials,
            local,
            remote: remote.into(),
        })
    }
}

#[async_trait]
impl DeviceAction for UploadFile {
    async fn run(&self, device: &Device) -> anyhow::Result<String> {
        let session = self.factory.connect(device, &self.credentials).await?;
        session.upload_file(&self.local, &self.remote).await?;
        Ok(format!("copied {} to {}", self.local.display(), self.remote.display()))
    }
}
