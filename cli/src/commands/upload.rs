use std::path::PathBuf;
use std::sync::Arc;

use reactorctl_common::config::{Credentials, FleetConfig};
use reactorctl_core::ops::UploadFile;
use reactorctl_core::session::SessionFactory;

pub async fn upload_file(
    cfg: &FleetConfig,
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
    local: PathBuf,
    remote: PathBuf,
) -> anyhow::Result<usize> {
    // Constructing the action validates the local path, so a missing
    // file aborts before the network is touched at all.
    let action = UploadFile::new(factory, credentials, local, remote)?;
    super::run_fleet(cfg, Arc::new(action), "uploading file").await
}
