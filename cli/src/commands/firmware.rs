use std::path::PathBuf;
use std::sync::Arc;

use reactorctl_common::config::{Credentials, FleetConfig};
use reactorctl_core::executor::DeviceAction;
use reactorctl_core::ops;
use reactorctl_core::session::SessionFactory;

pub async fn update_firmware(
    cfg: &FleetConfig,
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
    local: Option<PathBuf>,
) -> anyhow::Result<usize> {
    let action: Arc<dyn DeviceAction> =
        Arc::from(ops::update_firmware(factory, credentials, local)?);
    super::run_fleet(cfg, action, "updating firmware").await
}

pub async fn update_services(
    cfg: &FleetConfig,
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
) -> anyhow::Result<usize> {
    let action = Arc::new(ops::update_services(factory, credentials));
    super::run_fleet(cfg, action, "updating services").await
}
