use std::sync::Arc;

use reactorctl_common::config::{Credentials, FleetConfig};
use reactorctl_core::executor::DeviceAction;
use reactorctl_core::ops::ExecuteCommand;
use reactorctl_core::session::SessionFactory;

pub async fn execute(
    cfg: &FleetConfig,
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
    cmd: String,
) -> anyhow::Result<usize> {
    let action: Arc<dyn DeviceAction> =
        Arc::new(ExecuteCommand::new(factory, credentials, cmd.clone()));
    super::run_fleet(cfg, action, &format!("executing '{cmd}'")).await
}
