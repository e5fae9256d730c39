use std::path::PathBuf;
use std::sync::Arc;

use reactorctl_common::config::{Credentials, FleetConfig};
use reactorctl_core::ops::{self, ServiceVerb};
use reactorctl_core::session::SessionFactory;

pub async fn load(
    cfg: &FleetConfig,
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
    recipe: PathBuf,
) -> anyhow::Result<usize> {
    let action = ops::load_recipe(factory, credentials, recipe)?;
    super::run_fleet(cfg, Arc::new(action), "loading recipe").await
}

pub async fn service(
    cfg: &FleetConfig,
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
    verb: ServiceVerb,
) -> anyhow::Result<usize> {
    let banner = match verb {
        ServiceVerb::Start => "starting recipe runner",
        ServiceVerb::Stop => "stopping recipe runner",
        ServiceVerb::Restart => "restarting recipe runner",
    };
    let action = Arc::new(ops::recipe_service(factory, credentials, verb));
    super::run_fleet(cfg, action, banner).await
}

pub async fn list(
    cfg: &FleetConfig,
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
) -> anyhow::Result<usize> {
    let action = Arc::new(ops::recipe_list(factory, credentials));
    super::run_fleet(cfg, action, "listing recipes").await
}
