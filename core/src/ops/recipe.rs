use std::path::PathBuf;
use std::sync::Arc;

use reactorctl_common::config::Credentials;

use crate::session::SessionFactory;

use super::{ExecuteCommand, OpsError, UploadFile};

/// Destination the on-device recipe runner loads at startup.
pub const RECIPE_DEST: &str = "/home/reactor/recipe-runner/config/default.yaml";

const RECIPE_DIR: &str = "/home/reactor/recipe-runner/recipes";
const RUNNER_SERVICE: &str = "recipe-runner.service";

/// Installs a recipe as every selected device's default: an upload with
/// a fixed destination, nothing more.
pub fn load_recipe(
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
    recipe: PathBuf,
) -> Result<UploadFile, OpsError> {
    UploadFile::new(factory, credentials, recipe, RECIPE_DEST)
}

/// Lifecycle verbs for the on-device recipe runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceVerb {
    Start,
    Stop,
    Restart,
}

impl ServiceVerb {
    fn as_str(self) -> &'static str {
        match self {
            ServiceVerb::Start => "start",
            ServiceVerb::Stop => "stop",
            ServiceVerb::Restart => "restart",
        }
    }
}

/// Drives the recipe runner service on every selected device.
pub fn recipe_service(
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
    verb: ServiceVerb,
) -> ExecuteCommand {
    ExecuteCommand::new(
        factory,
        credentials,
        format!("sudo systemctl {} {RUNNER_SERVICE}", verb.as_str()),
    )
}

/// Lists the recipes staged on each device.
pub fn recipe_list(
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
) -> ExecuteCommand {
    ExecuteCommand::new(factory, credentials, format!("ls -1 {RECIPE_DIR}"))
}
