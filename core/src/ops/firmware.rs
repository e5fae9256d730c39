use std::path::{Path, PathBuf};
use std::sync::Arc;

use reactorctl_common::config::Credentials;

use crate::executor::{DeviceAction, Pipeline};
use crate::session::SessionFactory;

use super::{ExecuteCommand, OpsError, UploadFile};

const INSTALL_SCRIPT: &str = "./update_firmware.sh";
const SERVICES_SCRIPT: &str = "./update_services.sh";
const FIRMWARE_DIR: &str = "/home/reactor/firmware";

/// Builds the firmware update action.
///
/// With a local archive this is a two-step per-device pipeline: upload
/// the archive, then run the installer against the uploaded file. A
/// device whose upload fails never reaches the install step. Without an
/// archive every device fetches and installs on its own.
pub fn update_firmware(
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
    local: Option<PathBuf>,
) -> Result<Box<dyn DeviceAction>, OpsError> {
    let Some(archive) = local else {
        return Ok(Box::new(ExecuteCommand::new(factory, credentials, INSTALL_SCRIPT)));
    };

    let file_name = archive.file_name().ok_or_else(|| OpsError::LocalPath {
        path: archive.clone(),
        reason: "path has no file name".to_string(),
    })?;
    let remote: PathBuf = Path::new(FIRMWARE_DIR).join(file_name);

    let upload = UploadFile::new(
        Arc::clone(&factory),
        credentials.clone(),
        archive,
        remote.clone(),
    )?;
    let install = ExecuteCommand::new(
        factory,
        credentials,
        format!("{INSTALL_SCRIPT} {}", remote.display()),
    );

    Ok(Box::new(
        Pipeline::new()
            .step("upload archive", upload)
            .step("install", install),
    ))
}

/// Refreshes the on-device service stack via the maintenance script the
/// appliances ship with.
pub fn update_services(
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
) -> ExecuteCommand {
    ExecuteCommand::new(factory, credentials, SERVICES_SCRIPT)
}
