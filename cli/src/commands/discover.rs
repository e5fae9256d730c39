use anyhow::Context;

use reactorctl_common::config::FleetConfig;
use reactorctl_common::device::Device;
use reactorctl_core::discovery;

use crate::terminal::{print, spinner};

pub async fn discover(cfg: &FleetConfig) -> anyhow::Result<usize> {
    let devices = run_discovery(cfg).await?;

    if devices.is_empty() {
        print::status("no devices found");
        return Ok(0);
    }

    if !cfg.quiet {
        print::header(&format!("discovered {} device/s", devices.len()));
    }
    for (idx, device) in devices.iter().enumerate() {
        print::device_line(idx, device);
    }

    Ok(0)
}

/// Shared discovery step for every subcommand: a spinner while the
/// browse window is open, then the sorted, filtered device list.
pub(crate) async fn run_discovery(cfg: &FleetConfig) -> anyhow::Result<Vec<Device>> {
    let spinner = (!cfg.quiet).then(|| spinner::start("listening for fleet advertisements..."));

    let result = discovery::discover(cfg.timeout, cfg.selected.as_ref()).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    result.context("device discovery failed")
}
