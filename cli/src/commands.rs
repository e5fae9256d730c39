pub mod discover;
pub mod execute;
pub mod firmware;
pub mod recipe;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use reactorctl_common::config::{Credentials, ExecMode, FleetConfig};
use reactorctl_common::range;
use reactorctl_core::executor::{self, DeviceAction};

use crate::terminal::{format, print};

#[derive(Parser)]
#[command(name = "reactorctl")]
#[command(about = "Fleet management for networked bioreactor appliances.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Seconds to listen for device advertisements
    #[arg(long, global = true, default_value_t = 2)]
    pub timeout: u64,

    /// SSH username for the appliances
    #[arg(long, global = true, default_value = "reactor")]
    pub username: String,

    /// SSH password for the appliances
    #[arg(long, global = true, default_value = "grow")]
    pub password: String,

    /// Run against all devices concurrently instead of one at a time
    #[arg(long, global = true)]
    pub parallel: bool,

    /// Cap on concurrent workers in parallel mode (default: one per device)
    #[arg(long, global = true, requires = "parallel")]
    pub workers: Option<usize>,

    /// Ordinal range selecting a device subset, e.g. "1-3,7"
    #[arg(long, global = true, value_name = "RANGE")]
    pub devices: Option<String>,

    /// Suppress headers and the discovery spinner
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the appliances advertising on the local network
    #[command(alias = "d")]
    Discover,
    /// Run a shell command on every selected device
    #[command(alias = "x")]
    Execute {
        #[arg(long)]
        cmd: String,
    },
    /// Copy a local file to every selected device
    UploadFile {
        #[arg(long)]
        local: PathBuf,
        #[arg(long)]
        remote: PathBuf,
    },
    /// Install a recipe as every selected device's default
    RecipeLoad {
        #[arg(long)]
        recipe: PathBuf,
    },
    /// Update firmware from a local archive, or let devices fetch their own
    UpdateFirmware {
        #[arg(long)]
        local: Option<PathBuf>,
    },
    /// Refresh the service stack on every selected device
    UpdateServices,
    /// Start the recipe runner
    RecipeStart,
    /// Stop the recipe runner
    RecipeStop,
    /// Restart the recipe runner
    RecipeRestart,
    /// List the recipes staged on each device
    RecipeList,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolves the global flags into the per-invocation fleet
    /// parameters. A malformed --devices range aborts here, before any
    /// network activity.
    pub fn fleet_config(&self) -> anyhow::Result<FleetConfig> {
        let selected = match self.devices.as_deref() {
            None => None,
            Some(spec) => Some(
                range::parse_range(spec)
                    .with_context(|| format!("invalid --devices range '{spec}'"))?,
            ),
        };

        let mode = if self.parallel {
            ExecMode::Parallel { workers: self.workers }
        } else {
            ExecMode::Sequential
        };

        Ok(FleetConfig {
            timeout: Duration::from_secs(self.timeout),
            mode,
            selected,
            quiet: self.quiet,
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// The shared fleet flow: discover, fan the action out, report, and hand
/// the failure count back to `main` for the exit status.
pub(crate) async fn run_fleet(
    cfg: &FleetConfig,
    action: Arc<dyn DeviceAction>,
    banner: &str,
) -> anyhow::Result<usize> {
    let devices = discover::run_discovery(cfg).await?;
    if devices.is_empty() {
        print::status("no devices found");
        return Ok(0);
    }

    if !cfg.quiet {
        print::header(&format!("{banner} on {} device/s", devices.len()));
    }

    let results = executor::run_all(&devices, action, cfg.mode).await;
    Ok(format::report(&results))
}
