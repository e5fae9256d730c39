mod commands;
mod terminal;

use std::process::ExitCode;
use std::sync::Arc;

use commands::{CommandLine, Commands, discover, execute, firmware, recipe, upload};
use reactorctl_core::ops::ServiceVerb;
use reactorctl_core::session::SessionFactory;
use reactorctl_core::session::ssh::SshSessionFactory;
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init();

    let cfg = commands.fleet_config()?;
    let credentials = commands.credentials();
    let factory: Arc<dyn SessionFactory> = Arc::new(SshSessionFactory);

    let failures = match commands.command {
        Commands::Discover => discover::discover(&cfg).await?,
        Commands::Execute { cmd } => {
            execute::execute(&cfg, factory, credentials, cmd).await?
        }
        Commands::UploadFile { local, remote } => {
            upload::upload_file(&cfg, factory, credentials, local, remote).await?
        }
        Commands::RecipeLoad { recipe } => {
            recipe::load(&cfg, factory, credentials, recipe).await?
        }
        Commands::UpdateFirmware { local } => {
            firmware::update_firmware(&cfg, factory, credentials, local).await?
        }
        Commands::UpdateServices => {
            firmware::update_services(&cfg, factory, credentials).await?
        }
        Commands::RecipeStart => {
            recipe::service(&cfg, factory, credentials, ServiceVerb::Start).await?
        }
        Commands::RecipeStop => {
            recipe::service(&cfg, factory, credentials, ServiceVerb::Stop).await?
        }
        Commands::RecipeRestart => {
            recipe::service(&cfg, factory, credentials, ServiceVerb::Restart).await?
        }
        Commands::RecipeList => recipe::list(&cfg, factory, credentials).await?,
    };

    // "Some devices failed" is a normal result shape, but the operator's
    // scripts still need to see it in the exit status.
    if failures > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
