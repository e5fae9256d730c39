use std::sync::Arc;

use async_trait::async_trait;

use reactorctl_common::config::Credentials;
use reactorctl_common::device::Device;

use crate::executor::DeviceAction;
use crate::session::SessionFactory;

/// Runs one literal shell command per device and classifies the outcome
/// by stderr: anything on stderr is a failure, otherwise stdout is the
/// result.
pub struct ExecuteCommand {
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
    command: String,
}

impl ExecuteCommand {
    pub fn new(
        factory: Arc<dyn SessionFactory>,
        credentials: Credentials,
        command: impl Into<String>,
    ) -> Self {
        Self {
            factory,
            credentials,
            command: command.into(),
        }
    }
}

#[async_trait]
impl DeviceAction for ExecuteCommand {
    async fn run(&self, device: &Device) -> anyhow::Result<String> {
        let session = self.factory.connect(device, &self.credentials).await?;
        let output = session.run_command(&self.command).await?;

        if output.is_clean() {
            Ok(output.stdout.trim_end().to_string())
        } else {
            anyhow::bail!("{}", output.stderr.trim_end())
        }
    }
}
