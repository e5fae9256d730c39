//! # Remote Session Seam
//!
//! One authenticated channel per device, able to run a command and
//! upload a file. The operation library depends on these traits only;
//! the production SSH adapter and the scripted test double live in the
//! submodules.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use reactorctl_common::config::Credentials;
use reactorctl_common::device::Device;

pub mod mock;
pub mod ssh;

/// Captured streams of one remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A command is treated as clean when it wrote nothing to stderr.
    pub fn is_clean(&self) -> bool {
        self.stderr.trim().is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connect to {host} failed: {reason}")]
    Connect { host: String, reason: String },
    #[error("authentication rejected for {user}@{host}")]
    Auth { user: String, host: String },
    #[error("remote command failed: {0}")]
    Exec(String),
    #[error("file transfer failed: {0}")]
    Transfer(String),
}

/// An open, authenticated channel to one device.
///
/// Implementations own their transport exclusively and release it when
/// dropped; sessions are never shared across devices or workers.
#[async_trait]
pub trait RemoteSession: Send + Sync {
    async fn run_command(&self, command: &str) -> Result<CommandOutput, SessionError>;

    async fn upload_file(&self, local: &Path, remote: &Path) -> Result<(), SessionError>;
}

/// Opens sessions against devices. This is the seam the operation
/// library is generic over; production wires in SSH, tests wire in a
/// scripted double.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn connect(
        &self,
        device: &Device,
        credentials: &Credentials,
    ) -> Result<Box<dyn RemoteSession>, SessionError>;
}
