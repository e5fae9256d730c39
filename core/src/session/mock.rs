//! Scripted session backend for tests.
//!
//! Records every connect, command and upload, and serves pre-programmed
//! responses keyed by hostname, so orchestration tests run without a
//! network or real appliances.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use reactorctl_common::config::Credentials;
use reactorctl_common::device::Device;

use super::{CommandOutput, RemoteSession, SessionError, SessionFactory};

/// What the scripted backend answers for one device.
#[derive(Debug, Clone)]
pub enum Script {
    /// Commands succeed with this stdout; uploads succeed.
    Healthy { stdout: String },
    /// Commands come back with this stderr; uploads fail with it too.
    Faulty { stderr: String },
    /// The connect itself is refused.
    Unreachable,
}

/// Every call made through the factory, in order.
#[derive(Debug, Default)]
pub struct CallLog {
    pub connects: Vec<String>,
    /// (hostname, command)
    pub commands: Vec<(String, String)>,
    /// (hostname, local, remote)
    pub uploads: Vec<(String, PathBuf, PathBuf)>,
}

pub struct ScriptedFactory {
    scripts: HashMap<String, Script>,
    log: Arc<Mutex<CallLog>>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            log: Arc::new(Mutex::new(CallLog::default())),
        }
    }

    /// Pre-load the response script for one hostname. Unscripted devices
    /// behave as healthy with empty output.
    pub fn script(mut self, hostname: &str, script: Script) -> Self {
        self.scripts.insert(hostname.to_string(), script);
        self
    }

    pub fn log(&self) -> Arc<Mutex<CallLog>> {
        Arc::clone(&self.log)
    }

    pub fn connect_count(&self) -> usize {
        self.log.lock().unwrap().connects.len()
    }
}

impl Default for ScriptedFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionFactory for ScriptedFactory {
    async fn connect(
        &self,
        device: &Device,
        _credentials: &Credentials,
    ) -> Result<Box<dyn RemoteSession>, SessionError> {
        self.log.lock().unwrap().connects.push(device.hostname.clone());

        let script = self
            .scripts
            .get(&device.hostname)
            .cloned()
            .unwrap_or(Script::Healthy { stdout: String::new() });

        if matches!(script, Script::Unreachable) {
            return Err(SessionError::Connect {
                host: device.hostname.clone(),
                reason: "scripted refusal".to_string(),
            });
        }

        Ok(Box::new(ScriptedSession {
            hostname: device.hostname.clone(),
            script,
            log: Arc::clone(&self.log),
        }))
    }
}

pub struct ScriptedSession {
    hostname: String,
    script: Script,
    log: Arc<Mutex<CallLog>>,
}

#[async_trait]
impl RemoteSession for ScriptedSession {
    async fn run_command(&self, command: &str) -> Result<CommandOutput, SessionError> {
        self.log
            .lock()
            .unwrap()
            .commands
            .push((self.hostname.clone(), command.to_string()));

        match &self.script {
            Script::Healthy { stdout } => Ok(CommandOutput {
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            Script::Faulty { stderr } => Ok(CommandOutput {
                stdout: String::new(),
                stderr: stderr.clone(),
            }),
            Script::Unreachable => unreachable!("refused at connect"),
        }
    }

    async fn upload_file(&self, local: &Path, remote: &Path) -> Result<(), SessionError> {
        self.log.lock().unwrap().uploads.push((
            self.hostname.clone(),
            local.to_path_buf(),
            remote.to_path_buf(),
        ));

        match &self.script {
            Script::Healthy { .. } => Ok(()),
            Script::Faulty { stderr } => Err(SessionError::Transfer(stderr.clone())),
            Script::Unreachable => unreachable!("refused at connect"),
        }
    }
}
