//! Production SSH adapter on libssh2.
//!
//! libssh2 calls block, so every exchange runs inside `spawn_blocking`.
//! The handshake and password authentication happen at connect time; the
//! authenticated session owns its transport and tears both down when the
//! boxed session is dropped.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ssh2::Session;
use tokio::task;

use reactorctl_common::config::Credentials;
use reactorctl_common::device::Device;

use super::{CommandOutput, RemoteSession, SessionError, SessionFactory};

/// Appliances expose their API on the advertised port; administration
/// always rides the standard SSH port.
const SSH_PORT: u16 = 22;

pub struct SshSessionFactory;

#[async_trait]
impl SessionFactory for SshSessionFactory {
    async fn connect(
        &self,
        device: &Device,
        credentials: &Credentials,
    ) -> Result<Box<dyn RemoteSession>, SessionError> {
        let host = device.hostname.clone();
        let address = device.address;
        let user = credentials.username.clone();
        let password = credentials.password.clone();

        let join_host = device.hostname.clone();
        let session = task::spawn_blocking(move || -> Result<Session, SessionError> {
            let connect_err = |reason: String| SessionError::Connect {
                host: host.clone(),
                reason,
            };

            let tcp = TcpStream::connect((address, SSH_PORT))
                .map_err(|e| connect_err(e.to_string()))?;
            let mut session = Session::new().map_err(|e| connect_err(e.to_string()))?;
            session.set_tcp_stream(tcp);
            session.handshake().map_err(|e| connect_err(e.to_string()))?;
            session
                .userauth_password(&user, &password)
                .map_err(|_| SessionError::Auth {
                    user: user.clone(),
                    host: host.clone(),
                })?;
            Ok(session)
        })
        .await
        .map_err(|e| SessionError::Connect {
            host: join_host,
            reason: e.to_string(),
        })??;

        Ok(Box::new(SshSession {
            session: Arc::new(Mutex::new(session)),
        }))
    }
}

pub struct SshSession {
    session: Arc<Mutex<Session>>,
}

#[async_trait]
impl RemoteSession for SshSession {
    async fn run_command(&self, command: &str) -> Result<CommandOutput, SessionError> {
        let session = Arc::clone(&self.session);
        let command = command.to_string();

        task::spawn_blocking(move || -> Result<CommandOutput, SessionError> {
            let exec_err = |e: ssh2::Error| SessionError::Exec(e.to_string());

            let session = session
                .lock()
                .map_err(|_| SessionError::Exec("session lock poisoned".to_string()))?;
            let mut channel = session.channel_session().map_err(exec_err)?;
            channel.exec(&command).map_err(exec_err)?;

            let mut stdout = String::new();
            channel
                .read_to_string(&mut stdout)
                .map_err(|e| SessionError::Exec(e.to_string()))?;
            let mut stderr = String::new();
            channel
                .stderr()
                .read_to_string(&mut stderr)
                .map_err(|e| SessionError::Exec(e.to_string()))?;

            channel.wait_close().map_err(exec_err)?;
            Ok(CommandOutput { stdout, stderr })
        })
        .await
        .map_err(|e| SessionError::Exec(e.to_string()))?
    }

    async fn upload_file(&self, local: &Path, remote: &Path) -> Result<(), SessionError> {
        let session = Arc::clone(&self.session);
        let local: PathBuf = local.to_path_buf();
        let remote: PathBuf = remote.to_path_buf();

        task::spawn_blocking(move || -> Result<(), SessionError> {
            let transfer_err = |e: ssh2::Error| SessionError::Transfer(e.to_string());

            let data = std::fs::read(&local)
                .map_err(|e| SessionError::Transfer(format!("read {}: {e}", local.display())))?;

            let session = session
                .lock()
                .map_err(|_| SessionError::Transfer("session lock poisoned".to_string()))?;
            let mut channel = session
                .scp_send(&remote, 0o644, data.len() as u64, None)
                .map_err(transfer_err)?;
            channel
                .write_all(&data)
                .map_err(|e| SessionError::Transfer(e.to_string()))?;
            channel.send_eof().map_err(transfer_err)?;
            channel.wait_eof().map_err(transfer_err)?;
            channel.close().map_err(transfer_err)?;
            channel.wait_close().map_err(transfer_err)?;
            Ok(())
        })
        .await
        .map_err(|e| SessionError::Transfer(e.to_string()))?
    }
}
