//! SSH transport ownership: connect, authenticate, execute, release.

use ssh2::Session;
use std::io::Read;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::config::ConnectionConfig;
use super::traits::{CommandOutput, CommandRunner};
use crate::error::{Result, RouterError};

/// An authenticated SSH session to one router.
///
/// The session is locally scoped to a single poll or validation: opened,
/// used, and released, with `close` invoked on every exit path and `Drop`
/// backstopping early returns. Host keys are accepted without a pinned
/// fingerprint store (trust on first use), preserving the behavior the
/// routers were deployed with.
pub struct SshSession {
    session: Session,
    host: String,
    closed: bool,
}

impl SshSession {
    /// Connect, handshake, and authenticate within `timeout`.
    ///
    /// The same budget bounds the TCP connect and every subsequent blocking
    /// operation on the session.
    pub fn open(config: &ConnectionConfig, timeout: Duration) -> Result<Self> {
        let addr = resolve(config)?;

        let stream = TcpStream::connect_timeout(&addr, timeout).map_err(|e| match e.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                RouterError::connect_timeout(&config.host, config.port, timeout.as_secs())
            }
            _ => RouterError::unreachable(&config.host, config.port, e.to_string()),
        })?;

        let mut session = Session::new()
            .map_err(|e| RouterError::unreachable(&config.host, config.port, e.to_string()))?;
        session.set_tcp_stream(stream);
        session.set_timeout(timeout.as_millis() as u32);
        session
            .handshake()
            .map_err(|e| RouterError::unreachable(&config.host, config.port, e.to_string()))?;

        session
            .userauth_password(&config.username, &config.password)
            .map_err(|_| RouterError::auth_failure(&config.username, &config.host))?;
        if !session.authenticated() {
            return Err(RouterError::auth_failure(&config.username, &config.host));
        }

        tracing::debug!(host = %config.host, port = config.port, "session established");
        Ok(Self {
            session,
            host: config.host.clone(),
            closed: false,
        })
    }
}

fn resolve(config: &ConnectionConfig) -> Result<SocketAddr> {
    (config.host.as_str(), config.port)
        .to_socket_addrs()
        .map_err(|e| RouterError::unreachable(&config.host, config.port, e.to_string()))?
        .next()
        .ok_or_else(|| {
            RouterError::unreachable(&config.host, config.port, "hostname resolved to no addresses")
        })
}

impl CommandRunner for SshSession {
    fn run(&mut self, command: &str) -> Result<CommandOutput> {
        let mut channel = self
            .session
            .channel_session()
            .map_err(|e| RouterError::exec_error(command, e.to_string()))?;
        channel
            .exec(command)
            .map_err(|e| RouterError::exec_error(command, e.to_string()))?;

        let mut stdout = String::new();
        channel
            .read_to_string(&mut stdout)
            .map_err(|e| RouterError::exec_error(command, e.to_string()))?;
        let mut stderr = String::new();
        channel
            .stderr()
            .read_to_string(&mut stderr)
            .map_err(|e| RouterError::exec_error(command, e.to_string()))?;

        // Exit status is not inspected: vendor wrappers report their failures
        // through empty or invalid output, which the pipeline checks instead.
        let _ = channel.wait_close();

        tracing::trace!(command, stdout_len = stdout.len(), "remote command finished");
        Ok(CommandOutput { stdout, stderr })
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        let _ = self.session.disconnect(None, "collection finished", None);
        self.closed = true;
        tracing::debug!(host = %self.host, "session closed");
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        self.close();
    }
}
