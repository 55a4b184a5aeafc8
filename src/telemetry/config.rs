//! Router connection settings.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouterError};
use crate::DEFAULT_SSH_PORT;

/// Connection parameters for one router.
///
/// Immutable once constructed; cloned into the blocking worker that owns the
/// actual session for the duration of a poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Router hostname or IP address
    pub host: String,
    /// SSH port
    pub port: u16,
    /// Login username
    pub username: String,
    /// Login password
    pub password: String,
}

impl ConnectionConfig {
    /// Create a new connection configuration with the default SSH port.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Set a non-default SSH port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Check that every required field is present.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(RouterError::config_error("host must not be empty"));
        }
        if self.username.is_empty() {
            return Err(RouterError::config_error("username must not be empty"));
        }
        if self.password.is_empty() {
            return Err(RouterError::config_error("password must not be empty"));
        }
        Ok(())
    }

    /// The `host:port` address used for the TCP connection.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
