//! Error handling for the edge_pulse collector.

/// A specialized `Result` type for edge_pulse operations.
pub type Result<T> = std::result::Result<T, RouterError>;

/// The main error type for router collection operations.
///
/// Transport-level failures (`ConnectTimeout`, `Unreachable`, `AuthFailure`)
/// are raised while opening a session; `Exec` covers a remote command that
/// could not be run or whose channel closed unexpectedly. A full poll that
/// hits any of these surfaces a single `Collection` error wrapping the first
/// failure — partial results are never returned. Malformed lines inside an
/// otherwise successful capture are skipped by the parsers and never become
/// errors.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// TCP connection to the router did not complete within the budget
    #[error("connection to {host}:{port} timed out after {timeout_secs}s")]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout_secs: u64,
    },

    /// The router could not be reached (refused, no route, DNS failure)
    #[error("router {host}:{port} is unreachable: {reason}")]
    Unreachable {
        host: String,
        port: u16,
        reason: String,
    },

    /// Password authentication was rejected
    #[error("authentication failed for {username}@{host}")]
    AuthFailure { username: String, host: String },

    /// A remote command could not be executed or its channel broke
    #[error("remote command `{command}` failed: {reason}")]
    Exec { command: String, reason: String },

    /// A telemetry poll failed; wraps the first transport or exec error
    #[error("collection from {host} failed")]
    Collection {
        host: String,
        #[source]
        source: Box<RouterError>,
    },

    /// Connection settings are invalid
    #[error("invalid connection settings: {0}")]
    Config(String),
}

impl RouterError {
    /// Create a new connect-timeout error
    pub fn connect_timeout(host: impl Into<String>, port: u16, timeout_secs: u64) -> Self {
        Self::ConnectTimeout {
            host: host.into(),
            port,
            timeout_secs,
        }
    }

    /// Create a new unreachable error
    pub fn unreachable(host: impl Into<String>, port: u16, reason: impl Into<String>) -> Self {
        Self::Unreachable {
            host: host.into(),
            port,
            reason: reason.into(),
        }
    }

    /// Create a new authentication-failure error
    pub fn auth_failure(username: impl Into<String>, host: impl Into<String>) -> Self {
        Self::AuthFailure {
            username: username.into(),
            host: host.into(),
        }
    }

    /// Create a new remote-execution error
    pub fn exec_error(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Exec {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Wrap the first transport/exec error of a failed poll
    pub fn collection(host: impl Into<String>, source: RouterError) -> Self {
        Self::Collection {
            host: host.into(),
            source: Box::new(source),
        }
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
