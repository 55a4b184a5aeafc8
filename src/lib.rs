//! # edge_pulse - EdgeOS Router Telemetry over SSH
//!
//! A Rust crate that polls a remote EdgeOS-style router over SSH and derives
//! typed telemetry from raw kernel files: uptime, firmware identity, CPU and
//! memory utilization, per-interface traffic rates, and log-derived error
//! counts.
//!
//! ## Features
//!
//! - **Delta sampling**: cumulative `/proc/net/dev` and `/proc/stat` counters
//!   captured twice, two seconds apart, and turned into rates
//! - **Tolerant parsing**: malformed lines and missing fields degrade to
//!   defaults instead of failing the poll
//! - **Scoped sessions**: every poll opens and releases its own SSH session,
//!   with the transport freed on every exit path
//! - **Strict failure policy**: a transport error yields one collection
//!   error, never a silently-zeroed snapshot
//! - **Library + Binary**: embed the collector or run the bundled CLI
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edge_pulse::{ConnectionConfig, RouterCollector};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectionConfig::new("192.168.1.1", "ubnt", "secret");
//!     let collector = RouterCollector::new(config)?;
//!
//!     collector.validate().await?;
//!     let snapshot = collector.collect().await?;
//!     println!("CPU: {:.1}%", snapshot.cpu_percent);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod telemetry;

// Re-export public API
pub use error::{Result, RouterError};
pub use telemetry::{
    collector::RouterCollector,
    config::ConnectionConfig,
    data::{ByteCounters, CpuSample, InterfaceRate, TelemetrySnapshot},
    traits::{CommandOutput, CommandRunner},
};

/// The default SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Delay between the two counter snapshots, in seconds. Internal to one
/// poll; not the polling period, which the caller owns.
pub const SAMPLE_DELAY_SECS: u64 = 2;

/// Session budget for credential validation (handshake only)
pub const VALIDATE_TIMEOUT_SECS: u64 = 5;

/// Session budget for a full collection (must tolerate slow command
/// round-trips on busy devices)
pub const COLLECT_TIMEOUT_SECS: u64 = 10;

/// How many trailing log lines the error scanner inspects
pub const LOG_TAIL_LINES: u32 = 50;

/// Default polling period for the `watch` command, in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
