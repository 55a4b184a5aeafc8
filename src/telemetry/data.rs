//! Data structures for router telemetry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The complete result of one telemetry poll.
///
/// Every field has a defined default so a snapshot is structurally complete
/// before the pipeline has populated it. A snapshot is built once per poll
/// and never mutated afterwards; ownership passes to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Raw output of `uptime` on the router
    pub uptime: String,
    /// Firmware image identity as reported by the vendor wrapper
    pub firmware: String,
    /// Aggregate CPU usage over the sample interval (0.0 to 100.0)
    pub cpu_percent: f64,
    /// Memory usage at the moment of the poll (0.0 to 100.0)
    pub memory_percent: f64,
    /// Number of error-pattern matches in the recent log tail
    pub log_errors: u32,
    /// Per-interface traffic rates, keyed by interface name.
    /// Includes a synthetic `"total"` entry summing all real interfaces.
    /// No ordering guarantee.
    pub interfaces: HashMap<String, InterfaceRate>,
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self {
            uptime: "Unknown".to_string(),
            firmware: "Unknown".to_string(),
            cpu_percent: 0.0,
            memory_percent: 0.0,
            log_errors: 0,
            interfaces: HashMap::new(),
        }
    }
}

/// Traffic rate for one interface over the sample interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterfaceRate {
    /// Receive rate in megabits per second
    pub rx_mbps: f64,
    /// Transmit rate in megabits per second
    pub tx_mbps: f64,
}

/// Cumulative byte counters for one interface as of one snapshot.
///
/// Kernel counters are monotonically non-decreasing but may wrap or reset
/// when an interface restarts; rate derivation clamps such deltas to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteCounters {
    /// Cumulative received bytes
    pub rx_bytes: u64,
    /// Cumulative transmitted bytes
    pub tx_bytes: u64,
}

/// Jiffie counters read from one capture of the aggregate CPU line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSample {
    /// Sum of all counters on the aggregate line
    pub total: u64,
    /// The idle counter (fourth field)
    pub idle: u64,
}
