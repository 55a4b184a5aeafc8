//! Pure text parsers for the kernel counter files and log tails.
//!
//! Each parser takes the raw capture(s) produced by the sampler and derives
//! one telemetry value. Firmware variance makes these files semi-structured
//! at best, so every parser is tolerant: a malformed line or missing field is
//! skipped with a diagnostic, never an error.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use super::data::{ByteCounters, CpuSample, InterfaceRate};

lazy_static! {
    /// Duplicate DHCP lease assignment
    static ref DHCP_DUPLICATE: Regex = Regex::new(r"uid lease .* is duplicate on").unwrap();
    /// Kernel warning or backtrace marker
    static ref KERNEL_WARNING: Regex = Regex::new(r"WARNING: CPU: .*|Call Trace:").unwrap();
    /// Failed login attempt
    static ref AUTH_FAILURE: Regex = Regex::new(r"authentication failure").unwrap();
}

/// Round to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Parse one `/proc/net/dev` capture into per-interface byte counters.
///
/// Header lines contain a `|` and are skipped; so are lines without the `:`
/// separating the interface name from its fields. The `:` is replaced with a
/// space before splitting, which handles both `eth0:123` and `eth0: 123`.
pub fn parse_interface_counters(block: &str) -> HashMap<String, ByteCounters> {
    let mut counters = HashMap::new();

    for line in block.lines() {
        if line.contains('|') || !line.contains(':') {
            continue;
        }

        let clean = line.replace(':', " ");
        let parts: Vec<&str> = clean.split_whitespace().collect();
        // name, rx bytes at field 1, tx bytes at field 9
        if parts.len() < 10 {
            tracing::debug!(line, "skipping short interface line");
            continue;
        }

        match (parts[1].parse::<u64>(), parts[9].parse::<u64>()) {
            (Ok(rx_bytes), Ok(tx_bytes)) => {
                counters.insert(parts[0].to_string(), ByteCounters { rx_bytes, tx_bytes });
            }
            _ => {
                tracing::warn!(line, "failed to parse interface counter line");
            }
        }
    }

    counters
}

/// Derive per-interface traffic rates from two counter captures taken
/// `interval_secs` apart.
///
/// Only interfaces present in both captures produce a rate; a hot-plugged
/// interface seen in just one is dropped with a diagnostic. The result also
/// carries a synthetic `"total"` entry summing all real interfaces.
pub fn parse_traffic_rates(
    before: &str,
    after: &str,
    interval_secs: f64,
) -> HashMap<String, InterfaceRate> {
    let start = parse_interface_counters(before);
    let end = parse_interface_counters(after);

    let mut rates = HashMap::new();
    for (name, end_counters) in &end {
        let Some(start_counters) = start.get(name) else {
            tracing::warn!(
                interface = %name,
                "interface present in only one snapshot; dropping"
            );
            continue;
        };
        rates.insert(
            name.clone(),
            InterfaceRate {
                rx_mbps: rate_mbps(start_counters.rx_bytes, end_counters.rx_bytes, interval_secs),
                tx_mbps: rate_mbps(start_counters.tx_bytes, end_counters.tx_bytes, interval_secs),
            },
        );
    }

    let total_rx: f64 = rates.values().map(|r| r.rx_mbps).sum();
    let total_tx: f64 = rates.values().map(|r| r.tx_mbps).sum();
    rates.insert(
        "total".to_string(),
        InterfaceRate {
            rx_mbps: total_rx,
            tx_mbps: total_tx,
        },
    );

    rates
}

/// Cumulative byte delta to megabits per second over the interval.
///
/// A counter that decreased means the interface restarted or the counter
/// wrapped; the rate is clamped to zero for that poll.
fn rate_mbps(before: u64, after: u64, interval_secs: f64) -> f64 {
    let Some(delta) = after.checked_sub(before) else {
        tracing::debug!(before, after, "counter decreased; clamping rate to zero");
        return 0.0;
    };
    delta as f64 * 8.0 / 1024.0 / 1024.0 / interval_secs
}

/// Read the aggregate CPU jiffie counters from one `/proc/stat` capture.
///
/// Total is the sum of every counter on the `cpu ` line; idle is the fourth.
/// A missing or malformed line yields the zero sample, which downstream
/// degrades to 0.0% usage.
pub fn parse_cpu_sample(block: &str) -> CpuSample {
    for line in block.lines() {
        let Some(rest) = line.strip_prefix("cpu ") else {
            continue;
        };
        let values: Result<Vec<u64>, _> = rest.split_whitespace().map(str::parse).collect();
        match values {
            Ok(values) if values.len() >= 4 => {
                return CpuSample {
                    total: values.iter().sum(),
                    idle: values[3],
                };
            }
            _ => {
                tracing::warn!(line, "failed to parse aggregate cpu line");
            }
        }
    }
    CpuSample::default()
}

/// Derive CPU usage percentage from two `/proc/stat` captures.
///
/// Usage = (ΔTotal − ΔIdle) / ΔTotal × 100, one decimal. A non-positive
/// total delta (clock anomaly, sampling too fast, missing line) degrades to
/// 0.0 rather than an error.
pub fn parse_cpu_usage(before: &str, after: &str) -> f64 {
    let start = parse_cpu_sample(before);
    let end = parse_cpu_sample(after);

    let Some(total_delta) = end.total.checked_sub(start.total) else {
        return 0.0;
    };
    if total_delta == 0 {
        return 0.0;
    }
    let idle_delta = end.idle.saturating_sub(start.idle);
    let usage = (total_delta - idle_delta.min(total_delta)) as f64 / total_delta as f64 * 100.0;
    round1(usage)
}

/// Derive memory usage percentage from one `/proc/meminfo` capture.
///
/// Used = MemTotal − MemAvailable when the kernel reports an available
/// figure; older kernels fall back to MemTotal − (MemFree + Buffers +
/// Cached). A zero total (parse failure) degrades to 0.0.
pub fn parse_memory_usage(block: &str) -> f64 {
    let mut total = 0u64;
    let mut available = 0u64;
    let mut free = 0u64;
    let mut buffers = 0u64;
    let mut cached = 0u64;

    for line in block.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(value) = value.parse::<u64>() else {
            continue;
        };
        match key.trim_end_matches(':') {
            "MemTotal" => total = value,
            "MemAvailable" => available = value,
            "MemFree" => free = value,
            "Buffers" => buffers = value,
            "Cached" => cached = value,
            _ => {}
        }
    }

    if total == 0 {
        return 0.0;
    }

    let used = if available > 0 {
        total.saturating_sub(available)
    } else {
        total.saturating_sub(free + buffers + cached)
    };

    round1(used as f64 / total as f64 * 100.0)
}

/// Count error-pattern matches in a log tail.
///
/// Sums non-overlapping matches of the duplicate-lease, kernel-warning, and
/// authentication-failure patterns into a single figure; which pattern fired
/// is not preserved.
pub fn count_log_errors(tail: &str) -> u32 {
    let count = DHCP_DUPLICATE.find_iter(tail).count()
        + KERNEL_WARNING.find_iter(tail).count()
        + AUTH_FAILURE.find_iter(tail).count();
    count as u32
}
