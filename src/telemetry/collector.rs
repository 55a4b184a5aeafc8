//! The collection pipeline: one SSH session, one telemetry snapshot.

use std::time::{Duration, Instant};

use super::config::ConnectionConfig;
use super::data::TelemetrySnapshot;
use super::parsers::{count_log_errors, parse_cpu_usage, parse_memory_usage, parse_traffic_rates};
use super::sampler::{sample_counters, CounterFile};
use super::session::SshSession;
use super::traits::CommandRunner;
use crate::error::{Result, RouterError};
use crate::{COLLECT_TIMEOUT_SECS, LOG_TAIL_LINES, SAMPLE_DELAY_SECS, VALIDATE_TIMEOUT_SECS};

/// Vendor wrapper paths tried in order for the firmware identity command.
const FIRMWARE_WRAPPERS: &[&str] = &[
    "/opt/vyatta/bin/vyatta-op-cmd-wrapper",
    "vbash -c /opt/vyatta/bin/vyatta-op-cmd-wrapper",
];

/// Router telemetry collector.
///
/// A pure function of connection parameters: each poll opens its own
/// session, runs the bounded command sequence, and releases the transport.
/// It holds no opinion about polling cadence — the two-second inter-sample
/// delay is internal to one poll, while the polling period belongs to the
/// caller.
pub struct RouterCollector {
    config: ConnectionConfig,
    in_flight: tokio::sync::Mutex<()>,
}

impl RouterCollector {
    /// Create a collector for one router, validating the settings.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            in_flight: tokio::sync::Mutex::new(()),
        })
    }

    /// The connection settings this collector polls.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Run one telemetry poll.
    ///
    /// The blocking transport work runs on a dedicated worker so an async
    /// caller is never blocked. At most one poll is in flight per collector:
    /// overlapping sessions against the same router risk interleaved command
    /// output and counter misalignment, so concurrent calls queue here.
    ///
    /// Any transport or execution error discards the partial result and
    /// surfaces as a single [`RouterError::Collection`]; retry and backoff
    /// belong to the caller.
    pub async fn collect(&self) -> Result<TelemetrySnapshot> {
        let _in_flight = self.in_flight.lock().await;
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || collect_blocking(&config))
            .await
            .map_err(|e| RouterError::exec_error("collection worker", e.to_string()))?
    }

    /// Test the credentials: connect and disconnect, nothing else.
    pub async fn validate(&self) -> Result<()> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || validate_blocking(&config))
            .await
            .map_err(|e| RouterError::exec_error("validation worker", e.to_string()))?
    }
}

/// Blocking body of one poll: open, run the pipeline, always close.
pub fn collect_blocking(config: &ConnectionConfig) -> Result<TelemetrySnapshot> {
    let started = Instant::now();
    let mut session = SshSession::open(config, Duration::from_secs(COLLECT_TIMEOUT_SECS))
        .map_err(|e| RouterError::collection(&config.host, e))?;

    let result = collect_with(&mut session, &config.host);
    if result.is_ok() {
        tracing::debug!(
            host = %config.host,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "telemetry poll finished"
        );
    }
    result
}

/// Run the pipeline over an established runner, releasing it on every path.
///
/// A pipeline error discards the partial snapshot and comes back as a single
/// [`RouterError::Collection`] wrapping the first failure.
pub fn collect_with(runner: &mut dyn CommandRunner, host: &str) -> Result<TelemetrySnapshot> {
    let result = run_pipeline(runner);
    runner.close();
    result.map_err(|e| RouterError::collection(host, e))
}

/// Blocking credential check: connect within the short budget, then close.
pub fn validate_blocking(config: &ConnectionConfig) -> Result<()> {
    let mut session = SshSession::open(config, Duration::from_secs(VALIDATE_TIMEOUT_SECS))?;
    session.close();
    Ok(())
}

/// Sequence the remote commands and assemble the snapshot.
///
/// Runs against the [`CommandRunner`] seam so tests can drive it with canned
/// output. Fields start at their documented defaults; each step overwrites
/// one of them. The first transport/exec error aborts the whole poll.
pub fn run_pipeline(runner: &mut dyn CommandRunner) -> Result<TelemetrySnapshot> {
    let mut snapshot = TelemetrySnapshot::default();

    let uptime = runner.run("uptime")?.stdout.trim().to_string();
    if !uptime.is_empty() {
        snapshot.uptime = uptime;
    }

    if let Some(firmware) = fetch_firmware(runner)? {
        snapshot.firmware = firmware;
    }

    let pairs = sample_counters(runner, &[CounterFile::Traffic, CounterFile::CpuStat])?;
    for pair in &pairs {
        match pair.before.file {
            CounterFile::Traffic => {
                snapshot.interfaces = parse_traffic_rates(
                    &pair.before.text,
                    &pair.after.text,
                    SAMPLE_DELAY_SECS as f64,
                );
                // Only the synthetic total means the counter table was unreadable
                if snapshot.interfaces.len() <= 1 {
                    tracing::warn!(file = pair.before.file.path(), "parsed no interfaces");
                }
            }
            CounterFile::CpuStat => {
                snapshot.cpu_percent = parse_cpu_usage(&pair.before.text, &pair.after.text);
            }
        }
    }

    let meminfo = runner.run("cat /proc/meminfo")?;
    snapshot.memory_percent = parse_memory_usage(&meminfo.stdout);

    let log_tail = runner.run(&format!("tail -n {LOG_TAIL_LINES} /var/log/messages"))?;
    snapshot.log_errors = count_log_errors(&log_tail.stdout);

    Ok(snapshot)
}

/// Try each vendor wrapper in order; first output that looks like an image
/// listing wins. `None` leaves the default identity standing.
fn fetch_firmware(runner: &mut dyn CommandRunner) -> Result<Option<String>> {
    for wrapper in FIRMWARE_WRAPPERS.iter().copied() {
        let output = runner.run(&format!("{wrapper} show system image"))?;
        let text = output.stdout.trim();
        if !text.is_empty() && text.to_lowercase().contains("image") {
            return Ok(Some(text.to_string()));
        }
        tracing::debug!(wrapper, "wrapper produced no usable image listing");
    }
    Ok(None)
}
