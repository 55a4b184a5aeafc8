//! Two-snapshot sampling of cumulative kernel counter files.

use serde::{Deserialize, Serialize};

use super::traits::CommandRunner;
use crate::error::{Result, RouterError};
use crate::SAMPLE_DELAY_SECS;

/// Token separating sections of the compound snapshot command's output.
/// Must never occur inside a kernel counter file.
pub const SECTION_TOKEN: &str = "__EDGE_PULSE_SECTION__";

/// Which kernel counter file a capture came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterFile {
    /// `/proc/net/dev` — per-interface cumulative traffic counters
    Traffic,
    /// `/proc/stat` — aggregate CPU jiffie counters
    CpuStat,
}

impl CounterFile {
    /// Remote path of the file.
    pub fn path(&self) -> &'static str {
        match self {
            CounterFile::Traffic => "/proc/net/dev",
            CounterFile::CpuStat => "/proc/stat",
        }
    }
}

/// One raw capture of a counter file at one instant.
#[derive(Debug, Clone)]
pub struct CounterSnapshot {
    /// Which file was captured
    pub file: CounterFile,
    /// The raw text of the capture
    pub text: String,
}

/// Before/after captures of one counter file, taken one sample delay apart.
#[derive(Debug, Clone)]
pub struct SnapshotPair {
    pub before: CounterSnapshot,
    pub after: CounterSnapshot,
}

/// Capture each requested file twice, two seconds apart.
///
/// A single compound command reads every file, sleeps on the router, and
/// reads them again, with a delimiter token echoed between sections. The
/// server-side sleep keeps client scheduling jitter out of the sample
/// interval, which feeds directly into rate accuracy. The combined output
/// must split into exactly two sections per file or the sample fails.
pub fn sample_counters(
    runner: &mut dyn CommandRunner,
    files: &[CounterFile],
) -> Result<Vec<SnapshotPair>> {
    let reads: Vec<String> = files.iter().map(|f| format!("cat {}", f.path())).collect();
    let separator = format!("; echo {SECTION_TOKEN}; ");
    let command = format!(
        "{before}; echo {SECTION_TOKEN}; sleep {SAMPLE_DELAY_SECS}; {after}",
        before = reads.join(&separator),
        after = reads.join(&separator),
    );

    let output = runner.run(&command)?;
    let sections: Vec<&str> = output.stdout.split(SECTION_TOKEN).collect();
    if sections.len() != files.len() * 2 {
        return Err(RouterError::exec_error(
            &command,
            format!(
                "snapshot output split into {} sections, expected {}",
                sections.len(),
                files.len() * 2
            ),
        ));
    }

    let pairs = files
        .iter()
        .enumerate()
        .map(|(i, &file)| SnapshotPair {
            before: CounterSnapshot {
                file,
                text: sections[i].to_string(),
            },
            after: CounterSnapshot {
                file,
                text: sections[files.len() + i].to_string(),
            },
        })
        .collect();

    tracing::debug!(files = files.len(), "counter snapshots captured");
    Ok(pairs)
}
