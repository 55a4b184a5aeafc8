//! The seam between the transport and the collection pipeline.

use crate::error::Result;

/// Captured output of one remote command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Everything the command wrote to stdout
    pub stdout: String,
    /// Everything the command wrote to stderr
    pub stderr: String,
}

/// Executes remote commands on an established session.
///
/// Implemented by [`SshSession`](super::session::SshSession) against a live
/// router and by in-memory fakes in tests, so the pipeline and sampler can be
/// exercised without a device. The transport is blocking end to end, so the
/// trait is synchronous; async callers hand the whole pipeline to a blocking
/// worker.
pub trait CommandRunner {
    /// Run `command` on the remote side and capture its output.
    fn run(&mut self, command: &str) -> Result<CommandOutput>;

    /// Release the transport. Idempotent; safe after a prior failure.
    fn close(&mut self);
}
