use crate::error::LaunchError;
use crate::launch::wildcard::expand_args;
use crate::launch::{ExitStatus, ProcessLauncher};
use crate::table::CommandLine;

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Spawns real child processes.
///
/// Stdio and environment are inherited, so the tool's diagnostics reach the
/// terminal unchanged. Wildcard arguments are expanded first, the way the
/// shell would.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&mut self, command: &CommandLine, working_dir: &Path) -> Result<ExitStatus, LaunchError> {
        let args = expand_args(&command.args, working_dir);
        debug!(program = %command.program, args = ?args, dir = %working_dir.display(), "spawning");

        let status = Command::new(&command.program)
            .args(&args)
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| LaunchError::new(command.program.clone(), source))?;

        Ok(match status.code() {
            Some(code) => ExitStatus::from_code(code),
            None => ExitStatus::Failed(signal_code(&status)),
        })
    }
}

/// Shell-style code for a child killed by a signal: 128 + signal number.
#[cfg(unix)]
fn signal_code(status: &std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|sig| 128 + sig).unwrap_or(1)
}

#[cfg(not(unix))]
fn signal_code(_status: &std::process::ExitStatus) -> i32 {
    1
}
