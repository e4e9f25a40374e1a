//! Launching external programs.
//!
//! The runner only sees [`ProcessLauncher`]; the system implementation spawns
//! real child processes, tests substitute a recording fake.

pub mod system;
pub mod wildcard;

#[cfg(test)]
pub mod fake;

pub use system::SystemLauncher;

use crate::error::LaunchError;
use crate::table::CommandLine;
use std::path::Path;

/// How a launched program ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failed(i32),
}

impl ExitStatus {
    pub fn from_code(code: i32) -> Self {
        if code == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Failed(code)
        }
    }
}

/// Runs one command to completion in `working_dir`.
///
/// Implementations block until the program exits and never capture its
/// output.
pub trait ProcessLauncher {
    fn launch(&mut self, command: &CommandLine, working_dir: &Path) -> Result<ExitStatus, LaunchError>;
}

impl<L: ProcessLauncher + ?Sized> ProcessLauncher for &mut L {
    fn launch(&mut self, command: &CommandLine, working_dir: &Path) -> Result<ExitStatus, LaunchError> {
        (**self).launch(command, working_dir)
    }
}
