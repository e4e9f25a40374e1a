//! Recording launcher for tests: no processes, scripted outcomes.

use crate::error::LaunchError;
use crate::launch::{ExitStatus, ProcessLauncher};
use crate::table::CommandLine;

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::Path;

#[derive(Debug, Default)]
pub struct RecordingLauncher {
    /// Every launch attempt, rendered as a command line.
    pub calls: Vec<String>,
    statuses: BTreeMap<String, i32>, // program -> exit code
    missing: BTreeSet<String>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every launch of `program` exit with `code`.
    pub fn exit_with(mut self, program: &str, code: i32) -> Self {
        self.statuses.insert(program.to_string(), code);
        self
    }

    /// Make every launch of `program` fail as if it were not installed.
    pub fn missing(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Programs launched, in order.
    pub fn programs(&self) -> Vec<&str> {
        self.calls
            .iter()
            .map(|line| line.split(' ').next().unwrap_or(""))
            .collect()
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn launch(&mut self, command: &CommandLine, _working_dir: &Path) -> Result<ExitStatus, LaunchError> {
        self.calls.push(command.to_string());
        if self.missing.contains(&command.program) {
            return Err(LaunchError::new(
                command.program.clone(),
                io::Error::from(io::ErrorKind::NotFound),
            ));
        }
        let code = self.statuses.get(&command.program).copied().unwrap_or(0);
        Ok(ExitStatus::from_code(code))
    }
}
