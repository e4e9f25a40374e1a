//! Error taxonomy for table loading, process launching and runs.
//!
//! Every run error maps to a process exit code via [`RunError::exit_code`].

use std::io;
use thiserror::Error;

/// Exit code for a usage error (unknown operation), as clap reports them.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for a broken operation table (`EX_CONFIG`).
pub const EXIT_CONFIG: u8 = 78;
/// Exit code when the external program does not exist.
pub const EXIT_NOT_FOUND: u8 = 127;
/// Exit code when the external program exists but cannot be started.
pub const EXIT_CANNOT_EXECUTE: u8 = 126;

/// Structural problems found while validating an operation table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("operation table contains no operations")]
    Empty,

    #[error("operation name must not be empty")]
    EmptyName,

    #[error("duplicate operation name: {0}")]
    DuplicateName(String),

    #[error("operation `{operation}` has no commands")]
    NoCommands { operation: String },

    #[error("operation `{operation}` has a command with an empty program")]
    EmptyProgram { operation: String },

    #[error("operation `{operation}` lists unknown prerequisite `{prerequisite}`")]
    UnknownPrerequisite {
        operation: String,
        prerequisite: String,
    },
}

/// The external program could not be started at all.
#[derive(Debug, Error)]
#[error("failed to launch `{program}`: {source}")]
pub struct LaunchError {
    pub program: String,
    #[source]
    pub source: io::Error,
}

impl LaunchError {
    pub fn new(program: impl Into<String>, source: io::Error) -> Self {
        Self {
            program: program.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self.source.kind() {
            io::ErrorKind::NotFound => EXIT_NOT_FOUND,
            _ => EXIT_CANNOT_EXECUTE,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("unknown operation `{name}` (expected one of: {})", .known.join(", "))]
    UnknownOperation { name: String, known: Vec<String> },

    #[error("prerequisite cycle detected: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("operation `{operation}` failed: `{command}` exited with status {code}")]
    StepFailed {
        operation: String,
        command: String,
        code: i32,
    },

    #[error("operation `{operation}` could not start")]
    Spawn {
        operation: String,
        #[source]
        source: LaunchError,
    },
}

impl RunError {
    /// Process exit code that reports this error to the invoker.
    ///
    /// A failed step reports the child's own code. Codes outside `1..=255`
    /// cannot be passed through an exit status and collapse to 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::UnknownOperation { .. } => EXIT_USAGE,
            RunError::Cycle { .. } => EXIT_CONFIG,
            RunError::StepFailed { code, .. } => u8::try_from(*code)
                .ok()
                .filter(|c| *c != 0)
                .unwrap_or(1),
            RunError::Spawn { source, .. } => source.exit_code(),
        }
    }
}
