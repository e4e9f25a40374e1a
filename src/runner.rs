//! Operation runner: resolve the closure, then execute it step by step.
//!
//! A run moves through `Pending -> Resolving -> Executing(i of n)` and ends in
//! `Succeeded` or `Failed`. Steps run strictly one after another and the first
//! failure stops the run; nothing already done is rolled back.

use crate::error::RunError;
use crate::graph;
use crate::launch::{ExitStatus, ProcessLauncher};
use crate::table::{Operation, OperationTable};

use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Resolving,
    Executing { step: usize, of: usize },
    Succeeded,
    /// `operation` is the failing step (or the requested name when the
    /// closure could not be resolved). `code` is what the run exits with.
    Failed { operation: String, code: i32 },
}

/// Operations a successful run executed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub executed: Vec<String>,
}

pub struct Runner<'t, L> {
    table: &'t OperationTable,
    launcher: L,
    working_dir: PathBuf,
    state: RunState,
}

impl<'t, L: ProcessLauncher> Runner<'t, L> {
    pub fn new(table: &'t OperationTable, launcher: L, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            table,
            launcher,
            working_dir: working_dir.into(),
            state: RunState::Pending,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Execution order for `name`, without running anything.
    pub fn plan(&self, name: &str) -> Result<Vec<&'t Operation>, RunError> {
        graph::closure(self.table, name)
    }

    /// Run `name` after its prerequisites. Each invocation starts afresh.
    pub fn run(&mut self, name: &str) -> Result<RunReport, RunError> {
        self.transition(RunState::Pending);
        self.transition(RunState::Resolving);

        let steps = match self.plan(name) {
            Ok(steps) => steps,
            Err(err) => return Err(self.fail(name, err)),
        };

        let of = steps.len();
        let mut executed = Vec::with_capacity(of);
        for (i, op) in steps.into_iter().enumerate() {
            self.transition(RunState::Executing { step: i + 1, of });
            if let Err(err) = self.execute(op, i + 1, of) {
                return Err(self.fail(&op.name, err));
            }
            executed.push(op.name.clone());
        }

        self.transition(RunState::Succeeded);
        Ok(RunReport { executed })
    }

    /// Run every command of `op`; the first nonzero exit ends the step.
    fn execute(&mut self, op: &Operation, step: usize, of: usize) -> Result<(), RunError> {
        for command in &op.commands {
            info!(operation = %op.name, step, of, command = %command, "running");
            match self.launcher.launch(command, &self.working_dir) {
                Ok(ExitStatus::Success) => {}
                Ok(ExitStatus::Failed(code)) => {
                    return Err(RunError::StepFailed {
                        operation: op.name.clone(),
                        command: command.to_string(),
                        code,
                    });
                }
                Err(source) => {
                    return Err(RunError::Spawn {
                        operation: op.name.clone(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    fn fail(&mut self, operation: &str, err: RunError) -> RunError {
        let code = match &err {
            RunError::StepFailed { code, .. } => *code,
            other => i32::from(other.exit_code()),
        };
        self.transition(RunState::Failed {
            operation: operation.to_string(),
            code,
        });
        err
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = ?self.state, to = ?next, "run state");
        self.state = next;
    }
}
