use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, warn};

mod error;
mod graph;
mod launch;
mod logging;
mod runner;
mod settings;
mod table;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "release-ops", version)]
#[command(about = "Build, test, upload and clean a package release", long_about = None)]
#[command(after_help = "Operations:
  build    build distributable artifacts into dist/
  test     install the package with its dev extras, then run the test suite
  upload   build, then upload dist/* to the package index
  clean    remove dist/, build/ and generated *.egg-info directories")]
struct Cli {
    /// Operation to run.
    operation: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli.operation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Run errors carry their own code; anything else (settings, table) is 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<error::RunError>()
        .map(error::RunError::exit_code)
        .unwrap_or(1)
}

fn run(operation: &str) -> Result<()> {
    // 1) Settings + logging.
    let settings = settings::Settings::from_env()?;
    logging::init(&settings);
    if let Some(value) = &settings.ignored_log_format {
        warn!(value = %value, "unknown {}, using text", settings::LOG_FORMAT_ENV);
    }

    // 2) Static operation table.
    let table = table::release()?;

    // 3) Run the closure with real processes.
    let mut runner = runner::Runner::new(&table, launch::SystemLauncher, &settings.working_dir);
    let report = runner.run(operation)?;
    debug!(executed = ?report.executed, state = ?runner.state(), "run finished");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunError;
    use anyhow::{Context, anyhow};
    use pretty_assertions::assert_eq;

    #[test]
    fn run_errors_keep_their_exit_code() {
        let failed: anyhow::Error = RunError::StepFailed {
            operation: "build".to_string(),
            command: "python -m build".to_string(),
            code: 4,
        }
        .into();
        assert_eq!(exit_code(&failed), 4);

        let unknown: anyhow::Error = RunError::UnknownOperation {
            name: "deploy".to_string(),
            known: vec!["build".to_string()],
        }
        .into();
        assert_eq!(exit_code(&unknown), 2);
    }

    #[test]
    fn context_does_not_hide_run_errors() {
        let err = Err::<(), _>(RunError::Cycle {
            path: vec!["a".to_string(), "a".to_string()],
        })
        .context("run release operation")
        .unwrap_err();
        assert_eq!(exit_code(&err), 78);
    }

    #[test]
    fn other_errors_exit_one() {
        assert_eq!(exit_code(&anyhow!("RELEASE_OPS_DIR is not a directory")), 1);
    }
}
