//! Operation table: JSON schema + validated in-memory structures.
//!
//! The release table is static configuration compiled into the binary and
//! loaded once at startup. This module owns:
//! - CommandLine (one external program invocation)
//! - Table schema (raw JSON) and the validated OperationTable

pub mod command;
pub mod ops;

pub use command::CommandLine;
pub use ops::{Operation, OperationTable, TableSpec};

use crate::Result;
use anyhow::Context;

const RELEASE_TABLE: &str = include_str!("release.json");

/// Load the built-in release table: build, test, upload (after build), clean.
pub fn release() -> Result<OperationTable> {
    let spec: TableSpec =
        serde_json::from_str(RELEASE_TABLE).context("parse built-in release table")?;
    let table = spec
        .validate_and_build()
        .context("validate built-in release table")?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn release_table_has_the_four_operations() {
        let table = release().unwrap();
        assert_eq!(table.names(), vec!["build", "test", "upload", "clean"]);
    }

    #[test]
    fn only_upload_has_a_prerequisite() {
        let table = release().unwrap();
        for name in ["build", "test", "clean"] {
            assert!(table.get(name).unwrap().prerequisites.is_empty(), "{name}");
        }
        assert_eq!(table.get("upload").unwrap().prerequisites, vec!["build"]);
    }

    #[test]
    fn release_commands() {
        let table = release().unwrap();
        let lines = |name: &str| -> Vec<String> {
            table
                .get(name)
                .unwrap()
                .commands
                .iter()
                .map(ToString::to_string)
                .collect()
        };

        assert_eq!(lines("build"), vec!["python -m build"]);
        assert_eq!(
            lines("test"),
            vec!["python -m pip install -e .[dev]", "pytest"]
        );
        assert_eq!(lines("upload"), vec!["twine upload dist/*"]);
        assert_eq!(
            lines("clean"),
            vec!["rm -rf dist build *.egg-info src/*.egg-info"]
        );
    }
}
