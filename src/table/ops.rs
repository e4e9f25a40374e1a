//! Operation table schema and validation.
//!
//! JSON shape:
//! {
//!   "operations": [
//!     {
//!       "name": "upload",                      // unique operation name
//!       "prerequisites": ["build"],            // run first, in this order
//!       "commands": [                          // recipe lines, run in order
//!         { "program": "twine", "args": ["upload", "dist/*"] }
//!       ]
//!     },
//!     ...
//!   ]
//! }
//!
//! Validation checks names, commands and prerequisite references. Cycles are
//! left to the graph walk so they surface as a run error before anything is
//! launched.

use crate::error::TableError;
use crate::table::CommandLine;

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
pub struct TableSpec {
    #[serde(default)]
    pub operations: Vec<RawOperation>,
}

/// Raw operation shape as it appears in the table JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOperation {
    pub name: String,

    #[serde(default)]
    pub prerequisites: Vec<String>,

    #[serde(default)]
    pub commands: Vec<CommandLine>,
}

/// Validated operation, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub prerequisites: Vec<String>,
    pub commands: Vec<CommandLine>,
}

/// Immutable operation table. Iteration follows declaration order.
#[derive(Debug, Clone)]
pub struct OperationTable {
    operations: Vec<Operation>,
    index: BTreeMap<String, usize>, // name -> position in `operations`
}

impl OperationTable {
    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.index.get(name).map(|&i| &self.operations[i])
    }

    pub fn names(&self) -> Vec<String> {
        self.operations.iter().map(|op| op.name.clone()).collect()
    }
}

impl TableSpec {
    /// Validate the raw table and build an [`OperationTable`]:
    /// - at least one operation
    /// - non-empty, unique names
    /// - every operation has commands, every command a program
    /// - prerequisites reference existing operations
    pub fn validate_and_build(&self) -> Result<OperationTable, TableError> {
        if self.operations.is_empty() {
            return Err(TableError::Empty);
        }

        // 1) Unique, non-empty names and well-formed commands.
        let mut operations = Vec::with_capacity(self.operations.len());
        let mut index = BTreeMap::<String, usize>::new();
        for raw in &self.operations {
            let name = raw.name.trim();
            if name.is_empty() {
                return Err(TableError::EmptyName);
            }
            if index.contains_key(name) {
                return Err(TableError::DuplicateName(name.to_string()));
            }
            if raw.commands.is_empty() {
                return Err(TableError::NoCommands {
                    operation: name.to_string(),
                });
            }
            if raw.commands.iter().any(|c| c.program.trim().is_empty()) {
                return Err(TableError::EmptyProgram {
                    operation: name.to_string(),
                });
            }

            index.insert(name.to_string(), operations.len());
            operations.push(Operation {
                name: name.to_string(),
                prerequisites: raw
                    .prerequisites
                    .iter()
                    .map(|p| p.trim().to_string())
                    .collect(),
                commands: raw.commands.clone(),
            });
        }

        // 2) Prerequisites must name declared operations.
        for op in &operations {
            for prerequisite in &op.prerequisites {
                if !index.contains_key(prerequisite) {
                    return Err(TableError::UnknownPrerequisite {
                        operation: op.name.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
            }
        }

        Ok(OperationTable { operations, index })
    }
}
