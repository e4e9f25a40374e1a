//! Prerequisite closure of an operation.
//!
//! The closure is the ordered list of operations a run executes: every
//! prerequisite (depth-first, in declared order, each at most once), then the
//! requested operation last. Cycles are found with DFS coloring: reaching a
//! node that is still on the stack is a cycle, reaching a finished node is
//! just a shared prerequisite.

use crate::error::RunError;
use crate::table::{Operation, OperationTable};

use std::collections::BTreeMap;

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    Temp,
    Perm,
}

/// Resolve the execution order for `target`.
pub fn closure<'t>(table: &'t OperationTable, target: &str) -> Result<Vec<&'t Operation>, RunError> {
    let op = table.get(target).ok_or_else(|| RunError::UnknownOperation {
        name: target.to_string(),
        known: table.names(),
    })?;

    let mut marks = BTreeMap::<&str, Mark>::new();
    let mut stack = Vec::<&str>::new();
    let mut order = Vec::new();
    visit(op, table, &mut marks, &mut stack, &mut order)?;
    Ok(order)
}

fn visit<'t>(
    op: &'t Operation,
    table: &'t OperationTable,
    marks: &mut BTreeMap<&'t str, Mark>,
    stack: &mut Vec<&'t str>,
    order: &mut Vec<&'t Operation>,
) -> Result<(), RunError> {
    let name = op.name.as_str();
    match marks.get(name) {
        Some(Mark::Perm) => return Ok(()),
        Some(Mark::Temp) => {
            // `name` is on the current stack; report the loop from its first visit.
            let start = stack.iter().position(|n| *n == name).unwrap_or(0);
            let mut path: Vec<String> = stack[start..].iter().map(|n| n.to_string()).collect();
            path.push(name.to_string());
            return Err(RunError::Cycle { path });
        }
        None => {}
    }

    marks.insert(name, Mark::Temp);
    stack.push(name);

    for prerequisite in &op.prerequisites {
        let dep = table
            .get(prerequisite)
            .ok_or_else(|| RunError::UnknownOperation {
                name: prerequisite.clone(),
                known: table.names(),
            })?;
        visit(dep, table, marks, stack, order)?;
    }

    stack.pop();
    marks.insert(name, Mark::Perm);
    order.push(op);
    Ok(())
}
