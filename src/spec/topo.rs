use indexmap::IndexMap;
use tracing::trace;

use crate::{
    diagnostics::{
        DUPLICATE_OPERATION, Diagnostic, NO_ROOT_NODES, OPERATION_CYCLE, QUERY_FILE,
        UNKNOWN_CHILD_OPERATION, UNKNOWN_PARENT_OPERATION,
    },
    spec::{Edge, Operation, OperationId},
};

/// Adjacency and execution order derived from a specification.
///
/// Indices point into the specification's `operations`.
#[derive(Debug)]
pub(crate) struct Prepared {
    pub(crate) lookup: IndexMap<OperationId, usize>,
    pub(crate) sorted: Vec<usize>,
    pub(crate) children: Vec<Vec<usize>>,
    pub(crate) parents: Vec<Vec<usize>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

pub(crate) fn prepare(operations: &[Operation], edges: &[Edge]) -> Result<Prepared, Diagnostic> {
    let mut lookup = IndexMap::with_capacity(operations.len());
    for (idx, op) in operations.iter().enumerate() {
        if lookup.insert(op.id.clone(), idx).is_some() {
            return Err(Diagnostic::make_error(
                &DUPLICATE_OPERATION,
                &[op.id.as_str()],
                QUERY_FILE,
            ));
        }
    }

    let mut children = vec![Vec::new(); operations.len()];
    let mut parents = vec![Vec::new(); operations.len()];
    for edge in edges {
        let parent = *lookup.get(&edge.parent).ok_or_else(|| {
            Diagnostic::make_error(&UNKNOWN_PARENT_OPERATION, &[edge.parent.as_str()], QUERY_FILE)
        })?;
        let child = *lookup.get(&edge.child).ok_or_else(|| {
            Diagnostic::make_error(&UNKNOWN_CHILD_OPERATION, &[edge.child.as_str()], QUERY_FILE)
        })?;
        children[parent].push(child);
        parents[child].push(parent);
    }

    let roots: Vec<usize> = (0..operations.len())
        .filter(|idx| parents[*idx].is_empty())
        .collect();
    if roots.is_empty() {
        return Err(Diagnostic::make_error(&NO_ROOT_NODES, &[], QUERY_FILE));
    }

    fn dfs(
        idx: usize,
        children: &[Vec<usize>],
        colors: &mut [Color],
        order: &mut Vec<usize>,
    ) -> Result<(), usize> {
        match colors[idx] {
            Color::Gray => return Err(idx),
            Color::Black => return Ok(()),
            Color::White => {}
        }

        colors[idx] = Color::Gray;
        for &child in &children[idx] {
            dfs(child, children, colors, order)?;
        }
        colors[idx] = Color::Black;
        order.push(idx);
        Ok(())
    }

    let mut colors = vec![Color::White; operations.len()];
    let mut order = Vec::with_capacity(operations.len());

    // Roots first; the second pass only does work when some cycle is not
    // reachable from any root.
    let starts = roots.iter().copied().chain(0..operations.len());
    for start in starts {
        if let Err(idx) = dfs(start, &children, &mut colors, &mut order) {
            return Err(Diagnostic::make_error(
                &OPERATION_CYCLE,
                &[operations[idx].id.as_str()],
                QUERY_FILE,
            ));
        }
    }

    order.reverse();
    trace!(
        operations = operations.len(),
        edges = edges.len(),
        roots = roots.len(),
        "prepared specification"
    );

    Ok(Prepared {
        lookup,
        sorted: order,
        children,
        parents,
    })
}
