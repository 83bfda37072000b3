use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    diagnostics::{Diagnostic, NO_STREAMING_DATA, QUERY_FILE},
    interpreter::value::Value,
    operation::{TableArena, TableHandle, TableObject},
    spec::{Edge, Operation, OperationId, OperationSource, Specification},
};

/// Maps operation nodes to their operation ids.
pub trait Ider {
    fn id_for(&self, handle: TableHandle) -> Option<OperationId>;
}

/// Assigns ids of the form `{kind}{n}`, where `n` counts every id handed
/// out so far regardless of kind.
#[derive(Debug, Default)]
pub struct TableIder {
    ids: IndexMap<TableHandle, OperationId>,
}

impl TableIder {
    pub fn new() -> Self {
        Self::default()
    }

    fn assign(&mut self, handle: TableHandle, kind: &str) -> OperationId {
        let id = OperationId::new(format!("{}{}", kind, self.ids.len()));
        self.ids.insert(handle, id.clone());
        id
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Ider for TableIder {
    fn id_for(&self, handle: TableHandle) -> Option<OperationId> {
        self.ids.get(&handle).cloned()
    }
}

impl Specification {
    /// Flattens the nodes reachable from a query's side effects.
    ///
    /// Parents are numbered before their children. Every payload gets a
    /// chance to resolve node references through the finished [`Ider`]
    /// before it is moved into the specification. Side effects that are not
    /// tables are ignored; if none is a table the query has nothing to run.
    pub fn from_evaluation(
        arena: TableArena,
        side_effects: &[Value],
        now: i64,
    ) -> Result<Specification, Diagnostic> {
        struct Walk<'a> {
            arena: &'a TableArena,
            ider: TableIder,
            visited: Vec<bool>,
            order: Vec<TableHandle>,
            edges: Vec<Edge>,
        }

        impl Walk<'_> {
            fn visit(&mut self, handle: TableHandle) {
                let idx = handle.index() as usize;
                if self.visited[idx] {
                    return;
                }
                self.visited[idx] = true;

                let arena = self.arena;
                let object = arena.get(handle);
                for &parent in object.parents() {
                    self.visit(parent);
                }

                let id = self.ider.assign(handle, object.kind());
                for &parent in object.parents() {
                    if let Some(parent_id) = self.ider.id_for(parent) {
                        self.edges.push(Edge::new(parent_id, id.clone()));
                    }
                }
                self.order.push(handle);
            }
        }

        let mut walk = Walk {
            arena: &arena,
            ider: TableIder::new(),
            visited: vec![false; arena.len()],
            order: Vec::new(),
            edges: Vec::new(),
        };
        for value in side_effects {
            if let Value::Table(handle) = value {
                walk.visit(*handle);
            }
        }

        let Walk {
            ider, order, edges, ..
        } = walk;
        if order.is_empty() {
            return Err(Diagnostic::make_error(&NO_STREAMING_DATA, &[], QUERY_FILE));
        }

        let mut objects: Vec<Option<TableObject>> =
            arena.into_objects().into_iter().map(Some).collect();
        let mut operations = Vec::with_capacity(order.len());
        for handle in order {
            let Some(mut object) = objects[handle.index() as usize].take() else {
                continue;
            };
            let Some(id) = ider.id_for(handle) else {
                continue;
            };
            object.spec.resolve_ids(&ider);
            operations.push(Operation {
                id,
                spec: Arc::from(object.spec),
                source: OperationSource {
                    stack: object.source,
                },
            });
        }

        debug!(
            operations = operations.len(),
            edges = edges.len(),
            "assembled specification"
        );
        Ok(Specification::new(operations, edges).with_now(now))
    }
}
