use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::json;

use crate::{
    interpreter::value::Value,
    operation::{OperationSpec, TableArena, TableHandle, TableObject},
    spec::{Edge, Ider, Operation, OperationId, ResourceLimits, Specification},
};

#[derive(Debug)]
struct NamedSpec {
    kind: String,
}

fn named(kind: &str) -> Box<NamedSpec> {
    Box::new(NamedSpec {
        kind: kind.to_string(),
    })
}

impl OperationSpec for NamedSpec {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn to_json(&self) -> serde_json::Value {
        json!({ "kind": self.kind })
    }
}

/// Payload that refers to other nodes and swaps handles for ids on assembly.
#[derive(Debug)]
struct JoinSpec {
    tables: Vec<TableHandle>,
    resolved: Vec<OperationId>,
}

impl OperationSpec for JoinSpec {
    fn kind(&self) -> &str {
        "join"
    }

    fn to_json(&self) -> serde_json::Value {
        json!({ "tables": self.resolved })
    }

    fn resolve_ids(&mut self, ider: &dyn Ider) {
        self.resolved = self
            .tables
            .iter()
            .filter_map(|handle| ider.id_for(*handle))
            .collect();
    }
}

fn op(id: &str) -> Operation {
    Operation::new(
        id,
        Arc::new(NamedSpec {
            kind: id.to_string(),
        }),
    )
}

fn spec(ids: &[&str], edges: &[(&str, &str)]) -> Specification {
    Specification::new(
        ids.iter().map(|id| op(id)).collect(),
        edges.iter().map(|(p, c)| Edge::new(*p, *c)).collect(),
    )
    .with_now(1)
}

fn walk_ids(spec: &Specification) -> Result<Vec<String>, crate::diagnostics::Diagnostic> {
    let mut seen = Vec::new();
    spec.walk(|op| {
        seen.push(op.id.to_string());
        Ok(())
    })?;
    Ok(seen)
}

fn position(order: &[String], id: &str) -> usize {
    order.iter().position(|seen| seen == id).unwrap()
}

#[test]
fn test_walk_diamond_parents_first() {
    let spec = spec(
        &["a", "b", "c", "d"],
        &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
    );

    let order = walk_ids(&spec).unwrap();
    assert_eq!(order, vec!["a", "c", "b", "d"]);
    assert!(position(&order, "a") < position(&order, "b"));
    assert!(position(&order, "a") < position(&order, "c"));
    assert!(position(&order, "b") < position(&order, "d"));
    assert!(position(&order, "c") < position(&order, "d"));
}

#[test]
fn test_walk_visits_every_node_once() {
    let spec = spec(
        &["from", "range", "filter", "other", "join"],
        &[
            ("from", "range"),
            ("range", "filter"),
            ("filter", "join"),
            ("other", "join"),
        ],
    );

    let mut order = walk_ids(&spec).unwrap();
    assert_eq!(order.len(), 5);
    order.sort();
    order.dedup();
    assert_eq!(order.len(), 5);
}

#[test]
fn test_unknown_child_operation() {
    let spec = spec(&["a", "b"], &[("a", "c")]);

    let err = spec.validate().unwrap_err();
    assert_eq!(err.code(), Some("E402"));
    assert_eq!(
        err.message(),
        Some("Edge references unknown child operation `c`.")
    );
}

#[test]
fn test_unknown_parent_operation() {
    let spec = spec(&["a", "b"], &[("x", "b")]);

    let err = spec.validate().unwrap_err();
    assert_eq!(err.code(), Some("E401"));
    assert!(err.message().unwrap().contains("`x`"));
}

#[test]
fn test_cycle_is_rejected() {
    let spec = spec(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "b")]);

    let err = spec.validate().unwrap_err();
    assert_eq!(err.code(), Some("E404"));
}

#[test]
fn test_cycle_not_reachable_from_roots_is_rejected() {
    let spec = spec(&["a", "b", "c"], &[("b", "c"), ("c", "b")]);

    let err = spec.validate().unwrap_err();
    assert_eq!(err.code(), Some("E404"));
}

#[test]
fn test_cycle_performs_no_visits() {
    let spec = spec(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "b")]);

    let mut visits = 0;
    let result = spec.walk(|_| {
        visits += 1;
        Ok(())
    });
    assert!(result.is_err());
    assert_eq!(visits, 0);
}

#[test]
fn test_empty_specification_has_no_roots() {
    let spec = Specification::new(Vec::new(), Vec::new()).with_now(1);

    let err = spec.validate().unwrap_err();
    assert_eq!(err.code(), Some("E403"));
    assert_eq!(err.to_string(), "[E403] Query has no root nodes.");
}

#[test]
fn test_duplicate_ids_regardless_of_edges() {
    let clean = spec(&["a", "a"], &[]);
    let dangling = spec(&["a", "b", "a"], &[("a", "zzz"), ("zzz", "b")]);

    assert_eq!(clean.validate().unwrap_err().code(), Some("E400"));
    assert_eq!(dangling.validate().unwrap_err().code(), Some("E400"));
}

#[test]
fn test_validate_requires_now() {
    let spec = spec(&["a"], &[]).with_now(0);
    assert_eq!(spec.validate().unwrap_err().code(), Some("E405"));

    let spec = spec.with_now(1_700_000_000_000_000_000);
    assert!(spec.validate().is_ok());
}

#[test]
fn test_walk_stops_at_first_error() {
    let spec = spec(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);

    let mut seen = Vec::new();
    let err = spec
        .walk(|op| {
            seen.push(op.id.to_string());
            if op.id.as_str() == "b" {
                return Err(crate::diagnostics::Diagnostic::make_error(
                    &crate::diagnostics::BAD_EXPRESSION,
                    &["stop"],
                    "<query>",
                ));
            }
            Ok(())
        })
        .unwrap_err();

    assert_eq!(err.code(), Some("E307"));
    assert_eq!(seen, vec!["a", "b"]);
}

#[test]
fn test_children_and_parents() {
    let spec = spec(
        &["a", "b", "c", "d"],
        &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
    );

    let ids = |ops: Vec<&Operation>| ops.iter().map(|op| op.id.to_string()).collect::<Vec<_>>();
    assert_eq!(ids(spec.children(&"a".into())), vec!["b", "c"]);
    assert_eq!(ids(spec.parents(&"d".into())), vec!["b", "c"]);
    assert!(spec.parents(&"a".into()).is_empty());
    assert!(spec.children(&"missing".into()).is_empty());
}

#[test]
fn test_children_on_invalid_graph() {
    let spec = spec(&["a", "b"], &[("a", "c")]);

    assert!(spec.children(&"a".into()).is_empty());
    assert!(spec.parents(&"b".into()).is_empty());
    assert_eq!(
        spec.try_children(&"a".into()).unwrap_err().code(),
        Some("E402")
    );
}

#[test]
fn test_clone_is_unprepared() {
    let original = spec(&["a", "b"], &[("a", "b")]);
    assert!(original.validate().is_ok());

    let mut copy = original.clone();
    copy.edges.push(Edge::new("b", "a"));

    assert!(original.validate().is_ok());
    assert_eq!(copy.validate().unwrap_err().code(), Some("E403"));
}

#[test]
fn test_serialized_shape() {
    let spec = spec(&["from0", "range1"], &[("from0", "range1")]).with_resources(ResourceLimits {
        concurrency_quota: 4,
        memory_bytes_quota: 1024,
    });

    let value = serde_json::to_value(&spec).unwrap();
    assert_eq!(
        value,
        json!({
            "operations": [
                { "id": "from0", "kind": "from0", "spec": { "kind": "from0" }, "source": { "stack": [] } },
                { "id": "range1", "kind": "range1", "spec": { "kind": "range1" }, "source": { "stack": [] } },
            ],
            "edges": [ { "parent": "from0", "child": "range1" } ],
            "resources": { "concurrency_quota": 4, "memory_bytes_quota": 1024 },
            "now": 1,
        })
    );

    let restored: Specification = serde_json::from_value(value).unwrap();
    assert_eq!(restored.operations[1].kind(), "range1");
    assert_eq!(restored.operations[1].spec.to_json(), json!({ "kind": "range1" }));
    assert_eq!(restored.resources.concurrency_quota, 4);
    assert!(restored.validate().is_ok());
    assert_eq!(restored.fingerprint().unwrap(), spec.fingerprint().unwrap());
}

#[test]
fn test_fingerprint_tracks_content() {
    let a = spec(&["a", "b"], &[("a", "b")]);
    let b = spec(&["a", "b"], &[("a", "b")]).with_now(2);

    let fa = a.fingerprint().unwrap();
    assert_eq!(fa.len(), 64);
    assert_eq!(fa, a.clone().fingerprint().unwrap());
    assert_ne!(fa, b.fingerprint().unwrap());
}

fn table(
    arena: &mut TableArena,
    spec: Box<dyn OperationSpec>,
    parents: Vec<TableHandle>,
) -> TableHandle {
    arena.alloc(TableObject::new(spec, parents, IndexMap::new(), Vec::new()))
}

#[test]
fn test_from_evaluation_assigns_ids_parents_first() {
    let mut arena = TableArena::new();
    let from = table(&mut arena, named("from"), vec![]);
    let range = table(&mut arena, named("range"), vec![from]);
    let filter = table(&mut arena, named("filter"), vec![range]);

    let spec = Specification::from_evaluation(
        arena,
        &[Value::Int(1), Value::Table(filter), Value::Table(filter)],
        42,
    )
    .unwrap();

    let ids: Vec<&str> = spec.operations.iter().map(|op| op.id.as_str()).collect();
    assert_eq!(ids, vec!["from0", "range1", "filter2"]);
    assert_eq!(
        spec.edges,
        vec![Edge::new("from0", "range1"), Edge::new("range1", "filter2")]
    );
    assert_eq!(spec.now, 42);
    assert!(spec.validate().is_ok());
}

#[test]
fn test_from_evaluation_shares_common_ancestors() {
    let mut arena = TableArena::new();
    let from = table(&mut arena, named("from"), vec![]);
    let left = table(&mut arena, named("filter"), vec![from]);
    let right = table(&mut arena, named("range"), vec![from]);
    let join = table(
        &mut arena,
        Box::new(JoinSpec {
            tables: vec![left, right],
            resolved: Vec::new(),
        }),
        vec![left, right],
    );
    let unused = table(&mut arena, named("from"), vec![]);

    let spec = Specification::from_evaluation(arena, &[Value::Table(join)], 1).unwrap();

    let ids: Vec<&str> = spec.operations.iter().map(|op| op.id.as_str()).collect();
    assert_eq!(ids, vec!["from0", "filter1", "range2", "join3"]);
    assert_eq!(spec.edges.len(), 4);
    assert_eq!(
        spec.operations[3].spec.to_json(),
        json!({ "tables": ["filter1", "range2"] })
    );
    assert!(unused.index() > join.index());
    assert!(spec.validate().is_ok());
}

#[test]
fn test_from_evaluation_requires_a_table() {
    let mut arena = TableArena::new();
    table(&mut arena, named("from"), vec![]);

    let err = Specification::from_evaluation(arena, &[Value::Int(3)], 1).unwrap_err();
    assert_eq!(err.code(), Some("E406"));
}
