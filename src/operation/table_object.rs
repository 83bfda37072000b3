use std::{collections::HashSet, fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{
    interpreter::{StackEntry, value::Value},
    operation::{
        OperationSpec,
        arena::{TableArena, TableHandle},
    },
};

/// Operation node produced by an operation-constructing builtin.
///
/// Nodes are immutable once stored in a [`TableArena`]. `args` keeps the call
/// arguments exactly as the script passed them, including the piped
/// `tables` value.
#[derive(Debug)]
pub struct TableObject {
    pub(crate) kind: String,
    pub(crate) spec: Box<dyn OperationSpec>,
    pub(crate) parents: Vec<TableHandle>,
    pub(crate) args: IndexMap<String, Value>,
    pub(crate) source: Vec<StackEntry>,
}

impl TableObject {
    pub fn new(
        spec: Box<dyn OperationSpec>,
        parents: Vec<TableHandle>,
        args: IndexMap<String, Value>,
        source: Vec<StackEntry>,
    ) -> Self {
        Self {
            kind: spec.kind().to_string(),
            spec,
            parents,
            args,
            source,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn spec(&self) -> &dyn OperationSpec {
        self.spec.as_ref()
    }

    pub fn parents(&self) -> &[TableHandle] {
        &self.parents
    }

    pub fn args(&self) -> &IndexMap<String, Value> {
        &self.args
    }

    /// Call stack at the time the node was built, innermost last.
    pub fn source(&self) -> &[StackEntry] {
        &self.source
    }
}

/// Script-facing view of a node.
///
/// Exposes the captured arguments plus two synthesized fields, `kind` and
/// `parents`. The view is read-only.
#[derive(Clone, Copy)]
pub struct TableValue<'a> {
    arena: &'a TableArena,
    handle: TableHandle,
}

impl<'a> TableValue<'a> {
    pub fn new(arena: &'a TableArena, handle: TableHandle) -> Self {
        Self { arena, handle }
    }

    pub fn handle(&self) -> TableHandle {
        self.handle
    }

    pub fn object(&self) -> &'a TableObject {
        self.arena.get(self.handle)
    }

    pub fn kind(&self) -> &'a str {
        self.object().kind()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let object = self.object();
        match name {
            "kind" => Some(Value::string(&object.kind)),
            "parents" => Some(Value::Array(Arc::new(
                object.parents.iter().map(|p| Value::Table(*p)).collect(),
            ))),
            _ => object.args.get(name).cloned(),
        }
    }

    /// Field assignment on a table object is silently ignored.
    pub fn set(&self, _name: &str, _value: Value) {}

    pub fn len(&self) -> usize {
        self.object().args.len() + 2
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn range(&self, mut f: impl FnMut(&str, &Value)) {
        let object = self.object();
        for name in ["kind", "parents"] {
            if let Some(value) = self.get(name) {
                f(name, &value);
            }
        }
        for (name, value) in &object.args {
            f(name, value);
        }
    }

    /// Structural equality: same kind, same arguments, and pairwise equal
    /// parents. Table-valued arguments are compared structurally as well.
    pub fn equal(&self, other: &TableValue<'_>) -> bool {
        let mut seen = HashSet::new();
        self.equal_in(other, &mut seen)
    }

    /// `seen` holds pairs already compared or under comparison. Any mismatch
    /// ends the whole comparison, so a revisited pair counts as equal and
    /// shared upstream nodes are walked once.
    fn equal_in(
        &self,
        other: &TableValue<'_>,
        seen: &mut HashSet<(TableHandle, TableHandle)>,
    ) -> bool {
        if !seen.insert((self.handle, other.handle)) {
            return true;
        }

        let left = self.object();
        let right = other.object();

        if left.kind != right.kind
            || left.args.len() != right.args.len()
            || left.parents.len() != right.parents.len()
        {
            return false;
        }

        for (name, value) in &left.args {
            let Some(other_value) = right.args.get(name) else {
                return false;
            };
            let same = match (value, other_value) {
                (Value::Table(a), Value::Table(b)) => TableValue::new(self.arena, *a)
                    .equal_in(&TableValue::new(other.arena, *b), seen),
                (a, b) => a == b,
            };
            if !same {
                return false;
            }
        }

        left.parents.iter().zip(&right.parents).all(|(a, b)| {
            TableValue::new(self.arena, *a).equal_in(&TableValue::new(other.arena, *b), seen)
        })
    }

    fn write_lineage(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let object = self.object();
        let multi_parent = object.parents.len() > 1;
        if multi_parent {
            write!(f, "( ")?;
        }
        for parent in &object.parents {
            TableValue::new(self.arena, *parent).write_lineage(f)?;
            if multi_parent {
                write!(f, "; ")?;
            }
        }
        if multi_parent {
            write!(f, " ) -> ")?;
        } else if object.parents.len() == 1 {
            write!(f, " -> ")?;
        }
        write!(f, "{}", object.kind)
    }
}

impl fmt::Debug for TableValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableValue(#{}, {})", self.handle.0, self.kind())
    }
}

/// Renders the node's lineage, e.g. `from -> range -> filter`.
impl fmt::Display for TableValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_lineage(f)
    }
}
