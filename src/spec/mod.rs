//! Flattened operation graph handed to the planner.
//!
//! A [`Specification`] is assembled from the operation nodes a query built
//! (see [`assemble`]), validated, and topologically ordered (see [`topo`]).

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{interpreter::StackEntry, operation::OperationSpec};

pub mod assemble;
pub mod specification;
mod topo;

pub use assemble::{Ider, TableIder};
pub use specification::Specification;

/// Stable identifier of an operation within one specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OperationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OperationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub parent: OperationId,
    pub child: OperationId,
}

impl Edge {
    pub fn new(parent: impl Into<OperationId>, child: impl Into<OperationId>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

/// Where in the query an operation was built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSource {
    pub stack: Vec<StackEntry>,
}

/// A node of the specification graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "OperationRepr", into = "OperationRepr")]
pub struct Operation {
    pub id: OperationId,
    pub spec: Arc<dyn OperationSpec>,
    pub source: OperationSource,
}

impl Operation {
    pub fn new(id: impl Into<OperationId>, spec: Arc<dyn OperationSpec>) -> Self {
        Self {
            id: id.into(),
            spec,
            source: OperationSource::default(),
        }
    }

    pub fn with_source(mut self, source: OperationSource) -> Self {
        self.source = source;
        self
    }

    pub fn kind(&self) -> &str {
        self.spec.kind()
    }
}

/// Wire shape of an [`Operation`]: the payload travels as its JSON form.
#[derive(Serialize, Deserialize)]
struct OperationRepr {
    id: OperationId,
    kind: String,
    #[serde(default)]
    spec: serde_json::Value,
    #[serde(default)]
    source: OperationSource,
}

impl From<Operation> for OperationRepr {
    fn from(op: Operation) -> Self {
        Self {
            kind: op.spec.kind().to_string(),
            spec: op.spec.to_json(),
            id: op.id,
            source: op.source,
        }
    }
}

impl From<OperationRepr> for Operation {
    fn from(repr: OperationRepr) -> Self {
        Self {
            id: repr.id,
            spec: Arc::new(OpaqueSpec {
                kind: repr.kind,
                spec: repr.spec,
            }),
            source: repr.source,
        }
    }
}

/// Payload restored from a serialized specification. Only its kind and JSON
/// form are known.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueSpec {
    pub kind: String,
    pub spec: serde_json::Value,
}

impl OperationSpec for OpaqueSpec {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn to_json(&self) -> serde_json::Value {
        self.spec.clone()
    }
}

/// Resource quotas the executor is allowed to use for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    pub concurrency_quota: i64,
    pub memory_bytes_quota: i64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            concurrency_quota: 1,
            memory_bytes_quota: i64::MAX,
        }
    }
}

#[cfg(test)]
mod specification_test;
