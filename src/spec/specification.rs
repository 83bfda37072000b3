use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    diagnostics::{Diagnostic, MISSING_NOW, QUERY_FILE},
    spec::{
        Edge, Operation, OperationId, ResourceLimits,
        topo::{self, Prepared},
    },
};

/// Operation graph of one query.
///
/// Preparation (id lookup, edge resolution, topological order) runs on first
/// use and is cached, including its failure. The cache is never invalidated:
/// do not mutate `operations` or `edges` after calling any graph accessor.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Specification {
    pub operations: Vec<Operation>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub resources: ResourceLimits,
    /// Logical now in nanoseconds since the Unix epoch. `0` means unset.
    #[serde(default)]
    pub now: i64,
    #[serde(skip)]
    prepared: OnceLock<Result<Prepared, Diagnostic>>,
}

/// Clones start unprepared.
impl Clone for Specification {
    fn clone(&self) -> Self {
        Self {
            operations: self.operations.clone(),
            edges: self.edges.clone(),
            resources: self.resources,
            now: self.now,
            prepared: OnceLock::new(),
        }
    }
}

impl Specification {
    pub fn new(operations: Vec<Operation>, edges: Vec<Edge>) -> Self {
        Self {
            operations,
            edges,
            ..Self::default()
        }
    }

    pub fn with_now(mut self, now: i64) -> Self {
        self.now = now;
        self
    }

    pub fn with_resources(mut self, resources: ResourceLimits) -> Self {
        self.resources = resources;
        self
    }

    fn prepare(&self) -> Result<&Prepared, Diagnostic> {
        self.prepared
            .get_or_init(|| topo::prepare(&self.operations, &self.edges))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Calls `f` on every operation, parents before children.
    ///
    /// Stops at the first error `f` returns. Structural errors are reported
    /// before `f` is called at all.
    pub fn walk<F>(&self, mut f: F) -> Result<(), Diagnostic>
    where
        F: FnMut(&Operation) -> Result<(), Diagnostic>,
    {
        let prepared = self.prepare()?;
        for &idx in &prepared.sorted {
            f(&self.operations[idx])?;
        }
        Ok(())
    }

    /// Checks that the graph is ready for planning.
    pub fn validate(&self) -> Result<(), Diagnostic> {
        if self.now == 0 {
            return Err(Diagnostic::make_error(&MISSING_NOW, &[], QUERY_FILE));
        }
        self.prepare().map(|_| ())
    }

    /// Operation ids in execution order.
    pub fn order(&self) -> Result<Vec<&OperationId>, Diagnostic> {
        let prepared = self.prepare()?;
        Ok(prepared
            .sorted
            .iter()
            .map(|&idx| &self.operations[idx].id)
            .collect())
    }

    /// Direct children of `id`. Empty when `id` is unknown or the graph is
    /// invalid; use [`Specification::try_children`] to see the error.
    pub fn children(&self, id: &OperationId) -> Vec<&Operation> {
        self.try_children(id).unwrap_or_default()
    }

    /// Direct parents of `id`. Empty when `id` is unknown or the graph is
    /// invalid; use [`Specification::try_parents`] to see the error.
    pub fn parents(&self, id: &OperationId) -> Vec<&Operation> {
        self.try_parents(id).unwrap_or_default()
    }

    pub fn try_children(&self, id: &OperationId) -> Result<Vec<&Operation>, Diagnostic> {
        let prepared = self.prepare()?;
        Ok(self.neighbours(prepared, id, &prepared.children))
    }

    pub fn try_parents(&self, id: &OperationId) -> Result<Vec<&Operation>, Diagnostic> {
        let prepared = self.prepare()?;
        Ok(self.neighbours(prepared, id, &prepared.parents))
    }

    fn neighbours(
        &self,
        prepared: &Prepared,
        id: &OperationId,
        adjacency: &[Vec<usize>],
    ) -> Vec<&Operation> {
        prepared
            .lookup
            .get(id)
            .map(|&idx| {
                adjacency[idx]
                    .iter()
                    .map(|&other| &self.operations[other])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// SHA-256 of the serialized specification, hex encoded.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hasher.finalize();

        let mut out = String::with_capacity(64);
        for b in digest.iter() {
            out.push_str(&format!("{:02x}", b));
        }
        Ok(out)
    }
}
