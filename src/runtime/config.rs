use serde::{Deserialize, Serialize};

use crate::spec::ResourceLimits;

/// Package path of the standard prelude.
pub const UNIVERSE: &str = "universe";

/// Settings fixed before a runtime is finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Packages visible to every script without an import, in lookup
    /// order. A later package shadows an earlier one.
    pub prelude: Vec<String>,
    /// Limits stamped on every compiled specification.
    pub resources: ResourceLimits,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            prelude: vec![UNIVERSE.to_string()],
            resources: ResourceLimits::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_prelude<I, S>(mut self, prelude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prelude = prelude.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resources(mut self, resources: ResourceLimits) -> Self {
        self.resources = resources;
        self
    }

    pub fn is_prelude(&self, path: &str) -> bool {
        self.prelude.iter().any(|p| p == path)
    }
}
