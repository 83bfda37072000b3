use indexmap::IndexMap;

use crate::interpreter::{Importer, value::Value};

/// An evaluated package: its exported bindings by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    name: String,
    path: String,
    bindings: IndexMap<String, Value>,
}

impl Package {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        bindings: IndexMap<String, Value>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            bindings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Visits every binding in definition order.
    pub fn range(&self, mut f: impl FnMut(&str, &Value)) {
        for (name, value) in &self.bindings {
            f(name, value);
        }
    }

    /// Independent copy whose bindings can be changed without affecting `self`.
    pub fn copy(&self) -> Package {
        self.clone()
    }
}

/// Finalized packages by import path.
///
/// Every import hands out a fresh copy, so callers never share mutable state.
#[derive(Debug, Clone, Default)]
pub struct PackageTable {
    packages: IndexMap<String, Package>,
}

impl PackageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, package: Package) {
        self.packages.insert(package.path().to_string(), package);
    }

    pub fn get(&self, path: &str) -> Option<&Package> {
        self.packages.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.packages.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Paths in evaluation order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Deep copy of the whole table.
    pub fn copy(&self) -> PackageTable {
        self.clone()
    }
}

impl Importer for PackageTable {
    fn import_package(&self, path: &str) -> Option<Package> {
        self.packages.get(path).map(Package::copy)
    }
}
