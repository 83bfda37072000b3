use indexmap::IndexMap;

use crate::interpreter::{package::Package, value::Value};

/// Lexical environment used while evaluating packages and scripts.
///
/// A scope is a chain of frames. Each nested frame owns its parent, the same
/// way an enclosed symbol table owns its outer table, so `copy` duplicates the
/// whole chain and the copy can be changed freely.
#[derive(Debug, Clone)]
pub struct Scope {
    parent: Option<Box<Scope>>,
    frame: Frame,
}

#[derive(Debug, Clone)]
enum Frame {
    Values {
        bindings: IndexMap<String, Value>,
        return_value: Option<Value>,
    },
    Prelude(PreludeScope),
}

/// Immutable composite scope over the prelude packages.
///
/// Packages are kept in prelude order. A name defined by more than one package
/// resolves to the one that comes last.
#[derive(Debug, Clone, Default)]
pub struct PreludeScope {
    packages: Vec<Package>,
}

impl PreludeScope {
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.packages.iter().rev().find_map(|pkg| pkg.get(name))
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.iter().map(Package::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self, mut f: impl FnMut(&str, &Value)) {
        for pkg in &self.packages {
            pkg.range(&mut f);
        }
    }
}

impl Scope {
    pub fn new() -> Self {
        Self::with_values(IndexMap::new())
    }

    pub fn with_values(bindings: IndexMap<String, Value>) -> Self {
        Self {
            parent: None,
            frame: Frame::Values {
                bindings,
                return_value: None,
            },
        }
    }

    /// Root scope over the prelude packages.
    pub fn prelude(prelude: PreludeScope) -> Self {
        Self {
            parent: None,
            frame: Frame::Prelude(prelude),
        }
    }

    pub fn nest(self) -> Scope {
        self.nest_with_values(IndexMap::new())
    }

    pub fn nest_with_values(self, bindings: IndexMap<String, Value>) -> Scope {
        Self {
            parent: Some(Box::new(self)),
            frame: Frame::Values {
                bindings,
                return_value: None,
            },
        }
    }

    /// Drops this frame and returns its parent.
    pub fn pop(self) -> Option<Scope> {
        self.parent.map(|parent| *parent)
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.parent.as_deref()
    }

    pub fn is_prelude(&self) -> bool {
        matches!(self.frame, Frame::Prelude(_))
    }

    /// Resolves `name` in the nearest frame that defines it.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut current = Some(self);
        while let Some(scope) = current {
            let found = match &scope.frame {
                Frame::Values { bindings, .. } => bindings.get(name),
                Frame::Prelude(prelude) => prelude.lookup(name),
            };
            if found.is_some() {
                return found;
            }
            current = scope.parent.as_deref();
        }
        None
    }

    /// Binds `name` in this frame.
    ///
    /// # Panics
    ///
    /// Panics when called on the prelude scope, which is immutable.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match &mut self.frame {
            Frame::Values { bindings, .. } => {
                bindings.insert(name, value);
            }
            Frame::Prelude(_) => panic!("attempted to set `{}` on the prelude scope", name),
        }
    }

    /// # Panics
    ///
    /// Panics when called on the prelude scope.
    pub fn set_return(&mut self, value: Value) {
        match &mut self.frame {
            Frame::Values { return_value, .. } => *return_value = Some(value),
            Frame::Prelude(_) => panic!("attempted to set a return value on the prelude scope"),
        }
    }

    pub fn return_value(&self) -> Option<&Value> {
        match &self.frame {
            Frame::Values { return_value, .. } => return_value.as_ref(),
            Frame::Prelude(_) => None,
        }
    }

    /// Number of bindings visible from this scope, shadowed names included.
    pub fn len(&self) -> usize {
        let own = match &self.frame {
            Frame::Values { bindings, .. } => bindings.len(),
            Frame::Prelude(prelude) => prelude.len(),
        };
        own + self.parent.as_ref().map_or(0, |parent| parent.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visits this frame's bindings, then every parent's.
    pub fn range(&self, mut f: impl FnMut(&str, &Value)) {
        let mut current = Some(self);
        while let Some(scope) = current {
            scope.range_local(&mut f);
            current = scope.parent.as_deref();
        }
    }

    /// Visits only this frame's bindings.
    pub fn range_local(&self, mut f: impl FnMut(&str, &Value)) {
        match &self.frame {
            Frame::Values { bindings, .. } => {
                for (name, value) in bindings {
                    f(name, value);
                }
            }
            Frame::Prelude(prelude) => prelude.range(f),
        }
    }

    /// Snapshot of this frame's own bindings.
    pub fn local_values(&self) -> IndexMap<String, Value> {
        match &self.frame {
            Frame::Values { bindings, .. } => bindings.clone(),
            Frame::Prelude(_) => IndexMap::new(),
        }
    }

    /// Independent copy of the whole chain.
    pub fn copy(&self) -> Scope {
        self.clone()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
