//! Evaluation contract and a reference tree-walking evaluator.
//!
//! The resolver does not own expression evaluation. It calls into an
//! [`Evaluator`] with a [`Scope`] to evaluate in and an [`Importer`] that
//! decides which packages are visible. [`Interpreter`] is a small evaluator
//! for the AST in [`crate::syntax`] that drives both the runtime finalizer and
//! operation-graph construction.

use serde::{Deserialize, Serialize};

use crate::{
    diagnostics::Diagnostic, operation::arena::TableArena, syntax::package::Package as AstPackage,
};

pub mod arguments;
mod eval;
pub mod function;
pub mod package;
pub mod scope;
pub mod value;

pub use arguments::Arguments;
pub use eval::Interpreter;
pub use function::{BuiltinFunction, Closure, Function};
pub use package::{Package, PackageTable};
pub use scope::{PreludeScope, Scope};
pub use value::Value;

/// Resolves import paths to evaluated packages.
pub trait Importer {
    /// Returns a fresh copy of the package at `path`, if it is visible.
    fn import_package(&self, path: &str) -> Option<Package>;
}

/// Evaluates a package body.
pub trait Evaluator {
    /// Evaluates `package` against `scope`.
    ///
    /// Top-level bindings are written into `scope`'s own frame. Operation
    /// nodes built along the way are allocated in `arena`. Returns the values
    /// of top-level expression statements (the side effects).
    fn eval(
        &self,
        package: &AstPackage,
        scope: &mut Scope,
        importer: &dyn Importer,
        arena: &mut TableArena,
    ) -> Result<Vec<Value>, Diagnostic>;
}

/// One frame of the evaluator's call stack, kept as operation provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    pub function: String,
    pub package: String,
}

/// What a builtin function sees of the evaluation in progress.
pub struct CallContext<'a> {
    pub arena: &'a mut TableArena,
    pub stack: &'a [StackEntry],
    pub file: &'a str,
}
