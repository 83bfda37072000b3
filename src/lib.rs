//! Resolution pipeline for dataflow queries.
//!
//! Builtin packages are registered on a [`runtime::Runtime`], ordered by
//! import, and evaluated once into an immutable prelude. Query scripts are
//! evaluated against that prelude; every pipeline call builds an operation
//! node, and the resulting graph is flattened into a validated
//! [`spec::Specification`].

pub mod diagnostics;
pub mod interpreter;
pub mod operation;
pub mod runtime;
pub mod spec;
pub mod syntax;
