//! Abstract syntax consumed by the resolver.
//!
//! The lexer and parser live outside this crate; they hand over fully built
//! [`package::Package`] trees. Parse errors are represented in-tree as `Bad`
//! nodes so the finalizer can refuse malformed builtin packages.

pub mod expression;
pub mod package;
pub mod statement;

pub type Identifier = String;
