//! Diagnostics module.
//!
//! Every failure in the resolution pipeline is reported as a [`Diagnostic`]
//! built from a static [`ErrorCode`] entry. The error type of the code tells
//! the embedding application how far the failure reaches: registration and
//! resolution errors poison the whole runtime, evaluation and specification
//! errors are scoped to a single query.

pub mod diagnostic;
pub mod error_code;
pub mod format;
pub mod registry;
pub mod resolver_errors;

pub use diagnostic::{Diagnostic, QUERY_FILE};
pub use error_code::{ErrorCode, ErrorType};
pub use format::format_message;
pub use registry::{ERROR_CODES, lookup_error_code};

pub use resolver_errors::*;

#[cfg(test)]
mod diagnostics_test;
