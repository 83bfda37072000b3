//! Operation nodes and the builtins that construct them.
//!
//! An operation-constructing builtin receives its call arguments and an
//! [`Administration`] for parent bookkeeping, returns an [`OperationSpec`]
//! payload, and the resulting [`TableObject`] is stored in the query's
//! [`TableArena`].

use std::fmt;

use crate::{
    diagnostics::Diagnostic,
    interpreter::{arguments::Arguments, function::Function, value::Value},
    spec::assemble::Ider,
};

pub mod administration;
pub mod arena;
pub mod table_object;

pub use administration::Administration;
pub use arena::{TableArena, TableHandle};
pub use table_object::{TableObject, TableValue};

/// Name of the argument that carries piped input tables.
pub const TABLES_PARAMETER: &str = "tables";

/// Payload of an operation node, handed to the planner unchanged.
pub trait OperationSpec: fmt::Debug + Send + Sync {
    /// Operation kind, e.g. `from` or `range`.
    fn kind(&self) -> &str;

    /// Serializable form of the payload. Defaults to `null`.
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Rewrites references to other nodes into operation ids.
    ///
    /// Called once during assembly, after every parent has been assigned an
    /// id. Payloads that hold no node references keep the default.
    fn resolve_ids(&mut self, _ider: &dyn Ider) {}
}

/// Wraps a create function into a builtin that builds an operation node.
///
/// The node captures the call arguments, the parents recorded on the
/// [`Administration`] and the evaluator's call stack.
pub fn operation_function<F>(name: impl Into<String>, create: F) -> Value
where
    F: Fn(&mut Arguments, &mut Administration) -> Result<Box<dyn OperationSpec>, Diagnostic>
        + Send
        + Sync
        + 'static,
{
    Function::builtin(name, move |ctx, args| {
        let mut admin = Administration::new();
        let spec = create(args, &mut admin)?;
        let object = TableObject::new(
            spec,
            admin.into_parents(),
            args.values().clone(),
            ctx.stack.to_vec(),
        );
        Ok(Value::Table(ctx.arena.alloc(object)))
    })
}
