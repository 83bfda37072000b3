use std::{fmt, sync::Arc};

use crate::{
    diagnostics::Diagnostic,
    interpreter::{CallContext, arguments::Arguments, scope::Scope, value::Value},
    syntax::{expression::Parameter, statement::Statement},
};

/// Host implementation of a builtin function.
pub type BuiltinFn =
    dyn Fn(&mut CallContext<'_>, &mut Arguments) -> Result<Value, Diagnostic> + Send + Sync;

/// Function supplied by the embedding program.
///
/// A piped value is passed under the `tables` argument.
#[derive(Clone)]
pub struct BuiltinFunction {
    pub name: String,
    pub func: Arc<BuiltinFn>,
}

impl BuiltinFunction {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut CallContext<'_>, &mut Arguments) -> Result<Value, Diagnostic>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinFunction({})", self.name)
    }
}

/// Function literal together with the scope it was defined in.
///
/// The scope is a copy taken at definition time, so later assignments in the
/// defining scope are not visible to the body.
#[derive(Debug, Clone)]
pub struct Closure {
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
    pub scope: Scope,
}

impl Closure {
    pub fn pipe_parameter(&self) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.pipe)
    }
}

#[derive(Debug, Clone)]
pub enum Function {
    Builtin(BuiltinFunction),
    Closure(Closure),
}

impl Function {
    pub fn builtin<F>(name: impl Into<String>, func: F) -> Value
    where
        F: Fn(&mut CallContext<'_>, &mut Arguments) -> Result<Value, Diagnostic>
            + Send
            + Sync
            + 'static,
    {
        Value::Function(Arc::new(Function::Builtin(BuiltinFunction::new(name, func))))
    }

    pub fn name(&self) -> &str {
        match self {
            Function::Builtin(builtin) => &builtin.name,
            Function::Closure(_) => "<closure>",
        }
    }
}
