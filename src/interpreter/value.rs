use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{
    interpreter::{function::Function, package::Package},
    operation::arena::TableHandle,
};

/// Script value produced and consumed while evaluating packages and queries.
///
/// Heap-backed variants use `Arc` so a finalized runtime can be shared across
/// threads. Values are immutable once created; mutation always produces a new
/// value.
///
/// Operation nodes are not stored inline. `Table` holds a handle into the
/// query's [`TableArena`](crate::operation::arena::TableArena) and script-level
/// field access goes through [`TableValue`](crate::operation::table_object::TableValue).
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of value.
    Null,
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// UTF-8 string value.
    String(Arc<str>),
    /// Ordered collection of values.
    Array(Arc<Vec<Value>>),
    /// Record with ordered, named fields.
    Record(Arc<IndexMap<String, Value>>),
    /// Builtin or user-defined function.
    Function(Arc<Function>),
    /// Operation node in the query's table arena.
    Table(TableHandle),
    /// Imported package.
    Package(Arc<Package>),
}

impl Value {
    pub fn string(value: impl AsRef<str>) -> Self {
        Value::String(Arc::from(value.as_ref()))
    }

    pub fn record(fields: IndexMap<String, Value>) -> Self {
        Value::Record(Arc::new(fields))
    }

    /// Returns the canonical type label used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
            Value::Function(_) => "function",
            Value::Table(_) => "table",
            Value::Package(_) => "package",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<TableHandle> {
        match self {
            Value::Table(handle) => Some(*handle),
            _ => None,
        }
    }
}

/// Tables compare by handle and functions by allocation here. Structural
/// comparison of operation nodes lives in `TableValue::equal`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            (Value::Table(a), Value::Table(b)) => a == b,
            (Value::Package(a), Value::Package(b)) => a.path() == b.path(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "\"{}\"", v),
            Value::Array(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Record(fields) => {
                let items: Vec<String> =
                    fields.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            Value::Function(func) => write!(f, "<function {}>", func.name()),
            Value::Table(handle) => write!(f, "<table #{}>", handle.index()),
            Value::Package(pkg) => write!(f, "<package {}>", pkg.path()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string(value)
    }
}
