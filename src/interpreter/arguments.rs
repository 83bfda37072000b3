use indexmap::IndexMap;

use crate::{
    diagnostics::{Diagnostic, MISSING_ARGUMENT, TYPE_MISMATCH},
    interpreter::value::Value,
    operation::arena::TableHandle,
};

/// Named call arguments with read tracking.
///
/// Every getter marks the argument as used; the caller reports whatever the
/// callee never looked at as unused.
#[derive(Debug, Clone)]
pub struct Arguments {
    values: IndexMap<String, Value>,
    used: Vec<bool>,
    file: String,
}

impl Arguments {
    pub fn new(values: IndexMap<String, Value>, file: impl Into<String>) -> Self {
        let used = vec![false; values.len()];
        Self {
            values,
            used,
            file: file.into(),
        }
    }

    pub fn get(&mut self, name: &str) -> Option<Value> {
        let (index, _, value) = self.values.get_full(name)?;
        self.used[index] = true;
        Some(value.clone())
    }

    pub fn get_required(&mut self, name: &str) -> Result<Value, Diagnostic> {
        self.get(name)
            .ok_or_else(|| Diagnostic::make_error(&MISSING_ARGUMENT, &[name], self.file.clone()))
    }

    pub fn get_string(&mut self, name: &str) -> Result<Option<String>, Diagnostic> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.to_string())),
            Some(other) => Err(self.type_error(name, "a string", &other)),
        }
    }

    pub fn get_required_string(&mut self, name: &str) -> Result<String, Diagnostic> {
        match self.get_required(name)? {
            Value::String(s) => Ok(s.to_string()),
            other => Err(self.type_error(name, "a string", &other)),
        }
    }

    pub fn get_int(&mut self, name: &str) -> Result<Option<i64>, Diagnostic> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Int(v)) => Ok(Some(v)),
            Some(other) => Err(self.type_error(name, "an int", &other)),
        }
    }

    pub fn get_bool(&mut self, name: &str) -> Result<Option<bool>, Diagnostic> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Bool(v)) => Ok(Some(v)),
            Some(other) => Err(self.type_error(name, "a bool", &other)),
        }
    }

    pub fn get_required_table(&mut self, name: &str) -> Result<TableHandle, Diagnostic> {
        match self.get_required(name)? {
            Value::Table(handle) => Ok(handle),
            other => Err(self.type_error(name, "a table object", &other)),
        }
    }

    pub fn get_required_record(
        &mut self,
        name: &str,
    ) -> Result<IndexMap<String, Value>, Diagnostic> {
        match self.get_required(name)? {
            Value::Record(fields) => Ok(fields.as_ref().clone()),
            other => Err(self.type_error(name, "a record", &other)),
        }
    }

    /// Names of arguments no getter has read, in call order.
    pub fn unused(&self) -> Vec<&str> {
        self.values
            .keys()
            .zip(&self.used)
            .filter(|(_, used)| !**used)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn type_error(&self, name: &str, expected: &str, got: &Value) -> Diagnostic {
        Diagnostic::make_error(
            &TYPE_MISMATCH,
            &[name, expected, got.type_name()],
            self.file.clone(),
        )
    }
}
