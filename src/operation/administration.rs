use crate::{
    diagnostics::Diagnostic,
    interpreter::arguments::Arguments,
    operation::{TABLES_PARAMETER, arena::TableHandle},
};

/// Parent bookkeeping for one operation-constructing call.
///
/// Parents keep insertion order and never repeat a handle.
#[derive(Debug, Default)]
pub struct Administration {
    parents: Vec<TableHandle>,
}

impl Administration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the piped `tables` argument as a parent.
    ///
    /// Fails with a type error when the argument is missing or is not a
    /// table object.
    pub fn add_parent_from_args(&mut self, args: &mut Arguments) -> Result<(), Diagnostic> {
        let handle = args.get_required_table(TABLES_PARAMETER)?;
        self.add_parent(handle);
        Ok(())
    }

    pub fn add_parent(&mut self, handle: TableHandle) {
        // Parent lists are short; a scan beats hashing here.
        if !self.parents.contains(&handle) {
            self.parents.push(handle);
        }
    }

    pub fn parents(&self) -> &[TableHandle] {
        &self.parents
    }

    pub fn into_parents(self) -> Vec<TableHandle> {
        self.parents
    }
}
