use crate::syntax::{Identifier, statement::Statement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    pub alias: Option<Identifier>,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    /// Name the imported package is bound to: the alias, or the last path segment.
    pub fn binding_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

/// A parsed package: either a builtin library package or a query script.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub path: String,
    pub name: Identifier,
    pub imports: Vec<Import>,
    pub body: Vec<Statement>,
}

impl Package {
    pub fn new(path: impl Into<String>, name: impl Into<Identifier>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            imports: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.body.push(statement);
        self
    }

    pub fn import_paths(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(|import| import.path.as_str())
    }

    /// Names declared with `builtin` statements, in source order.
    pub fn builtin_names(&self) -> Vec<&str> {
        self.body
            .iter()
            .filter_map(|statement| match statement {
                Statement::Builtin { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Text of every node the parser could not make sense of.
    ///
    /// A package is well formed when this is empty.
    pub fn bad_nodes(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for statement in &self.body {
            statement.collect_bad(&mut out);
        }
        out
    }
}
