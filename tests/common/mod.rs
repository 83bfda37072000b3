#![allow(dead_code)]

use fluxplan::{
    diagnostics::{Diagnostic, TYPE_MISMATCH},
    interpreter::{Interpreter, value::Value},
    operation::{Administration, OperationSpec, TableHandle, operation_function},
    runtime::Runtime,
    spec::{Ider, OperationId},
    syntax::{
        expression::{Expression, Parameter},
        package::Package,
        statement::Statement,
    },
};
use serde_json::json;

pub const QUERY_PATH: &str = "query.flux";
pub const NOW: i64 = 1_700_000_000_000_000_000;

#[derive(Debug)]
pub struct FromSpec {
    pub bucket: String,
}

impl OperationSpec for FromSpec {
    fn kind(&self) -> &str {
        "from"
    }

    fn to_json(&self) -> serde_json::Value {
        json!({ "bucket": self.bucket })
    }
}

#[derive(Debug)]
pub struct RangeSpec {
    pub start: i64,
}

impl OperationSpec for RangeSpec {
    fn kind(&self) -> &str {
        "range"
    }

    fn to_json(&self) -> serde_json::Value {
        json!({ "start": self.start })
    }
}

#[derive(Debug)]
pub struct FilterSpec {
    pub column: String,
}

impl OperationSpec for FilterSpec {
    fn kind(&self) -> &str {
        "filter"
    }

    fn to_json(&self) -> serde_json::Value {
        json!({ "column": self.column })
    }
}

/// Refers to its inputs by name, so the ids are resolved after assembly.
#[derive(Debug)]
pub struct JoinSpec {
    pub tables: Vec<(String, TableHandle)>,
    pub table_names: Vec<(String, OperationId)>,
    pub on: Vec<String>,
}

impl OperationSpec for JoinSpec {
    fn kind(&self) -> &str {
        "join"
    }

    fn to_json(&self) -> serde_json::Value {
        let names: serde_json::Map<String, serde_json::Value> = self
            .table_names
            .iter()
            .map(|(name, id)| (name.clone(), json!(id)))
            .collect();
        json!({ "tables": names, "on": self.on })
    }

    fn resolve_ids(&mut self, ider: &dyn Ider) {
        self.table_names = self
            .tables
            .iter()
            .filter_map(|(name, handle)| ider.id_for(*handle).map(|id| (name.clone(), id)))
            .collect();
    }
}

fn create_from(
    args: &mut fluxplan::interpreter::Arguments,
    _admin: &mut Administration,
) -> Result<Box<dyn OperationSpec>, Diagnostic> {
    let bucket = args.get_required_string("bucket")?;
    Ok(Box::new(FromSpec { bucket }))
}

fn create_range(
    args: &mut fluxplan::interpreter::Arguments,
    admin: &mut Administration,
) -> Result<Box<dyn OperationSpec>, Diagnostic> {
    admin.add_parent_from_args(args)?;
    let start = args.get_int("start")?.unwrap_or(0);
    Ok(Box::new(RangeSpec { start }))
}

fn create_filter(
    args: &mut fluxplan::interpreter::Arguments,
    admin: &mut Administration,
) -> Result<Box<dyn OperationSpec>, Diagnostic> {
    admin.add_parent_from_args(args)?;
    let column = args.get_required_string("column")?;
    Ok(Box::new(FilterSpec { column }))
}

fn create_join(
    args: &mut fluxplan::interpreter::Arguments,
    admin: &mut Administration,
) -> Result<Box<dyn OperationSpec>, Diagnostic> {
    let tables = args.get_required_record("tables")?;
    let mut handles = Vec::with_capacity(tables.len());
    for (name, value) in tables {
        let Some(handle) = value.as_table() else {
            let field = format!("tables.{}", name);
            return Err(Diagnostic::make_error(
                &TYPE_MISMATCH,
                &[field.as_str(), "a table object", value.type_name()],
                QUERY_PATH,
            ));
        };
        admin.add_parent(handle);
        handles.push((name, handle));
    }

    let on = match args.get("on") {
        Some(Value::Array(columns)) => columns
            .iter()
            .filter_map(|c| c.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };
    Ok(Box::new(JoinSpec {
        tables: handles,
        table_names: Vec::new(),
        on,
    }))
}

/// The `universe` package: four operations plus a helper written in the
/// package itself.
pub fn universe() -> Package {
    let recent = Expression::function(
        vec![
            Parameter::piped("tables"),
            Parameter::new("start").with_default(Expression::integer(-1)),
        ],
        vec![Statement::returns(Expression::pipe(
            Expression::identifier("tables"),
            Expression::call(
                Expression::identifier("range"),
                vec![("start", Expression::identifier("start"))],
            ),
        ))],
    );

    Package::new("universe", "universe")
        .with_statement(Statement::builtin("from"))
        .with_statement(Statement::builtin("range"))
        .with_statement(Statement::builtin("filter"))
        .with_statement(Statement::builtin("join"))
        .with_statement(Statement::variable("recent", recent))
}

pub fn register_universe(runtime: &mut Runtime) -> Result<(), Diagnostic> {
    runtime.register_package(universe())?;
    runtime.register_package_value("universe", "from", operation_function("from", create_from))?;
    runtime.register_package_value("universe", "range", operation_function("range", create_range))?;
    runtime.register_package_value(
        "universe",
        "filter",
        operation_function("filter", create_filter),
    )?;
    runtime.register_package_value("universe", "join", operation_function("join", create_join))?;
    Ok(())
}

pub fn finalized_runtime() -> Runtime {
    let mut runtime = Runtime::new();
    register_universe(&mut runtime).unwrap();
    runtime.finalize(&Interpreter).unwrap();
    runtime
}

pub fn script(statements: Vec<Statement>) -> Package {
    statements
        .into_iter()
        .fold(Package::new(QUERY_PATH, "main"), Package::with_statement)
}

/// `from(bucket: <bucket>)`
pub fn from(bucket: &str) -> Expression {
    Expression::call(
        Expression::identifier("from"),
        vec![("bucket", Expression::string(bucket))],
    )
}

/// `<input> |> <name>(<args>)`
pub fn pipe_call(input: Expression, name: &str, args: Vec<(&str, Expression)>) -> Expression {
    Expression::pipe(input, Expression::call(Expression::identifier(name), args))
}
