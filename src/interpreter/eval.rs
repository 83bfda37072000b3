use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    diagnostics::{
        BAD_EXPRESSION, Diagnostic, ErrorCode, IMPORT_NOT_FOUND, MISSING_ARGUMENT, NOT_A_FUNCTION,
        UNDEFINED_IDENTIFIER, UNKNOWN_MEMBER, UNUSED_ARGUMENTS,
    },
    interpreter::{
        CallContext, Evaluator, Importer, StackEntry,
        arguments::Arguments,
        function::{Closure, Function},
        scope::Scope,
        value::Value,
    },
    operation::{TABLES_PARAMETER, arena::TableArena, table_object::TableValue},
    syntax::{
        expression::{Expression, Property},
        package::Package as AstPackage,
        statement::Statement,
    },
};

/// Reference evaluator for [`crate::syntax`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for Interpreter {
    fn eval(
        &self,
        package: &AstPackage,
        scope: &mut Scope,
        importer: &dyn Importer,
        arena: &mut TableArena,
    ) -> Result<Vec<Value>, Diagnostic> {
        let mut session = Session {
            arena,
            imports: IndexMap::new(),
            stack: Vec::new(),
            file: package.path.clone(),
        };

        for import in &package.imports {
            let imported = importer.import_package(&import.path).ok_or_else(|| {
                Diagnostic::make_error(
                    &IMPORT_NOT_FOUND,
                    &[import.path.as_str()],
                    session.file.clone(),
                )
            })?;
            session.imports.insert(
                import.binding_name().to_string(),
                Value::Package(Arc::new(imported)),
            );
        }

        let mut side_effects = Vec::new();
        for statement in &package.body {
            if let Some(value) = session.eval_statement(statement, scope, true)? {
                side_effects.push(value);
            }
            if scope.return_value().is_some() {
                break;
            }
        }
        Ok(side_effects)
    }
}

/// State of one `eval` call.
///
/// Imports are kept out of the scope so they never end up in a package's
/// exported bindings.
struct Session<'a> {
    arena: &'a mut TableArena,
    imports: IndexMap<String, Value>,
    stack: Vec<StackEntry>,
    file: String,
}

impl Session<'_> {
    fn error(&self, code: &'static ErrorCode, values: &[&str]) -> Diagnostic {
        Diagnostic::make_error(code, values, self.file.clone())
    }

    fn eval_statement(
        &mut self,
        statement: &Statement,
        scope: &mut Scope,
        top_level: bool,
    ) -> Result<Option<Value>, Diagnostic> {
        match statement {
            Statement::Variable { name, value } => {
                let value = self.eval_expression(value, scope)?;
                scope.set(name.clone(), value);
                Ok(None)
            }
            Statement::Expression { expression } => {
                let value = self.eval_expression(expression, scope)?;
                Ok(top_level.then_some(value))
            }
            Statement::Return { value } => {
                let value = self.eval_expression(value, scope)?;
                scope.set_return(value);
                Ok(None)
            }
            // Builtin values are seeded by the host before evaluation.
            Statement::Builtin { name } => {
                if scope.lookup(name).is_none() {
                    return Err(self.error(&UNDEFINED_IDENTIFIER, &[name.as_str()]));
                }
                Ok(None)
            }
            Statement::Bad { text } => Err(self.error(&BAD_EXPRESSION, &[text.as_str()])),
        }
    }

    fn eval_block(&mut self, body: &[Statement], scope: &mut Scope) -> Result<(), Diagnostic> {
        for statement in body {
            self.eval_statement(statement, scope, false)?;
            if scope.return_value().is_some() {
                break;
            }
        }
        Ok(())
    }

    fn eval_expression(
        &mut self,
        expression: &Expression,
        scope: &Scope,
    ) -> Result<Value, Diagnostic> {
        match expression {
            Expression::Identifier { name } => scope
                .lookup(name)
                .or_else(|| self.imports.get(name))
                .cloned()
                .ok_or_else(|| self.error(&UNDEFINED_IDENTIFIER, &[name.as_str()])),
            Expression::Integer { value } => Ok(Value::Int(*value)),
            Expression::Float { value } => Ok(Value::Float(*value)),
            Expression::String { value } => Ok(Value::string(value)),
            Expression::Boolean { value } => Ok(Value::Bool(*value)),
            Expression::Array { elements } => {
                let values = elements
                    .iter()
                    .map(|element| self.eval_expression(element, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(Arc::new(values)))
            }
            Expression::Record { properties } => {
                Ok(Value::record(self.eval_properties(properties, scope)?))
            }
            Expression::Member { object, property } => {
                let object = self.eval_expression(object, scope)?;
                self.member(&object, property)
            }
            Expression::Call { callee, arguments } => {
                self.eval_call(callee, arguments, None, scope)
            }
            Expression::Pipe { argument, call } => {
                let piped = self.eval_expression(argument, scope)?;
                match call.as_ref() {
                    Expression::Call { callee, arguments } => {
                        self.eval_call(callee, arguments, Some(piped), scope)
                    }
                    _ => Err(self.error(&BAD_EXPRESSION, &["pipe destination must be a call"])),
                }
            }
            Expression::Function { parameters, body } => {
                let closure = Closure {
                    parameters: parameters.clone(),
                    body: body.clone(),
                    scope: self.capture_scope(scope),
                };
                Ok(Value::Function(Arc::new(Function::Closure(closure))))
            }
            Expression::Bad { text } => Err(self.error(&BAD_EXPRESSION, &[text.as_str()])),
        }
    }

    fn eval_properties(
        &mut self,
        properties: &[Property],
        scope: &Scope,
    ) -> Result<IndexMap<String, Value>, Diagnostic> {
        let mut values = IndexMap::with_capacity(properties.len());
        for property in properties {
            let value = self.eval_expression(&property.value, scope)?;
            values.insert(property.key.clone(), value);
        }
        Ok(values)
    }

    /// Copies the defining scope and pins the session's imports into it, so
    /// the closure still resolves them when called from another package.
    fn capture_scope(&self, scope: &Scope) -> Scope {
        let mut captured = scope.copy();
        if captured.is_prelude() {
            captured = captured.nest();
        }
        for (name, value) in &self.imports {
            if captured.lookup(name).is_none() {
                captured.set(name.clone(), value.clone());
            }
        }
        captured
    }

    fn member(&self, object: &Value, property: &str) -> Result<Value, Diagnostic> {
        let found = match object {
            Value::Record(fields) => fields.get(property).cloned(),
            Value::Package(pkg) => pkg.get(property).cloned(),
            Value::Table(handle) => TableValue::new(&*self.arena, *handle).get(property),
            _ => None,
        };
        found.ok_or_else(|| {
            let owner = match object {
                Value::Package(pkg) => format!("Package `{}`", pkg.path()),
                other => format!("Value of type {}", other.type_name()),
            };
            self.error(&UNKNOWN_MEMBER, &[owner.as_str(), property])
        })
    }

    fn eval_call(
        &mut self,
        callee: &Expression,
        arguments: &[Property],
        pipe: Option<Value>,
        scope: &Scope,
    ) -> Result<Value, Diagnostic> {
        let function = match self.eval_expression(callee, scope)? {
            Value::Function(function) => function,
            other => return Err(self.error(&NOT_A_FUNCTION, &[other.type_name()])),
        };
        let arguments = self.eval_properties(arguments, scope)?;
        self.call(&function, arguments, pipe)
    }

    fn call(
        &mut self,
        function: &Function,
        arguments: IndexMap<String, Value>,
        pipe: Option<Value>,
    ) -> Result<Value, Diagnostic> {
        match function {
            Function::Builtin(builtin) => {
                let mut values = arguments;
                if let Some(pipe) = pipe {
                    values.insert(TABLES_PARAMETER.to_string(), pipe);
                }
                let mut args = Arguments::new(values, self.file.clone());

                self.stack.push(StackEntry {
                    function: builtin.name.clone(),
                    package: self.file.clone(),
                });
                let result = {
                    let mut ctx = CallContext {
                        arena: &mut *self.arena,
                        stack: &self.stack,
                        file: &self.file,
                    };
                    (builtin.func)(&mut ctx, &mut args)
                };
                self.stack.pop();

                let value = result?;
                let unused = args.unused();
                if !unused.is_empty() {
                    return Err(self.error(
                        &UNUSED_ARGUMENTS,
                        &[builtin.name.as_str(), unused.join(", ").as_str()],
                    ));
                }
                Ok(value)
            }
            Function::Closure(closure) => self.call_closure(closure, arguments, pipe),
        }
    }

    fn call_closure(
        &mut self,
        closure: &Closure,
        mut arguments: IndexMap<String, Value>,
        mut pipe: Option<Value>,
    ) -> Result<Value, Diagnostic> {
        let mut bound = IndexMap::with_capacity(closure.parameters.len());
        for parameter in &closure.parameters {
            let piped = if parameter.pipe { pipe.take() } else { None };
            let value = match (arguments.shift_remove(&parameter.key), piped) {
                (Some(value), _) | (None, Some(value)) => value,
                (None, None) => match &parameter.default {
                    Some(default) => self.eval_expression(default, &closure.scope)?,
                    None => return Err(self.error(&MISSING_ARGUMENT, &[parameter.key.as_str()])),
                },
            };
            bound.insert(parameter.key.clone(), value);
        }

        let mut unused: Vec<&str> = arguments.keys().map(String::as_str).collect();
        if pipe.is_some() {
            unused.push("<-");
        }
        if !unused.is_empty() {
            return Err(self.error(&UNUSED_ARGUMENTS, &["<closure>", unused.join(", ").as_str()]));
        }

        self.stack.push(StackEntry {
            function: "<closure>".to_string(),
            package: self.file.clone(),
        });
        let mut scope = closure.scope.copy().nest_with_values(bound);
        let result = self.eval_block(&closure.body, &mut scope);
        self.stack.pop();
        result?;

        Ok(scope.return_value().cloned().unwrap_or(Value::Null))
    }
}
