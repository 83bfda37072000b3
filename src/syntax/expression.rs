use crate::syntax::{Identifier, statement::Statement};

/// A `key: value` pair in a record literal or a call argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Identifier,
    pub value: Expression,
}

/// A function literal parameter.
///
/// A pipe parameter (`<-tables`) receives the left-hand side of `|>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub key: Identifier,
    pub default: Option<Expression>,
    pub pipe: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier {
        name: Identifier,
    },
    Integer {
        value: i64,
    },
    Float {
        value: f64,
    },
    String {
        value: String,
    },
    Boolean {
        value: bool,
    },
    Array {
        elements: Vec<Expression>,
    },
    Record {
        properties: Vec<Property>,
    },
    Member {
        object: Box<Expression>,
        property: Identifier,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Property>,
    },
    /// `argument |> call`. The right-hand side must be a call expression.
    Pipe {
        argument: Box<Expression>,
        call: Box<Expression>,
    },
    Function {
        parameters: Vec<Parameter>,
        body: Vec<Statement>,
    },
    /// Placeholder left behind by the parser's error recovery.
    Bad {
        text: String,
    },
}

impl Parameter {
    pub fn new(key: impl Into<Identifier>) -> Self {
        Self {
            key: key.into(),
            default: None,
            pipe: false,
        }
    }

    /// A `<-key` parameter.
    pub fn piped(key: impl Into<Identifier>) -> Self {
        Self {
            pipe: true,
            ..Self::new(key)
        }
    }

    pub fn with_default(mut self, default: Expression) -> Self {
        self.default = Some(default);
        self
    }
}

impl Expression {
    pub fn identifier(name: impl Into<Identifier>) -> Self {
        Expression::Identifier { name: name.into() }
    }

    pub fn integer(value: i64) -> Self {
        Expression::Integer { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::String {
            value: value.into(),
        }
    }

    pub fn member(object: Expression, property: impl Into<Identifier>) -> Self {
        Expression::Member {
            object: Box::new(object),
            property: property.into(),
        }
    }

    pub fn call(callee: Expression, arguments: Vec<(&str, Expression)>) -> Self {
        Expression::Call {
            callee: Box::new(callee),
            arguments: arguments
                .into_iter()
                .map(|(key, value)| Property {
                    key: key.to_string(),
                    value,
                })
                .collect(),
        }
    }

    pub fn pipe(argument: Expression, call: Expression) -> Self {
        Expression::Pipe {
            argument: Box::new(argument),
            call: Box::new(call),
        }
    }

    pub fn record(properties: Vec<(&str, Expression)>) -> Self {
        Expression::Record {
            properties: properties
                .into_iter()
                .map(|(key, value)| Property {
                    key: key.to_string(),
                    value,
                })
                .collect(),
        }
    }

    pub fn function(parameters: Vec<Parameter>, body: Vec<Statement>) -> Self {
        Expression::Function { parameters, body }
    }

    /// Collects the text of every `Bad` node below this expression.
    pub(crate) fn collect_bad<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expression::Bad { text } => out.push(text),
            Expression::Array { elements } => {
                for element in elements {
                    element.collect_bad(out);
                }
            }
            Expression::Record { properties } => {
                for property in properties {
                    property.value.collect_bad(out);
                }
            }
            Expression::Member { object, .. } => object.collect_bad(out),
            Expression::Call { callee, arguments } => {
                callee.collect_bad(out);
                for argument in arguments {
                    argument.value.collect_bad(out);
                }
            }
            Expression::Pipe { argument, call } => {
                argument.collect_bad(out);
                call.collect_bad(out);
            }
            Expression::Function { parameters, body } => {
                for parameter in parameters {
                    if let Some(default) = &parameter.default {
                        default.collect_bad(out);
                    }
                }
                for statement in body {
                    statement.collect_bad(out);
                }
            }
            Expression::Identifier { .. }
            | Expression::Integer { .. }
            | Expression::Float { .. }
            | Expression::String { .. }
            | Expression::Boolean { .. } => {}
        }
    }
}
