use crate::syntax::{Identifier, expression::Expression};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `name = value`
    Variable {
        name: Identifier,
        value: Expression,
    },
    /// A bare expression. At the top level of a script its value is a side effect.
    Expression {
        expression: Expression,
    },
    Return {
        value: Expression,
    },
    /// `builtin name`: the value is supplied by the host at finalize time.
    Builtin {
        name: Identifier,
    },
    Bad {
        text: String,
    },
}

impl Statement {
    pub fn variable(name: impl Into<Identifier>, value: Expression) -> Self {
        Statement::Variable {
            name: name.into(),
            value,
        }
    }

    pub fn expression(expression: Expression) -> Self {
        Statement::Expression { expression }
    }

    pub fn returns(value: Expression) -> Self {
        Statement::Return { value }
    }

    pub fn builtin(name: impl Into<Identifier>) -> Self {
        Statement::Builtin { name: name.into() }
    }

    pub(crate) fn collect_bad<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Statement::Variable { value, .. } | Statement::Return { value } => {
                value.collect_bad(out)
            }
            Statement::Expression { expression } => expression.collect_bad(out),
            Statement::Bad { text } => out.push(text),
            Statement::Builtin { .. } => {}
        }
    }
}
