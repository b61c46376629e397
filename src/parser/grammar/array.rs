//! Arrays of numbers, strings and nested arrays
//!
//! ```text
//! value := NUMBER | STRING | array
//! array := "[" [ value { "," value } ] "]"
//! ```

use std::any::Any;
use std::fmt;

use serde_json::Value;

use crate::lexer::array::{ArrayKind, scan};
use crate::lexer::{ScanError, Token};
use crate::parser::{
    Expression, ParseResult, Parser, ParserFunction, Production, exactly_one_of, same_production,
    terminal,
};

/// The elements of one parsed array.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpression {
    elements: Vec<Expression<ArrayKind>>,
}

impl ArrayExpression {
    pub fn new(elements: Vec<Expression<ArrayKind>>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[Expression<ArrayKind>] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Decodes a scalar token into the JSON value it spells. Falls back to the raw text when the
/// token is not valid JSON (e.g. a number outside the `f64` range).
fn scalar_json(token: &Token<ArrayKind>) -> Value {
    match token.kind {
        ArrayKind::Number => serde_json::from_str::<serde_json::Number>(&token.text)
            .map(Value::Number)
            .unwrap_or_else(|_| Value::String(token.text.clone())),
        ArrayKind::String => serde_json::from_str::<String>(&token.text)
            .map(Value::String)
            .unwrap_or_else(|_| Value::String(token.text.trim_matches('"').to_string())),
        _ => token.to_json(),
    }
}

impl Production<ArrayKind> for ArrayExpression {
    fn as_list(&self) -> Option<Vec<Expression<ArrayKind>>> {
        Some(self.elements.clone())
    }

    fn to_json(&self) -> Value {
        Value::Array(
            self.elements
                .iter()
                .map(|expr| match expr {
                    Expression::Terminal(token) => scalar_json(token),
                    other => other.to_json(),
                })
                .collect(),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Production<ArrayKind>) -> bool {
        same_production(self, other)
    }
}

impl fmt::Display for ArrayExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, expr) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match expr {
                Expression::Terminal(token) => f.write_str(&token.text)?,
                other => write!(f, "{other}")?,
            }
        }
        f.write_str("]")
    }
}

/// Parser for one array, producing an [`ArrayExpression`].
pub fn parser() -> ParserFunction<ArrayKind> {
    ParserFunction::recursive("Array", |array| {
        let value = exactly_one_of(
            terminal(ArrayKind::Number),
            [terminal(ArrayKind::String), array],
        );
        value
            .separated_list(terminal(ArrayKind::Comma))
            .between(
                terminal(ArrayKind::OpenSquare),
                terminal(ArrayKind::CloseSquare),
            )
            .map_expression(|expr| Expression::other(ArrayExpression::new(expr.as_list())))
    })
}

/// Scans `input` and parses it as exactly one array.
pub fn parse_array(input: &str) -> Result<ParseResult<ArrayKind>, ScanError> {
    let tokens = scan(input)?;
    Ok(parser().then_end().parse(&tokens))
}
