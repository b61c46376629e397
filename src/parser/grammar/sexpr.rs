//! S-expressions
//!
//! ```text
//! sexpr := "(" (WORD | sexpr)* ")"
//! ```

use std::any::Any;
use std::fmt;

use serde_json::Value;

use crate::lexer::ScanError;
use crate::lexer::sexpr::{SexprKind, scan};
use crate::parser::{
    Expression, ParseResult, Parser, ParserFunction, Production, one_of, same_production, terminal,
};

/// A parsed s-expression: the words and nested s-expressions between one pair of parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct SExpression {
    contents: Vec<Expression<SexprKind>>,
}

impl SExpression {
    pub fn new(contents: Vec<Expression<SexprKind>>) -> Self {
        Self { contents }
    }

    pub fn contents(&self) -> &[Expression<SexprKind>] {
        &self.contents
    }

    /// Converts into a plain value tree. Returns `None` if an element is neither a word nor a
    /// nested `SExpression`, which the parser never produces.
    pub fn to_value(&self) -> Option<SexprValue> {
        self.contents
            .iter()
            .map(|expr| match expr {
                Expression::Terminal(token) => Some(SexprValue::Word(token.text.clone())),
                Expression::Other(_) => expr.downcast_ref::<SExpression>()?.to_value(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(SexprValue::List)
    }
}

impl Production<SexprKind> for SExpression {
    fn as_list(&self) -> Option<Vec<Expression<SexprKind>>> {
        Some(self.contents.clone())
    }

    fn to_json(&self) -> Value {
        Value::Array(
            self.contents
                .iter()
                .map(|expr| match expr {
                    Expression::Terminal(token) => Value::String(token.text.clone()),
                    other => other.to_json(),
                })
                .collect(),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Production<SexprKind>) -> bool {
        same_production(self, other)
    }
}

impl fmt::Display for SExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, expr) in self.contents.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match expr {
                Expression::Terminal(token) => f.write_str(&token.text)?,
                other => write!(f, "{other}")?,
            }
        }
        f.write_str(")")
    }
}

/// An s-expression as plain data, detached from the parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SexprValue {
    Word(String),
    List(Vec<SexprValue>),
}

impl fmt::Display for SexprValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SexprValue::Word(word) => f.write_str(word),
            SexprValue::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Parser for one s-expression, producing an [`SExpression`].
///
/// Tokens after the closing parenthesis are left in the result; use
/// [`ParserFunction::then_end`] (or [`parse_sexpr`]) to reject them.
pub fn parser() -> ParserFunction<SexprKind> {
    ParserFunction::recursive("SExpression", |sexpr| {
        one_of(terminal(SexprKind::Word), [sexpr])
            .list()
            .between(terminal(SexprKind::Open), terminal(SexprKind::Close))
            .map_expression(|expr| Expression::other(SExpression::new(expr.as_list())))
    })
}

/// Scans `input` and parses it as exactly one s-expression.
pub fn parse_sexpr(input: &str) -> Result<ParseResult<SexprKind>, ScanError> {
    let tokens = scan(input)?;
    Ok(parser().then_end().parse(&tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Token;

    fn word(text: &str) -> Expression<SexprKind> {
        Expression::terminal(Token::new(SexprKind::Word, text))
    }

    fn parse_ok(input: &str) -> SExpression {
        let success = parse_sexpr(input).unwrap().unwrap_ok();
        assert!(success.tokens.is_empty());
        success
            .production
            .downcast_ref::<SExpression>()
            .expect("expected an SExpression")
            .clone()
    }

    #[test]
    fn test_flat_words() {
        let sexpr = parse_ok("(alice bob charlie)");
        assert_eq!(
            sexpr,
            SExpression::new(vec![word("alice"), word("bob"), word("charlie")])
        );
    }

    #[test]
    fn test_nested() {
        let sexpr = parse_ok("(alice bob (charlie))");
        assert_eq!(
            sexpr,
            SExpression::new(vec![
                word("alice"),
                word("bob"),
                Expression::other(SExpression::new(vec![word("charlie")])),
            ])
        );
        assert_eq!(sexpr.to_string(), "(alice bob (charlie))");
    }

    #[test]
    fn test_to_value() {
        let value = parse_ok("(alice    bob  ( charlie ) dorothy)").to_value();
        assert_eq!(
            value,
            Some(SexprValue::List(vec![
                SexprValue::Word("alice".into()),
                SexprValue::Word("bob".into()),
                SexprValue::List(vec![SexprValue::Word("charlie".into())]),
                SexprValue::Word("dorothy".into()),
            ]))
        );
        assert_eq!(
            value.map(|value| value.to_string()),
            Some("(alice bob (charlie) dorothy)".to_string())
        );
    }

    #[test]
    fn test_to_json() {
        let sexpr = parse_ok("(a (b c) ())");
        assert_eq!(sexpr.to_json(), serde_json::json!(["a", ["b", "c"], []]));
    }

    #[test]
    fn test_rejects() {
        for input in ["", "alice", "(", "(()", "())", "( ) alice", "((()"] {
            assert!(
                parse_sexpr(input).unwrap().is_error(),
                "expected {input:?} to be rejected"
            );
        }
    }
}
