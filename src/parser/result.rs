use std::fmt;

use serde_json::Value;

use crate::lexer::{TokenKind, TokenStream};

use super::expression::Expression;

/// A successful parse step: what was produced and what is left to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Success<K> {
    pub production: Expression<K>,
    pub tokens: TokenStream<K>,
}

/// Outcome of running a parser function.
///
/// Failure carries no data: the engine only reports whether the input was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult<K> {
    Ok(Success<K>),
    ParserError,
}

impl<K: TokenKind> ParseResult<K> {
    pub fn ok(production: Expression<K>, tokens: TokenStream<K>) -> Self {
        ParseResult::Ok(Success { production, tokens })
    }

    pub fn error() -> Self {
        ParseResult::ParserError
    }

    /// Chains another parse step onto a success. Errors pass through untouched.
    pub fn flat_map(self, f: impl FnOnce(Success<K>) -> ParseResult<K>) -> ParseResult<K> {
        match self {
            ParseResult::Ok(success) => f(success),
            ParseResult::ParserError => ParseResult::ParserError,
        }
    }

    /// Rewrites the production of a success, keeping its remaining tokens.
    pub fn map_production(self, f: impl FnOnce(Expression<K>) -> Expression<K>) -> ParseResult<K> {
        self.flat_map(|success| ParseResult::ok(f(success.production), success.tokens))
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ParseResult::Ok(_))
    }

    pub fn is_error(&self) -> bool {
        !self.is_ok()
    }

    pub fn into_success(self) -> Option<Success<K>> {
        match self {
            ParseResult::Ok(success) => Some(success),
            ParseResult::ParserError => None,
        }
    }

    /// # Panics
    ///
    /// Panics if the result is a `ParserError`.
    pub fn unwrap_ok(self) -> Success<K> {
        match self {
            ParseResult::Ok(success) => success,
            ParseResult::ParserError => panic!("called `unwrap_ok` on a ParserError"),
        }
    }

    /// # Panics
    ///
    /// Panics if the result is `Ok`.
    pub fn unwrap_error(self) {
        if let ParseResult::Ok(success) = self {
            panic!("called `unwrap_error` on Ok({})", success.production);
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ParseResult::Ok(success) => success.production.to_json(),
            ParseResult::ParserError => Value::String("ParserError".to_string()),
        }
    }
}

impl<K: TokenKind> fmt::Display for ParseResult<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseResult::Ok(success) => write!(
                f,
                "Ok(production: {}, tokens: [{}])",
                success.production, success.tokens
            ),
            ParseResult::ParserError => f.write_str("ParserError"),
        }
    }
}
