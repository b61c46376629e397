//! Scanner for the infix calculator
//!
//! Numbers follow JSON syntax, including an optional leading `-`. The longest match wins, so
//! `2-3` scans as the two numbers `2` and `-3`; the calculator reinserts the missing `+`.

use super::{ScanError, Token, TokenKind, TokenStream};

#[lachs::token]
enum InfixToken {
    #[literal(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,
    #[literal("[a-zA-Z][a-zA-Z0-9]*")]
    Variable,
    #[terminal("=")]
    Equals,
    #[terminal("(")]
    OpenParen,
    #[terminal(")")]
    CloseParen,
    #[terminal("+")]
    Plus,
    #[terminal("-")]
    Minus,
    #[terminal("*")]
    Times,
    #[terminal("/")]
    Divide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfixKind {
    Number,
    Variable,
    Equals,
    OpenParen,
    CloseParen,
    Plus,
    Minus,
    Times,
    Divide,
}

impl TokenKind for InfixKind {
    fn name(&self) -> &'static str {
        match self {
            InfixKind::Number => "NUMBER",
            InfixKind::Variable => "VARIABLE",
            InfixKind::Equals => "EQUALS",
            InfixKind::OpenParen => "OPENPAREN",
            InfixKind::CloseParen => "CLOSEPAREN",
            InfixKind::Plus => "PLUS",
            InfixKind::Minus => "MINUS",
            InfixKind::Times => "TIMES",
            InfixKind::Divide => "DIVIDE",
        }
    }
}

impl From<InfixToken> for Token<InfixKind> {
    fn from(token: InfixToken) -> Self {
        match token {
            InfixToken::Number(number) => Token::new(InfixKind::Number, number.value),
            InfixToken::Variable(variable) => Token::new(InfixKind::Variable, variable.value),
            InfixToken::Equals(_) => Token::new(InfixKind::Equals, "="),
            InfixToken::OpenParen(_) => Token::new(InfixKind::OpenParen, "("),
            InfixToken::CloseParen(_) => Token::new(InfixKind::CloseParen, ")"),
            InfixToken::Plus(_) => Token::new(InfixKind::Plus, "+"),
            InfixToken::Minus(_) => Token::new(InfixKind::Minus, "-"),
            InfixToken::Times(_) => Token::new(InfixKind::Times, "*"),
            InfixToken::Divide(_) => Token::new(InfixKind::Divide, "/"),
        }
    }
}

/// Tokenize calculator input. Whitespace is dropped.
pub fn scan(input: &str) -> Result<TokenStream<InfixKind>, ScanError> {
    let tokens = InfixToken::lex(input).map_err(ScanError::unrecognized)?;
    log::trace!("scanned {} infix tokens", tokens.len());
    Ok(tokens.into_iter().map(Token::from).collect())
}
