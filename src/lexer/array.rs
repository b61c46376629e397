//! Scanner for bracketed arrays of numbers and strings

use super::{ScanError, Token, TokenKind, TokenStream};

#[lachs::token]
enum ArrayToken {
    #[terminal("[")]
    OpenSquare,
    #[terminal("]")]
    CloseSquare,
    #[terminal(",")]
    Comma,
    #[literal(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,
    #[literal(r#""([^"\\]|\\.)*""#)]
    StringLiteral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    OpenSquare,
    CloseSquare,
    Comma,
    Number,
    String,
}

impl TokenKind for ArrayKind {
    fn name(&self) -> &'static str {
        match self {
            ArrayKind::OpenSquare => "OPENSQUARE",
            ArrayKind::CloseSquare => "CLOSESQUARE",
            ArrayKind::Comma => "COMMA",
            ArrayKind::Number => "NUMBER",
            ArrayKind::String => "STRING",
        }
    }
}

impl From<ArrayToken> for Token<ArrayKind> {
    fn from(token: ArrayToken) -> Self {
        match token {
            ArrayToken::OpenSquare(_) => Token::new(ArrayKind::OpenSquare, "["),
            ArrayToken::CloseSquare(_) => Token::new(ArrayKind::CloseSquare, "]"),
            ArrayToken::Comma(_) => Token::new(ArrayKind::Comma, ","),
            ArrayToken::Number(number) => Token::new(ArrayKind::Number, number.value),
            // keeps the surrounding quotes; the grammar decodes escapes
            ArrayToken::StringLiteral(string) => Token::new(ArrayKind::String, string.value),
        }
    }
}

/// Tokenize array text. Whitespace is dropped.
pub fn scan(input: &str) -> Result<TokenStream<ArrayKind>, ScanError> {
    let tokens = ArrayToken::lex(input).map_err(ScanError::unrecognized)?;
    log::trace!("scanned {} array tokens", tokens.len());
    Ok(tokens.into_iter().map(Token::from).collect())
}
