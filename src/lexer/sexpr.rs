//! Scanner for s-expressions: parentheses and words

use super::{ScanError, Token, TokenKind, TokenStream};

#[lachs::token]
enum SexprToken {
    #[terminal("(")]
    Open,
    #[terminal(")")]
    Close,
    #[literal("[a-zA-Z0-9_]+")]
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SexprKind {
    Open,
    Close,
    Word,
}

impl TokenKind for SexprKind {
    fn name(&self) -> &'static str {
        match self {
            SexprKind::Open => "OPEN",
            SexprKind::Close => "CLOSE",
            SexprKind::Word => "WORD",
        }
    }
}

impl From<SexprToken> for Token<SexprKind> {
    fn from(token: SexprToken) -> Self {
        match token {
            SexprToken::Open(_) => Token::new(SexprKind::Open, "("),
            SexprToken::Close(_) => Token::new(SexprKind::Close, ")"),
            SexprToken::Word(word) => Token::new(SexprKind::Word, word.value),
        }
    }
}

/// Tokenize s-expression text. Whitespace is dropped.
pub fn scan(input: &str) -> Result<TokenStream<SexprKind>, ScanError> {
    let tokens = SexprToken::lex(input).map_err(ScanError::unrecognized)?;
    log::trace!("scanned {} s-expression tokens", tokens.len());
    Ok(tokens.into_iter().map(Token::from).collect())
}
