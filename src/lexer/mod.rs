//! Tokens and token streams
//!
//! The combinator engine never looks at source text. It consumes a [`TokenStream`] of
//! [`Token`]s, each of which pairs a grammar-specific [`TokenKind`] with the text it matched.
//!
//! The scanners for the bundled grammars live in the submodules. Each one defines its lexical
//! syntax with `lachs` and converts the lachs tokens into the generic [`Token`] representation.

pub mod array;
pub mod infix;
pub mod sexpr;

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use serde_json::{Map, Value};

/// Error produced when a scanner cannot tokenize its input
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("unrecognized input: {0}")]
    Unrecognized(String),
}

impl ScanError {
    pub fn unrecognized(err: impl fmt::Display) -> Self {
        ScanError::Unrecognized(err.to_string())
    }
}

/// The closed set of token kinds for one grammar.
pub trait TokenKind: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Upper-case name of the kind, used in descriptions and JSON output
    fn name(&self) -> &'static str;
}

/// An immutable `(kind, text)` pair produced by a scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token<K> {
    pub kind: K,
    pub text: String,
}

impl<K: TokenKind> Token<K> {
    pub fn new(kind: K, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// `{"KIND": "text"}`
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert(self.kind.name().to_string(), Value::String(self.text.clone()));
        Value::Object(object)
    }
}

impl<K: TokenKind> fmt::Display for Token<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}: {:?})", self.kind.name(), self.text)
    }
}

/// A persistent view over a scanned token sequence.
///
/// All tails of a stream share the same backing slice, so popping the head is O(1) and
/// alternatives that start from the same input never copy it.
pub struct TokenStream<K> {
    tokens: Rc<[Token<K>]>,
    start: usize,
}

impl<K> Clone for TokenStream<K> {
    fn clone(&self) -> Self {
        TokenStream {
            tokens: Rc::clone(&self.tokens),
            start: self.start,
        }
    }
}

impl<K> TokenStream<K> {
    pub fn new(tokens: Vec<Token<K>>) -> Self {
        Self {
            tokens: tokens.into(),
            start: 0,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn as_slice(&self) -> &[Token<K>] {
        &self.tokens[self.start..]
    }

    pub fn len(&self) -> usize {
        self.tokens.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn head(&self) -> Option<&Token<K>> {
        self.tokens.get(self.start)
    }

    /// Everything after the head. The tail of an empty stream is empty.
    pub fn tail(&self) -> Self {
        TokenStream {
            tokens: Rc::clone(&self.tokens),
            start: (self.start + 1).min(self.tokens.len()),
        }
    }

    /// Pop-front: the head token and the stream after it.
    pub fn split_first(&self) -> Option<(&Token<K>, Self)> {
        self.head().map(|head| (head, self.tail()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token<K>> {
        self.as_slice().iter()
    }

    /// At most the first `n` remaining tokens
    pub fn take(&self, n: usize) -> &[Token<K>] {
        let slice = self.as_slice();
        &slice[..n.min(slice.len())]
    }
}

impl<K: PartialEq> PartialEq for TokenStream<K> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<K: Eq> Eq for TokenStream<K> {}

impl<K: fmt::Debug> fmt::Debug for TokenStream<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<K: TokenKind> fmt::Display for TokenStream<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tokens(f, self.as_slice())
    }
}

/// Comma-separated token list, shared by stream display and ambiguity reports
pub(crate) fn write_tokens<K: TokenKind>(
    f: &mut fmt::Formatter<'_>,
    tokens: &[Token<K>],
) -> fmt::Result {
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{token}")?;
    }
    Ok(())
}

impl<K> From<Vec<Token<K>>> for TokenStream<K> {
    fn from(tokens: Vec<Token<K>>) -> Self {
        TokenStream::new(tokens)
    }
}

impl<K> FromIterator<Token<K>> for TokenStream<K> {
    fn from_iter<I: IntoIterator<Item = Token<K>>>(iter: I) -> Self {
        TokenStream::new(iter.into_iter().collect())
    }
}

impl<'a, K> IntoIterator for &'a TokenStream<K> {
    type Item = &'a Token<K>;
    type IntoIter = std::slice::Iter<'a, Token<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Word,
        Comma,
    }

    impl TokenKind for Kind {
        fn name(&self) -> &'static str {
            match self {
                Kind::Word => "WORD",
                Kind::Comma => "COMMA",
            }
        }
    }

    fn stream() -> TokenStream<Kind> {
        TokenStream::new(vec![
            Token::new(Kind::Word, "a"),
            Token::new(Kind::Comma, ","),
            Token::new(Kind::Word, "b"),
        ])
    }

    #[test]
    fn test_split_first_pops_head() {
        let tokens = stream();
        let (head, rest) = tokens.split_first().unwrap();
        assert_eq!(head, &Token::new(Kind::Word, "a"));
        assert_eq!(rest.len(), 2);
        assert_eq!(rest.head(), Some(&Token::new(Kind::Comma, ",")));
    }

    #[test]
    fn test_tail_of_empty_is_empty() {
        let empty = TokenStream::<Kind>::empty();
        assert!(empty.split_first().is_none());
        assert!(empty.tail().is_empty());
    }

    #[test]
    fn test_suffixes_compare_by_content() {
        let tokens = stream();
        let suffix = tokens.tail().tail();
        let fresh = TokenStream::new(vec![Token::new(Kind::Word, "b")]);
        assert_eq!(suffix, fresh);
        assert_ne!(tokens, fresh);
    }

    #[test]
    fn test_take_is_clamped() {
        let tokens = stream();
        assert_eq!(tokens.take(2).len(), 2);
        assert_eq!(tokens.take(10).len(), 3);
    }

    #[test]
    fn test_token_display_and_json() {
        let token = Token::new(Kind::Word, "alice");
        assert_eq!(token.to_string(), "(WORD: \"alice\")");
        assert_eq!(token.to_json(), serde_json::json!({ "WORD": "alice" }));
    }

    #[test]
    fn test_stream_display() {
        assert_eq!(
            stream().to_string(),
            "(WORD: \"a\"), (COMMA: \",\"), (WORD: \"b\")"
        );
    }
}
