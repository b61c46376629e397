//! The combinator engine
//!
//! - `expression`: parse-tree values and the [`Production`] extension point
//! - `result`: the outcome of a single parse step
//! - `observer`: reporting of ambiguous alternatives
//! - `combinators`: [`ParserFunction`] and the combinator algebra
//! - `grammar`: the bundled client grammars

mod combinators;
mod expression;
pub mod grammar;
mod observer;
mod result;

pub use combinators::*;
pub use expression::*;
pub use observer::*;
pub use result::*;

use crate::lexer::TokenStream;

/// Anything that can take a parse step over a token stream.
pub trait Parser<K>: Sized {
    fn parse(&self, tokens: &TokenStream<K>) -> ParseResult<K>;
}

// Allow closures to be parsers
impl<K, F: Fn(&TokenStream<K>) -> ParseResult<K>> Parser<K> for F {
    fn parse(&self, tokens: &TokenStream<K>) -> ParseResult<K> {
        self(tokens)
    }
}
