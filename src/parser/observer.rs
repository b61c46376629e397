//! Reporting of ambiguous alternations
//!
//! [`ParserFunction::or`](super::ParserFunction::or) fails when both of its alternatives accept
//! the same input. Before failing it hands an [`Ambiguity`] report to an
//! [`AmbiguityObserver`]. The default observer writes the report to the `log` facade; tests
//! and tools can supply their own.

use std::fmt;

use crate::lexer::{Token, TokenKind, write_tokens};

/// How many input tokens an ambiguity report quotes.
pub const SNIPPET_LEN: usize = 10;

/// Two alternatives that both accepted the same input.
#[derive(Debug)]
pub struct Ambiguity<'a, K> {
    pub left: &'a str,
    pub right: &'a str,
    /// The first tokens of the contested input
    pub input: &'a [Token<K>],
}

impl<K: TokenKind> fmt::Display for Ambiguity<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} and {} both accept: ", self.left, self.right)?;
        write_tokens(f, self.input)
    }
}

pub trait AmbiguityObserver<K> {
    fn ambiguous(&self, report: &Ambiguity<'_, K>);
}

impl<K, F: Fn(&Ambiguity<'_, K>)> AmbiguityObserver<K> for F {
    fn ambiguous(&self, report: &Ambiguity<'_, K>) {
        self(report)
    }
}

/// Writes ambiguity reports at error level under the `cparser::or` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl<K: TokenKind> AmbiguityObserver<K> for LogObserver {
    fn ambiguous(&self, report: &Ambiguity<'_, K>) {
        log::error!(target: "cparser::or", "Ambiguous results: two parsers accept this input!");
        log::error!(target: "cparser::or", "-- {report}");
    }
}
