//! # cparser - Parser Combinators over Token Streams
//!
//! cparser is a small parser-combinator engine. Grammars are written as ordinary Rust values:
//! primitive parsers that each accept one token are combined into sequences, alternatives and
//! repetitions until the combined value accepts a whole language.
//!
//! ## Architecture Overview
//!
//! 1. **Lexer** (`lexer`) - Generic tokens and token streams, plus `lachs` scanners for the
//!    bundled grammars
//! 2. **Parser** (`parser`) - Parse-tree values, parse results and the combinator algebra
//! 3. **Grammars** (`parser::grammar`) - S-expressions, arrays and an infix calculator built
//!    from the combinators
//!
//! ## Pipeline Flow
//!
//! ```text
//! Source Code (String)
//!     ↓
//! [Scanner] → TokenStream<K>
//!     ↓
//! [ParserFunction<K>] → ParseResult<K>
//!     ↓                     ├─ Ok { production: Expression<K>, tokens: remaining input }
//!     ↓                     └─ ParserError
//! [Grammar mapping] → grammar-specific trees (SExpression, ArrayExpression, ArithExpression)
//! ```
//!
//! ## Key Design Decisions
//!
//! ### Parsers are values
//! A [`parser::ParserFunction`] pairs a parse function with a description. Parser functions
//! are reference counted, so cloning one to use it in several places is cheap, and every
//! combinator returns a fresh parser without touching its operands. Descriptions compose as
//! the parsers do, which makes a grammar printable.
//!
//! ### Failure is a value
//! A parse step either succeeds with a production and the unconsumed tokens or returns
//! `ParserError`. Nothing is thrown, so alternatives simply try the next branch.
//!
//! ### Two kinds of choice
//! - `or_else` (`|`) is ordered: the first success wins.
//! - `or` (`^`) demands that exactly one side succeeds. When both do, the grammar is
//!   ambiguous for that input: the parse fails and an ambiguity report goes to an
//!   [`parser::AmbiguityObserver`], by default the `log` facade.
//!
//! ### Lists are pair chains
//! Sequences and repetitions produce right-nested pairs ending in `Nothing`, so
//! [`parser::Expression::as_list`] recovers exactly the elements that were parsed.
//!
//! ## Module Structure
//!
//! - [`lexer`] - Tokens, token streams and scanners using lachs
//! - [`parser`] - The combinator engine and the bundled grammars
//!
//! ## Example
//!
//! ```
//! use cparser::lexer::sexpr::{SexprKind, scan};
//! use cparser::parser::{Parser, terminal};
//!
//! let words = terminal(SexprKind::Word)
//!     .list()
//!     .between(terminal(SexprKind::Open), terminal(SexprKind::Close));
//!
//! let tokens = scan("(alice bob)").unwrap();
//! let success = words.parse(&tokens).unwrap_ok();
//! assert_eq!(success.production.as_list().len(), 2);
//! assert!(success.tokens.is_empty());
//! ```

pub mod lexer;
pub mod parser;
