//! Client grammars built on the combinator engine
//!
//! - `sexpr`: s-expressions of words
//! - `array`: JSON-style arrays of numbers and strings
//! - `infix`: the infix calculator

pub mod array;
pub mod infix;
pub mod sexpr;
