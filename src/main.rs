use std::io::{self, BufRead, Write};
use std::str::FromStr;

use cparser::lexer::TokenKind;
use cparser::parser::ParseResult;
use cparser::parser::grammar::array::parse_array;
use cparser::parser::grammar::infix::{Calculator, PARSE_FAILURE};
use cparser::parser::grammar::sexpr::parse_sexpr;

/// Which grammar to read standard input with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Calc,
    Sexpr,
    Array,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calc" => Ok(Mode::Calc),
            "sexpr" => Ok(Mode::Sexpr),
            "array" => Ok(Mode::Array),
            other => anyhow::bail!("unknown mode {other:?}, expected one of: calc, sexpr, array"),
        }
    }
}

fn render<K: TokenKind>(result: ParseResult<K>) -> String {
    match result {
        ParseResult::Ok(success) => success.production.to_json().to_string(),
        ParseResult::ParserError => PARSE_FAILURE.to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mode = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => Mode::Calc,
    };
    log::debug!("reading stdin in {mode:?} mode");

    let mut calculator = Calculator::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let output = match mode {
            Mode::Calc => calculator.calc(&line),
            Mode::Sexpr => parse_sexpr(&line).map(render).unwrap_or_else(|err| err.to_string()),
            Mode::Array => parse_array(&line).map(render).unwrap_or_else(|err| err.to_string()),
        };
        writeln!(stdout, "{output}")?;
    }

    Ok(())
}
