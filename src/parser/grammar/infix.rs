//! The infix calculator
//!
//! ```text
//! <Expr3>      ::= "(" <Expr1> ")" | <Number> | <Variable>
//! <Expr2>      ::= <Expr3> { ("*" | "/") <Expr3> }
//! <Expr1>      ::= <Expr2> { ("+" | "-") <Expr2> }
//! <Assignment> ::= <Variable> "=" <Expr1>
//! <Goal>       ::= <Expr1> EOF | <Assignment> EOF
//! ```
//!
//! Binary operators associate to the left. Each rule maps its parse tree into an
//! [`ArithExpression`], so a successful parse of the goal yields one expression tree that the
//! [`Calculator`] evaluates against its variable environment.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use serde_json::{Value, json};

use crate::lexer::infix::{InfixKind, scan};
use crate::lexer::{Token, TokenStream};
use crate::parser::{
    Expression, Parser, ParserFunction, Production, exactly_one_of, same_production, sequence,
    terminal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn from_kind(kind: InfixKind) -> Option<Self> {
        match kind {
            InfixKind::Plus => Some(Operator::Add),
            InfixKind::Minus => Some(Operator::Subtract),
            InfixKind::Times => Some(Operator::Multiply),
            InfixKind::Divide => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => lhs / rhs,
        }
    }
}

/// Expression tree of the calculator language.
#[derive(Debug, Clone, PartialEq)]
pub enum ArithExpression {
    Number(f64),
    Variable(String),
    Binary {
        operator: Operator,
        lhs: Box<ArithExpression>,
        rhs: Box<ArithExpression>,
    },
    Assignment {
        name: String,
        rhs: Box<ArithExpression>,
    },
}

impl Production<InfixKind> for ArithExpression {
    fn to_json(&self) -> Value {
        match self {
            ArithExpression::Number(value) => json!(value),
            ArithExpression::Variable(name) => json!(name),
            ArithExpression::Binary { operator, lhs, rhs } => {
                json!([operator.symbol(), lhs.to_json(), rhs.to_json()])
            }
            ArithExpression::Assignment { name, rhs } => json!(["assign", name, rhs.to_json()]),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Production<InfixKind>) -> bool {
        same_production(self, other)
    }
}

impl fmt::Display for ArithExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

// === Parse tree to ArithExpression ===

fn arith(expr: &Expression<InfixKind>) -> &ArithExpression {
    match expr.downcast_ref::<ArithExpression>() {
        Some(arith) => arith,
        None => unreachable!("expected an arithmetic expression, found {expr}"),
    }
}

fn make_number(expr: Expression<InfixKind>) -> Expression<InfixKind> {
    let value = expr
        .as_terminal()
        .and_then(|token| token.text.parse::<f64>().ok());
    match value {
        Some(value) => Expression::other(ArithExpression::Number(value)),
        None => unreachable!("NUMBER token did not hold a number: {expr}"),
    }
}

fn make_variable(expr: Expression<InfixKind>) -> Expression<InfixKind> {
    match expr.as_terminal() {
        Some(token) => Expression::other(ArithExpression::Variable(token.text.clone())),
        None => unreachable!("expected a VARIABLE terminal, found {expr}"),
    }
}

/// `first { op operand }` folded to the left.
fn make_binary(expr: Expression<InfixKind>) -> Expression<InfixKind> {
    let items = expr.as_list();
    let Some((first, rest)) = items.split_first() else {
        unreachable!("binary chain without an operand");
    };

    let tree = rest.iter().fold(arith(first).clone(), |lhs, step| {
        let step = step.as_list();
        let operator = step
            .first()
            .and_then(Expression::as_terminal)
            .and_then(|token| Operator::from_kind(token.kind));
        match (operator, step.get(1)) {
            (Some(operator), Some(rhs)) => ArithExpression::Binary {
                operator,
                lhs: Box::new(lhs),
                rhs: Box::new(arith(rhs).clone()),
            },
            _ => unreachable!("malformed operator step in binary chain"),
        }
    });
    Expression::other(tree)
}

fn make_assignment(expr: Expression<InfixKind>) -> Expression<InfixKind> {
    let items = expr.as_list();
    match (items.first().map(arith), items.get(2)) {
        (Some(ArithExpression::Variable(name)), Some(rhs)) => {
            Expression::other(ArithExpression::Assignment {
                name: name.clone(),
                rhs: Box::new(arith(rhs).clone()),
            })
        }
        _ => unreachable!("malformed assignment {expr}"),
    }
}

// === Grammar ===

/// Parser for a complete calculator input: an expression or an assignment followed by the end
/// of the input.
pub fn goal() -> ParserFunction<InfixKind> {
    let number = terminal(InfixKind::Number)
        .map_expression(make_number)
        .named("<NUMBER>");
    let variable = terminal(InfixKind::Variable)
        .map_expression(make_variable)
        .named("<VARIABLE>");

    let expr1 = ParserFunction::recursive("EXPR1", |expr1| {
        let parenthesized = expr1
            .between(terminal(InfixKind::OpenParen), terminal(InfixKind::CloseParen))
            .named("\"(\" <EXPR1> \")\"");
        let expr3 = exactly_one_of(number.clone(), [variable.clone(), parenthesized]);

        let multiply_or_divide = terminal(InfixKind::Times) ^ terminal(InfixKind::Divide);
        let expr2 = ((expr3.clone() + sequence([multiply_or_divide, expr3]).list()) >> make_binary)
            .named("<EXPR3> { * or / <EXPR3> }");

        let add_or_subtract = terminal(InfixKind::Plus) ^ terminal(InfixKind::Minus);
        ((expr2.clone() + sequence([add_or_subtract, expr2]).list()) >> make_binary)
            .named("<EXPR2> { + or - <EXPR2> }")
    });

    let assignment = sequence([variable, terminal(InfixKind::Equals), expr1.clone()])
        .map_expression(make_assignment)
        .named("<VARIABLE> \"=\" <EXPR1>");

    exactly_one_of(expr1.then_end(), [assignment.then_end()])
}

/// The scanner reads `2-3` as the numbers `2` and `-3`. Put a `+` between a number and a
/// following negative number so the pair parses as a sum.
fn fix_adjacent_numbers(tokens: &TokenStream<InfixKind>) -> TokenStream<InfixKind> {
    let mut fixed = Vec::with_capacity(tokens.len());
    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        fixed.push(token.clone());
        let negative_follows = iter
            .peek()
            .is_some_and(|next| next.kind == InfixKind::Number && next.text.starts_with('-'));
        if token.kind == InfixKind::Number && negative_follows {
            fixed.push(Token::new(InfixKind::Plus, "+"));
        }
    }
    TokenStream::new(fixed)
}

// === Evaluation ===

pub const PARSE_FAILURE: &str = "Parse failure!";
pub const UNDEFINED: &str = "Undefined";

/// A calculator session. Assignments persist across calls to [`Calculator::calc`].
pub struct Calculator {
    goal: ParserFunction<InfixKind>,
    environment: HashMap<String, f64>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            goal: goal(),
            environment: HashMap::new(),
        }
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.environment.get(name).copied()
    }

    /// Scans and parses one line of input. `None` if either step fails.
    pub fn parse_tree(&self, input: &str) -> Option<ArithExpression> {
        let tokens = match scan(input) {
            Ok(tokens) => fix_adjacent_numbers(&tokens),
            Err(err) => {
                log::debug!("{err}");
                return None;
            }
        };
        let success = self.goal.parse(&tokens).into_success()?;
        success.production.downcast_ref::<ArithExpression>().cloned()
    }

    /// Evaluates `expr`. `None` when a variable is unbound or an operation has no finite
    /// result. An assignment binds its variable to the result, or unbinds it when there is
    /// none.
    pub fn eval(&mut self, expr: &ArithExpression) -> Option<f64> {
        match expr {
            ArithExpression::Number(value) => Some(*value),
            ArithExpression::Variable(name) => self.variable(name),
            ArithExpression::Binary { operator, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                Some(operator.apply(lhs, rhs)).filter(|value| value.is_finite())
            }
            ArithExpression::Assignment { name, rhs } => {
                let value = self.eval(rhs);
                match value {
                    Some(value) => self.environment.insert(name.clone(), value),
                    None => self.environment.remove(name),
                };
                value
            }
        }
    }

    /// Parses and evaluates one line, rendering the outcome as text.
    pub fn calc(&mut self, input: &str) -> String {
        let Some(expr) = self.parse_tree(input) else {
            log::debug!("{input:?} --> {PARSE_FAILURE}");
            return PARSE_FAILURE.to_string();
        };
        let output = match self.eval(&expr) {
            Some(value) => format!("{value:?}"),
            None => UNDEFINED.to_string(),
        };
        log::debug!("{expr} --> {output}");
        output
    }
}
