use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, BitOr, BitXor, Shr};
use std::rc::{Rc, Weak};

use crate::lexer::{Token, TokenKind, TokenStream};

use super::Parser;
use super::expression::Expression;
use super::observer::{Ambiguity, AmbiguityObserver, LogObserver, SNIPPET_LEN};
use super::result::ParseResult;

type ParserFn<K> = Rc<dyn Fn(&TokenStream<K>) -> ParseResult<K>>;

// === Parser functions ===

/// A parse function paired with a human-readable description.
///
/// Cloning is cheap: clones share the underlying function. Two parser functions compare
/// equal, and hash the same, when their descriptions are equal.
pub struct ParserFunction<K> {
    parser: ParserFn<K>,
    description: Rc<str>,
}

impl<K> Clone for ParserFunction<K> {
    fn clone(&self) -> Self {
        ParserFunction {
            parser: Rc::clone(&self.parser),
            description: Rc::clone(&self.description),
        }
    }
}

impl<K: TokenKind> ParserFunction<K> {
    pub fn new<P: Parser<K> + 'static>(description: impl Into<Rc<str>>, parser: P) -> Self {
        ParserFunction {
            parser: Rc::new(move |tokens: &TokenStream<K>| parser.parse(tokens)),
            description: description.into(),
        }
    }

    /// A parser whose definition is built by `thunk` on the first call to `parse` and reused
    /// afterwards.
    pub fn lazy<F>(description: impl Into<Rc<str>>, thunk: F) -> Self
    where
        F: Fn() -> ParserFunction<K> + 'static,
    {
        let cell = OnceCell::new();
        ParserFunction::new(description, move |tokens: &TokenStream<K>| {
            cell.get_or_init(&thunk).parse(tokens)
        })
    }

    /// Ties the knot for a self-referential grammar.
    ///
    /// `build` receives a parser that stands for the grammar being defined and returns the
    /// definition. The stand-in forwards to that definition once it exists.
    ///
    /// ```
    /// use cparser::lexer::sexpr::SexprKind;
    /// use cparser::parser::{ParserFunction, one_of, terminal};
    ///
    /// // sexpr := "(" (WORD | sexpr)* ")"
    /// let sexpr = ParserFunction::recursive("sexpr", |sexpr| {
    ///     one_of(terminal(SexprKind::Word), [sexpr])
    ///         .list()
    ///         .between(terminal(SexprKind::Open), terminal(SexprKind::Close))
    /// });
    /// assert_eq!(sexpr.description(), "sexpr");
    /// ```
    pub fn recursive<F>(description: impl Into<Rc<str>>, build: F) -> Self
    where
        F: FnOnce(ParserFunction<K>) -> ParserFunction<K>,
    {
        let description: Rc<str> = description.into();
        let cell = Rc::new(OnceCell::new());
        let stand_in = ParserFunction::new(
            Rc::clone(&description),
            Knot {
                cell: Rc::downgrade(&cell),
            },
        );
        let definition = build(stand_in);
        // the cell was created above and nothing else can reach it mutably
        if cell.set(definition).is_err() {
            unreachable!("recursive parser {description} defined twice");
        }
        ParserFunction::new(description, Tied { cell })
    }

    // === Combinators ===

    /// `self` followed by `other`, producing `Pair(self's production, other's production)`.
    pub fn then(self, other: ParserFunction<K>) -> ParserFunction<K> {
        let description = format!("({} then {})", self.description, other.description);
        ParserFunction::new(description, move |tokens: &TokenStream<K>| {
            self.parse(tokens).flat_map(|first| {
                other.parse(&first.tokens).flat_map(|second| {
                    ParseResult::ok(
                        Expression::pair(first.production, second.production),
                        second.tokens,
                    )
                })
            })
        })
    }

    /// Accepts what `self` accepts, but only if no tokens remain afterwards.
    pub fn then_end(self) -> ParserFunction<K> {
        let description = format!("{}, EOF", self.description);
        ParserFunction::new(description, move |tokens: &TokenStream<K>| {
            self.parse(tokens).flat_map(|success| {
                if success.tokens.is_empty() {
                    ParseResult::Ok(success)
                } else {
                    ParseResult::error()
                }
            })
        })
    }

    /// Exactly one of `self` and `other` must accept the input.
    ///
    /// Both alternatives run on the same input. If both succeed the grammar is ambiguous: the
    /// ambiguity is logged and the combined parser fails. Use [`ParserFunction::or_else`] for
    /// deliberately ordered alternatives.
    pub fn or(self, other: ParserFunction<K>) -> ParserFunction<K> {
        self.or_observed(other, Rc::new(LogObserver))
    }

    /// [`ParserFunction::or`] with ambiguities reported to `observer`.
    pub fn or_observed(
        self,
        other: ParserFunction<K>,
        observer: Rc<dyn AmbiguityObserver<K>>,
    ) -> ParserFunction<K> {
        let description = format!("({} or {})", self.description, other.description);
        ParserFunction::new(description, move |tokens: &TokenStream<K>| {
            match self.parse(tokens) {
                ParseResult::Ok(first) => match other.parse(tokens) {
                    ParseResult::Ok(_) => {
                        observer.ambiguous(&Ambiguity {
                            left: &self.description,
                            right: &other.description,
                            input: tokens.take(SNIPPET_LEN),
                        });
                        ParseResult::error()
                    }
                    ParseResult::ParserError => ParseResult::Ok(first),
                },
                ParseResult::ParserError => other.parse(tokens),
            }
        })
    }

    /// `self` if it succeeds, otherwise `other`. `other` never runs when `self` succeeds.
    pub fn or_else(self, other: ParserFunction<K>) -> ParserFunction<K> {
        let description = format!("({} orElse {})", self.description, other.description);
        ParserFunction::new(description, move |tokens: &TokenStream<K>| {
            match self.parse(tokens) {
                ParseResult::Ok(success) => ParseResult::Ok(success),
                ParseResult::ParserError => other.parse(tokens),
            }
        })
    }

    /// Zero or more consecutive matches of `self`, as a `Nothing`-terminated pair chain.
    ///
    /// Never fails. With no match at all it produces `Nothing` and consumes nothing, so
    /// repeating a parser that can itself succeed without consuming input (such as another
    /// `list`) never terminates. Grammars must not do that.
    pub fn list(self) -> ParserFunction<K> {
        let description = format!("(list-of: {})", self.description);
        ParserFunction::new(description, move |tokens: &TokenStream<K>| {
            let mut remaining = tokens.clone();
            let mut items = Vec::new();
            while let ParseResult::Ok(success) = self.parse(&remaining) {
                items.push(success.production);
                remaining = success.tokens;
            }
            ParseResult::ok(Expression::chain(items), remaining)
        })
    }

    /// Zero or more matches of `self` separated by `separator`. The separators are dropped
    /// from the production. Shares the non-termination caveat of [`ParserFunction::list`].
    pub fn separated_list(self, separator: ParserFunction<K>) -> ParserFunction<K> {
        let description = format!("(separated-list-of {})", self.description);
        let rest = self.clone().with_prefix(separator).list();
        ParserFunction::new(description, move |tokens: &TokenStream<K>| {
            match self.parse(tokens) {
                ParseResult::Ok(head) => rest.parse(&head.tokens).flat_map(|tail| {
                    ParseResult::ok(
                        Expression::pair(head.production, tail.production),
                        tail.tokens,
                    )
                }),
                ParseResult::ParserError => {
                    ParseResult::ok(Expression::nothing(), tokens.clone())
                }
            }
        })
    }

    /// `prefix self suffix`, keeping only the production of `self`.
    pub fn between(
        self,
        prefix: ParserFunction<K>,
        suffix: ParserFunction<K>,
    ) -> ParserFunction<K> {
        let description = format!(
            "(between: {} {} {})",
            prefix.description, self.description, suffix.description
        );
        sequence([prefix, self, suffix])
            .map_expression(second)
            .named(description)
    }

    /// `header self`, keeping only the production of `self`.
    pub fn with_prefix(self, header: ParserFunction<K>) -> ParserFunction<K> {
        let description = format!("(withPrefix: {} {})", header.description, self.description);
        sequence([header, self])
            .map_expression(second)
            .named(description)
    }

    /// Post-processes a successful production, typically into a grammar's own
    /// [`Production`](super::Production) type.
    pub fn map_expression<F>(self, f: F) -> ParserFunction<K>
    where
        F: Fn(Expression<K>) -> Expression<K> + 'static,
    {
        let description = format!("(mapped: {})", self.description);
        ParserFunction::new(description, move |tokens: &TokenStream<K>| {
            self.parse(tokens).map_production(&f)
        })
    }

    /// Replaces the description. Parsing is unchanged.
    pub fn named(self, description: impl Into<Rc<str>>) -> ParserFunction<K> {
        ParserFunction {
            parser: self.parser,
            description: description.into(),
        }
    }
}

impl<K> ParserFunction<K> {
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<K> Parser<K> for ParserFunction<K> {
    fn parse(&self, tokens: &TokenStream<K>) -> ParseResult<K> {
        (self.parser)(tokens)
    }
}

/// The production of the second parser in a sequence of two or more.
fn second<K: TokenKind>(expr: Expression<K>) -> Expression<K> {
    match expr.as_pair().and_then(|(_, rest)| rest.as_pair()) {
        Some((middle, _)) => middle.clone(),
        None => unreachable!("sequence of two or more parsers produced {expr}"),
    }
}

// === Recursion ===

/// The stand-in handed to a recursive definition.
///
/// It only holds a weak reference, so the definition that contains it does not keep itself
/// alive.
struct Knot<K> {
    cell: Weak<OnceCell<ParserFunction<K>>>,
}

impl<K> Parser<K> for Knot<K> {
    fn parse(&self, tokens: &TokenStream<K>) -> ParseResult<K> {
        let Some(cell) = self.cell.upgrade() else {
            panic!("recursive parser used after its definition was dropped");
        };
        match cell.get() {
            Some(definition) => definition.parse(tokens),
            None => panic!("recursive parser used while its definition was being built"),
        }
    }
}

struct Tied<K> {
    cell: Rc<OnceCell<ParserFunction<K>>>,
}

impl<K: TokenKind> Parser<K> for Tied<K> {
    fn parse(&self, tokens: &TokenStream<K>) -> ParseResult<K> {
        self.cell
            .get()
            .map_or_else(ParseResult::error, |definition| definition.parse(tokens))
    }
}

// === Primitive Parsers ===

/// Accepts one token of the given kind, whatever its text.
pub fn terminal<K: TokenKind>(kind: K) -> ParserFunction<K> {
    let description = format!("Terminal({})", kind.name());
    ParserFunction::new(description, move |tokens: &TokenStream<K>| {
        match tokens.split_first() {
            Some((head, tail)) if head.kind == kind => {
                ParseResult::ok(Expression::terminal(head.clone()), tail)
            }
            _ => ParseResult::error(),
        }
    })
}

/// Accepts one token with exactly the given kind and text.
pub fn exact<K: TokenKind>(kind: K, text: impl Into<String>) -> ParserFunction<K> {
    token(Token::new(kind, text))
}

/// Accepts exactly the given token.
pub fn token<K: TokenKind>(expected: Token<K>) -> ParserFunction<K> {
    let description = format!("Terminal{expected}");
    ParserFunction::new(description, move |tokens: &TokenStream<K>| {
        match tokens.split_first() {
            Some((head, tail)) if *head == expected => {
                ParseResult::ok(Expression::terminal(head.clone()), tail)
            }
            _ => ParseResult::error(),
        }
    })
}

// === Combinators over many parsers ===

/// The given parsers one after another. The production is a `Nothing`-terminated pair chain,
/// so `as_list` yields one element per parser.
///
/// # Panics
///
/// Panics when `parsers` is empty.
pub fn sequence<K: TokenKind>(
    parsers: impl IntoIterator<Item = ParserFunction<K>>,
) -> ParserFunction<K> {
    let parsers: Vec<_> = parsers.into_iter().collect();
    if parsers.is_empty() {
        panic!("internal error: sequence requires at least one parser");
    }
    let description = format!(
        "(sequence: {})",
        parsers
            .iter()
            .map(|parser| parser.description())
            .collect::<Vec<_>>()
            .join(",")
    );
    ParserFunction::new(description, move |tokens: &TokenStream<K>| {
        let mut remaining = tokens.clone();
        let mut productions = Vec::with_capacity(parsers.len());
        for parser in &parsers {
            match parser.parse(&remaining) {
                ParseResult::Ok(success) => {
                    productions.push(success.production);
                    remaining = success.tokens;
                }
                ParseResult::ParserError => return ParseResult::error(),
            }
        }
        ParseResult::ok(Expression::list(productions), remaining)
    })
}

/// The first of the given parsers that succeeds, tried left to right.
pub fn one_of<K: TokenKind>(
    first: ParserFunction<K>,
    others: impl IntoIterator<Item = ParserFunction<K>>,
) -> ParserFunction<K> {
    let others: Vec<_> = others.into_iter().collect();
    let description = format!("(oneOf: {})", describe(&first, &others));
    others
        .into_iter()
        .fold(first, ParserFunction::or_else)
        .named(description)
}

/// Exactly one of the given parsers must succeed; see [`ParserFunction::or`].
pub fn exactly_one_of<K: TokenKind>(
    first: ParserFunction<K>,
    others: impl IntoIterator<Item = ParserFunction<K>>,
) -> ParserFunction<K> {
    exactly_one_of_observed(first, others, Rc::new(LogObserver))
}

/// [`exactly_one_of`] with ambiguities reported to `observer`.
pub fn exactly_one_of_observed<K: TokenKind>(
    first: ParserFunction<K>,
    others: impl IntoIterator<Item = ParserFunction<K>>,
    observer: Rc<dyn AmbiguityObserver<K>>,
) -> ParserFunction<K> {
    let others: Vec<_> = others.into_iter().collect();
    let description = format!("(exactlyOneOf: {})", describe(&first, &others));
    others
        .into_iter()
        .fold(first, |acc, next| acc.or_observed(next, Rc::clone(&observer)))
        .named(description)
}

fn describe<K>(first: &ParserFunction<K>, others: &[ParserFunction<K>]) -> String {
    std::iter::once(first)
        .chain(others)
        .map(|parser| parser.description())
        .collect::<Vec<_>>()
        .join(", ")
}

// === Trait impls ===

impl<K> PartialEq for ParserFunction<K> {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
    }
}

impl<K> Eq for ParserFunction<K> {}

impl<K> Hash for ParserFunction<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.description.hash(state);
    }
}

impl<K> fmt::Debug for ParserFunction<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParserFunction")
            .field(&self.description)
            .finish()
    }
}

impl<K> fmt::Display for ParserFunction<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

// === Operator Overloading ===

/// `+` for sequencing: A + B is `A.then(B)`
impl<K: TokenKind> Add for ParserFunction<K> {
    type Output = ParserFunction<K>;

    fn add(self, rhs: ParserFunction<K>) -> Self::Output {
        self.then(rhs)
    }
}

/// `|` for ordered choice: A | B is `A.or_else(B)`
impl<K: TokenKind> BitOr for ParserFunction<K> {
    type Output = ParserFunction<K>;

    fn bitor(self, rhs: ParserFunction<K>) -> Self::Output {
        self.or_else(rhs)
    }
}

/// `^` for exclusive choice: A ^ B is `A.or(B)`
impl<K: TokenKind> BitXor for ParserFunction<K> {
    type Output = ParserFunction<K>;

    fn bitxor(self, rhs: ParserFunction<K>) -> Self::Output {
        self.or(rhs)
    }
}

/// `>>` for mapping: A >> f is `A.map_expression(f)`
impl<K: TokenKind, F> Shr<F> for ParserFunction<K>
where
    F: Fn(Expression<K>) -> Expression<K> + 'static,
{
    type Output = ParserFunction<K>;

    fn shr(self, f: F) -> Self::Output {
        self.map_expression(f)
    }
}
