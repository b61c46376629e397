use std::cell::RefCell;
use std::rc::Rc;

use cparser::lexer::array::{self, ArrayKind};
use cparser::lexer::sexpr::{self, SexprKind};
use cparser::lexer::{Token, TokenStream};
use cparser::parser::{
    Ambiguity, AmbiguityObserver, Expression, ParseResult, Parser, ParserFunction, exact,
    exactly_one_of_observed, one_of, sequence, terminal,
};

fn word(text: &str) -> Expression<SexprKind> {
    Expression::terminal(Token::new(SexprKind::Word, text))
}

fn number(text: &str) -> Expression<ArrayKind> {
    Expression::terminal(Token::new(ArrayKind::Number, text))
}

fn recording() -> (Rc<RefCell<Vec<String>>>, Rc<dyn AmbiguityObserver<SexprKind>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let observer = move |report: &Ambiguity<'_, SexprKind>| {
        sink.borrow_mut().push(format!("{} | {}", report.left, report.right));
    };
    (seen, Rc::new(observer))
}

#[test]
fn list_round_trip() {
    let items = vec![word("a"), Expression::nothing(), word("c")];
    assert_eq!(Expression::list(items.clone()).as_list(), items);

    let single = vec![word("a")];
    assert_eq!(Expression::list(single.clone()).as_list(), single);
}

#[test]
fn sequence_production_shape() {
    let tokens = sexpr::scan("( a )").unwrap();
    let parser = sequence([
        terminal(SexprKind::Open),
        terminal(SexprKind::Word),
        terminal(SexprKind::Close),
    ]);
    let success = parser.parse(&tokens).unwrap_ok();

    let open = Expression::terminal(Token::new(SexprKind::Open, "("));
    let close = Expression::terminal(Token::new(SexprKind::Close, ")"));
    assert_eq!(
        success.production,
        Expression::pair(
            open.clone(),
            Expression::pair(
                word("a"),
                Expression::pair(close.clone(), Expression::nothing())
            )
        )
    );
    assert_eq!(success.production.as_list(), vec![open, word("a"), close]);
}

#[test]
fn then_consumes_prefix_first() {
    let parser = terminal(SexprKind::Open).then(terminal(SexprKind::Word));

    let success = parser.parse(&sexpr::scan("( a )").unwrap()).unwrap_ok();
    assert_eq!(success.tokens, sexpr::scan(")").unwrap());

    parser.parse(&sexpr::scan("a (").unwrap()).unwrap_error();
}

#[test]
fn or_fails_on_ambiguity() {
    let tokens = sexpr::scan("alice").unwrap();
    let a = terminal(SexprKind::Word);
    let b = exact(SexprKind::Word, "alice");
    assert!(a.parse(&tokens).is_ok());
    assert!(b.parse(&tokens).is_ok());

    let (seen, observer) = recording();
    a.or_observed(b, observer).parse(&tokens).unwrap_error();
    assert_eq!(
        seen.borrow().as_slice(),
        ["Terminal(WORD) | Terminal(WORD: \"alice\")"]
    );
}

#[test]
fn or_without_observer_still_fails() {
    let tokens = sexpr::scan("alice").unwrap();
    let parser = terminal(SexprKind::Word) ^ exact(SexprKind::Word, "alice");
    assert_eq!(parser.parse(&tokens), ParseResult::error());
}

#[test]
fn or_else_prefers_first() {
    let tokens = sexpr::scan("alice bob").unwrap();
    let first = terminal(SexprKind::Word).map_expression(|_| Expression::nothing());
    let second = ParserFunction::new(
        "unreachable",
        |_: &TokenStream<SexprKind>| -> ParseResult<SexprKind> {
            panic!("second alternative must not run")
        },
    );

    let success = first.or_else(second).parse(&tokens).unwrap_ok();
    assert!(success.production.is_nothing());
    assert_eq!(success.tokens, sexpr::scan("bob").unwrap());
}

#[test]
fn list_zero_match() {
    let tokens = sexpr::scan("( a )").unwrap();
    let success = terminal(SexprKind::Word).list().parse(&tokens).unwrap_ok();
    assert_eq!(success.production, Expression::nothing());
    assert_eq!(success.tokens, tokens);
}

#[test]
fn separated_list_strips_separators() {
    let tokens = array::scan("1, 2, 3").unwrap();
    let parser = terminal(ArrayKind::Number).separated_list(terminal(ArrayKind::Comma));
    let success = parser.parse(&tokens).unwrap_ok();
    assert_eq!(
        success.production.as_list(),
        vec![number("1"), number("2"), number("3")]
    );
    assert!(success.tokens.is_empty());
}

#[test]
fn bracketed_numbers() {
    let parser = terminal(ArrayKind::Number)
        .separated_list(terminal(ArrayKind::Comma))
        .between(
            terminal(ArrayKind::OpenSquare),
            terminal(ArrayKind::CloseSquare),
        );

    let success = parser.parse(&array::scan("[]").unwrap()).unwrap_ok();
    assert!(success.production.is_nothing());

    let success = parser.parse(&array::scan("[1, 2, 3, 4]").unwrap()).unwrap_ok();
    assert_eq!(
        success.production.as_list(),
        vec![number("1"), number("2"), number("3"), number("4")]
    );
}

#[test]
fn then_end_rejects_trailing_input() {
    let parser = terminal(SexprKind::Word);
    let tokens = sexpr::scan("alice bob").unwrap();
    assert!(parser.parse(&tokens).is_ok());
    parser.clone().then_end().parse(&tokens).unwrap_error();
    assert!(
        parser
            .then_end()
            .parse(&sexpr::scan("alice").unwrap())
            .is_ok()
    );
}

#[test]
fn long_list_parses_and_drops() {
    let tokens: TokenStream<SexprKind> = (0..200_000)
        .map(|_| Token::new(SexprKind::Word, "w"))
        .collect::<Vec<_>>()
        .into();
    let success = terminal(SexprKind::Word).list().parse(&tokens).unwrap_ok();
    assert_eq!(success.production.as_list().len(), 200_000);
    assert!(success.tokens.is_empty());
    drop(success);
}

#[test]
fn words_between_parens() {
    let tokens: TokenStream<SexprKind> = vec![
        Token::new(SexprKind::Open, "("),
        Token::new(SexprKind::Word, "a"),
        Token::new(SexprKind::Word, "b"),
        Token::new(SexprKind::Close, ")"),
    ]
    .into();
    let parser = terminal(SexprKind::Word)
        .list()
        .between(terminal(SexprKind::Open), terminal(SexprKind::Close));

    let success = parser.parse(&tokens).unwrap_ok();
    assert_eq!(success.production.as_list(), vec![word("a"), word("b")]);
    assert!(success.tokens.is_empty());
}

#[test]
fn grammar_shapes_differ_but_lists_agree() {
    let tokens = sexpr::scan("(alice bob charlie)").unwrap();
    let open = || terminal(SexprKind::Open);
    let close = || terminal(SexprKind::Close);
    let words = || terminal(SexprKind::Word).list();

    let nested = open().then(words().then(close()));
    let flat = sequence([open(), words(), close()]);
    let left = open().then(words()).then(close());

    let nested = nested.parse(&tokens).unwrap_ok().production;
    let flat = flat.parse(&tokens).unwrap_ok().production;
    let left = left.parse(&tokens).unwrap_ok().production;

    let expected = vec![word("alice"), word("bob"), word("charlie")];
    assert_eq!(nested.as_list()[1].as_list(), expected);
    assert_eq!(flat.as_list()[1].as_list(), expected);
    assert_ne!(nested, left);
    assert_eq!(left.as_list().len(), 2);
}

#[test]
fn single_alternative_choices() {
    let tokens = sexpr::scan("a").unwrap();
    let (seen, observer) = recording();
    let alone = terminal(SexprKind::Word).parse(&tokens);

    assert_eq!(one_of(terminal(SexprKind::Word), []).parse(&tokens), alone);
    assert_eq!(
        exactly_one_of_observed(terminal(SexprKind::Word), [], observer).parse(&tokens),
        alone
    );
    assert!(seen.borrow().is_empty());
}

#[test]
fn result_json() {
    let tokens = sexpr::scan("a b").unwrap();
    let result = terminal(SexprKind::Word).list().parse(&tokens);
    assert_eq!(
        result.to_json(),
        serde_json::json!([{ "WORD": "a" }, { "WORD": "b" }])
    );
    assert_eq!(
        terminal(SexprKind::Open).parse(&tokens).to_json(),
        serde_json::json!("ParserError")
    );
}
