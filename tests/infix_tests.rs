use cparser::parser::grammar::infix::Calculator;

#[test]
fn operator_precedence() {
    let mut calc = Calculator::new();
    assert_eq!(calc.calc("3 + 4 * 5"), "23.0");
    assert_eq!(calc.calc("3 * 4 + 5"), "17.0");
    assert_eq!(calc.calc("3 * (4 + 5)"), "27.0");
    assert_eq!(calc.calc("(3 + 4) * 5"), "35.0");
}

#[test]
fn left_associativity() {
    let mut calc = Calculator::new();
    assert_eq!(calc.calc("2 - 3 - 4"), "-5.0");
    assert_eq!(calc.calc("(2 - 3) - 4"), "-5.0");
    assert_eq!(calc.calc("2 / 4 / 2"), "0.25");
    assert_eq!(calc.calc("(2 / 4) / 2"), "0.25");
}

#[test]
fn no_whitespace() {
    let mut calc = Calculator::new();
    assert_eq!(calc.calc("2-3-4"), "-5.0");
    assert_eq!(calc.calc("2+3+4"), "9.0");
    assert_eq!(calc.calc("2+-3-4"), "-5.0");
}

#[test]
fn equivalent_expressions_are_equal() {
    let calc = Calculator::new();
    for (a, b) in [
        ("3", "(3)"),
        ("3 + (4 * 5)", "3 + 4 * 5"),
        ("(2 - 3) - 4", "2 - 3 - 4"),
    ] {
        let a = calc.parse_tree(a);
        let b = calc.parse_tree(b);
        assert!(a.is_some());
        assert_eq!(a, b);
        assert_eq!(a.map(|tree| tree.to_string()), b.map(|tree| tree.to_string()));
    }
}

#[test]
fn variable_assignment() {
    let mut calc = Calculator::new();
    assert_eq!(calc.calc("3 + 4"), "7.0");
    assert_eq!(calc.calc("x = 3"), "3.0");
    assert_eq!(calc.calc("x"), "3.0");
    assert_eq!(calc.calc("3.0 + x"), "6.0");
    assert_eq!(calc.calc("x = 3.0 + x"), "6.0");
    assert_eq!(calc.calc("x"), "6.0");
    assert_eq!(calc.calc("y"), "Undefined");
    assert_eq!(calc.calc("3 + y"), "Undefined");
    assert_eq!(calc.calc("z = 3 + y"), "Undefined");
    assert_eq!(calc.calc("z"), "Undefined");
    assert_eq!(calc.calc("x"), "6.0");
    assert_eq!(calc.calc("x = y"), "Undefined");
    assert_eq!(calc.calc("x"), "Undefined");
}

#[test]
fn division_by_zero_is_undefined() {
    let mut calc = Calculator::new();
    assert_eq!(calc.calc("x = 3"), "3.0");
    assert_eq!(calc.calc("x = 3 / 0"), "Undefined");
    assert_eq!(calc.calc("x"), "Undefined");
    assert_eq!(calc.calc("0 / 0"), "Undefined");
}

#[test]
fn bad_expressions_fail() {
    let mut calc = Calculator::new();
    for input in [
        "",
        "  ",
        "3 +",
        "3 + 4 *",
        "3 *",
        "3 * 4 + ( 2",
        "(2 - 3) - 4)",
        "- 3",
        "3 4 5",
        "3-4 5",
        "-3 4-5",
        "-3 4+-5",
        "2+3-+4",
        "2+-3-+4",
        "x =",
        "= x =",
        "= x 3",
        "3 = x",
        "x = 3 = x",
        "=",
    ] {
        assert_eq!(calc.calc(input), "Parse failure!", "input {input:?}");
    }
}
