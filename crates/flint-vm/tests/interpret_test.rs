//! End-to-end interpretation tests.
//!
//! Each test feeds a complete expression through the full pipeline:
//! scanner, compiler, and VM.

use flint_vm::{InterpretError, Vm};

fn eval(source: &str) -> String {
    let mut vm = Vm::new();
    vm.interpret(source).unwrap().to_string()
}

fn eval_err(source: &str) -> InterpretError {
    let mut vm = Vm::new();
    vm.interpret(source).unwrap_err()
}

#[test]
fn test_arithmetic() {
    assert_eq!(eval("5 + 3"), "8");
    assert_eq!(eval("10 - 4"), "6");
    assert_eq!(eval("6 * 7"), "42");
    assert_eq!(eval("15 / 3"), "5");
    assert_eq!(eval("1.5 + 2.25"), "3.75");
}

#[test]
fn test_precedence_and_grouping() {
    assert_eq!(eval("1 + 2 * 3"), "7");
    assert_eq!(eval("(1 + 2) * 3"), "9");
    assert_eq!(eval("10 - 4 - 3"), "3");
    assert_eq!(eval("-(1 + 2)"), "-3");
    assert_eq!(eval("100 / 10 / 2"), "5");
}

#[test]
fn test_comparison() {
    assert_eq!(eval("5 == 5"), "true");
    assert_eq!(eval("5 != 3"), "true");
    assert_eq!(eval("5 < 10"), "true");
    assert_eq!(eval("10 > 5"), "true");
    assert_eq!(eval("5 <= 5"), "true");
    assert_eq!(eval("5 >= 6"), "false");
}

#[test]
fn test_literals() {
    assert_eq!(eval("nil"), "nil");
    assert_eq!(eval("true"), "true");
    assert_eq!(eval("false"), "false");
    assert_eq!(eval("0"), "0");
    assert_eq!(eval("-0.5"), "-0.5");
}

#[test]
fn test_logical_not() {
    assert_eq!(eval("!true"), "false");
    assert_eq!(eval("!nil"), "true");
    assert_eq!(eval("!0"), "false");
    assert_eq!(eval("!!false"), "false");
}

#[test]
fn test_mixed_expression() {
    assert_eq!(eval("!(5 - 4 > 3 * 2 == !nil)"), "true");
}

#[test]
fn test_nan_compares_unequal_to_itself() {
    assert_eq!(eval("0/0 == 0/0"), "false");
    assert_eq!(eval("0/0 != 0/0"), "true");
}

#[test]
fn test_values_of_different_kinds_are_unequal() {
    assert_eq!(eval("true == 1"), "false");
    assert_eq!(eval("nil == false"), "false");
}

#[test]
fn test_compile_error_carries_line_and_lexeme() {
    let InterpretError::Compile(errors) = eval_err("1 +\n* 2") else {
        panic!("expected a compile error");
    };
    assert_eq!(
        errors[0].to_string(),
        "[line 2] Error at '*': Expect expression."
    );
}

#[test]
fn test_runtime_error_carries_line() {
    let InterpretError::Runtime(error) = eval_err("1 +\ntrue") else {
        panic!("expected a runtime error");
    };
    assert_eq!(error.to_string(), "[line 2] Operands must be numbers.");
}

#[test]
fn test_type_errors_surface_at_runtime_not_compile_time() {
    assert!(matches!(eval_err("-nil"), InterpretError::Runtime(_)));
    assert!(matches!(eval_err("true + false"), InterpretError::Runtime(_)));
}

#[test]
fn test_whitespace_and_comments_are_ignored() {
    assert_eq!(eval("1 + // a comment\n2"), "3");
    assert_eq!(eval("1 /* inline */ + 2"), "3");
}
