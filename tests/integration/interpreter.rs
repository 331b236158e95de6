mod common;
use common::*;

#[test]
fn test_continuation_receives_result() {
    assert_eq!(run_source("main: add 40 2 print\n"), "42\n");
}

#[test]
fn test_closure_captures_environment() {
    let source = "make x k: k (j: print x j)\nmain: make 9 (show: show exit)\n";
    assert_eq!(run_source(source), "9\n");
}

#[test]
fn test_mutual_recursion() {
    let source = "even n:\n    eq n 0 yes (: sub n 1 (m: odd m))\n    yes: print “even” exit\nodd n:\n    eq n 0 no (: sub n 1 (m: even m))\n    no: print “odd” exit\nmain: even 4\n";
    assert_eq!(run_source(source), "even\n");
}

#[test]
fn test_sub_saturates_at_zero() {
    assert_eq!(run_source("main: print (sub 1 5)\n"), "0\n");
}

#[test]
fn test_division_by_zero() {
    run_should_fail_with("main: print (div 1 0)\n", "division by zero");
}

#[test]
fn test_arithmetic_overflow() {
    run_should_fail_with(
        "main: print (mul 18446744073709551615 2)\n",
        "arithmetic overflow",
    );
}

#[test]
fn test_calling_a_number() {
    run_should_fail_with("main: 42 exit\n", "cannot call");
}

#[test]
fn test_printing_a_procedure() {
    run_should_fail_with("main: print print exit\n", "cannot print a procedure");
}

#[test]
fn test_eq_type_mismatch() {
    run_should_fail_with(
        "main: eq 1 “1” (: exit) (: exit)\n",
        "compares numbers and strings only",
    );
}

#[test]
fn test_missing_main() {
    run_should_fail_with("helper k: print 1 k\n", "no 'main' procedure");
}

#[test]
fn test_main_with_parameters() {
    run_should_fail_with("main x: print x exit\n", "must not take parameters");
}

#[test]
fn test_wrong_arity() {
    run_should_fail_with(
        "pair a b k: k\nmain: pair 1 (: exit)\n",
        "expects 3 arguments, got 2",
    );
}

#[test]
fn test_sibling_parameter_is_unbound_at_runtime() {
    // `y` resolves to a sibling procedure's parameter, which has no value here.
    run_should_fail_with(
        "f k: print y k\ng y: exit\nmain: f exit\n",
        "unbound variable 'y'",
    );
}
