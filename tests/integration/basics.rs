mod common;
use common::*;

#[test]
fn test_print_number() {
    assert_eq!(run_source("main: print 42 exit\n"), "42\n");
}

#[test]
fn test_print_string() {
    assert_eq!(
        run_source("main: print “Hello, World!” exit\n"),
        "Hello, World!\n"
    );
}

#[test]
fn test_arithmetic() {
    assert_eq!(run_source("main: print (add 40 2)\n"), "42\n");
    assert_eq!(run_source("main: print (sub 50 8)\n"), "42\n");
    assert_eq!(run_source("main: print (mul 6 7)\n"), "42\n");
    assert_eq!(run_source("main: print (div 84 2)\n"), "42\n");
}

#[test]
fn test_nested_call_groups() {
    assert_eq!(run_source("main: print (add (mul 4 10) 2)\n"), "42\n");
}

#[test]
fn test_user_procedure() {
    let source = "double x k: add x x k\nmain: double 21 print\n";
    assert_eq!(run_source(source), "42\n");
}

#[test]
fn test_higher_order_procedure() {
    let source = "twice f k: f 21 k\nmain: twice (x k: add x x k) print\n";
    assert_eq!(run_source(source), "42\n");
}

#[test]
fn test_branching() {
    let source = "main: eq 1 1 (: print “yes” exit) (: print “no” exit)\n";
    assert_eq!(run_source(source), "yes\n");
    let source = "main: eq 1 2 (: print “yes” exit) (: print “no” exit)\n";
    assert_eq!(run_source(source), "no\n");
}

#[test]
fn test_countdown() {
    let source = "count n:\n    eq n 0 done loop\n    loop: print n next\n    next: sub n 1 (m: count m)\n    done: print “done” exit\nmain: count 3\n";
    assert_eq!(run_source(source), "3\n2\n1\ndone\n");
}

#[test]
fn test_multiple_prints() {
    let source = "main:\n    print 1 a\n    a: print 2 b\n    b: print 3 exit\n";
    assert_eq!(run_source(source), "1\n2\n3\n");
}

#[test]
fn test_symbol_identifiers() {
    // Syntax characters are ordinary identifiers.
    let source = "+ x y k: add x y k\nmain: + 40 2 print\n";
    assert_eq!(run_source(source), "42\n");
}

#[test]
fn test_unicode_identifiers() {
    let source = "näpärä k: print 42 k\nmain: näpärä exit\n";
    assert_eq!(run_source(source), "42\n");
}

#[test]
fn test_syntax_error_reported() {
    compile_should_fail_with("main: print (add 1 2\n", "Syntax error");
}

#[test]
fn test_missing_body_reported() {
    compile_should_fail_with("main:\n", "procedure has no body");
}
