//! Smoke tests: the canonical sample program must make it through the whole
//! front end.

mod common;

const HELLO: &str = "main: print “Hello, World!” exit\n";

#[test]
fn can_load_grammar() {
    let module = olus::parse_module(HELLO).expect("Error loading Olus grammar");
    assert!(!module.lines.is_empty());
}

#[test]
fn can_compile_canonical_program() {
    let program = olus::compile(HELLO).expect("Error loading Olus grammar");
    assert!(!program.procedures.is_empty());
}

#[test]
fn can_run_canonical_program() {
    assert_eq!(common::run_source(HELLO), "Hello, World!\n");
}
