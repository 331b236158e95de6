mod common;
use common::*;

#[test]
fn test_forward_reference() {
    let source = "main: helper exit\nhelper k: print 7 k\n";
    assert_eq!(run_source(source), "7\n");
}

#[test]
fn test_backward_reference() {
    let source = "helper k: print 7 k\nmain: helper exit\n";
    assert_eq!(run_source(source), "7\n");
}

#[test]
fn test_nearest_preceding_binder_wins() {
    let source = "v k: print 1 k\nv k: print 2 k\nmain: v exit\n";
    assert_eq!(run_source(source), "2\n");
}

#[test]
fn test_definition_shadows_builtin() {
    let source = "print x k: k\nmain: print 42 (: exit)\n";
    assert_eq!(run_source(source), "");
}

#[test]
fn test_group_parameters_resolve_inside_group() {
    let source = "apply f k: f 5 k\nmain: apply (x k: mul x x k) print\n";
    assert_eq!(run_source(source), "25\n");
}

#[test]
fn test_parameter_visible_in_block() {
    let source = "show x:\n    print x exit\nmain:\nshow 3\n";
    assert_eq!(run_source(source), "3\n");
}

#[test]
fn test_unresolved_identifier() {
    compile_should_fail_with("main: frobnicate 1\n", "unresolved identifier 'frobnicate'");
}

#[test]
fn test_block_binders_are_private() {
    compile_should_fail_with(
        "main: inner exit\nouter:\n    inner k: print 1 k\n",
        "unresolved identifier 'inner'",
    );
}

#[test]
fn test_unbound_call_detected() {
    compile_should_fail_with("main: exit\nprint 1 exit\n", "not the body of any procedure");
}
