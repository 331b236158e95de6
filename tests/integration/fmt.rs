mod common;

fn fmt(source: &str) -> String {
    olus::format_source(source).expect("formatting failed")
}

#[test]
fn test_canonical_source_is_unchanged() {
    let source = "main:\n    print 1 done\n    done: exit\n";
    assert_eq!(fmt(source), source);
}

#[test]
fn test_formatting_is_idempotent() {
    let source = "main:   print   (add 1   2)\n\n\nother k:  k\n";
    let once = fmt(&fmt(source));
    assert_eq!(fmt(source), once);
}

#[test]
fn test_reindents_blocks() {
    let source = "main:\n  print 1 done\n  done: exit\n";
    assert_eq!(fmt(source), "main:\n    print 1 done\n    done: exit\n");
}

#[test]
fn test_formatted_program_behaves_the_same() {
    let source = "count n:\n  eq n 0 done loop\n  loop: print n next\n  next: sub n 1 (m: count m)\n  done: print “done” exit\nmain: count 2\n";
    let formatted = fmt(source);
    assert_eq!(common::run_source(source), common::run_source(&formatted));
}

#[test]
fn test_format_rejects_invalid_source() {
    assert!(olus::format_source("main: (\n").is_err());
}
