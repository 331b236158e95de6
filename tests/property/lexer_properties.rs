// Property-based tests for the lexer: invariants that must hold for ANY
// input, not just hand-picked examples.

use olus::lexer::{lex, token::Token};
use proptest::prelude::*;

// =============================================================================
// SECTION 1: BASIC PROPERTIES - Safety & Determinism
// =============================================================================

/// Property: Lexer NEVER panics, even on garbage input
///
/// It should handle ANY string gracefully, returning either Ok (valid
/// tokens) or Err (syntax error), but never panic.
#[test]
fn prop_lexer_never_panics() {
    proptest!(|(source in "\\PC{0,1000}")| {
        let _result = lex(&source);
    });
}

/// Property: Lexing is deterministic
#[test]
fn prop_lexing_is_deterministic() {
    proptest!(|(source in "\\PC{0,500}")| {
        let result1 = lex(&source);
        let result2 = lex(&source);

        assert_eq!(result1.is_ok(), result2.is_ok());

        if let (Ok(tokens1), Ok(tokens2)) = (result1, result2) {
            assert_eq!(tokens1.len(), tokens2.len());
            for (t1, t2) in tokens1.iter().zip(tokens2.iter()) {
                assert_eq!(t1.node, t2.node);
                assert_eq!(t1.span, t2.span);
            }
        }
    });
}

/// Property: Empty input produces empty token stream
#[test]
fn prop_empty_input_is_valid() {
    let result = lex("");
    assert!(result.is_ok());
    assert_eq!(result.unwrap().len(), 0);
}

// =============================================================================
// SECTION 2: STRUCTURAL PROPERTIES - Spans & Indentation
// =============================================================================

/// Property: Token spans never overlap and never run backwards.
///
/// `Dedent` tokens are synthesized with empty spans, so start == end is
/// legal; everything else must make forward progress.
#[test]
fn prop_spans_are_ordered() {
    proptest!(|(source in "\\PC{0,500}")| {
        if let Ok(tokens) = lex(&source) {
            for i in 0..tokens.len().saturating_sub(1) {
                prop_assert!(
                    tokens[i].span.end <= tokens[i + 1].span.start,
                    "Overlapping spans: token {} ends at {}, token {} starts at {}",
                    i, tokens[i].span.end, i + 1, tokens[i + 1].span.start
                );
            }
        }
    });
}

/// Property: All spans are within source bounds and UTF-8 aligned
#[test]
fn prop_spans_within_bounds() {
    proptest!(|(source in "\\PC{0,500}")| {
        if let Ok(tokens) = lex(&source) {
            for (i, token) in tokens.iter().enumerate() {
                prop_assert!(
                    token.span.start <= token.span.end,
                    "Token {} has a backwards span", i
                );
                prop_assert!(
                    token.span.end <= source.len(),
                    "Token {} span.end ({}) exceeds source length ({})",
                    i, token.span.end, source.len()
                );
                prop_assert!(source.is_char_boundary(token.span.start));
                prop_assert!(source.is_char_boundary(token.span.end));
            }
        }
    });
}

/// Property: Indent and Dedent tokens always balance
///
/// Every opened block is closed, at a dedent or at end of input.
#[test]
fn prop_indentation_balances() {
    proptest!(|(source in "\\PC{0,500}")| {
        if let Ok(tokens) = lex(&source) {
            let mut depth = 0i64;
            for token in &tokens {
                match token.node {
                    Token::Indent => depth += 1,
                    Token::Dedent => depth -= 1,
                    _ => {}
                }
                prop_assert!(depth >= 0, "Dedent without a matching Indent");
            }
            prop_assert_eq!(depth, 0, "Unclosed Indent at end of input");
        }
    });
}

// =============================================================================
// SECTION 3: SEMANTIC PROPERTIES - Valid Syntax Always Works
// =============================================================================

/// Custom generator: ASCII identifiers (no underscore; Oluś identifiers
/// follow XID_Start, which excludes it)
fn valid_identifiers() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9]{0,30}").expect("valid regex")
}

/// Property: All valid identifiers lex to a single Ident token
#[test]
fn prop_valid_identifiers_always_lex() {
    proptest!(|(ident in valid_identifiers())| {
        let result = lex(&ident);
        prop_assert!(result.is_ok(), "Failed to lex identifier: {}", ident);

        let tokens = result.unwrap();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert!(matches!(tokens[0].node, Token::Ident));
    });
}

/// Property: All u64 literals lex to a single Number token
#[test]
fn prop_valid_numbers_always_lex(){
    proptest!(|(n in any::<u64>())| {
        let source = n.to_string();
        let result = lex(&source);
        prop_assert!(result.is_ok(), "Failed to lex number: {}", source);

        let tokens = result.unwrap();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert!(matches!(tokens[0].node, Token::Number(m) if m == n));
    });
}

/// Property: Quoted text without inner quotes lexes to a single Str token
#[test]
fn prop_valid_strings_always_lex() {
    proptest!(|(text in "[a-zA-Z0-9 ,.:;!?()]{0,80}")| {
        let source = format!("“{text}”");
        let result = lex(&source);
        prop_assert!(result.is_ok(), "Failed to lex string: {}", source);

        let tokens = result.unwrap();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert!(matches!(&tokens[0].node, Token::Str(s) if *s == text));
    });
}

/// Custom generator: simple one-line statements
fn simple_statements() -> impl Strategy<Value = String> {
    (
        valid_identifiers(),
        prop::collection::vec(valid_identifiers(), 0..4),
    )
        .prop_map(|(name, params)| {
            let mut line = name;
            for p in params {
                line.push(' ');
                line.push_str(&p);
            }
            line.push_str(": exit\n");
            line
        })
}

/// Property: Generated definitions lex without error and end in a Newline
#[test]
fn prop_simple_statements_lex() {
    proptest!(|(stmt in simple_statements())| {
        let result = lex(&stmt);
        prop_assert!(result.is_ok(), "Failed to lex statement: {}", stmt);

        let tokens = result.unwrap();
        prop_assert!(matches!(tokens.last().map(|t| &t.node), Some(Token::Newline)));
        prop_assert!(tokens.iter().any(|t| matches!(t.node, Token::Colon)));
    });
}

// =============================================================================
// SECTION 4: NEGATIVE PROPERTIES - Invalid Input Should Fail
// =============================================================================

/// Property: Unterminated strings always fail to lex
#[test]
fn prop_unterminated_strings_fail() {
    proptest!(|(text in "[a-zA-Z0-9 ]{0,40}")| {
        let source = format!("“{text}");
        let result = lex(&source);
        prop_assert!(result.is_err(), "Should reject unterminated string: {}", source);
    });
}

/// Property: Numbers beyond u64 range always fail to lex
#[test]
fn prop_out_of_range_numbers_fail() {
    proptest!(|(digits in "[1-9][0-9]{20,30}")| {
        let result = lex(&digits);
        prop_assert!(result.is_err(), "Should reject oversized number: {}", digits);
    });
}
