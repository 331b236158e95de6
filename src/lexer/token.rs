use logos::Logos;

/// Lexical tokens for Oluś source text.
///
/// Whitespace handling follows UAX31: `Newline` matches any whitespace run
/// containing a line break (UAX31-R3a1), and carries the indentation of the
/// following line in its trailing characters. `Indent` and `Dedent` are never
/// produced by logos; `lex` synthesizes them from `Newline` runs.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    /// White space without line breaks.
    /// See <https://www.unicode.org/reports/tr31/#R3a-1>
    #[regex(
        r"[\p{Pattern_White_Space}--\u000a\u000b\u000c\u000d\u0085\u2028\u2029]+",
        priority = 1
    )]
    Whitespace,

    /// White space containing at least one line break. Runs without a break
    /// are caught by `Whitespace`, which wins ties on priority.
    #[regex(r"[\p{Pattern_White_Space}]+", priority = 0)]
    Newline,

    #[token(":")]
    Colon,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,

    /// Identifiers and symbols. Oluś has no operators: a lone syntax
    /// character is an ordinary identifier.
    /// See <https://www.unicode.org/reports/tr31>
    #[regex(r"\p{XID_Start}\p{XID_Continue}*|\p{Pattern_Syntax}", priority = 0)]
    Ident,

    /// String literal delimited by mirrored quotes `“` and `”`. Nested pairs
    /// are balanced and kept verbatim; the payload is the inner text.
    #[token("“", lex_string)]
    Str(String),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    Number(u64),

    // Synthesized by the indentation pass.
    Indent,
    Dedent,
}

/// Matches the rest of a string literal, tracking nesting depth.
fn lex_string(lexer: &mut logos::Lexer<Token>) -> Option<String> {
    let remainder = lexer.remainder();
    let mut nesting = 1usize;
    for (i, c) in remainder.char_indices() {
        match c {
            '“' => nesting += 1,
            '”' => {
                nesting -= 1;
                if nesting == 0 {
                    let inner = remainder[..i].to_string();
                    lexer.bump(i + '”'.len_utf8());
                    return Some(inner);
                }
            }
            _ => {}
        }
    }
    // Unterminated string literal.
    None
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Whitespace => write!(f, "whitespace"),
            Token::Newline => write!(f, "newline"),
            Token::Colon => write!(f, "':'"),
            Token::ParenOpen => write!(f, "'('"),
            Token::ParenClose => write!(f, "')'"),
            Token::Ident => write!(f, "identifier"),
            Token::Str(s) => write!(f, "“{s}”"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Indent => write!(f, "indentation"),
            Token::Dedent => write!(f, "end of block"),
        }
    }
}
