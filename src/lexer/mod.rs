pub mod token;

use logos::Logos;
use crate::span::{Span, Spanned};
use crate::diagnostics::CompileError;
use token::Token;

/// Tokenize Oluś source into a whitespace-free token stream with synthesized
/// `Indent`/`Dedent` tokens.
///
/// Indentation is tracked as a stack of prefixes: every entry must be a
/// prefix of the next, so tabs and spaces may be mixed but not interchanged.
/// Doing this during tokenizing keeps the grammar context-free.
pub fn lex(source: &str) -> Result<Vec<Spanned<Token>>, CompileError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    // The first entry is the empty indentation of the top-level block.
    let mut indentation: Vec<&str> = vec![&source[0..0]];

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(Token::Whitespace) => continue,
            Ok(Token::Newline) => {
                let (newline, indent) = split_indentation(lexer.slice());
                let newline_end = span.start + newline.len();
                tokens.push(Spanned::new(
                    Token::Newline,
                    Span::new(span.start, newline_end),
                ));

                let last = indentation.last().copied().unwrap_or("");
                let indent_span = Span::new(newline_end, span.end);
                if indent.len() > last.len() {
                    if !indent.starts_with(last) {
                        return Err(CompileError::syntax(
                            "inconsistent indentation",
                            indent_span,
                        ));
                    }
                    indentation.push(indent);
                    tokens.push(Spanned::new(Token::Indent, indent_span));
                } else if let Some(level) =
                    indentation.iter().rposition(|prefix| *prefix == indent)
                {
                    // Dedents get empty spans after the whitespace run.
                    for _ in 0..indentation.len() - level - 1 {
                        tokens.push(Spanned::new(
                            Token::Dedent,
                            Span::new(span.end, span.end),
                        ));
                    }
                    indentation.truncate(level + 1);
                } else {
                    return Err(CompileError::syntax(
                        "inconsistent indentation",
                        indent_span,
                    ));
                }
            }
            Ok(tok) => tokens.push(Spanned::new(tok, Span::new(span.start, span.end))),
            Err(()) => {
                let slice = &source[span.start..span.end];
                let msg = if slice.starts_with('“') {
                    "unterminated string literal".to_string()
                } else if slice.chars().all(|c| c.is_ascii_digit()) {
                    "number literal out of range".to_string()
                } else {
                    format!("unexpected character '{slice}'")
                };
                return Err(CompileError::syntax(msg, Span::new(span.start, span.end)));
            }
        }
    }

    // Close blocks left open at end of input.
    for _ in 0..indentation.len() - 1 {
        tokens.push(Spanned::new(
            Token::Dedent,
            Span::new(source.len(), source.len()),
        ));
    }

    Ok(tokens)
}

/// Splits a `Newline` run into the part ending at the last line break and the
/// trailing indentation of the next line.
fn split_indentation(run: &str) -> (&str, &str) {
    let mut split = 0;
    for (i, c) in run.char_indices() {
        if is_newline(c) {
            split = i + c.len_utf8();
        }
    }
    run.split_at(split)
}

/// Line breaks according to UAX31-R3a1.
const fn is_newline(c: char) -> bool {
    matches!(
        c as u32,
        0x000a | 0x000b | 0x000c | 0x000d | 0x0085 | 0x2028 | 0x2029
    )
}
