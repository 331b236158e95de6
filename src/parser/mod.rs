pub mod ast;

use crate::diagnostics::CompileError;
use crate::lexer::token::Token;
use crate::span::{Span, Spanned};
use ast::*;

/// Recursive-descent parser over the lexed token stream.
///
/// Newlines terminate statements; `Indent`/`Dedent` delimit blocks. End of
/// input also terminates a statement, so a missing trailing newline is fine.
pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str) -> Self {
        Self { tokens, source, pos: 0 }
    }

    fn peek(&self) -> Option<&Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Spanned<Token>> {
        if self.pos < self.tokens.len() {
            let tok = &self.tokens[self.pos];
            self.pos += 1;
            Some(tok)
        } else {
            None
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<&Spanned<Token>, CompileError> {
        match self.tokens.get(self.pos) {
            Some(tok) if std::mem::discriminant(&tok.node) == std::mem::discriminant(expected) => {
                self.pos += 1;
                Ok(&self.tokens[self.pos - 1])
            }
            Some(tok) => Err(CompileError::syntax(
                format!("expected {expected}, found {}", tok.node),
                tok.span,
            )),
            None => Err(CompileError::syntax(
                format!("expected {expected}, found end of file"),
                self.eof_span(),
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>, CompileError> {
        match self.tokens.get(self.pos) {
            Some(tok) if matches!(tok.node, Token::Ident) => {
                let name = self.source[tok.span.start..tok.span.end].to_string();
                self.pos += 1;
                Ok(Spanned::new(name, tok.span))
            }
            Some(tok) => Err(CompileError::syntax(
                format!("expected identifier, found {}", tok.node),
                tok.span,
            )),
            None => Err(CompileError::syntax(
                "expected identifier, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn eof_span(&self) -> Span {
        if let Some(last) = self.tokens.last() {
            Span::new(last.span.end, last.span.end)
        } else {
            Span::dummy()
        }
    }

    fn prev_end(&self) -> usize {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span.end
        } else {
            0
        }
    }

    /// Lookahead: one or more identifiers followed by a colon.
    fn at_def(&self) -> bool {
        let mut i = self.pos;
        while matches!(self.tokens.get(i).map(|t| &t.node), Some(Token::Ident)) {
            i += 1;
        }
        i > self.pos && matches!(self.tokens.get(i).map(|t| &t.node), Some(Token::Colon))
    }

    /// Lookahead inside parentheses: zero or more identifiers then a colon.
    fn at_group_def(&self) -> bool {
        let mut i = self.pos;
        while matches!(self.tokens.get(i).map(|t| &t.node), Some(Token::Ident)) {
            i += 1;
        }
        matches!(self.tokens.get(i).map(|t| &t.node), Some(Token::Colon))
    }

    fn at_expr(&self) -> bool {
        matches!(
            self.peek().map(|t| &t.node),
            Some(Token::Ident | Token::Number(_) | Token::Str(_) | Token::ParenOpen)
        )
    }

    pub fn parse_module(&mut self) -> Result<Module, CompileError> {
        let mut lines = Vec::new();
        // Leading blank lines.
        while matches!(self.peek().map(|t| &t.node), Some(Token::Newline)) {
            self.advance();
        }
        while self.peek().is_some() {
            lines.push(self.parse_line()?);
        }
        Ok(Module { lines })
    }

    fn parse_line(&mut self) -> Result<Line, CompileError> {
        let stmt = self.parse_statement()?;

        match self.tokens.get(self.pos) {
            None | Some(Spanned { node: Token::Dedent, .. }) => {}
            Some(Spanned { node: Token::Newline, .. }) => {
                self.pos += 1;
            }
            Some(tok) => {
                return Err(CompileError::syntax(
                    format!("expected newline, found {}", tok.node),
                    tok.span,
                ));
            }
        }

        let block = if matches!(self.peek().map(|t| &t.node), Some(Token::Indent)) {
            self.advance();
            let mut lines = Vec::new();
            loop {
                match self.peek().map(|t| &t.node) {
                    Some(Token::Dedent) => {
                        self.advance();
                        break;
                    }
                    None => break,
                    _ => lines.push(self.parse_line()?),
                }
            }
            Some(lines)
        } else {
            None
        };

        Ok(Line { stmt, block })
    }

    fn parse_statement(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = match self.peek() {
            Some(tok) => tok.span.start,
            None => {
                return Err(CompileError::syntax(
                    "expected statement, found end of file",
                    self.eof_span(),
                ));
            }
        };
        if self.at_def() {
            let def = self.parse_def()?;
            let span = Span::new(start, self.prev_end());
            Ok(Spanned::new(Stmt::Def(def), span))
        } else {
            let call = self.parse_call()?;
            let span = Span::new(start, self.prev_end());
            Ok(Spanned::new(Stmt::Call(call), span))
        }
    }

    /// `def := ident+ ':' [call]` — the trailing call ends at the newline.
    fn parse_def(&mut self) -> Result<Def, CompileError> {
        let mut params = Vec::new();
        while matches!(self.peek().map(|t| &t.node), Some(Token::Ident)) {
            params.push(self.expect_ident()?);
        }
        self.expect(&Token::Colon)?;
        let call = if self.at_expr() {
            Some(self.parse_call()?)
        } else {
            None
        };
        Ok(Def { params, call })
    }

    fn parse_call(&mut self) -> Result<Call, CompileError> {
        let mut args = vec![self.parse_expr()?];
        while self.at_expr() {
            args.push(self.parse_expr()?);
        }
        Ok(Call { args })
    }

    fn parse_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        match self.tokens.get(self.pos) {
            Some(tok) => match &tok.node {
                Token::Ident => {
                    let name = self.source[tok.span.start..tok.span.end].to_string();
                    let span = tok.span;
                    self.pos += 1;
                    Ok(Spanned::new(Expr::Ident(name), span))
                }
                Token::Number(n) => {
                    let (n, span) = (*n, tok.span);
                    self.pos += 1;
                    Ok(Spanned::new(Expr::Number(n), span))
                }
                Token::Str(s) => {
                    let (s, span) = (s.clone(), tok.span);
                    self.pos += 1;
                    Ok(Spanned::new(Expr::Str(s), span))
                }
                Token::ParenOpen => self.parse_group(),
                other => Err(CompileError::syntax(
                    format!("expected expression, found {other}"),
                    tok.span,
                )),
            },
            None => Err(CompileError::syntax(
                "expected expression, found end of file",
                self.eof_span(),
            )),
        }
    }

    /// `group := '(' (group_def | call) ')'` — no newlines inside.
    fn parse_group(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let open = self.expect(&Token::ParenOpen)?.span;
        let group = if self.at_group_def() {
            let mut params = Vec::new();
            while matches!(self.peek().map(|t| &t.node), Some(Token::Ident)) {
                params.push(self.expect_ident()?);
            }
            self.expect(&Token::Colon)?;
            let call = if self.at_expr() {
                Some(self.parse_call()?)
            } else {
                None
            };
            Group::Def(Def { params, call })
        } else {
            Group::Call(self.parse_call()?)
        };
        let close = self.expect(&Token::ParenClose)?.span;
        Ok(Spanned::new(
            Expr::Group(Box::new(group)),
            open.merge(close),
        ))
    }
}
