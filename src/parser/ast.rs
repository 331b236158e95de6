use crate::span::{Span, Spanned};

/// A parsed Oluś source file: a sequence of lines at indentation level zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub lines: Vec<Line>,
}

/// One statement together with the indented block attached below it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub stmt: Spanned<Stmt>,
    pub block: Option<Vec<Line>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Def(Def),
    Call(Call),
}

/// A procedure definition: `name params… : call?`.
///
/// `params[0]` is the procedure's name; every identifier left of the colon is
/// a binder. The body call may be omitted here and supplied by the following
/// statement or the attached block (resolved during lowering).
#[derive(Debug, Clone, PartialEq)]
pub struct Def {
    pub params: Vec<Spanned<String>>,
    pub call: Option<Call>,
}

/// A call: callee followed by its arguments, all expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub args: Vec<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Number(u64),
    Str(String),
    Group(Box<Group>),
}

/// A parenthesized group: either an anonymous procedure or a nested call.
#[derive(Debug, Clone, PartialEq)]
pub enum Group {
    /// `(params… : call)` — unlike top-level defs, the parameter list may be
    /// empty (an anonymous continuation).
    Def(Def),
    Call(Call),
}

impl Call {
    pub fn span(&self) -> Span {
        match (self.args.first(), self.args.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::dummy(),
        }
    }
}
