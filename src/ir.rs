use serde::Serialize;

use crate::span::Span;

/// A variable in the lowered program. Every binder and every reference to it
/// share one `id`; lowering introduces fresh unnamed identifiers when it
/// lifts groups out of calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub source: Span,
    /// False for compiler-introduced temporaries.
    pub named: bool,
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Atom {
    Reference { source: Span, id: u32 },
    String { source: Span, value: String },
    Number { source: Span, value: u64 },
    Builtin { source: Span, builtin: Builtin },
}

/// A procedure in continuation-passing style. `arguments[0]` is the
/// procedure's own name; the body is a single flat call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Procedure {
    pub source: Span,
    pub arguments: Vec<Identifier>,
    pub body: Vec<Atom>,
}

/// The fully lowered program: a flat list of procedures over the original
/// source text. No nesting remains; all closures are explicit procedures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub source: String,
    pub procedures: Vec<Procedure>,
}

impl Program {
    /// The source text a named identifier was written as, for diagnostics.
    pub fn resolve_name(&self, id: u32) -> Option<&str> {
        for proc in &self.procedures {
            for arg in &proc.arguments {
                if arg.id == id && arg.named {
                    return Some(&self.source[arg.source.start..arg.source.end]);
                }
            }
        }
        None
    }
}

/// Built-in procedures. Each takes its operands followed by one or more
/// continuations, in keeping with the calling convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Builtin {
    /// `print value k` — write the value and a newline, continue with `k`.
    Print,
    /// `add a b k` — call `k` with the sum.
    Add,
    /// `sub a b k` — call `k` with the difference, saturating at zero.
    Sub,
    /// `mul a b k` — call `k` with the product.
    Mul,
    /// `div a b k` — call `k` with the quotient.
    Div,
    /// `eq a b t f` — continue with `t` if equal, `f` otherwise.
    Eq,
    /// `exit` — halt the program.
    Exit,
}

impl Builtin {
    /// Looks up a builtin by name. Resolution runs first, so a user
    /// definition with the same name shadows the builtin.
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "print" => Some(Self::Print),
            "add" => Some(Self::Add),
            "sub" => Some(Self::Sub),
            "mul" => Some(Self::Mul),
            "div" => Some(Self::Div),
            "eq" => Some(Self::Eq),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Eq => "eq",
            Self::Exit => "exit",
        }
    }
}
