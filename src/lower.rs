//! Lowering from the syntax tree to continuation-passing style.
//!
//! Two passes. The first collects binders per block and resolves every
//! identifier reference to a binder id. The second flattens the tree into
//! [`Program`] form: groups are lifted into standalone procedures and call
//! groups are rewritten into explicit continuations.

use std::collections::{HashMap, HashSet};
use std::mem::{replace, swap};

use crate::diagnostics::CompileError;
use crate::ir::{Atom, Builtin, Identifier, Procedure, Program};
use crate::parser::ast::{Call, Def, Expr, Group, Line, Module, Stmt};
use crate::span::{Span, Spanned};

pub fn lower(source: &str, module: &Module) -> Result<Program, CompileError> {
    let mut lowerer = Lowerer::default();
    lowerer.resolve_block(&module.lines)?;
    lowerer.lower_block(&module.lines)?;
    Ok(Program {
        source: source.to_string(),
        procedures: lowerer.procedures,
    })
}

/// An intermediate expression while call and procedure groups still exist.
enum Expression {
    Atom(Atom),
    Procedure {
        source: Span,
        arguments: Vec<Identifier>,
        body: Vec<Expression>,
    },
    Call {
        source: Span,
        body: Vec<Expression>,
    },
}

impl Expression {
    const fn source(&self) -> Span {
        match self {
            Self::Atom(atom) => match atom {
                Atom::Reference { source, .. }
                | Atom::String { source, .. }
                | Atom::Number { source, .. }
                | Atom::Builtin { source, .. } => *source,
            },
            Self::Procedure { source, .. } | Self::Call { source, .. } => *source,
        }
    }
}

/// A binder occurrence within one block, in source order.
struct Binder {
    name: String,
    span: Span,
    id: u32,
}

#[derive(Default)]
struct Lowerer {
    next_id: u32,
    /// Binder span start -> variable id.
    binder_ids: HashMap<usize, u32>,
    /// Reference span start -> id of the binder it resolves to. Identifiers
    /// absent from this map fall through to the builtin table.
    resolved: HashMap<usize, u32>,
    /// Stack of enclosing block scopes during resolution.
    scopes: Vec<Vec<Binder>>,
    /// Span starts of call statements claimed as a procedure body.
    consumed: HashSet<usize>,
    procedures: Vec<Procedure>,
}

impl Lowerer {
    // ----- resolution -----

    fn resolve_block(&mut self, lines: &[Line]) -> Result<(), CompileError> {
        let binders = self.collect_binders(lines);
        self.scopes.push(binders);
        for line in lines {
            match &line.stmt.node {
                Stmt::Def(def) => {
                    if let Some(call) = &def.call {
                        self.resolve_call(call)?;
                    }
                }
                Stmt::Call(call) => self.resolve_call(call)?,
            }
            if let Some(block) = &line.block {
                self.resolve_block(block)?;
            }
        }
        self.scopes.pop();
        Ok(())
    }

    /// All binders of a block: the parameters of its defs, including the ones
    /// in groups. Groups are not scopes, so their parameters are visible to
    /// sibling statements; nested blocks keep theirs to themselves.
    fn collect_binders(&mut self, lines: &[Line]) -> Vec<Binder> {
        let mut binders = Vec::new();
        for line in lines {
            match &line.stmt.node {
                Stmt::Def(def) => self.collect_def(def, &mut binders),
                Stmt::Call(call) => self.collect_groups(call, &mut binders),
            }
        }
        binders
    }

    fn collect_def(&mut self, def: &Def, binders: &mut Vec<Binder>) {
        for param in &def.params {
            let id = self.fresh_id();
            self.binder_ids.insert(param.span.start, id);
            binders.push(Binder {
                name: param.node.clone(),
                span: param.span,
                id,
            });
        }
        if let Some(call) = &def.call {
            self.collect_groups(call, binders);
        }
    }

    fn collect_groups(&mut self, call: &Call, binders: &mut Vec<Binder>) {
        for arg in &call.args {
            if let Expr::Group(group) = &arg.node {
                match group.as_ref() {
                    Group::Def(def) => self.collect_def(def, binders),
                    Group::Call(inner) => self.collect_groups(inner, binders),
                }
            }
        }
    }

    fn resolve_call(&mut self, call: &Call) -> Result<(), CompileError> {
        for arg in &call.args {
            match &arg.node {
                Expr::Ident(name) => self.resolve_ident(name, arg.span)?,
                Expr::Group(group) => match group.as_ref() {
                    Group::Def(def) => {
                        if let Some(inner) = &def.call {
                            self.resolve_call(inner)?;
                        }
                    }
                    Group::Call(inner) => self.resolve_call(inner)?,
                },
                Expr::Number(_) | Expr::Str(_) => {}
            }
        }
        Ok(())
    }

    /// Resolves a reference: the nearest preceding binder with the same text
    /// in the innermost block, then the nearest following one, then outward
    /// through the enclosing blocks. Definitions shadow builtins.
    fn resolve_ident(&mut self, name: &str, span: Span) -> Result<(), CompileError> {
        for scope in self.scopes.iter().rev() {
            let preceding = scope
                .iter()
                .filter(|b| b.name == name && b.span.start < span.start)
                .max_by_key(|b| b.span.start);
            let found = preceding.or_else(|| {
                scope
                    .iter()
                    .filter(|b| b.name == name && b.span.start > span.start)
                    .min_by_key(|b| b.span.start)
            });
            if let Some(binder) = found {
                self.resolved.insert(span.start, binder.id);
                return Ok(());
            }
        }
        if Builtin::lookup(name).is_some() {
            return Ok(());
        }
        Err(CompileError::resolve(
            format!("unresolved identifier '{name}'"),
            span,
        ))
    }

    // ----- flattening -----

    fn lower_block(&mut self, lines: &[Line]) -> Result<(), CompileError> {
        for (i, line) in lines.iter().enumerate() {
            match &line.stmt.node {
                Stmt::Def(def) => {
                    let arguments = def.params.iter().map(|p| self.binder(p)).collect();
                    let body = self.lower_body(def, line.stmt.span, lines, i)?;
                    self.procedures.push(Procedure {
                        source: line.stmt.span,
                        arguments,
                        body,
                    });
                }
                Stmt::Call(_) => {
                    if !self.consumed.contains(&line.stmt.span.start) {
                        return Err(CompileError::syntax(
                            "call is not the body of any procedure",
                            line.stmt.span,
                        ));
                    }
                }
            }
            if let Some(block) = &line.block {
                self.lower_block(block)?;
            }
        }
        Ok(())
    }

    /// The body of a definition: its immediate call, the first line of the
    /// attached block, or the next statement in the block.
    fn lower_body(
        &mut self,
        def: &Def,
        span: Span,
        lines: &[Line],
        at: usize,
    ) -> Result<Vec<Atom>, CompileError> {
        let (call, lines, at) = match &def.call {
            Some(call) => (call, lines, at),
            None => self
                .claim_attachment(lines, at)
                .ok_or_else(|| CompileError::syntax("procedure has no body", span))?,
        };
        let body = call
            .args
            .iter()
            .map(|arg| self.lower_expr(arg, lines, at))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.compile_call(body))
    }

    /// Claims the call statement following line `at` as a procedure body and
    /// marks it consumed. Returns the call along with its own position, so
    /// body-less groups inside it can chain further.
    fn claim_attachment<'m>(
        &mut self,
        lines: &'m [Line],
        at: usize,
    ) -> Option<(&'m Call, &'m [Line], usize)> {
        let (line, lines, at) = if let Some(block) = &lines[at].block {
            (block.first()?, block.as_slice(), 0)
        } else {
            (lines.get(at + 1)?, lines, at + 1)
        };
        match &line.stmt.node {
            Stmt::Call(call) => {
                self.consumed.insert(line.stmt.span.start);
                Some((call, lines, at))
            }
            Stmt::Def(_) => None,
        }
    }

    fn lower_expr(
        &mut self,
        arg: &Spanned<Expr>,
        lines: &[Line],
        at: usize,
    ) -> Result<Expression, CompileError> {
        match &arg.node {
            Expr::Ident(name) => {
                if let Some(&id) = self.resolved.get(&arg.span.start) {
                    Ok(Expression::Atom(Atom::Reference {
                        source: arg.span,
                        id,
                    }))
                } else if let Some(builtin) = Builtin::lookup(name) {
                    Ok(Expression::Atom(Atom::Builtin {
                        source: arg.span,
                        builtin,
                    }))
                } else {
                    Err(CompileError::resolve(
                        format!("unresolved identifier '{name}'"),
                        arg.span,
                    ))
                }
            }
            Expr::Number(value) => Ok(Expression::Atom(Atom::Number {
                source: arg.span,
                value: *value,
            })),
            Expr::Str(value) => Ok(Expression::Atom(Atom::String {
                source: arg.span,
                value: value.clone(),
            })),
            Expr::Group(group) => match group.as_ref() {
                Group::Def(def) => {
                    let arguments = def.params.iter().map(|p| self.binder(p)).collect();
                    let (call, lines, at) = match &def.call {
                        Some(call) => (call, lines, at),
                        None => self.claim_attachment(lines, at).ok_or_else(|| {
                            CompileError::syntax("procedure has no body", arg.span)
                        })?,
                    };
                    let body = call
                        .args
                        .iter()
                        .map(|a| self.lower_expr(a, lines, at))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Expression::Procedure {
                        source: arg.span,
                        arguments,
                        body,
                    })
                }
                Group::Call(call) => {
                    let body = call
                        .args
                        .iter()
                        .map(|a| self.lower_expr(a, lines, at))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Expression::Call {
                        source: arg.span,
                        body,
                    })
                }
            },
        }
    }

    /// Flattens a call of expressions into a call of atoms, lifting groups
    /// out into standalone procedures.
    fn compile_call(&mut self, mut expr: Vec<Expression>) -> Vec<Atom> {
        // First eliminate call groups by turning each into a procedure group:
        // the inner call becomes the body of this procedure, and what was
        // here continues as an appended continuation taking the result.
        while let Some(call) = expr
            .iter()
            .position(|e| matches!(e, Expression::Call { .. }))
        {
            let source = expr[call].source();
            let (definition, reference) = self.fresh_variable(false, source);

            let call = replace(&mut expr[call], Expression::Atom(reference));
            let Expression::Call { mut body, .. } = call else {
                unreachable!()
            };

            swap(&mut body, &mut expr);

            expr.push(Expression::Procedure {
                source,
                arguments: vec![definition],
                body,
            });
        }

        // Then name the procedure groups and lift them out. The fresh
        // identifier in front is the anonymous procedure's own name.
        expr.into_iter()
            .map(|e| match e {
                Expression::Atom(atom) => atom,
                Expression::Procedure {
                    source,
                    mut arguments,
                    body,
                } => {
                    let (definition, reference) = self.fresh_variable(false, source);
                    arguments.insert(0, definition);
                    let body = self.compile_call(body);
                    self.procedures.push(Procedure {
                        source,
                        arguments,
                        body,
                    });
                    let Atom::Reference { source, id } = reference else {
                        unreachable!()
                    };
                    Atom::Reference { source, id }
                }
                Expression::Call { .. } => unreachable!(),
            })
            .collect()
    }

    // ----- identifiers -----

    fn fresh_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn fresh_variable(&mut self, named: bool, source: Span) -> (Identifier, Atom) {
        let id = self.fresh_id();
        (
            Identifier { source, named, id },
            Atom::Reference { source, id },
        )
    }

    fn binder(&mut self, param: &Spanned<String>) -> Identifier {
        match self.binder_ids.get(&param.span.start).copied() {
            Some(id) => Identifier {
                source: param.span,
                named: true,
                id,
            },
            None => self.fresh_variable(true, param.span).0,
        }
    }
}
