//! A small trampolined interpreter for lowered programs.
//!
//! Execution state is just the current call: a vector of values whose first
//! element is the callee. Procedures never return; each step replaces the
//! call with the next one until a builtin halts the program by leaving it
//! empty.

use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::diagnostics::CompileError;
use crate::ir::{Atom, Builtin, Procedure, Program};

#[derive(Debug, Clone)]
pub enum Value {
    Number(u64),
    Str(String),
    Closure(Rc<ClosureData>),
    Builtin(Builtin),
}

#[derive(Debug)]
pub struct ClosureData {
    /// Index into the program's procedures.
    proc: usize,
    /// Captured bindings at the point the procedure was referenced.
    env: Env,
}

type Env = HashMap<u32, Value>;

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Closure(_) | Value::Builtin(_) => write!(f, "<procedure>"),
        }
    }
}

pub struct Interpreter<'a, W> {
    program: &'a Program,
    /// Procedure name id -> index, for lazy closure creation.
    by_name: HashMap<u32, usize>,
    out: &'a mut W,
}

/// Runs the program's `main` procedure, writing output to `out`.
pub fn run(program: &Program, out: &mut impl Write) -> Result<(), CompileError> {
    Interpreter::new(program, out)?.run()
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(program: &'a Program, out: &'a mut W) -> Result<Self, CompileError> {
        let by_name = program
            .procedures
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.arguments.first().map(|a| (a.id, i)))
            .collect();
        Ok(Self {
            program,
            by_name,
            out,
        })
    }

    pub fn run(&mut self) -> Result<(), CompileError> {
        let main = self
            .program
            .procedures
            .iter()
            .position(|p| {
                p.arguments
                    .first()
                    .is_some_and(|a| self.program.resolve_name(a.id) == Some("main"))
            })
            .ok_or_else(|| CompileError::runtime("program has no 'main' procedure"))?;
        if self.program.procedures[main].arguments.len() != 1 {
            return Err(CompileError::runtime(
                "'main' must not take parameters",
            ));
        }

        let mut values = vec![Value::Closure(Rc::new(ClosureData {
            proc: main,
            env: Env::new(),
        }))];

        // An empty call means a builtin halted the program.
        while let Some(callee) = values.first().cloned() {
            values = match callee {
                Value::Closure(closure) => self.enter(&closure, values)?,
                Value::Builtin(builtin) => self.apply(builtin, values)?,
                Value::Number(_) | Value::Str(_) => {
                    return Err(CompileError::runtime(format!(
                        "cannot call the value {callee}"
                    )));
                }
            };
        }
        Ok(())
    }

    /// Binds the call's values to the procedure's arguments, the callee
    /// itself included, and evaluates the body into the next call.
    fn enter(
        &mut self,
        closure: &ClosureData,
        values: Vec<Value>,
    ) -> Result<Vec<Value>, CompileError> {
        let proc = &self.program.procedures[closure.proc];
        if values.len() != proc.arguments.len() {
            return Err(CompileError::runtime(format!(
                "'{}' expects {} arguments, got {}",
                self.name_of(proc),
                proc.arguments.len() - 1,
                values.len() - 1
            )));
        }
        let mut env = closure.env.clone();
        for (argument, value) in proc.arguments.iter().zip(values) {
            env.insert(argument.id, value);
        }
        proc.body
            .iter()
            .map(|atom| self.eval(atom, &env))
            .collect()
    }

    fn eval(&self, atom: &Atom, env: &Env) -> Result<Value, CompileError> {
        match atom {
            Atom::Number { value, .. } => Ok(Value::Number(*value)),
            Atom::String { value, .. } => Ok(Value::Str(value.clone())),
            Atom::Builtin { builtin, .. } => Ok(Value::Builtin(*builtin)),
            Atom::Reference { id, .. } => {
                if let Some(value) = env.get(id) {
                    Ok(value.clone())
                } else if let Some(&proc) = self.by_name.get(id) {
                    // Capture the environment at the point of reference.
                    Ok(Value::Closure(Rc::new(ClosureData {
                        proc,
                        env: env.clone(),
                    })))
                } else {
                    let name = self.program.resolve_name(*id).unwrap_or("<anonymous>");
                    Err(CompileError::runtime(format!(
                        "use of unbound variable '{name}'"
                    )))
                }
            }
        }
    }

    fn apply(&mut self, builtin: Builtin, values: Vec<Value>) -> Result<Vec<Value>, CompileError> {
        match builtin {
            Builtin::Print => {
                let [_, value, rest @ ..] = values.as_slice() else {
                    return Err(self.arity_error(builtin, "a value and a continuation"));
                };
                match value {
                    Value::Number(_) | Value::Str(_) => {
                        writeln!(self.out, "{value}")
                            .map_err(|e| CompileError::io(e.to_string()))?;
                    }
                    Value::Closure(_) | Value::Builtin(_) => {
                        return Err(CompileError::runtime("cannot print a procedure"));
                    }
                }
                Ok(rest.to_vec())
            }
            Builtin::Add | Builtin::Sub | Builtin::Mul | Builtin::Div => {
                let [_, a, b, k] = values.as_slice() else {
                    return Err(self.arity_error(builtin, "two numbers and a continuation"));
                };
                let (Value::Number(a), Value::Number(b)) = (a, b) else {
                    return Err(CompileError::runtime(format!(
                        "'{}' requires number arguments",
                        builtin.name()
                    )));
                };
                let result = match builtin {
                    Builtin::Add => a
                        .checked_add(*b)
                        .ok_or_else(|| CompileError::runtime("arithmetic overflow"))?,
                    Builtin::Sub => a.saturating_sub(*b),
                    Builtin::Mul => a
                        .checked_mul(*b)
                        .ok_or_else(|| CompileError::runtime("arithmetic overflow"))?,
                    Builtin::Div => a
                        .checked_div(*b)
                        .ok_or_else(|| CompileError::runtime("division by zero"))?,
                    _ => unreachable!(),
                };
                Ok(vec![k.clone(), Value::Number(result)])
            }
            Builtin::Eq => {
                let [_, a, b, yes, no] = values.as_slice() else {
                    return Err(self.arity_error(builtin, "two values and two continuations"));
                };
                let equal = match (a, b) {
                    (Value::Number(a), Value::Number(b)) => a == b,
                    (Value::Str(a), Value::Str(b)) => a == b,
                    _ => {
                        return Err(CompileError::runtime(
                            "'eq' compares numbers and strings only",
                        ));
                    }
                };
                Ok(vec![if equal { yes.clone() } else { no.clone() }])
            }
            Builtin::Exit => Ok(Vec::new()),
        }
    }

    fn arity_error(&self, builtin: Builtin, expected: &str) -> CompileError {
        CompileError::runtime(format!("'{}' takes {expected}", builtin.name()))
    }

    fn name_of(&self, proc: &Procedure) -> &str {
        proc.arguments
            .first()
            .and_then(|a| self.program.resolve_name(a.id))
            .unwrap_or("<anonymous>")
    }
}
