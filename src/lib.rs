pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod ir;
pub mod lower;
pub mod interpreter;
pub mod pretty;
pub mod watch;

use std::io::Write;
use std::path::Path;

use diagnostics::CompileError;
use ir::Program;
use parser::ast::Module;

/// Parse a source string into a syntax tree (lex → parse).
pub fn parse_module(source: &str) -> Result<Module, CompileError> {
    let tokens = lexer::lex(source)?;
    let mut parser = parser::Parser::new(&tokens, source);
    parser.parse_module()
}

/// Compile a source string to a lowered program (lex → parse → lower).
/// No file I/O. Useful for compile-fail tests that only need to check errors.
pub fn compile(source: &str) -> Result<Program, CompileError> {
    let module = parse_module(source)?;
    lower::lower(source, &module)
}

/// Compile and run a source string, writing program output to `out`.
pub fn run_to(source: &str, out: &mut impl Write) -> Result<(), CompileError> {
    let program = compile(source)?;
    interpreter::run(&program, out)
}

/// Compile and run a file, writing program output to stdout.
pub fn run_file(path: &Path) -> Result<(), CompileError> {
    let source = read_source(path)?;
    run_to(&source, &mut std::io::stdout().lock())
}

pub fn read_source(path: &Path) -> Result<String, CompileError> {
    std::fs::read_to_string(path)
        .map_err(|e| CompileError::io(format!("failed to read {}: {e}", path.display())))
}

/// Reformat a source string into canonical style.
pub fn format_source(source: &str) -> Result<String, CompileError> {
    Ok(pretty::pretty_print(&parse_module(source)?))
}
