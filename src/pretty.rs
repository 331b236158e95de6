use crate::parser::ast::*;

/// Pretty-print a `Module` AST back into canonical Oluś source text.
pub fn pretty_print(module: &Module) -> String {
    let mut pp = PrettyPrinter::new();
    pp.emit_module(module);
    pp.buf
}

struct PrettyPrinter {
    buf: String,
    indent: usize,
}

impl PrettyPrinter {
    fn new() -> Self {
        Self {
            buf: String::new(),
            indent: 0,
        }
    }

    fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn newline(&mut self) {
        self.buf.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.buf.push_str("    ");
        }
    }

    fn emit_module(&mut self, module: &Module) {
        self.emit_lines(&module.lines);
    }

    fn emit_lines(&mut self, lines: &[Line]) {
        for line in lines {
            self.write_indent();
            self.emit_stmt(&line.stmt.node);
            self.newline();
            if let Some(block) = &line.block {
                self.indent += 1;
                self.emit_lines(block);
                self.indent -= 1;
            }
        }
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Def(def) => self.emit_def(def),
            Stmt::Call(call) => self.emit_call(call),
        }
    }

    fn emit_def(&mut self, def: &Def) {
        for (i, param) in def.params.iter().enumerate() {
            if i > 0 {
                self.write(" ");
            }
            self.write(&param.node);
        }
        self.write(":");
        if let Some(call) = &def.call {
            self.write(" ");
            self.emit_call(call);
        }
    }

    fn emit_call(&mut self, call: &Call) {
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.write(" ");
            }
            self.emit_expr(&arg.node);
        }
    }

    fn emit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.write(name),
            Expr::Number(n) => {
                self.write(&n.to_string());
            }
            Expr::Str(s) => {
                self.write("“");
                self.write(s);
                self.write("”");
            }
            Expr::Group(group) => {
                self.write("(");
                match group.as_ref() {
                    Group::Def(def) => self.emit_def(def),
                    Group::Call(call) => self.emit_call(call),
                }
                self.write(")");
            }
        }
    }
}
