use crate::span::Span;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Syntax error: {msg}")]
    Syntax { msg: String, span: Span },

    #[error("Name error: {msg}")]
    Resolve { msg: String, span: Span },

    #[error("Runtime error: {msg}")]
    Runtime { msg: String },

    #[error("IO error: {msg}")]
    Io { msg: String },
}

impl CompileError {
    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::Syntax { msg: msg.into(), span }
    }

    pub fn resolve(msg: impl Into<String>, span: Span) -> Self {
        Self::Resolve { msg: msg.into(), span }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime { msg: msg.into() }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io { msg: msg.into() }
    }
}

/// Render a CompileError with ariadne for nice terminal output.
pub fn render_error(source: &str, _filename: &str, err: &CompileError) {
    use ariadne::{Label, Report, ReportKind, Source};

    match err {
        CompileError::Syntax { msg, span } | CompileError::Resolve { msg, span } => {
            let kind_str = match err {
                CompileError::Syntax { .. } => "syntax",
                CompileError::Resolve { .. } => "name",
                _ => unreachable!(),
            };
            Report::build(ReportKind::Error, (), span.start)
                .with_message(format!("{kind_str} error"))
                .with_label(
                    Label::new(span.start..span.end)
                        .with_message(msg),
                )
                .finish()
                .eprint(Source::from(source))
                .unwrap();
        }
        CompileError::Runtime { msg } | CompileError::Io { msg } => {
            eprintln!("error: {msg}");
        }
    }
}
