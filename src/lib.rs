//! Fojaccia: a tree‑walking interpreter for a small dynamically‑typed
//! scripting language with closures and single‑inheritance classes.
//!
//! The pipeline is scanner → parser → resolver → interpreter.  Each phase
//! reports into a [`Diagnostics`](error::Diagnostics) collector; evaluation
//! only starts when the first three phases recorded nothing.
//!
//! ```rust
//! let result = fojaccia::run_source("var a = 1; print a + 2;");
//! assert!(result.diagnostics.is_empty());
//! ```

pub mod ast_printer;
pub mod callable;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stack;
pub mod stmt;
pub mod token;
pub mod value;

use std::io::Write;

use log::info;
use serde::Serialize;

use crate::error::{Diagnostic, Diagnostics};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::scan_tokens;

/// Outcome of running one piece of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Top‑level statements that ran to completion.
    pub statements_executed: usize,

    /// Every diagnostic, in the order it was reported.
    pub diagnostics: Vec<Diagnostic>,

    /// A lexical, syntactic or static error stopped the run before evaluation.
    pub had_static_error: bool,

    /// A runtime error cut the run short.
    pub had_runtime_error: bool,
}

/// An interpreter whose global scope persists across [`Session::run_source`]
/// calls, as the interactive prompt needs.
pub struct Session {
    interpreter: Interpreter,

    /// First expression id the next parse hands out.
    next_expr_id: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session printing to stdout.
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
            next_expr_id: 0,
        }
    }

    /// A session whose `print` output goes to `output`.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(output),
            next_expr_id: 0,
        }
    }

    /// Print the value of top‑level expression statements.
    pub fn set_echo(&mut self, echo: bool) {
        self.interpreter.set_echo(echo);
    }

    /// Local references the interpreter still keeps a distance for.  Only
    /// references inside function bodies outlive the run that declared them.
    pub fn resolved_locals(&self) -> usize {
        self.interpreter.local_count()
    }

    /// Scan, parse, resolve and (if all of that was clean) execute `source`.
    pub fn run_source(&mut self, source: &str) -> RunResult {
        info!("Running {} bytes of source", source.len());

        let mut diagnostics = Diagnostics::new();

        let tokens = scan_tokens(source, &mut diagnostics);
        let mut parser = Parser::with_first_id(&tokens, self.next_expr_id);
        let statements = parser.parse(&mut diagnostics);
        self.next_expr_id = parser.next_id();

        let (resolutions, top_level) = Resolver::new()
            .with_globals(self.interpreter.global_names())
            .resolve_split(&statements, &mut diagnostics);

        if diagnostics.has_static_errors() {
            info!(
                "Skipping evaluation: {} static diagnostics",
                diagnostics.len()
            );

            return RunResult {
                statements_executed: 0,
                diagnostics: diagnostics.to_diagnostics(),
                had_static_error: true,
                had_runtime_error: false,
            };
        }

        self.interpreter.note_locals(resolutions);

        let statements_executed = self.interpreter.interpret(&statements, &mut diagnostics);
        self.interpreter.forget_locals(&top_level);

        RunResult {
            statements_executed,
            had_static_error: false,
            had_runtime_error: diagnostics.has_runtime_errors(),
            diagnostics: diagnostics.to_diagnostics(),
        }
    }
}

/// Run `source` in a fresh session that prints to stdout.
pub fn run_source(source: &str) -> RunResult {
    Session::new().run_source(source)
}
