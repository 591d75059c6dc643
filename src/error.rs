//! Centralised error hierarchy for the **Fojaccia interpreter**.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) convert their
//! internal failure modes into one of the variants defined here.  This enables a
//! uniform `Result<T>` alias throughout the crate and ergonomic inter‑operation
//! with `anyhow`, while still preserving rich diagnostic detail.
//!
//! The module **does not** print diagnostics itself.  Each pipeline phase pushes
//! its errors into a [`Diagnostics`] collector that the caller owns, so two
//! interpreter sessions never share error state.

use std::fmt;
use std::io;

use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::token::{Token, TokenType};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FojError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.  `location` is either `" at end"` or
    /// `" at 'lexeme'"`.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,
        location: String,
    },

    /// Static‑analysis failure reported by the resolver.
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        line: usize,
        location: String,
    },

    /// Runtime evaluation error.
    #[error("{message}\n[line {line}]")]
    Runtime { message: String, line: usize },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Render the `" at ..."` fragment used by parse and resolve diagnostics.
fn location_of(token: &Token) -> String {
    match token.token_type {
        TokenType::EOF => " at end".to_string(),
        _ => format!(" at '{}'", token.lexeme),
    }
}

impl FojError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        FojError::Lex { message, line }
    }

    /// Helper constructor for the **parser**, located at `token`.
    pub fn parse_at<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        FojError::Parse {
            message,
            line: token.line,
            location: location_of(token),
        }
    }

    /// Helper constructor for the **resolver**, located at `token`.
    pub fn resolve_at<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Resolve error: line={}, msg={}", token.line, message);

        FojError::Resolve {
            message,
            line: token.line,
            location: location_of(token),
        }
    }

    /// Helper constructor for the **interpreter**.
    pub fn runtime<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Runtime error: line={}, msg={}", line, message);

        FojError::Runtime { message, line }
    }

    /// Fill in `line` for a runtime error raised without a location (native
    /// functions do not know their call site).
    pub fn or_line(self, line: usize) -> Self {
        match self {
            FojError::Runtime { message, line: 0 } => FojError::Runtime { message, line },
            other => other,
        }
    }

    /// Source line the error points at, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            FojError::Lex { line, .. }
            | FojError::Parse { line, .. }
            | FojError::Resolve { line, .. }
            | FojError::Runtime { line, .. } => Some(*line),
            FojError::Io(_) => None,
        }
    }

    /// Pipeline phase the error belongs to.  I/O failures (writing program
    /// output) have no phase of their own and are filed as lexical.
    pub fn phase(&self) -> Phase {
        match self {
            FojError::Lex { .. } | FojError::Io(_) => Phase::Lexical,
            FojError::Parse { .. } => Phase::Syntactic,
            FojError::Resolve { .. } => Phase::Static,
            FojError::Runtime { .. } => Phase::Runtime,
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, FojError>;

/// The stage of the pipeline that produced a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Lexical,
    Syntactic,
    Static,
    Runtime,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Lexical => "lexical",
            Phase::Syntactic => "syntactic",
            Phase::Static => "static",
            Phase::Runtime => "runtime",
        };

        f.write_str(name)
    }
}

/// A reported problem, flattened for consumers of
/// [`RunResult`](crate::RunResult).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub phase: Phase,

    /// Fully rendered message, e.g. `[line 3] Error at ';': Expected expression.`
    pub message: String,
}

impl From<&FojError> for Diagnostic {
    fn from(err: &FojError) -> Self {
        Diagnostic {
            line: err.line().unwrap_or(0),
            phase: err.phase(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered collector of errors threaded through each pipeline phase.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<FojError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.  Every report is also forwarded to the `log` facade.
    pub fn report(&mut self, err: FojError) {
        log::error!("{} diagnostic: {}", err.phase(), err);

        self.errors.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Has any lexical, syntactic or static error been recorded?
    pub fn has_static_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|e| !matches!(e.phase(), Phase::Runtime))
    }

    pub fn has_runtime_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e.phase(), Phase::Runtime))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FojError> {
        self.errors.iter()
    }

    /// Flatten into the serialisable form handed to the driver.
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(Diagnostic::from).collect()
    }
}
