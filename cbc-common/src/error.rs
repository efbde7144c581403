//! Error handling for the cbc compiler
//!
//! This module defines the compiler error type, diagnostic records, and the
//! error handler sink that semantic passes report into.

use crate::source_loc::SourceSpan;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("semantic error at {span}: {message}")]
    Semantic { span: SourceSpan, message: String },

    #[error("internal compiler error: {message}")]
    Internal { message: String },
}

impl CompilerError {
    /// Create a semantic error
    pub fn semantic_error(message: String, span: SourceSpan) -> Self {
        CompilerError::Semantic { span, message }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with location and severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: SourceSpan,
}

impl Diagnostic {
    pub fn error(message: String, span: SourceSpan) -> Self {
        Self {
            severity: Severity::Error,
            message,
            span,
        }
    }

    pub fn warning(message: String, span: SourceSpan) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.span, self.severity, self.message)
    }
}

/// Diagnostic sink shared by the semantic passes
///
/// Append-only: passes record errors and warnings as they are discovered and
/// keep going; the driver observes `error_occurred` after a pass to decide
/// whether compilation may continue.
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl ErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error diagnostic
    pub fn error(&mut self, span: SourceSpan, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(message.into(), span));
        self.error_count += 1;
    }

    /// Record a warning diagnostic
    pub fn warn(&mut self, span: SourceSpan, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(message.into(), span));
        self.warning_count += 1;
    }

    /// Check if any errors have been recorded
    pub fn error_occurred(&self) -> bool {
        self.error_count > 0
    }

    /// Get the number of errors
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Get the number of warnings
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            eprintln!("{}", diagnostic);
        }
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        match (self.error_count, self.warning_count) {
            (0, 0) => "No errors or warnings".to_string(),
            (0, w) => format!("{} warning{}", w, if w == 1 { "" } else { "s" }),
            (e, 0) => format!("{} error{}", e, if e == 1 { "" } else { "s" }),
            (e, w) => format!(
                "{} error{} and {} warning{}",
                e,
                if e == 1 { "" } else { "s" },
                w,
                if w == 1 { "" } else { "s" }
            ),
        }
    }
}
