//! cbc compiler - Common Types and Utilities
//!
//! This crate contains shared types, diagnostics, and source-location
//! utilities used across all components of the cbc compiler.

pub mod error;
pub mod source_loc;

pub use error::{CompilerError, Diagnostic, ErrorHandler, Severity};
pub use source_loc::{SourceLocation, SourceSpan};
