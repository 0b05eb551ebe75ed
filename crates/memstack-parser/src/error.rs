//! Error and diagnostic system for the Memstack parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! Every malformed row produces a [`Diagnostic`] pointing at the offending
//! field. Diagnostics from all rows are gathered and returned together in a
//! [`ParseError`], so one run reports every problem in the input.
//!
//! # Example
//!
//! ```
//! # use memstack_parser::error::{Diagnostic, ErrorCode};
//! # use memstack_parser::Span;
//!
//! let span = Span::new(40..45);
//! let original_span = Span::new(10..15);
//!
//! let diag = Diagnostic::error("region label `stack` is defined multiple times")
//!     .with_code(ErrorCode::E202)
//!     .with_label(span, "duplicate label")
//!     .with_secondary_label(original_span, "first used here")
//!     .with_help("labels must be unique; rename one of the regions");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;

/// Result of a step that fails with a single diagnostic.
pub(crate) type Result<T> = std::result::Result<T, Diagnostic>;
