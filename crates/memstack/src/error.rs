//! Error types for Memstack operations.
//!
//! This module provides the main error type [`MemstackError`] which wraps
//! the error conditions that can occur while processing a memory map.

use std::io;

use thiserror::Error;

use memstack_core::RegionError;
use memstack_parser::error::ParseError;

/// The main error type for Memstack operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the source text alongside the diagnostics so
/// that callers can render them with source snippets.
#[derive(Debug, Error)]
pub enum MemstackError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Layout error: {0}")]
    Layout(#[from] RegionError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<serde_json::Error> for MemstackError {
    fn from(error: serde_json::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl MemstackError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
