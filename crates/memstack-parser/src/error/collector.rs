//! Collector for accumulating diagnostics while decoding rows.

use crate::error::{Diagnostic, ParseError};

/// Accumulates diagnostics so that every bad row is reported, not just the first.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` once any error has been emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Finish collection and return a result.
    ///
    /// Warnings are logged and discarded in the success case.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors {
            return Err(ParseError::new(self.diagnostics));
        }
        for warning in &self.diagnostics {
            log::warn!("{warning}");
        }
        Ok(())
    }
}
