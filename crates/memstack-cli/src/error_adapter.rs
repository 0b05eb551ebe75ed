//! Error adapter for converting MemstackError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`memstack_parser::error::ParseError`] contains multiple diagnostics,
//! each diagnostic is rendered independently.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use memstack::{MemstackError, RegionError};
use memstack_parser::error::Diagnostic;

/// Adapter for a single parser diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Source code for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn severity(&self) -> Option<miette::Severity> {
        if self.diag.severity().is_warning() {
            Some(miette::Severity::Warning)
        } else {
            Some(miette::Severity::Error)
        }
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for non-diagnostic [`MemstackError`] variants.
///
/// Layout errors get a code per [`RegionError`] kind so that scripts can tell
/// an overlap from a missing label without parsing the message.
pub struct ErrorAdapter<'a>(pub &'a MemstackError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            MemstackError::Io(_) => "memstack::io",
            MemstackError::Parse { .. } => return None,
            MemstackError::Layout(err) => match err {
                RegionError::Range { .. } => "memstack::range",
                RegionError::IncompleteRange { .. } => "memstack::incomplete_range",
                RegionError::Unresolved { .. } => "memstack::unresolved",
                RegionError::Overlap { .. } => "memstack::overlap",
                RegionError::UnknownLabel { .. } => "memstack::unknown_label",
            },
            MemstackError::Export(_) => "memstack::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            MemstackError::Layout(RegionError::IncompleteRange { .. }) => {
                "ascending layouts need a start address on every region; \
                 descending (`config,reverse`) layouts need an end address"
            }
            MemstackError::Layout(RegionError::Unresolved { .. }) => {
                "give the last region an explicit end address"
            }
            MemstackError::Layout(RegionError::UnknownLabel { .. }) => {
                "annotations must name the label column of a `node` row"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a parser [`Span`](memstack_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: memstack_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`MemstackError`] into a list of reportable errors.
///
/// For [`MemstackError::Parse`], this returns one [`Reportable`] for each
/// diagnostic in the error. For other error variants, this returns a single
/// [`Reportable`].
pub fn to_reportables(err: &MemstackError) -> Vec<Reportable<'_>> {
    match err {
        MemstackError::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use memstack_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    fn code_of(reportable: &Reportable<'_>) -> Option<String> {
        reportable.code().map(|c| c.to_string())
    }

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("unknown region kind `stack`")
            .with_code(ErrorCode::E102)
            .with_label(Span::new(5..10), "unknown region kind")
            .with_help("valid kinds are `regular`, ...");
        let err = MemstackError::new_parse_error(ParseError::from(diag), "node,stack,0,1");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "unknown region kind `stack`");
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
        assert_eq!(code_of(&reportables[0]).as_deref(), Some("E102"));
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error("invalid address `zz`")
                .with_code(ErrorCode::E101)
                .with_label(Span::new(0..2), "first"),
            Diagnostic::error("region label `a` is defined multiple times")
                .with_code(ErrorCode::E202)
                .with_label(Span::new(10..11), "duplicate label")
                .with_secondary_label(Span::new(3..4), "first used here"),
        ];
        let err = MemstackError::new_parse_error(ParseError::from(diags), "source code here...");

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "invalid address `zz`");
        assert_eq!(
            reportables[1].to_string(),
            "region label `a` is defined multiple times"
        );
    }

    #[test]
    fn test_skipped_row_renders_as_warning() {
        let diags = vec![
            Diagnostic::warning("unknown row kind `type`").with_label(Span::new(0..4), "row skipped"),
            Diagnostic::error("invalid address `zz`")
                .with_code(ErrorCode::E101)
                .with_label(Span::new(21..23), "invalid address"),
        ];
        let err = MemstackError::new_parse_error(
            ParseError::from(diags),
            "type,kind\nnode,regular,zz,0x10",
        );

        let reportables = to_reportables(&err);

        assert_eq!(reportables[0].severity(), Some(miette::Severity::Warning));
        assert_eq!(reportables[1].severity(), Some(miette::Severity::Error));
    }

    #[test]
    fn test_layout_error_codes() {
        let overlap = MemstackError::Layout(RegionError::Overlap {
            first: "region `a`".to_string(),
            first_line: Some(1),
            second: "region `b`".to_string(),
            second_line: Some(2),
        });
        let unknown = MemstackError::Layout(RegionError::UnknownLabel {
            label: "X".to_string(),
            line: Some(4),
        });

        let overlap = to_reportables(&overlap);
        let unknown = to_reportables(&unknown);

        assert_eq!(code_of(&overlap[0]).as_deref(), Some("memstack::overlap"));
        assert!(overlap[0].help().is_none());
        assert_eq!(code_of(&unknown[0]).as_deref(), Some("memstack::unknown_label"));
        assert!(unknown[0].help().is_some());
        assert_eq!(
            unknown[0].to_string(),
            "Layout error: region label `X` does not exist (referenced at line 4)"
        );
    }

    #[test]
    fn test_all_labels_returned() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary label")
            .with_secondary_label(Span::new(10..15), "secondary label");

        let adapter = DiagnosticAdapter::new(&diag, "some source code");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("primary label"));
        assert!(labels[0].primary());
        assert_eq!(labels[1].label(), Some("secondary label"));
        assert!(!labels[1].primary());
    }
}
