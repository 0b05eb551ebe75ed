//! Row lexer for comma-separated diagram sources.
//!
//! The lexer splits source text into [`Row`]s of [`Spanned`] fields. Fields
//! are either bare text running up to the next `,` or end of line, or
//! double-quoted strings in which `""` stands for a literal quote, so that
//! comments may contain commas.
//!
//! The public entry point is [`tokenize`], which recovers from a malformed
//! line by skipping to the next one and reports every problem in one pass.

use winnow::{
    Parser as _,
    ascii::{line_ending, space0},
    combinator::{alt, cut_err, eof, peek, repeat, separated, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{none_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::{Span, Spanned},
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()`; the reported span runs from
/// `start` to the position the error was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    pub start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// One physical line of the source, split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    line: usize,
    span: Span,
    fields: Vec<Spanned<String>>,
}

impl Row {
    /// Returns the 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the span of the row, excluding its line terminator.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn fields(&self) -> &[Spanned<String>] {
        &self.fields
    }

    /// Returns the field at `index`, if the row has that many columns.
    pub fn field(&self, index: usize) -> Option<&Spanned<String>> {
        self.fields.get(index)
    }

    /// Returns `true` if every field is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.inner().trim().is_empty())
    }
}

/// Parse the body of a quoted field, after the opening quote.
fn quoted_content<'a>(input: &mut Input<'a>) -> IResult<'a, String> {
    repeat(0.., alt(("\"\"".value('"'), none_of(['"', '\n', '\r']))))
        .fold(String::new, |mut acc, ch| {
            acc.push(ch);
            acc
        })
        .parse_next(input)
}

/// Parse a double-quoted field.
///
/// Backtracks unless the field starts with a quote (after optional blanks);
/// once the quote is seen, an unterminated body or trailing garbage is a
/// hard error.
fn quoted_field<'a>(input: &mut Input<'a>) -> IResult<'a, String> {
    space0.parse_next(input)?;
    let start = input.current_token_start();
    '"'.parse_next(input)?;

    let value = cut_err(terminated(quoted_content, '"'))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated quoted field",
            help: Some("add a closing `\"` before the end of the line"),
            start,
        })
        .parse_next(input)?;

    cut_err(terminated(
        space0,
        peek(alt((','.void(), line_ending.void(), '\r'.void(), eof.void()))),
    ))
    .context(LexerDiagnostic {
        code: ErrorCode::E002,
        message: "unexpected character after quoted field",
        help: Some("a closing quote must be followed by `,` or the end of the line; write `\"\"` for a literal quote"),
        start,
    })
    .parse_next(input)?;

    Ok(value)
}

/// Parse a bare field up to the next separator or line end.
fn bare_field<'a>(input: &mut Input<'a>) -> IResult<'a, String> {
    take_while(0.., |c: char| !matches!(c, ',' | '\n' | '\r'))
        .map(str::to_string)
        .parse_next(input)
}

/// Parse a single field with position tracking
fn field<'a>(input: &mut Input<'a>) -> IResult<'a, Spanned<String>> {
    let start = input.current_token_start();
    let value = alt((quoted_field, bare_field)).parse_next(input)?;
    let end = input.current_token_start();
    Ok(Spanned::new(value, Span::new(start..end)))
}

/// Parse the end of a line: `\n`, `\r\n`, a lone `\r`, or end of input.
fn line_end<'a>(input: &mut Input<'a>) -> IResult<'a, ()> {
    alt((line_ending.void(), '\r'.void(), eof.void())).parse_next(input)
}

/// Parse one row of fields and its terminator.
fn row<'a>(input: &mut Input<'a>, line: usize) -> IResult<'a, Row> {
    let start = input.current_token_start();
    let fields: Vec<Spanned<String>> = separated(1.., field, ',').parse_next(input)?;
    let end = input.current_token_start();
    line_end.parse_next(input)?;

    Ok(Row {
        line,
        span: Span::new(start..end),
        fields,
    })
}

/// Lexer that accumulates rows and diagnostics.
struct Lexer {
    rows: Vec<Row>,
    diagnostics: DiagnosticCollector,
}

impl Lexer {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Split the input into rows, collecting rows and errors.
    fn tokenize(&mut self, mut input: Input<'_>) {
        let mut line = 1;
        while !input.is_empty() {
            match row(&mut input, line) {
                Ok(row) => self.rows.push(row),
                Err(e) => {
                    let error_pos = input.current_token_start();
                    self.diagnostics.emit(Self::convert_err_mode(e, error_pos));
                    Self::skip_line(&mut input);
                }
            }
            line += 1;
        }
    }

    /// Advance past the next newline, or to the end of input.
    fn skip_line(input: &mut Input<'_>) {
        let skip = input
            .offset_for(|c| c == '\n')
            .map_or_else(|| input.eof_offset(), |offset| offset + 1);
        input.next_slice(skip);
    }

    fn finish(self) -> Result<Vec<Row>, ParseError> {
        self.diagnostics.finish().map(|()| self.rows)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Falls back to E002 if no diagnostic context is attached.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos);

            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Split source text into rows, collecting every lexical error.
///
/// # Returns
///
/// - `Ok(rows)` - one [`Row`] per line, in source order
/// - `Err(ParseError)` - one or more lines were malformed; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<Row>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(row: &Row) -> Vec<&str> {
        row.fields().iter().map(|f| f.inner().as_str()).collect()
    }

    #[test]
    fn test_bare_fields() {
        let rows = tokenize("node, regular, 0x0, 0x10, text, Code").unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            values(&rows[0]),
            vec!["node", " regular", " 0x0", " 0x10", " text", " Code"]
        );
        assert_eq!(rows[0].line(), 1);
    }

    #[test]
    fn test_empty_fields_are_kept() {
        let rows = tokenize("node,regular,,0x10,,").unwrap();

        assert_eq!(values(&rows[0]), vec!["node", "regular", "", "0x10", "", ""]);
    }

    #[test]
    fn test_quoted_field_with_comma_and_escape() {
        let rows = tokenize(r#"regionlabel,heap, "grows, ""slowly""" "#).unwrap();

        assert_eq!(
            values(&rows[0]),
            vec!["regionlabel", "heap", r#"grows, "slowly""#]
        );
    }

    #[test]
    fn test_line_numbers_and_terminators() {
        let rows = tokenize("config,reverse\r\n\nnode,regular,0,1\n").unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].line(), 1);
        assert_eq!(values(&rows[0]), vec!["config", "reverse"]);
        assert!(rows[1].is_blank());
        assert_eq!(rows[2].line(), 3);
    }

    #[test]
    fn test_field_spans() {
        let source = "node,\"a,b\",x";
        let rows = tokenize(source).unwrap();
        let fields = rows[0].fields();

        assert_eq!(&source[fields[0].span().start()..fields[0].span().end()], "node");
        assert_eq!(&source[fields[1].span().start()..fields[1].span().end()], "\"a,b\"");
        assert_eq!(fields[2].span().start(), 11);
        assert_eq!(rows[0].span(), Span::new(0..source.len()));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = tokenize("node,regular,0,1,a,\"oops\nnode,regular,1,2,b,ok").unwrap_err();

        assert_eq!(err.diagnostics().len(), 1);
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.labels()[0].span(), Span::new(19..24));
    }

    #[test]
    fn test_garbage_after_quote() {
        let err = tokenize("regionlabel,a,\"x\"y").unwrap_err();

        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E002));
    }

    #[test]
    fn test_reports_every_bad_line() {
        let source = "a,\"1\n\
                      b,ok\n\
                      c,\"2\"z\n";
        let err = tokenize(source).unwrap_err();

        let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
        assert_eq!(codes, vec![ErrorCode::E001, ErrorCode::E002]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
    }
}
