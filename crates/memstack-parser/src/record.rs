//! Record decoding.
//!
//! Turns lexed [`Row`]s into typed [`Record`]s. The first column selects the
//! row kind:
//!
//! | Row kind           | Columns                                                   |
//! |--------------------|-----------------------------------------------------------|
//! | `node`             | kind, start, end, label, comment...                       |
//! | `regionlabel`      | target label, comment...                                  |
//! | `multiregionlabel` | top label, bottom label, comment...                       |
//! | `config`           | key, value...                                             |
//!
//! Trailing comment and value columns are joined back together with `,`.
//! Rows of any other kind, such as a header line, are skipped with a warning
//! diagnostic pointing at their first column.

use log::trace;

use memstack_core::{
    annotation::{MultiRegionLabel, RegionLabel},
    error::RangeViolation,
    identifier::Id,
    options::ConfigEntry,
    region::{self, Address, Growth, Region, RegionKind},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError, Result},
    lexer::Row,
    span::{Span, Spanned},
};

/// A `node` row, before it has been given a label.
///
/// Unlabelled regions are named only once every authored label is known, so
/// the label stays optional until then.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRecord {
    label: Option<Spanned<Id>>,
    kind: RegionKind,
    growth: Growth,
    lo: Option<Address>,
    hi: Option<Address>,
    comment: String,
    line: usize,
    span: Span,
}

impl RegionRecord {
    /// Returns the authored label, if any.
    pub fn label(&self) -> Option<&Spanned<Id>> {
        self.label.as_ref()
    }

    /// Returns the span of the whole row.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the authored label's span, or the row's if it has none.
    pub fn label_span(&self) -> Span {
        self.label.as_ref().map_or(self.span, Spanned::span)
    }

    /// Builds the region under its final label.
    pub fn into_region(self, label: Id) -> Region {
        let region = Region::new(label, self.kind)
            .with_growth(self.growth)
            .with_range(self.lo, self.hi)
            .with_comment(self.comment)
            .with_line(self.line);
        if self.label.is_some() {
            region
        } else {
            region.with_generated_label()
        }
    }
}

/// One decoded input row.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Region(RegionRecord),
    RegionLabel(RegionLabel),
    MultiRegionLabel(MultiRegionLabel),
    /// A config entry, spanned by its value column (or the row, if it has none).
    Config(Spanned<ConfigEntry>),
}

/// Parses an address column.
///
/// Empty text is an omitted endpoint. Accepts decimal and `0x`, `0o` or `0b`
/// prefixed literals, with `_` allowed between digits.
fn parse_address(
    text: &Spanned<String>,
    negative: RangeViolation,
) -> Result<Option<Address>> {
    let raw = text.inner().trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if raw.starts_with('-') {
        return Err(Diagnostic::error(format!("negative address `{raw}`"))
            .with_code(ErrorCode::E200)
            .with_label(text.span(), negative.to_string()));
    }

    let digits = raw.strip_prefix('+').unwrap_or(raw);
    let (radix, digits) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ => (10, digits),
    };
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();

    let invalid = || {
        Diagnostic::error(format!("invalid address `{raw}`"))
            .with_code(ErrorCode::E101)
            .with_label(text.span(), ErrorCode::E101.description())
    };
    if cleaned.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return Err(invalid().with_help("addresses are decimal or `0x`-prefixed hexadecimal"));
    }

    match Address::from_str_radix(&cleaned, radix) {
        Ok(address) => Ok(Some(address)),
        Err(err) if matches!(err.kind(), std::num::IntErrorKind::PosOverflow) => {
            Err(invalid().with_help("addresses must fit in 64 bits"))
        }
        Err(_) => Err(invalid().with_help("addresses are decimal or `0x`-prefixed hexadecimal")),
    }
}

/// Decoder for a single row kind.
struct RowDecoder<'r> {
    row: &'r Row,
}

impl<'r> RowDecoder<'r> {
    fn new(row: &'r Row) -> Self {
        Self { row }
    }

    /// Returns a column that must be present.
    fn required(&self, index: usize, name: &str) -> Result<&'r Spanned<String>> {
        self.row.field(index).ok_or_else(|| {
            Diagnostic::error(format!(
                "`{}` row is missing its {name} column",
                self.kind_text()
            ))
            .with_code(ErrorCode::E100)
            .with_label(self.row.span(), format!("expected a {name} here"))
        })
    }

    /// Returns a column that must be present and non-blank, trimmed.
    fn required_text(&self, index: usize, name: &str) -> Result<Spanned<&'r str>> {
        let field = self.required(index, name)?;
        let text = field.inner().trim();
        if text.is_empty() {
            return Err(Diagnostic::error(format!(
                "`{}` row has an empty {name} column",
                self.kind_text()
            ))
            .with_code(ErrorCode::E100)
            .with_label(field.span(), format!("expected a {name}")));
        }
        Ok(Spanned::new(text, field.span()))
    }

    /// Returns an optional column, `None` when absent or blank.
    fn optional_text(&self, index: usize) -> Option<Spanned<&'r str>> {
        self.row
            .field(index)
            .map(|f| Spanned::new(f.inner().trim(), f.span()))
            .filter(|f| !f.inner().is_empty())
    }

    /// Joins every column from `index` onward with `,` and trims the result.
    fn rest(&self, index: usize) -> String {
        let fields = self.row.fields();
        if index >= fields.len() {
            return String::new();
        }
        fields[index..]
            .iter()
            .map(|f| f.inner().as_str())
            .collect::<Vec<_>>()
            .join(",")
            .trim()
            .to_string()
    }

    /// Returns the span covering every column from `index` onward.
    fn rest_span(&self, index: usize) -> Option<Span> {
        let fields = self.row.fields().get(index..)?;
        let first = fields.first()?.span();
        Some(fields.iter().fold(first, |span, f| span.union(f.span())))
    }

    fn kind_text(&self) -> &'r str {
        self.row.field(0).map_or("", |f| f.inner().trim())
    }

    fn node(&self) -> Result<Record> {
        let kind_field = self.required_text(1, "region kind")?;
        let (kind, growth) = region::parse_kind(kind_field.inner()).map_err(|err| {
            let valid = RegionKind::ALL.map(|k| format!("`{k}`")).join(", ");
            Diagnostic::error(err.to_string())
                .with_code(ErrorCode::E102)
                .with_label(kind_field.span(), ErrorCode::E102.description())
                .with_help(format!(
                    "valid kinds are {valid}, optionally prefixed with `grows up ` or `grows down `"
                ))
        })?;

        let lo = match self.row.field(2) {
            Some(field) => parse_address(field, RangeViolation::NegativeStart)?,
            None => None,
        };
        let hi = match self.row.field(3) {
            Some(field) => parse_address(field, RangeViolation::NegativeEnd)?,
            None => None,
        };

        if let (Some(lo), Some(hi)) = (lo, hi) {
            if hi <= lo {
                let span = self.row.fields()[2].span().union(self.row.fields()[3].span());
                return Err(Diagnostic::error(format!(
                    "empty or inverted address range [{lo:#x}, {hi:#x})"
                ))
                .with_code(ErrorCode::E201)
                .with_label(span, RangeViolation::EndNotAfterStart.to_string()));
            }
        }

        let label = self
            .optional_text(4)
            .map(|label| label.map(Id::new));

        Ok(Record::Region(RegionRecord {
            label,
            kind,
            growth,
            lo,
            hi,
            comment: self.rest(5),
            line: self.row.line(),
            span: self.row.span(),
        }))
    }

    fn region_label(&self) -> Result<Record> {
        let target = self.required_text(1, "target label")?;
        Ok(Record::RegionLabel(
            RegionLabel::new(Id::new(target.inner()), self.rest(2)).with_line(self.row.line()),
        ))
    }

    fn multi_region_label(&self) -> Result<Record> {
        let top = self.required_text(1, "top label")?;
        let bottom = self.required_text(2, "bottom label")?;
        Ok(Record::MultiRegionLabel(
            MultiRegionLabel::new(Id::new(top.inner()), Id::new(bottom.inner()), self.rest(3))
                .with_line(self.row.line()),
        ))
    }

    fn config(&self) -> Result<Record> {
        let key = self.required_text(1, "config key")?;
        let span = self.rest_span(2).unwrap_or(key.span());
        let entry = ConfigEntry::new(*key.inner(), self.rest(2)).with_line(self.row.line());
        Ok(Record::Config(Spanned::new(entry, span)))
    }

    /// Warning for a row whose first column names no row kind.
    fn unknown_kind(&self) -> Diagnostic {
        let span = self.row.field(0).map_or(self.row.span(), Spanned::span);
        Diagnostic::warning(format!("unknown row kind `{}`", self.kind_text()))
            .with_label(span, "row skipped")
            .with_help("rows start with `node`, `regionlabel`, `multiregionlabel` or `config`")
    }

    /// Decodes the row, or returns `None` for blank rows.
    ///
    /// A row of unknown kind yields a warning diagnostic instead of a record.
    fn decode(&self) -> Result<Option<Record>> {
        if self.row.is_blank() {
            return Ok(None);
        }

        let record = match self.kind_text() {
            "node" => self.node()?,
            "regionlabel" => self.region_label()?,
            "multiregionlabel" => self.multi_region_label()?,
            "config" => self.config()?,
            _ => return Err(self.unknown_kind()),
        };
        trace!(line = self.row.line(), record:? = record; "Decoded row");
        Ok(Some(record))
    }
}

/// Decodes every row, collecting one diagnostic per malformed or skipped row.
pub fn decode(rows: &[Row]) -> std::result::Result<Vec<Record>, ParseError> {
    let mut collector = DiagnosticCollector::new();
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        match RowDecoder::new(row).decode() {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(diagnostic) => collector.emit(diagnostic),
        }
    }

    collector.finish().map(|()| records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn decode_source(source: &str) -> std::result::Result<Vec<Record>, ParseError> {
        decode(&tokenize(source).unwrap())
    }

    fn single_error(source: &str) -> Diagnostic {
        let err = decode_source(source).unwrap_err();
        assert_eq!(err.diagnostics().len(), 1, "{:?}", err.diagnostics());
        err.diagnostics()[0].clone()
    }

    fn region(record: &Record) -> &RegionRecord {
        match record {
            Record::Region(region) => region,
            other => panic!("expected a region record, got {other:?}"),
        }
    }

    #[test]
    fn test_node_row() {
        let records =
            decode_source("node, grows down regular, 0x1000, 8192, stack, Stack, 8 KiB").unwrap();
        let record = region(&records[0]);

        assert_eq!(record.label().map(|l| *l.inner()), Some(Id::new("stack")));
        assert_eq!(record.kind, RegionKind::Regular);
        assert_eq!(record.growth, Growth::Down);
        assert_eq!(record.lo, Some(0x1000));
        assert_eq!(record.hi, Some(0x2000));
        assert_eq!(record.comment, "Stack, 8 KiB");
        assert_eq!(record.line, 1);
    }

    #[test]
    fn test_node_optional_columns() {
        let records = decode_source("node,reserved,0x10").unwrap();
        let record = region(&records[0]);

        assert_eq!(record.lo, Some(0x10));
        assert_eq!(record.hi, None);
        assert!(record.label().is_none());
        assert_eq!(record.comment, "");

        let built = record.clone().into_region(Id::new("__region_test"));
        assert!(built.has_generated_label());
        assert_eq!(built.line(), Some(1));
    }

    #[test]
    fn test_address_forms() {
        let records = decode_source(
            "node,regular,0b1000,0o20,a\n\
             node,regular,1_000,0X2_000,b",
        )
        .unwrap();

        assert_eq!(region(&records[0]).lo, Some(8));
        assert_eq!(region(&records[0]).hi, Some(16));
        assert_eq!(region(&records[1]).lo, Some(1000));
        assert_eq!(region(&records[1]).hi, Some(0x2000));
    }

    #[test]
    fn test_annotation_and_config_rows() {
        let records = decode_source(
            "regionlabel, heap, Heap, grows up\n\
             multiregionlabel, text, bss, Program image\n\
             config, substage_label, a,b\n\
             config, reverse",
        )
        .unwrap();

        assert_eq!(records.len(), 4);
        match &records[0] {
            Record::RegionLabel(label) => {
                assert_eq!(label.target(), Id::new("heap"));
                assert_eq!(label.comment(), "Heap, grows up");
            }
            other => panic!("unexpected record {other:?}"),
        }
        match &records[1] {
            Record::MultiRegionLabel(label) => {
                assert_eq!(label.top(), Id::new("text"));
                assert_eq!(label.bottom(), Id::new("bss"));
            }
            other => panic!("unexpected record {other:?}"),
        }
        match (&records[2], &records[3]) {
            (Record::Config(substage), Record::Config(reverse)) => {
                assert_eq!(substage.inner().key(), "substage_label");
                assert_eq!(substage.inner().value(), "a,b");
                assert_eq!(reverse.inner().key(), "reverse");
                assert_eq!(reverse.inner().value(), "");
                assert_eq!(reverse.inner().line(), Some(4));
            }
            other => panic!("unexpected records {other:?}"),
        }
    }

    #[test]
    fn test_skips_blank_and_unknown_rows() {
        let records = decode_source("type,kind,start,end,label,comment\n,,\nnode,regular,0,1").unwrap();

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_unknown_row_kind_is_a_spanned_warning() {
        let err = decode_source("type,kind,start\nnode,regular,zz,0x10").unwrap_err();
        let diagnostics = err.diagnostics();

        assert_eq!(diagnostics.len(), 2);
        let warning = &diagnostics[0];
        assert!(warning.severity().is_warning());
        assert_eq!(warning.message(), "unknown row kind `type`");
        assert_eq!(warning.labels()[0].span(), Span::new(0..4));
        assert!(diagnostics[1].severity().is_error());
        assert_eq!(diagnostics[1].code(), Some(ErrorCode::E101));
    }

    #[test]
    fn test_unknown_kind() {
        let diag = single_error("node, stack, 0, 1");

        assert_eq!(diag.code(), Some(ErrorCode::E102));
        assert!(diag.help().unwrap().contains("`registers`"));
    }

    #[test]
    fn test_missing_columns() {
        assert_eq!(single_error("node").code(), Some(ErrorCode::E100));
        assert_eq!(single_error("node, ,0,1").code(), Some(ErrorCode::E100));
        assert_eq!(single_error("regionlabel").code(), Some(ErrorCode::E100));
        assert_eq!(single_error("multiregionlabel, a").code(), Some(ErrorCode::E100));
        assert_eq!(single_error("config").code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_invalid_addresses() {
        assert_eq!(single_error("node,regular,0xZZ").code(), Some(ErrorCode::E101));
        assert_eq!(single_error("node,regular,0x").code(), Some(ErrorCode::E101));
        assert_eq!(
            single_error("node,regular,0,0x1_0000_0000_0000_0000").code(),
            Some(ErrorCode::E101)
        );
    }

    #[test]
    fn test_negative_address() {
        let diag = single_error("node,regular,-0x10,0x10");

        assert_eq!(diag.code(), Some(ErrorCode::E200));
        assert_eq!(
            diag.labels()[0].message(),
            "start address must be non-negative"
        );
    }

    #[test]
    fn test_inverted_range() {
        let source = "node,regular,0x20,0x10,a";
        let diag = single_error(source);

        assert_eq!(diag.code(), Some(ErrorCode::E201));
        assert_eq!(diag.labels()[0].span(), Span::new(13..22));
    }

    #[test]
    fn test_every_bad_row_is_reported() {
        let err = decode_source("node,stack,0,1\nnode,regular,0,1,ok\nnode,regular,5,5").unwrap_err();

        let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
        assert_eq!(codes, vec![ErrorCode::E102, ErrorCode::E201]);
    }
}
