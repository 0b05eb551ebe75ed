//! Assembly of decoded records into a [`Document`].
//!
//! This is where checks that span more than one row happen: authored labels
//! must be unique, unlabelled regions receive generated labels that cannot
//! collide with authored ones, and `config` rows are folded into the
//! diagram's options.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, info, trace};

use memstack_core::{
    annotation::Annotation,
    document::Document,
    identifier::{Id, IdGenerator},
    options::{ConfigEntry, DiagramOptions},
    region::Region,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    options::decode_options,
    record::{Record, RegionRecord},
    span::{Span, Spanned},
};

/// Builds a [`Document`] from decoded records.
pub struct Builder {
    base: DiagramOptions,
    diagnostics: DiagnosticCollector,
}

impl Builder {
    /// Create a builder whose options start from `base`.
    pub fn new(base: DiagramOptions) -> Self {
        Self {
            base,
            diagnostics: DiagnosticCollector::new(),
        }
    }

    pub fn build(mut self, records: Vec<Record>) -> Result<Document, ParseError> {
        let mut regions = Vec::new();
        let mut annotations = Vec::new();
        let mut configs: Vec<Spanned<ConfigEntry>> = Vec::new();

        for record in records {
            match record {
                Record::Region(region) => regions.push(region),
                Record::RegionLabel(label) => annotations.push(Annotation::from(label)),
                Record::MultiRegionLabel(label) => annotations.push(Annotation::from(label)),
                Record::Config(entry) => configs.push(entry),
            }
        }
        debug!(
            regions = regions.len(),
            annotations = annotations.len(),
            configs = configs.len();
            "Assembling document",
        );

        let options = decode_options(self.base.clone(), &configs, &mut self.diagnostics);
        self.check_unique_labels(&regions);
        let regions = Self::assign_labels(regions);

        self.diagnostics.finish()?;
        info!(regions = regions.len(); "Document assembled");
        Ok(Document::new(regions, annotations, options))
    }

    /// Reports every authored label that was already used by an earlier region.
    fn check_unique_labels(&mut self, regions: &[RegionRecord]) {
        let mut first_use: IndexMap<Id, Span> = IndexMap::new();
        for label in regions.iter().filter_map(RegionRecord::label) {
            let id = *label.inner();
            match first_use.get(&id) {
                Some(original) => self.diagnostics.emit(
                    Diagnostic::error(format!("region label `{id}` is defined multiple times"))
                        .with_code(ErrorCode::E202)
                        .with_label(label.span(), "duplicate label")
                        .with_secondary_label(*original, "first used here")
                        .with_help("labels must be unique; rename one of the regions"),
                ),
                None => {
                    first_use.insert(id, label.span());
                }
            }
        }
    }

    /// Gives every unlabelled region a generated label.
    fn assign_labels(regions: Vec<RegionRecord>) -> Vec<Region> {
        let authored: HashSet<Id> = regions
            .iter()
            .filter_map(|r| r.label().map(|l| *l.inner()))
            .collect();
        let mut ids = IdGenerator::new("region");

        regions
            .into_iter()
            .map(|record| {
                let label = match record.label() {
                    Some(label) => *label.inner(),
                    None => {
                        let id = ids.next_unused(|id| authored.contains(&id));
                        trace!(label:% = id, span:? = record.span(); "Generated region label");
                        id
                    }
                };
                record.into_region(label)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, record::decode};

    fn build(source: &str) -> Result<Document, ParseError> {
        let records = decode(&tokenize(source).unwrap()).unwrap();
        Builder::new(DiagramOptions::default()).build(records)
    }

    #[test]
    fn test_generated_labels_avoid_authored_ones() {
        let doc = build(
            "node,regular,0x0,0x10\n\
             node,regular,0x10,0x20,__region0\n\
             node,regular,0x20,0x30",
        )
        .unwrap();

        let labels: Vec<String> = doc.regions().iter().map(|r| r.label().to_string()).collect();
        assert_eq!(labels, vec!["__region1", "__region0", "__region2"]);
        assert!(doc.regions()[0].has_generated_label());
        assert!(!doc.regions()[1].has_generated_label());
    }

    #[test]
    fn test_duplicate_labels() {
        let source = "node,regular,0x0,0x10,heap\nnode,regular,0x10,0x20,heap";
        let err = build(source).unwrap_err();

        assert_eq!(err.diagnostics().len(), 1);
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E202));
        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.labels()[0].span(), Span::new(50..54));
        assert_eq!(diag.labels()[1].span(), Span::new(22..26));
    }

    #[test]
    fn test_config_and_annotations() {
        let doc = build(
            "config,buswidth,16\n\
             node,regular,0x0,0x10,a\n\
             regionlabel,a,A",
        )
        .unwrap();

        assert_eq!(doc.options().bus_width(), 16);
        assert_eq!(doc.annotations().len(), 1);
        assert_eq!(doc.annotations()[0].targets(), vec![Id::new("a")]);
    }

    #[test]
    fn test_reports_config_and_label_errors_together() {
        let err = build(
            "config,buswidth,7\n\
             node,regular,0x0,0x10,a\n\
             node,regular,0x10,0x20,a",
        )
        .unwrap_err();

        let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
        assert_eq!(codes, vec![ErrorCode::E103, ErrorCode::E202]);
    }
}
