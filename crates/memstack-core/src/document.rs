//! The decoded, not yet resolved, contents of one diagram source.

use crate::{annotation::Annotation, options::DiagramOptions, region::Region};

/// Everything the decoder extracted from a source: authored regions in source
/// order, annotations, and the diagram's options.
#[derive(Debug, Clone, Default)]
pub struct Document {
    regions: Vec<Region>,
    annotations: Vec<Annotation>,
    options: DiagramOptions,
}

impl Document {
    pub fn new(regions: Vec<Region>, annotations: Vec<Annotation>, options: DiagramOptions) -> Self {
        Self {
            regions,
            annotations,
            options,
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }
}
