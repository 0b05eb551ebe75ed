//! Labels drawn next to regions.
//!
//! Annotations refer to regions by label only; whether those labels exist is
//! checked after the layout is resolved.

use serde::Serialize;

use crate::identifier::Id;

/// A label attached to exactly one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionLabel {
    target: Id,
    comment: String,
    line: Option<usize>,
}

impl RegionLabel {
    pub fn new(target: Id, comment: impl Into<String>) -> Self {
        Self {
            target,
            comment: comment.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

/// A label bracketing every region from `top` down to `bottom`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiRegionLabel {
    top: Id,
    bottom: Id,
    comment: String,
    line: Option<usize>,
}

impl MultiRegionLabel {
    pub fn new(top: Id, bottom: Id, comment: impl Into<String>) -> Self {
        Self {
            top,
            bottom,
            comment: comment.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn top(&self) -> Id {
        self.top
    }

    pub fn bottom(&self) -> Id {
        self.bottom
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

/// Either kind of region annotation, in authored order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    Region(RegionLabel),
    MultiRegion(MultiRegionLabel),
}

impl Annotation {
    /// Returns every region label this annotation refers to.
    pub fn targets(&self) -> Vec<Id> {
        match self {
            Annotation::Region(label) => vec![label.target],
            Annotation::MultiRegion(label) => vec![label.top, label.bottom],
        }
    }

    /// Returns the annotation text.
    pub fn comment(&self) -> &str {
        match self {
            Annotation::Region(label) => label.comment(),
            Annotation::MultiRegion(label) => label.comment(),
        }
    }

    /// Returns the 1-based source line, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Annotation::Region(label) => label.line,
            Annotation::MultiRegion(label) => label.line,
        }
    }
}

impl From<RegionLabel> for Annotation {
    fn from(label: RegionLabel) -> Self {
        Annotation::Region(label)
    }
}

impl From<MultiRegionLabel> for Annotation {
    fn from(label: MultiRegionLabel) -> Self {
        Annotation::MultiRegion(label)
    }
}
