//! Fatal errors raised while validating and resolving regions.
//!
//! Every variant aborts the run; no diagram is produced from an inconsistent
//! model. Region descriptions embedded in the messages already carry the
//! source line, and the line numbers are also kept as fields for callers that
//! want to point at the input.

use thiserror::Error;

use crate::{options::Direction, region::Endpoint};

/// Why a single region's range is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeViolation {
    #[error("start address must be non-negative")]
    NegativeStart,
    #[error("end address must be non-negative")]
    NegativeEnd,
    #[error("end address must be greater than start address")]
    EndNotAfterStart,
}

/// The region error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    /// A region's own endpoints are malformed.
    #[error("bad address range for {region}: {violation}")]
    Range {
        region: String,
        line: Option<usize>,
        violation: RangeViolation,
    },

    /// The endpoint the active direction sorts by is missing.
    #[error("{region} has no {endpoint} address, which {direction} layouts require on every region")]
    IncompleteRange {
        region: String,
        line: Option<usize>,
        endpoint: Endpoint,
        direction: Direction,
    },

    /// A trailing endpoint is missing and there is no following region to infer it from.
    #[error("{region} has no {endpoint} address and no following region to infer it from")]
    Unresolved {
        region: String,
        line: Option<usize>,
        endpoint: Endpoint,
    },

    /// Two regions' intervals intersect.
    #[error("address ranges overlap between {first} and {second}")]
    Overlap {
        first: String,
        first_line: Option<usize>,
        second: String,
        second_line: Option<usize>,
    },

    /// An annotation names a region label that does not exist.
    #[error("region label `{label}` does not exist{}", at_line(.line))]
    UnknownLabel { label: String, line: Option<usize> },
}

impl RegionError {
    /// Returns the source lines this error refers to, primary first.
    pub fn lines(&self) -> Vec<usize> {
        match self {
            RegionError::Range { line, .. }
            | RegionError::IncompleteRange { line, .. }
            | RegionError::Unresolved { line, .. }
            | RegionError::UnknownLabel { line, .. } => line.iter().copied().collect(),
            RegionError::Overlap {
                first_line,
                second_line,
                ..
            } => first_line.iter().chain(second_line).copied().collect(),
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|line| format!(" (referenced at line {line})"))
        .unwrap_or_default()
}
