//! Layout resolution.
//!
//! Takes a parsed [`Document`] to a [`ResolvedLayout`]: the final draw order
//! of regions, each with its height and address labels, plus the document's
//! annotations. This is everything an emitter needs to draw the diagram.

pub mod geometry;
pub mod interval;
pub mod labels;
mod resolver;

pub use resolver::LayoutResolver;

use log::{debug, info};
use serde::Serialize;

use memstack_core::{
    RegionError,
    annotation::Annotation,
    document::Document,
    options::{DiagramOptions, Direction},
    region::Region,
};

use geometry::HeightCalculator;

/// A resolved region together with how it is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedRegion {
    region: Region,
    height: f64,
    top_address: Option<String>,
    bottom_address: Option<String>,
    number: Option<usize>,
}

impl PlacedRegion {
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Returns the drawn height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the address printed at the top edge, if any.
    pub fn top_address(&self) -> Option<&str> {
        self.top_address.as_deref()
    }

    /// Returns the address printed at the bottom edge, if any.
    pub fn bottom_address(&self) -> Option<&str> {
        self.bottom_address.as_deref()
    }

    /// Returns the region's 0-based draw position when numbering is enabled.
    pub fn number(&self) -> Option<usize> {
        self.number
    }
}

/// The fully resolved diagram, topmost region first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLayout {
    options: DiagramOptions,
    regions: Vec<PlacedRegion>,
    annotations: Vec<Annotation>,
}

impl ResolvedLayout {
    /// Resolves a document.
    ///
    /// Runs the layout resolver, validates the annotations against its
    /// output, then computes heights and address labels.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegionError`] found; no partial layout is produced.
    pub fn from_document(document: &Document) -> Result<Self, RegionError> {
        let options = document.options();

        let resolved = LayoutResolver::new(options).resolve(document.regions())?;
        labels::validate(document.annotations(), &resolved)?;

        let heights = HeightCalculator::new(options, &resolved);
        debug!(total_span = heights.total_span(); "Computing region geometry");

        let count = resolved.len();
        let regions = resolved
            .into_iter()
            .enumerate()
            .map(|(index, region)| {
                let (top_address, bottom_address) = address_labels(options, &region, index, count);
                PlacedRegion {
                    height: heights.height(&region),
                    number: options.region_label().then_some(index),
                    top_address,
                    bottom_address,
                    region,
                }
            })
            .collect::<Vec<_>>();

        info!(regions = regions.len(), annotations = document.annotations().len(); "Layout complete");
        Ok(Self {
            options: options.clone(),
            regions,
            annotations: document.annotations().to_vec(),
        })
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    /// Returns the placed regions in draw order.
    pub fn regions(&self) -> &[PlacedRegion] {
        &self.regions
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Picks the address labels for the region at `index` of `count`.
///
/// Each boundary between two regions is labelled once: ascending layouts
/// label every region's top (`lo`) and the last region's bottom (`hi`);
/// descending layouts label the first region's top (`hi`) and every
/// region's bottom (`lo`).
fn address_labels(
    options: &DiagramOptions,
    region: &Region,
    index: usize,
    count: usize,
) -> (Option<String>, Option<String>) {
    if options.no_addr() {
        return (None, None);
    }
    let format = |address: Option<u64>| address.map(|a| options.format_address(a));

    match options.direction() {
        Direction::Ascending => {
            let bottom = if index + 1 == count { region.hi() } else { None };
            (format(region.lo()), format(bottom))
        }
        Direction::Descending => {
            let top = if index == 0 { region.hi() } else { None };
            (format(top), format(region.lo()))
        }
    }
}
