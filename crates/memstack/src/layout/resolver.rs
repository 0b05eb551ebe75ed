//! The layout resolver.
//!
//! Turns the authored, unordered regions of a document into the resolved
//! sequence: ordered for drawing, free of overlaps, with every endpoint
//! defined and every address gap covered by a synthetic blank region.
//!
//! Resolution runs in three phases, each completing before the next starts:
//!
//! 1. **Endpoint check** - every region has the endpoint the direction sorts
//!    by, and no region's range is empty or inverted.
//! 2. **Sort and sweep** - regions are sorted by that endpoint alone, then a
//!    single pass over adjacent pairs rejects overlaps.
//! 3. **Gap fill** - missing trailing endpoints are inferred from the next
//!    region, blanks are appended for gaps and the sequence is re-sorted.

use std::collections::HashSet;

use log::{debug, trace};

use memstack_core::{
    RegionError,
    identifier::{Id, IdGenerator},
    options::{DiagramOptions, Direction},
    region::{Address, Endpoint, Region},
};

use crate::layout::interval;

/// Resolves one document's regions under fixed options.
#[derive(Debug)]
pub struct LayoutResolver<'a> {
    options: &'a DiagramOptions,
}

impl<'a> LayoutResolver<'a> {
    pub fn new(options: &'a DiagramOptions) -> Self {
        Self { options }
    }

    fn direction(&self) -> Direction {
        self.options.direction()
    }

    /// Produces the resolved region sequence, topmost region first.
    ///
    /// # Errors
    ///
    /// - [`RegionError::Range`] for a region whose end is not after its start.
    /// - [`RegionError::IncompleteRange`] for a region missing the endpoint
    ///   the direction sorts by.
    /// - [`RegionError::Overlap`] for two intersecting regions.
    /// - [`RegionError::Unresolved`] when the last region's trailing endpoint
    ///   is missing, since there is no following region to infer it from.
    pub fn resolve(&self, regions: &[Region]) -> Result<Vec<Region>, RegionError> {
        debug!(regions = regions.len(), direction:% = self.direction(); "Resolving layout");

        self.check_endpoints(regions)?;
        let sorted = self.sorted(regions.to_vec())?;
        self.sweep(&sorted)?;
        let resolved = self.fill_gaps(sorted)?;

        debug!(regions = resolved.len(); "Layout resolved");
        Ok(resolved)
    }

    fn check_endpoints(&self, regions: &[Region]) -> Result<(), RegionError> {
        for region in regions {
            region.check_range()?;
            region.check_required_endpoint(self.direction())?;
        }
        Ok(())
    }

    /// Sorts by the leading endpoint only. The sort is stable.
    fn sorted(&self, regions: Vec<Region>) -> Result<Vec<Region>, RegionError> {
        let direction = self.direction();
        let mut keyed = regions
            .into_iter()
            .map(|region| Ok((region.required_leading(direction)?, region)))
            .collect::<Result<Vec<(Address, Region)>, RegionError>>()?;

        keyed.sort_by(|(a, _), (b, _)| interval::draw_order(*a, *b, direction));
        Ok(keyed.into_iter().map(|(_, region)| region).collect())
    }

    /// Rejects overlaps between neighbours of a sorted sequence.
    ///
    /// Checking adjacent pairs suffices: if a region overlapped one further
    /// down, it would also overlap everything in between.
    fn sweep(&self, sorted: &[Region]) -> Result<(), RegionError> {
        for pair in sorted.windows(2) {
            if interval::overlaps(&pair[0], &pair[1], self.direction())? {
                return Err(interval::overlap_error(&pair[0], &pair[1]));
            }
        }
        Ok(())
    }

    /// Infers missing trailing endpoints and covers gaps with blank regions.
    fn fill_gaps(&self, mut sorted: Vec<Region>) -> Result<Vec<Region>, RegionError> {
        let direction = self.direction();
        let taken: HashSet<Id> = sorted.iter().map(Region::label).collect();
        let mut blank_ids = IdGenerator::new("blank");
        let mut blanks = Vec::new();

        for index in 0..sorted.len() {
            let next = match sorted.get(index + 1) {
                Some(next) => next.required_leading(direction)?,
                None => break,
            };
            let region = &mut sorted[index];

            let Some(trailing) = region.trailing(direction) else {
                trace!(region:% = region.label(), address = next; "Inferred trailing endpoint");
                region.set_trailing(direction, next);
                continue;
            };

            let gap = match direction {
                Direction::Ascending if trailing < next => Some((trailing, next)),
                Direction::Descending if next < trailing => Some((next, trailing)),
                _ => None,
            };
            if let Some((lo, hi)) = gap {
                let label = blank_ids.next_unused(|id| taken.contains(&id));
                trace!(label:% = label, lo, hi; "Inserting blank region");
                blanks.push(Region::blank(label, lo, hi));
            }
        }

        if let Some(last) = sorted.last() {
            if last.trailing(direction).is_none() {
                return Err(RegionError::Unresolved {
                    region: last.to_string(),
                    line: last.line(),
                    endpoint: Endpoint::trailing(direction),
                });
            }
        }

        debug!(blanks = blanks.len(); "Filled address gaps");
        sorted.extend(blanks);
        self.sorted(sorted)
    }
}
