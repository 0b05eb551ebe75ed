//! Pairwise interval checks between regions.
//!
//! All checks are direction-aware and treat ranges as half-open `[lo, hi)`.
//! Regions are compared by their leading endpoint (`lo` when ascending,
//! `hi` when descending); a missing trailing endpoint is assumed to stop
//! where the next region starts.

use std::cmp::Ordering;

use memstack_core::{
    RegionError,
    options::Direction,
    region::{Address, Region},
};

/// Orders two leading endpoints so that the one drawn first is `Less`.
pub fn draw_order(a: Address, b: Address, direction: Direction) -> Ordering {
    match direction {
        Direction::Ascending => a.cmp(&b),
        Direction::Descending => b.cmp(&a),
    }
}

/// Builds the error for two intersecting regions, in draw order.
pub fn overlap_error(first: &Region, second: &Region) -> RegionError {
    RegionError::Overlap {
        first: first.to_string(),
        first_line: first.line(),
        second: second.to_string(),
        second_line: second.line(),
    }
}

/// Returns `true` if `a` and `b` share any address.
///
/// Regions with the same leading endpoint always overlap. Otherwise the
/// region drawn first overlaps the other exactly when its trailing endpoint
/// reaches past the other's leading endpoint; if that trailing endpoint is
/// missing the pair does not overlap.
///
/// # Errors
///
/// Returns [`RegionError::IncompleteRange`] if either region lacks its
/// leading endpoint.
pub fn overlaps(a: &Region, b: &Region, direction: Direction) -> Result<bool, RegionError> {
    let a_key = a.required_leading(direction)?;
    let b_key = b.required_leading(direction)?;
    let (first, second_key) = match draw_order(a_key, b_key, direction) {
        Ordering::Equal => return Ok(true),
        Ordering::Less => (a, b_key),
        Ordering::Greater => (b, a_key),
    };

    Ok(match (direction, first.trailing(direction)) {
        (_, None) => false,
        (Direction::Ascending, Some(hi)) => hi > second_key,
        (Direction::Descending, Some(lo)) => lo < second_key,
    })
}

/// Compares two regions in draw order, validating them on the way.
///
/// Never returns [`Ordering::Equal`]: regions that cannot be strictly
/// ordered overlap, and that is reported as an error rather than a tie.
///
/// # Errors
///
/// Returns [`RegionError::IncompleteRange`] for a missing leading endpoint
/// and [`RegionError::Overlap`] for intersecting regions.
pub fn compare(a: &Region, b: &Region, direction: Direction) -> Result<Ordering, RegionError> {
    let order = draw_order(
        a.required_leading(direction)?,
        b.required_leading(direction)?,
        direction,
    );
    if overlaps(a, b, direction)? {
        return Err(match order {
            Ordering::Greater => overlap_error(b, a),
            _ => overlap_error(a, b),
        });
    }
    Ok(order)
}
