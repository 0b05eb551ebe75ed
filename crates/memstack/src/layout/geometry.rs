//! Region heights.
//!
//! A region's height is its share of the diagram's total address span, scaled
//! to the height budget. Growth regions get extra room for their arrow, and
//! every region is kept at least [`MIN_HEIGHT`] tall so that tiny regions stay
//! readable. In fixed mode every region is [`FIXED_HEIGHT`] tall.

use memstack_core::{
    options::{DiagramOptions, Direction},
    region::{Address, Region},
};

/// Smallest height a proportional region is drawn with.
pub const MIN_HEIGHT: f64 = 1.3;

/// Height of every region in fixed mode.
pub const FIXED_HEIGHT: f64 = 1.5;

/// Extra height given to regions with a growth annotation.
pub const GROWTH_BONUS: f64 = 4.0;

/// Computes the height of a single region.
///
/// A zero `total_span` yields [`MIN_HEIGHT`] (plus nothing proportional).
pub fn height(region: &Region, total_span: Address, max_height: f64, fixed: bool) -> f64 {
    if fixed {
        return FIXED_HEIGHT;
    }

    let share = match (region.width(), total_span) {
        (Some(width), span) if span > 0 => width as f64 / span as f64 * max_height,
        _ => 0.0,
    };
    let bonus = if region.growth().is_growing() {
        GROWTH_BONUS
    } else {
        0.0
    };
    (share + bonus).max(MIN_HEIGHT)
}

/// Returns the outer extent of a resolved sequence, topmost region first.
///
/// Ascending: `last.hi - first.lo`. Descending: `first.hi - last.lo`.
pub fn total_span(resolved: &[Region], direction: Direction) -> Address {
    let (Some(first), Some(last)) = (resolved.first(), resolved.last()) else {
        return 0;
    };
    let (top, bottom) = match direction {
        Direction::Ascending => (first.lo(), last.hi()),
        Direction::Descending => (last.lo(), first.hi()),
    };
    match (top, bottom) {
        (Some(lo), Some(hi)) => hi.saturating_sub(lo),
        _ => 0,
    }
}

/// Height calculator bound to one resolved sequence.
#[derive(Debug, Clone, Copy)]
pub struct HeightCalculator {
    total_span: Address,
    max_height: f64,
    fixed: bool,
}

impl HeightCalculator {
    pub fn new(options: &DiagramOptions, resolved: &[Region]) -> Self {
        Self {
            total_span: total_span(resolved, options.direction()),
            max_height: options.height(),
            fixed: options.fixed(),
        }
    }

    pub fn total_span(&self) -> Address {
        self.total_span
    }

    pub fn height(&self, region: &Region) -> f64 {
        height(region, self.total_span, self.max_height, self.fixed)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use memstack_core::{
        identifier::Id,
        region::{Growth, RegionKind},
    };

    use super::*;

    fn region(lo: Address, hi: Address) -> Region {
        Region::new(Id::new("geom"), RegionKind::Regular).with_range(Some(lo), Some(hi))
    }

    #[test]
    fn test_proportional_height() {
        assert_approx_eq!(f64, height(&region(0, 0x40), 0x100, 70.0, false), 17.5);
        assert_approx_eq!(f64, height(&region(0, 0x100), 0x100, 70.0, false), 70.0);
    }

    #[test]
    fn test_minimum_height() {
        assert_approx_eq!(f64, height(&region(0, 1), 0x10_0000, 70.0, false), MIN_HEIGHT);
        assert_approx_eq!(f64, height(&region(0, 1), 0, 70.0, false), MIN_HEIGHT);
    }

    #[test]
    fn test_growth_bonus() {
        let grows = region(0, 0x40).with_growth(Growth::Down);
        assert_approx_eq!(f64, height(&grows, 0x100, 70.0, false), 21.5);

        let tiny = region(0, 1).with_growth(Growth::Up);
        assert_approx_eq!(f64, height(&tiny, 0x10_0000, 70.0, false), 4.0 + 70.0 / 0x10_0000 as f64);
    }

    #[test]
    fn test_fixed_height_ignores_width() {
        let narrow = region(0, 1);
        let wide = region(0, 0x1000).with_growth(Growth::Up);

        assert_approx_eq!(f64, height(&narrow, 0x1000, 70.0, true), FIXED_HEIGHT);
        assert_approx_eq!(f64, height(&wide, 0x1000, 70.0, true), FIXED_HEIGHT);
    }

    #[test]
    fn test_total_span() {
        let ascending = [region(0x10, 0x20), region(0x20, 0x80)];
        let descending = [region(0x20, 0x80), region(0x10, 0x20)];

        assert_eq!(total_span(&ascending, Direction::Ascending), 0x70);
        assert_eq!(total_span(&descending, Direction::Descending), 0x70);
        assert_eq!(total_span(&[], Direction::Ascending), 0);
    }

    #[test]
    fn test_calculator_uses_options() {
        let resolved = [region(0, 0x80), region(0x80, 0x100)];
        let options = DiagramOptions::default().with_height(40.0);

        let calculator = HeightCalculator::new(&options, &resolved);

        assert_eq!(calculator.total_span(), 0x100);
        assert_approx_eq!(f64, calculator.height(&resolved[0]), 20.0);
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use memstack_core::{identifier::Id, region::RegionKind};

    use super::*;

    fn contiguous(widths: &[u64]) -> Vec<Region> {
        let mut lo = 0;
        widths
            .iter()
            .map(|&width| {
                let region = Region::new(Id::new("prop"), RegionKind::Regular)
                    .with_range(Some(lo), Some(lo + width));
                lo += width;
                region
            })
            .collect()
    }

    /// Without the floor, heights add up to the budget exactly.
    fn check_height_conservation(widths: Vec<u64>, max_height: f64) -> Result<(), TestCaseError> {
        let regions = contiguous(&widths);
        let options = DiagramOptions::default().with_height(max_height);
        let calculator = HeightCalculator::new(&options, &regions);

        let total: f64 = regions.iter().map(|r| calculator.height(r)).sum();
        let floor_allowance = MIN_HEIGHT * regions.len() as f64;

        prop_assert!(total >= max_height - 1e-6 * max_height);
        prop_assert!(total <= max_height + floor_allowance + 1e-6 * max_height);
        Ok(())
    }

    /// Heights never fall below the floor and are reproducible.
    fn check_height_floor_and_determinism(widths: Vec<u64>, fixed: bool) -> Result<(), TestCaseError> {
        let regions = contiguous(&widths);
        let options = DiagramOptions::default().with_fixed(fixed);
        let calculator = HeightCalculator::new(&options, &regions);

        for region in &regions {
            let h = calculator.height(region);
            prop_assert!(h >= MIN_HEIGHT);
            prop_assert!(approx_eq!(f64, h, calculator.height(region), ulps = 0));
            if fixed {
                prop_assert!(approx_eq!(f64, h, FIXED_HEIGHT));
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_height_conservation(
            widths in prop::collection::vec(1u64..1 << 20, 1..16),
            max_height in 1.0f64..500.0,
        ) {
            check_height_conservation(widths, max_height)?;
        }

        #[test]
        fn prop_height_floor_and_determinism(
            widths in prop::collection::vec(1u64..1 << 20, 1..16),
            fixed in any::<bool>(),
        ) {
            check_height_floor_and_determinism(widths, fixed)?;
        }
    }
}
