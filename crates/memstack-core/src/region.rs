//! The region model.
//!
//! A [`Region`] is a labelled, half-open interval `[lo, hi)` of address
//! space. Before resolution either endpoint may be missing; which one is
//! required depends on the [`Direction`] the diagram is drawn in:
//!
//! | Direction    | Sort key | Leading edge | Trailing edge |
//! |--------------|----------|--------------|---------------|
//! | `Ascending`  | `lo`     | `lo`         | `hi`          |
//! | `Descending` | `hi`     | `hi`         | `lo`          |
//!
//! The leading edge is the one drawn at the top of the region's box.

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use crate::{
    error::{RangeViolation, RegionError},
    identifier::Id,
    options::Direction,
};

/// An address in the diagram's address space.
pub type Address = u64;

/// Semantic category of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Unmapped,
    Reserved,
    Regular,
    Registers,
    /// Synthetic filler for an address gap between authored regions.
    Blank,
}

impl RegionKind {
    /// Every kind, in declaration order.
    pub const ALL: [RegionKind; 5] = [
        RegionKind::Unmapped,
        RegionKind::Reserved,
        RegionKind::Regular,
        RegionKind::Registers,
        RegionKind::Blank,
    ];

    /// Returns the canonical spelling of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionKind::Unmapped => "unmapped",
            RegionKind::Reserved => "reserved",
            RegionKind::Regular => "regular",
            RegionKind::Registers => "registers",
            RegionKind::Blank => "blank",
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a kind string names no known [`RegionKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown region kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for RegionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unmapped" | "notmapped" => Ok(RegionKind::Unmapped),
            "reserved" => Ok(RegionKind::Reserved),
            "regular" => Ok(RegionKind::Regular),
            "registers" => Ok(RegionKind::Registers),
            "blank" | "rempty" => Ok(RegionKind::Blank),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Growth annotation carried alongside a region's base kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Growth {
    #[default]
    None,
    Up,
    Down,
}

impl Growth {
    const PREFIXES: [(&'static str, Growth); 4] = [
        ("grows down ", Growth::Down),
        ("grow down ", Growth::Down),
        ("grows up ", Growth::Up),
        ("grow up ", Growth::Up),
    ];

    /// Splits a growth prefix off a kind string.
    ///
    /// Returns the growth annotation and the remaining base kind text.
    ///
    /// # Examples
    ///
    /// ```
    /// # use memstack_core::region::Growth;
    /// assert_eq!(Growth::split_prefix("grows down regular"), (Growth::Down, "regular"));
    /// assert_eq!(Growth::split_prefix("reserved"), (Growth::None, "reserved"));
    /// ```
    pub fn split_prefix(kind: &str) -> (Growth, &str) {
        let kind = kind.trim();
        Self::PREFIXES
            .iter()
            .find_map(|(prefix, growth)| {
                kind.strip_prefix(prefix)
                    .map(|rest| (*growth, rest.trim_start()))
            })
            .unwrap_or((Growth::None, kind))
    }

    /// Returns `true` unless this is [`Growth::None`].
    pub fn is_growing(self) -> bool {
        !matches!(self, Growth::None)
    }
}

/// Parses an annotated kind string such as `"grows up regular"`.
///
/// # Errors
///
/// Returns [`UnknownKind`] if the base kind is not recognised.
pub fn parse_kind(kind: &str) -> Result<(RegionKind, Growth), UnknownKind> {
    let (growth, base) = Growth::split_prefix(kind);
    Ok((base.parse()?, growth))
}

/// One of the two endpoints of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// The inclusive low address, `lo`.
    Start,
    /// The exclusive high address, `hi`.
    End,
}

impl Endpoint {
    /// The endpoint a region is ordered by in `direction`.
    pub fn leading(direction: Direction) -> Self {
        match direction {
            Direction::Ascending => Endpoint::Start,
            Direction::Descending => Endpoint::End,
        }
    }

    /// The endpoint that may be inferred from the next region in `direction`.
    pub fn trailing(direction: Direction) -> Self {
        match direction {
            Direction::Ascending => Endpoint::End,
            Direction::Descending => Endpoint::Start,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::End => write!(f, "end"),
        }
    }
}

/// A named span of address space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    label: Id,
    kind: RegionKind,
    growth: Growth,
    lo: Option<Address>,
    hi: Option<Address>,
    comment: String,
    generated_label: bool,
    line: Option<usize>,
}

impl Region {
    /// Creates an unbounded region. Set the range with [`Region::with_range`].
    pub fn new(label: Id, kind: RegionKind) -> Self {
        Self {
            label,
            kind,
            growth: Growth::None,
            lo: None,
            hi: None,
            comment: String::new(),
            generated_label: false,
            line: None,
        }
    }

    /// Creates a synthetic blank region covering `[lo, hi)`.
    pub fn blank(label: Id, lo: Address, hi: Address) -> Self {
        Self::new(label, RegionKind::Blank)
            .with_range(Some(lo), Some(hi))
            .with_generated_label()
    }

    pub fn with_range(mut self, lo: Option<Address>, hi: Option<Address>) -> Self {
        self.lo = lo;
        self.hi = hi;
        self
    }

    pub fn with_growth(mut self, growth: Growth) -> Self {
        self.growth = growth;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Marks the label as generated rather than authored.
    pub fn with_generated_label(mut self) -> Self {
        self.generated_label = true;
        self
    }

    pub fn label(&self) -> Id {
        self.label
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    pub fn growth(&self) -> Growth {
        self.growth
    }

    pub fn lo(&self) -> Option<Address> {
        self.lo
    }

    pub fn hi(&self) -> Option<Address> {
        self.hi
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns the 1-based source line, or `None` for synthetic regions.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Returns `true` if the label was generated rather than authored.
    pub fn has_generated_label(&self) -> bool {
        self.generated_label
    }

    /// Returns the requested endpoint.
    pub fn endpoint(&self, endpoint: Endpoint) -> Option<Address> {
        match endpoint {
            Endpoint::Start => self.lo,
            Endpoint::End => self.hi,
        }
    }

    /// Returns the endpoint drawn at the top of the region in `direction`.
    pub fn leading(&self, direction: Direction) -> Option<Address> {
        self.endpoint(Endpoint::leading(direction))
    }

    /// Returns the endpoint drawn at the bottom of the region in `direction`.
    pub fn trailing(&self, direction: Direction) -> Option<Address> {
        self.endpoint(Endpoint::trailing(direction))
    }

    /// Fills in the trailing endpoint for `direction`.
    pub fn set_trailing(&mut self, direction: Direction, address: Address) {
        match Endpoint::trailing(direction) {
            Endpoint::Start => self.lo = Some(address),
            Endpoint::End => self.hi = Some(address),
        }
    }

    /// Returns `hi - lo` once both endpoints are known.
    pub fn width(&self) -> Option<Address> {
        let (lo, hi) = (self.lo?, self.hi?);
        debug_assert!(hi > lo, "width of an unchecked range [{lo:#x}, {hi:#x})");
        Some(hi.saturating_sub(lo))
    }

    /// Returns `true` once both endpoints are defined.
    pub fn is_bounded(&self) -> bool {
        self.lo.is_some() && self.hi.is_some()
    }

    /// Checks that the end address lies strictly above the start address.
    ///
    /// Negative addresses cannot be represented by [`Address`]; the decoder
    /// reports them as [`RangeViolation`]s before a region exists.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Range`] when both endpoints are defined and
    /// `hi <= lo`.
    pub fn check_range(&self) -> Result<(), RegionError> {
        match (self.lo, self.hi) {
            (Some(lo), Some(hi)) if hi <= lo => Err(RegionError::Range {
                region: self.to_string(),
                line: self.line,
                violation: RangeViolation::EndNotAfterStart,
            }),
            _ => Ok(()),
        }
    }

    /// Returns the endpoint `direction` sorts by.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::IncompleteRange`] if it is missing.
    pub fn required_leading(&self, direction: Direction) -> Result<Address, RegionError> {
        self.leading(direction)
            .ok_or_else(|| RegionError::IncompleteRange {
                region: self.to_string(),
                line: self.line,
                endpoint: Endpoint::leading(direction),
                direction,
            })
    }

    /// Checks that the endpoint `direction` sorts by is present.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::IncompleteRange`] if it is missing.
    pub fn check_required_endpoint(&self, direction: Direction) -> Result<(), RegionError> {
        self.required_leading(direction).map(|_| ())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn address(value: Option<Address>) -> String {
            value.map_or_else(|| "?".to_string(), |a| format!("{a:#x}"))
        }

        write!(
            f,
            "region `{}` [{}, {}) ({})",
            self.label,
            address(self.lo),
            address(self.hi),
            self.kind
        )?;
        if let Some(line) = self.line {
            write!(f, " at line {line}")?;
        }
        Ok(())
    }
}
