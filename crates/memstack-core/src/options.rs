//! Per-diagram layout options.
//!
//! A diagram's `config` rows are decoded exactly once into a [`DiagramOptions`]
//! value, which is then passed by reference to the resolver and the geometry
//! calculator. Nothing reads configuration ad hoc after decoding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::region::Address;

/// Default address width in bits.
pub const DEFAULT_BUS_WIDTH: u32 = 32;

/// Default total height budget shared by all regions.
pub const DEFAULT_HEIGHT: f64 = 70.0;

/// Default width of a region box.
pub const DEFAULT_WIDTH: f64 = 8.0;

/// Which end of the address space is drawn at the top of the diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Low addresses at the top; regions are ordered by their start address.
    #[default]
    Ascending,
    /// High addresses at the top; regions are ordered by their end address.
    Descending,
}

impl Direction {
    /// Returns the direction selected by the `reverse` flag.
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// Returns `true` for [`Direction::Descending`].
    pub fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "ascending"),
            Self::Descending => write!(f, "descending"),
        }
    }
}

/// A raw `config` row: one key/value pair with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    key: String,
    value: String,
    line: Option<usize>,
}

impl ConfigEntry {
    /// Creates a new config entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            line: None,
        }
    }

    /// Sets the 1-based source line (builder style).
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Returns the key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value, trimmed of surrounding whitespace.
    pub fn value(&self) -> &str {
        self.value.trim()
    }

    /// Returns the source line, if known.
    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

/// Immutable layout settings for one diagram.
///
/// Every recognised option is a field with its default spelled out in
/// [`Default`]. Values are set with the `with_*` builder methods while
/// decoding and only read afterwards.
///
/// # Examples
///
/// ```
/// # use memstack_core::options::{DiagramOptions, Direction};
/// let options = DiagramOptions::default()
///     .with_direction(Direction::Descending)
///     .with_bus_width(16);
///
/// assert_eq!(options.format_address(0x1f), "0x001F");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramOptions {
    direction: Direction,
    bus_width: u32,
    height: f64,
    width: f64,
    embed: bool,
    no_addr: bool,
    fixed: bool,
    region_label: bool,
    substage_label: Option<String>,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            bus_width: DEFAULT_BUS_WIDTH,
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            embed: false,
            no_addr: false,
            fixed: false,
            region_label: false,
            substage_label: None,
        }
    }
}

impl DiagramOptions {
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the address width in bits. Callers validate the value.
    pub fn with_bus_width(mut self, bus_width: u32) -> Self {
        self.bus_width = bus_width;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_embed(mut self, embed: bool) -> Self {
        self.embed = embed;
        self
    }

    pub fn with_no_addr(mut self, no_addr: bool) -> Self {
        self.no_addr = no_addr;
        self
    }

    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn with_region_label(mut self, region_label: bool) -> Self {
        self.region_label = region_label;
        self
    }

    pub fn with_substage_label(mut self, substage_label: Option<String>) -> Self {
        self.substage_label = substage_label;
        self
    }

    /// Returns the address direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the address width in bits.
    pub fn bus_width(&self) -> u32 {
        self.bus_width
    }

    /// Returns the total height budget.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the region box width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns whether the output is wrapped for conditional inclusion.
    pub fn embed(&self) -> bool {
        self.embed
    }

    /// Returns whether address annotations are suppressed.
    pub fn no_addr(&self) -> bool {
        self.no_addr
    }

    /// Returns whether every region gets the same height.
    pub fn fixed(&self) -> bool {
        self.fixed
    }

    /// Returns whether regions are numbered in draw order.
    pub fn region_label(&self) -> bool {
        self.region_label
    }

    /// Returns the sub-stage annotation key, if any.
    pub fn substage_label(&self) -> Option<&str> {
        self.substage_label.as_deref()
    }

    /// Number of hex digits used when printing an address.
    pub fn address_digits(&self) -> usize {
        (self.bus_width / 8 * 2) as usize
    }

    /// Formats an address as fixed-width uppercase hexadecimal.
    pub fn format_address(&self, address: Address) -> String {
        format!("0x{:0width$X}", address, width = self.address_digits())
    }
}
