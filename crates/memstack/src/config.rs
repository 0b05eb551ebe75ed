//! Application configuration for Memstack.
//!
//! [`AppConfig`] holds settings that apply to every diagram processed in a
//! run. It implements [`serde::Deserialize`] so it can be loaded from a TOML
//! file; missing sections and keys fall back to their defaults.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration.
//! - [`DefaultsConfig`] - Diagram options in effect before a source's own
//!   `config` rows are applied.
//!
//! # Example
//!
//! ```
//! # use memstack::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.defaults().diagram_options().bus_width(), 32);
//! ```

use serde::Deserialize;
use thiserror::Error;

use memstack_core::options::{
    DEFAULT_BUS_WIDTH, DEFAULT_HEIGHT, DEFAULT_WIDTH, DiagramOptions, Direction,
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Per-diagram defaults section.
    #[serde(default)]
    defaults: DefaultsConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given defaults.
    pub fn new(defaults: DefaultsConfig) -> Self {
        Self { defaults }
    }

    /// Returns the per-diagram defaults.
    pub fn defaults(&self) -> &DefaultsConfig {
        &self.defaults
    }
}

/// A `[defaults]` value that a `config` row would reject.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidDefault {
    #[error("Invalid bus_width {0} in config: expected a positive multiple of 8, at most 64")]
    BusWidth(u32),

    #[error("Invalid {key} {value} in config: expected a positive number")]
    Dimension { key: &'static str, value: f64 },
}

/// Diagram option defaults, the `[defaults]` table of the config file.
///
/// ```toml
/// [defaults]
/// bus_width = 64
/// height = 90.0
/// reverse = true
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    bus_width: u32,
    height: f64,
    width: f64,
    reverse: bool,
    fixed: bool,
    no_addr: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            bus_width: DEFAULT_BUS_WIDTH,
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            reverse: false,
            fixed: false,
            no_addr: false,
        }
    }
}

impl DefaultsConfig {
    /// Returns the base [`DiagramOptions`] described by these defaults.
    pub fn diagram_options(&self) -> DiagramOptions {
        DiagramOptions::default()
            .with_bus_width(self.bus_width)
            .with_height(self.height)
            .with_width(self.width)
            .with_direction(Direction::from_reverse(self.reverse))
            .with_fixed(self.fixed)
            .with_no_addr(self.no_addr)
    }

    /// Checks the values against the same rules as `config` rows.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDefault`] for the first invalid value.
    pub fn validate(&self) -> Result<(), InvalidDefault> {
        if self.bus_width == 0 || self.bus_width % 8 != 0 || self.bus_width > 64 {
            return Err(InvalidDefault::BusWidth(self.bus_width));
        }
        for (key, value) in [("height", self.height), ("width", self.width)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(InvalidDefault::Dimension { key, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_default_matches_diagram_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.defaults().diagram_options(), DiagramOptions::default());
        assert!(config.defaults().validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_table() {
        let config: AppConfig = toml::from_str(
            r#"
            [defaults]
            bus_width = 64
            reverse = true
            "#,
        )
        .unwrap();
        let options = config.defaults().diagram_options();

        assert_eq!(options.bus_width(), 64);
        assert_eq!(options.direction(), Direction::Descending);
        assert_approx_eq!(f64, options.height(), DEFAULT_HEIGHT);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config.defaults().diagram_options(), DiagramOptions::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_width: AppConfig = toml::from_str("[defaults]\nbus_width = 12").unwrap();
        let bad_height: AppConfig = toml::from_str("[defaults]\nheight = -3.0").unwrap();

        assert_eq!(
            bad_width.defaults().validate(),
            Err(InvalidDefault::BusWidth(12))
        );
        assert_eq!(
            bad_height.defaults().validate(),
            Err(InvalidDefault::Dimension {
                key: "height",
                value: -3.0
            })
        );
    }
}
