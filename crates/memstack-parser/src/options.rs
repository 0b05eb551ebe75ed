//! Decoding `config` rows into [`DiagramOptions`].
//!
//! Entries are applied over a base value supplied by the caller. A key given
//! more than once takes its last value. Unrecognised keys are ignored with a
//! warning diagnostic.
//!
//! `embed`, `noaddr`, `reverse`, `fixed` and `region_label` are presence
//! flags: the key alone switches the option on, whatever its value column
//! holds.

use indexmap::IndexMap;
use log::debug;

use memstack_core::options::{ConfigEntry, DiagramOptions, Direction};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Result},
    span::Spanned,
};

/// Largest supported address width in bits.
const MAX_BUS_WIDTH: u32 = 64;

fn invalid_value(entry: &Spanned<ConfigEntry>, expected: &str) -> Diagnostic {
    let config = entry.inner();
    Diagnostic::error(format!(
        "invalid value `{}` for config key `{}`",
        config.value(),
        config.key()
    ))
    .with_code(ErrorCode::E103)
    .with_label(entry.span(), format!("expected {expected}"))
}

fn bus_width(entry: &Spanned<ConfigEntry>) -> Result<u32> {
    entry
        .inner()
        .value()
        .parse::<u32>()
        .ok()
        .filter(|bits| *bits > 0 && bits % 8 == 0 && *bits <= MAX_BUS_WIDTH)
        .ok_or_else(|| {
            invalid_value(entry, "a width in bits")
                .with_help("bus widths are positive multiples of 8, at most 64")
        })
}

fn dimension(entry: &Spanned<ConfigEntry>) -> Result<f64> {
    entry
        .inner()
        .value()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or_else(|| invalid_value(entry, "a positive number"))
}

fn substage_label(entry: &Spanned<ConfigEntry>) -> Result<String> {
    let value = entry.inner().value();
    if value.is_empty() {
        return Err(invalid_value(entry, "a sub-stage key"));
    }
    Ok(value.to_string())
}

/// Every key [`apply`] recognises.
const KNOWN_KEYS: [&str; 9] = [
    "embed",
    "noaddr",
    "buswidth",
    "height",
    "width",
    "reverse",
    "fixed",
    "region_label",
    "substage_label",
];

/// Applies one entry. Returns `Ok(None)` for unrecognised keys.
fn apply(options: DiagramOptions, entry: &Spanned<ConfigEntry>) -> Result<Option<DiagramOptions>> {
    let options = match entry.inner().key() {
        "embed" => options.with_embed(true),
        "noaddr" => options.with_no_addr(true),
        "reverse" => options.with_direction(Direction::Descending),
        "fixed" => options.with_fixed(true),
        "region_label" => options.with_region_label(true),
        "buswidth" => options.with_bus_width(bus_width(entry)?),
        "height" => options.with_height(dimension(entry)?),
        "width" => options.with_width(dimension(entry)?),
        "substage_label" => options.with_substage_label(Some(substage_label(entry)?)),
        _ => return Ok(None),
    };
    Ok(Some(options))
}

/// Builds the diagram options from `base` and the source's config entries.
///
/// Every invalid value is reported to `collector`; the returned options
/// then keep the base value for that key.
pub(crate) fn decode_options(
    base: DiagramOptions,
    entries: &[Spanned<ConfigEntry>],
    collector: &mut DiagnosticCollector,
) -> DiagramOptions {
    let mut latest: IndexMap<&str, &Spanned<ConfigEntry>> = IndexMap::new();
    for entry in entries {
        latest.insert(entry.inner().key(), entry);
    }

    let mut options = base;
    for (key, entry) in latest {
        match apply(options.clone(), entry) {
            Ok(Some(updated)) => options = updated,
            Ok(None) => collector.emit(
                Diagnostic::warning(format!("unknown config key `{key}`"))
                    .with_label(entry.span(), "ignored")
                    .with_help(format!("known keys are {}", KNOWN_KEYS.join(", "))),
            ),
            Err(diagnostic) => collector.emit(diagnostic),
        }
    }

    debug!(
        direction:% = options.direction(),
        bus_width = options.bus_width(),
        fixed = options.fixed();
        "Decoded diagram options",
    );
    options
}
