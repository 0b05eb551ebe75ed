//! # Memstack Parser
//!
//! Decoder for the comma-separated memory map format. This crate turns
//! source text into a [`Document`]: authored regions, label annotations and
//! the diagram's options, ready to be resolved into a layout.
//!
//! ## Usage
//!
//! ```
//! # use memstack_parser::{parse, ParseError};
//! # use memstack_core::options::DiagramOptions;
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "\
//! config, buswidth, 16
//! node, regular, 0x0000, 0x4000, text, Code
//! node, grows down regular, 0x8000, 0xA000, stack, Stack
//! regionlabel, stack, grows toward lower addresses
//! ";
//!
//!     let document = parse(source, DiagramOptions::default())?;
//!     assert_eq!(document.regions().len(), 2);
//!     assert_eq!(document.options().bus_width(), 16);
//!     Ok(())
//! }
//! ```

mod elaborate;
pub mod error;
mod lexer;
mod options;
mod record;
mod span;

pub use error::ParseError;
pub use lexer::Row;
pub use record::{Record, RegionRecord};
pub use span::{Span, Spanned};

use log::debug;

use memstack_core::{document::Document, options::DiagramOptions};

use elaborate::Builder;

/// Parse source text into a document.
///
/// This is the main entry point of the crate. It runs the decoding pipeline:
///
/// 1. **Tokenize** - Split source text into rows of fields
/// 2. **Decode** - Turn each row into a typed record
/// 3. **Assemble** - Check labels, name unlabelled regions, apply `config` rows
///
/// # Arguments
///
/// * `source` - The memory map source text
/// * `base` - Options in effect before the source's own `config` rows
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every diagnostic found in the first
/// failing stage.
pub fn parse(source: &str, base: DiagramOptions) -> Result<Document, ParseError> {
    // Step 1: Tokenize
    let rows = lexer::tokenize(source)?;
    debug!(rows = rows.len(); "Tokenized source");

    // Step 2: Decode
    let records = record::decode(&rows)?;

    // Step 3: Assemble
    Builder::new(base).build(records)
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Any bounded, well-formed region row decodes to the same addresses.
    fn check_addresses_survive_decoding(
        lo: u64,
        width: u64,
        hex: bool,
    ) -> Result<(), TestCaseError> {
        let hi = lo + width;
        let source = if hex {
            format!("node,regular,{lo:#x},{hi:#X},r")
        } else {
            format!("node,regular,{lo},{hi},r")
        };

        let doc = parse(&source, DiagramOptions::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(doc.regions()[0].lo(), Some(lo));
        prop_assert_eq!(doc.regions()[0].hi(), Some(hi));
        Ok(())
    }

    /// The decoder never panics, whatever the input.
    fn check_parse_is_total(source: &str) -> Result<(), TestCaseError> {
        let _ = parse(source, DiagramOptions::default());
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_addresses_survive_decoding(
            lo in 0u64..1 << 48,
            width in 1u64..1 << 16,
            hex in any::<bool>(),
        ) {
            check_addresses_survive_decoding(lo, width, hex)?;
        }

        #[test]
        fn prop_parse_is_total(source in "[a-z0-9x,\" \\n_-]{0,64}") {
            check_parse_is_total(&source)?;
        }
    }
}
