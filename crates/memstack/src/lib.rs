//! Memstack - stacked memory map layouts from tabular descriptions.
//!
//! Parsing, validation and layout resolution for memory map diagrams. A
//! source lists address regions, labels attached to them and per-diagram
//! options; Memstack orders the regions, checks that they never overlap,
//! fills address gaps and computes how tall each region is drawn. The
//! resulting [`ResolvedLayout`](layout::ResolvedLayout) is handed to an
//! emitter as JSON.

pub mod config;
pub mod layout;

mod error;

pub use memstack_core::{RegionError, annotation, document, identifier, options, region};

pub use error::MemstackError;

use log::{debug, info, trace};

use config::AppConfig;
use document::Document;
use layout::ResolvedLayout;

/// Builder for parsing and resolving Memstack diagrams.
///
/// # Examples
///
/// ```rust
/// use memstack::{DiagramBuilder, config::AppConfig};
///
/// let source = "\
/// node, regular, 0x0, 0x10, a, First
/// node, regular, 0x20, 0x30, b, Second
/// ";
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Parse source to a document
/// let document = builder.parse(source)
///     .expect("Failed to parse");
///
/// // Resolve the document into its final layout
/// let layout = builder.resolve(&document)
///     .expect("Failed to resolve");
/// assert_eq!(layout.regions().len(), 3);
///
/// // Serialize for an emitter
/// let json = builder.render_json(&layout)
///     .expect("Failed to render");
/// assert!(json.contains("\"__blank0\""));
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration supplying default diagram options
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse source text into a document.
    ///
    /// The configuration's defaults apply first; the source's own `config`
    /// rows override them.
    ///
    /// # Errors
    ///
    /// Returns [`MemstackError::Parse`] with every diagnostic found.
    pub fn parse(&self, source: &str) -> Result<Document, MemstackError> {
        info!("Parsing memory map");

        let base = self.config.defaults().diagram_options();
        let document = memstack_parser::parse(source, base)
            .map_err(|err| MemstackError::new_parse_error(err, source))?;

        debug!(regions = document.regions().len(); "Memory map parsed successfully");
        trace!(document:?; "Parsed document");

        Ok(document)
    }

    /// Resolve a document into its final layout.
    ///
    /// # Errors
    ///
    /// Returns [`MemstackError::Layout`] for range, overlap, unresolved
    /// endpoint or unknown label errors.
    pub fn resolve(&self, document: &Document) -> Result<ResolvedLayout, MemstackError> {
        info!(direction:% = document.options().direction(); "Resolving layout");
        let layout = ResolvedLayout::from_document(document)?;
        debug!(regions = layout.regions().len(); "Layout resolved successfully");
        Ok(layout)
    }

    /// Serialize a resolved layout as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MemstackError::Export`] if serialization fails.
    pub fn render_json(&self, layout: &ResolvedLayout) -> Result<String, MemstackError> {
        let json = serde_json::to_string_pretty(layout)?;
        info!(bytes = json.len(); "Layout serialized");
        Ok(json)
    }
}
