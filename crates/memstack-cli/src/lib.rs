//! CLI logic for the Memstack layout tool.
//!
//! Reads a memory map, resolves its layout and writes the result as JSON
//! for an emitter to draw.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use memstack::{DiagramBuilder, MemstackError};

/// Run the Memstack CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `MemstackError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Layout errors
/// - Serialization errors
pub fn run(args: &Args) -> Result<(), MemstackError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing memory map"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let document = builder.parse(&source)?;
    let layout = builder.resolve(&document)?;
    let json = builder.render_json(&layout)?;

    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Layout exported successfully");

    Ok(())
}
