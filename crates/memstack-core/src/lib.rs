//! Memstack Core Types and Definitions
//!
//! This crate provides the foundational types for Memstack memory map
//! diagrams. It includes:
//!
//! - **Identifiers**: Interned region labels ([`identifier::Id`]) and a
//!   collision-free generator for labels the author left out
//! - **Regions**: The [`region::Region`] interval model with its kind, growth
//!   annotation and self-consistency checks
//! - **Annotations**: Labels attached to one or more regions ([`annotation`] module)
//! - **Options**: The immutable per-diagram settings ([`options::DiagramOptions`])
//! - **Errors**: The fatal region error taxonomy ([`error::RegionError`])
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ lexer (memstack-parser)
//! Rows
//!     ↓ decoder (memstack-parser)
//! Document (these types) - regions, annotations, options
//!     ↓ resolver (memstack)
//! Resolved sequence - ordered, gap-free, fully bounded
//!     ↓ geometry (memstack)
//! Placed regions
//! ```

pub mod annotation;
pub mod document;
pub mod error;
pub mod identifier;
pub mod options;
pub mod region;

pub use error::RegionError;
