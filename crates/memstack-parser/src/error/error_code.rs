//! Error codes for the Memstack diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Record decoding errors
//! - `E2xx` - Region validation errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated quoted field.
    ///
    /// A field was opened with `"` but the line ended before it was closed.
    E001,

    /// Unexpected character after a quoted field.
    ///
    /// A closing `"` must be followed by a comma or the end of the line.
    E002,

    // =========================================================================
    // Decoding Errors (E1xx)
    // =========================================================================
    /// Missing column.
    ///
    /// The row has fewer columns than its kind requires.
    E100,

    /// Invalid address literal.
    ///
    /// Addresses are decimal or `0x`-prefixed hexadecimal integers.
    E101,

    /// Unknown region kind.
    ///
    /// The kind column names none of `unmapped`, `reserved`, `regular`,
    /// `registers` or `blank`, optionally prefixed by `grows up ` or
    /// `grows down `.
    E102,

    /// Invalid config value.
    ///
    /// A recognised config key was given a value it cannot take.
    E103,

    // =========================================================================
    // Region Errors (E2xx)
    // =========================================================================
    /// Negative address.
    ///
    /// Region start and end addresses must be non-negative.
    E200,

    /// Empty or inverted range.
    ///
    /// A region's end address must be greater than its start address.
    E201,

    /// Duplicate region label.
    ///
    /// Two regions were given the same label.
    E202,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated quoted field",
            ErrorCode::E002 => "unexpected character after quoted field",
            ErrorCode::E100 => "missing column",
            ErrorCode::E101 => "invalid address",
            ErrorCode::E102 => "unknown region kind",
            ErrorCode::E103 => "invalid config value",
            ErrorCode::E200 => "negative address",
            ErrorCode::E201 => "end address not after start address",
            ErrorCode::E202 => "duplicate region label",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
