//! Error taxonomy shared by every stage of the analyzer.

use crate::parser::Radix;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    /// Input does not match the digit grammar of the selected radix.
    #[error("Invalid literal '{input}' for {radix} input")]
    InvalidLiteral { input: String, radix: Radix },
    /// Field name absent from the current map, or a reserved word.
    #[error("Unknown field: {0}")]
    UnknownField(String),
    /// One entry of an imported field map is not a two-integer array.
    #[error("Invalid field spec for '{name}': {reason}")]
    InvalidFieldSpec { name: String, reason: String },
    /// The field-map document itself is unusable (empty, not JSON, not an object).
    #[error("Invalid field map: {0}")]
    InvalidFieldMap(String),
    #[error("Invalid bit range: {0}")]
    InvalidBitRange(String),
    #[error("Unknown mode: {0}")]
    UnknownMode(String),
    #[error("No value available: parse a value first")]
    NoValueAvailable,
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
