/*!
 * Error types for the scriptparse pipeline.
 *
 * This module contains custom error types for the parsing pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised when validating raw script input.
///
/// Both kinds are terminal for a single parse call and are never retried
/// internally. Unrecognized or malformed lines never raise: they degrade
/// to action entries instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Raw input is empty or entirely whitespace, detected before any processing
    #[error("Script text cannot be empty")]
    EmptyInput,

    /// Normalization yielded zero usable lines (e.g. control-character-only input)
    #[error("No valid content found in script")]
    NoContent,
}

impl ParseError {
    /// Stable machine-readable code for per-document batch reporting
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::NoContent => "no_content",
        }
    }
}
