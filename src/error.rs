//! Error types for the pulse simulator.
//!
//! This module provides a unified error type [`PulseError`] that covers
//! all error conditions of the outer layers: parsing the circuit description,
//! building the module graph, and reading input files. The pulse engine
//! itself assumes a validated graph and never fails.

use thiserror::Error;

/// Result type alias using [`PulseError`].
pub type Result<T> = std::result::Result<T, PulseError>;

/// Unified error type for all pulse simulator operations.
#[derive(Error, Debug)]
pub enum PulseError {
    // ============ Parsing Errors ============
    /// A declaration without the `->` separator
    #[error("Missing '->' in module declaration at line {line}")]
    MissingArrow { line: usize },

    /// Malformed declaration
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    // ============ Graph Building Errors ============
    /// Same module declared as a source twice
    #[error("Duplicate module '{name}' at line {line}")]
    DuplicateModule { name: String, line: usize },

    /// Module listing itself among its own outputs
    #[error("Module '{name}' at line {line} outputs to itself")]
    SelfLoop { name: String, line: usize },

    /// No broadcast module declared
    #[error("Circuit has no broadcast module (declare one without a '%' or '&' prefix)")]
    MissingBroadcaster,

    /// More than one broadcast module declared
    #[error("Circuit has more than one broadcast module: '{first}' and '{second}'")]
    MultipleBroadcasters { first: String, second: String },

    /// Invalid module graph
    #[error("Invalid circuit topology: {message}")]
    InvalidTopology { message: String },

    // ============ Simulation Errors ============
    /// Pulse totals exceed the counter range
    #[error("Pulse counts overflow over {presses} presses")]
    CountOverflow { presses: u64 },

    // ============ I/O Errors ============
    /// Error reading circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PulseError {
    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid topology error
    pub fn topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }
}
