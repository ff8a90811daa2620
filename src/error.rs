//! The crate's error type (§7).
//!
//! Only the two kinds that the original fatal-on-bad-input path covers —
//! malformed formulas and formulas outside the supported `F(pLTL)`/`G(pLTL)`
//! shape — are represented as `Err` values. `OracleFailure`, `Timeout` and
//! `Cancelled` are not errors: per §7 they are normal tri-valued outcomes
//! that solvers report as [`crate::Status::Unknown`]. `Unreachable` is a
//! bug, not recoverable input, so it is signalled with `unreachable!()` at
//! the call site rather than threaded through this type.

use std::fmt;

/// An error produced while parsing or shape-checking a specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    /// The formula text could not be parsed (§7 `ParseError`).
    ParseError(String),
    /// The formula parsed, but is not of the form `F(pLTL)` or `G(pLTL)`
    /// (§7 `SpecShapeError`).
    SpecShapeError(String),
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::ParseError(msg) => write!(f, "parse error: {}", msg),
            SynthError::SpecShapeError(msg) => write!(f, "unsupported specification: {}", msg),
        }
    }
}

impl std::error::Error for SynthError {}

pub type Result<T> = std::result::Result<T, SynthError>;
