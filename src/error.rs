//! Error types for drape.
//!
//! Construction is the only fallible phase of a cloth's life: once a
//! [`ClothGrid`](crate::ClothGrid) exists, stepping it never fails.
//! Degenerate geometry met during a step (coincident spring endpoints,
//! zero relative wind) is recovered locally and never surfaces here.

use std::fmt;

/// Errors that can occur when building or manipulating a cloth.
#[derive(Clone, Debug, PartialEq)]
pub enum ClothError {
    /// A construction parameter is out of range.
    ///
    /// Returned for `size < 2`, non-positive mass or spacing, and
    /// out-of-range physics parameters. No partial grid is produced.
    InvalidConfiguration {
        /// What was wrong.
        reason: String,
    },
    /// A grid coordinate does not address a particle.
    InvalidParticle {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid dimension.
        size: usize,
    },
}

impl ClothError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ClothError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ClothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClothError::InvalidConfiguration { reason } => {
                write!(f, "Invalid cloth configuration: {}", reason)
            }
            ClothError::InvalidParticle { row, col, size } => write!(
                f,
                "Particle ({}, {}) is outside the {}x{} grid",
                row, col, size, size
            ),
        }
    }
}

impl std::error::Error for ClothError {}
