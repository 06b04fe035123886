// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use thiserror::Error;

/// Error type shared across the timefold crates.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TimefoldError {
    /// Malformed argument: non-positive resolution, out-of-bounds row range,
    /// inexact window tiling, or non-0/1 mask bytes.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A table or mask does not share the time axis row count.
    #[error("alignment mismatch: {0}")]
    AlignmentMismatch(String),
    /// A referenced variable is not present in the dataset.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),
}

impl TimefoldError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn alignment_mismatch(msg: impl Into<String>) -> Self {
        Self::AlignmentMismatch(msg.into())
    }

    pub fn unknown_variable(msg: impl Into<String>) -> Self {
        Self::UnknownVariable(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::TimefoldError;

    #[test]
    fn display_prefixes_carry_the_taxonomy() {
        let invalid = TimefoldError::invalid_input("resolution must be >= 1");
        assert_eq!(invalid.to_string(), "invalid input: resolution must be >= 1");

        let misaligned = TimefoldError::alignment_mismatch("got 3 rows, expected 4");
        assert_eq!(
            misaligned.to_string(),
            "alignment mismatch: got 3 rows, expected 4"
        );

        let unknown = TimefoldError::unknown_variable("dni");
        assert_eq!(unknown.to_string(), "unknown variable: dni");
    }
}
