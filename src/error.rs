// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for pitch-class set theory operations.
//!
//! Every fallible operation in the crate reports one of these variants
//! synchronously at the call site; nothing is retried internally.

use thiserror::Error;

/// Errors produced by pitch-class, transformation, and row operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    /// A modulus smaller than 2 was supplied
    #[error("invalid modulus {0}: must be at least 2")]
    InvalidModulus(u32),

    /// Operands with different moduli were combined
    #[error("modulus mismatch: {left} vs {right}")]
    ModulusMismatch { left: u32, right: u32 },

    /// A multiplier that is not coprime to the modulus
    #[error("multiplier {multiplier} is not a unit mod {modulus}")]
    NonUnitMultiplier { multiplier: u32, modulus: u32 },

    /// A transformation label that does not match the grammar
    #[error("malformed transformation label {label:?}: {reason}")]
    MalformedLabel { label: String, reason: String },

    /// A pitch-class collection literal that does not parse
    #[error("malformed pitch-class literal {literal:?}: {reason}")]
    MalformedLiteral { literal: String, reason: String },

    /// A sequence used where a row (full permutation) is required
    #[error("not a row: {0}")]
    NotARow(String),

    /// A composition over an empty list of transformations
    #[error("cannot compose an empty list of transformations")]
    EmptyComposition,

    /// A constrained row generator ran out of retry budget
    #[error("row generation exhausted after {attempts} attempts")]
    GenerationExhausted { attempts: u64 },
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, TheoryError>;

impl TheoryError {
    /// Build a `MalformedLabel` error
    pub(crate) fn label(label: &str, reason: impl Into<String>) -> Self {
        TheoryError::MalformedLabel {
            label: label.to_string(),
            reason: reason.into(),
        }
    }

    /// Build a `MalformedLiteral` error
    pub(crate) fn literal(literal: &str, reason: impl Into<String>) -> Self {
        TheoryError::MalformedLiteral {
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }
}

/// Check that two moduli agree before combining values
pub(crate) fn check_moduli(left: u32, right: u32) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(TheoryError::ModulusMismatch { left, right })
    }
}
