// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch-class set theory toolkit.
//!
//! This crate models pitch classes under a configurable modulus (12 for
//! semitones, 24 for quarter tones), the affine transformation groups
//! acting on them, and combinatorial search and generation over ordered
//! and unordered pitch-class collections:
//!
//! - residue arithmetic and display ([`pitch`])
//! - ordered segments, rows, and their operators ([`pcseg`])
//! - unordered sets and prime-form classification ([`pcset`])
//! - the UTO/OTO transformation groups: parsing, composition, inverses,
//!   cycle decomposition, catalogs, and the transformation finder
//!   ([`transformations`])
//! - twelve-tone and invariance matrices ([`matrix`])
//! - constrained random row generation ([`rowgen`])
//!
//! Everything is synchronous and single-threaded; the only stateful input
//! is the caller-supplied random source for the row generators.

pub mod error;
pub mod matrix;
pub mod pcseg;
pub mod pcset;
pub mod pitch;
pub mod rowgen;
pub mod transformations;

pub use error::{Result, TheoryError};
pub use matrix::{InvarianceMatrix, Relation, TwelveToneMatrix};
pub use pcseg::{PcSeg, Row};
pub use pcset::{classify, PcSet, SetClass};
pub use pitch::{Pitch, PitchClass, CHROMATIC, QUARTER_TONE};
pub use rowgen::{
    all_interval_row, all_trichord_babbitt_row, all_trichord_row, random_pcseg, random_row,
    ten_trichord_row, RetryBudget,
};
pub use transformations::{
    find_otos, find_utos, get_otos, get_otos12, get_otos24, get_utos, get_utos12, get_utos24,
    left_multiply_otos, left_multiply_utos, Oto, Uto,
};
