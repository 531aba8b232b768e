// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Ordered pitch-class collections.
//!
//! A [`PcSeg`] is a finite ordered list of pitch classes sharing one
//! modulus, with duplicates permitted. A [`Row`] is the validated special
//! case: a segment of length `m` that is a permutation of `{0,..,m-1}`.

use std::fmt;

use crate::error::{check_moduli, Result, TheoryError};
use crate::pitch::{PitchClass, CHROMATIC, HEX_DIGITS};

/// An ordered sequence of pitch classes under a single modulus
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PcSeg {
    modulus: u32,
    pcs: Vec<PitchClass>,
}

impl PcSeg {
    /// Create a segment from raw integers, normalized under `modulus`
    pub fn new(modulus: u32, values: &[i64]) -> Result<Self> {
        if modulus < 2 {
            return Err(TheoryError::InvalidModulus(modulus));
        }
        let pcs = values
            .iter()
            .map(|&v| PitchClass::new(v, modulus))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { modulus, pcs })
    }

    /// Create a chromatic (mod 12) segment from raw integers
    pub fn mod12(values: &[i64]) -> Self {
        Self {
            modulus: CHROMATIC,
            pcs: values.iter().map(|&v| PitchClass::mod12(v)).collect(),
        }
    }

    /// Create a segment from pitch classes, which must share one modulus
    pub fn from_pitch_classes(modulus: u32, pcs: Vec<PitchClass>) -> Result<Self> {
        if modulus < 2 {
            return Err(TheoryError::InvalidModulus(modulus));
        }
        for pc in &pcs {
            check_moduli(modulus, pc.modulus())?;
        }
        Ok(Self { modulus, pcs })
    }

    /// Parse a compact mod-12 literal such as `"[01675243A9B8]"`
    ///
    /// One character per pitch class: `0-9`, then `A` = 10 and `B` = 11.
    pub fn parse(literal: &str) -> Result<Self> {
        let inner = literal
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| TheoryError::literal(literal, "missing enclosing brackets"))?;
        let mut pcs = Vec::with_capacity(inner.len());
        for c in inner.chars() {
            let v = match c {
                '0'..='9' => c as i64 - '0' as i64,
                'A' => 10,
                'B' => 11,
                other => {
                    return Err(TheoryError::literal(
                        literal,
                        format!("unrecognized pitch-class character {other:?}"),
                    ))
                }
            };
            pcs.push(PitchClass::mod12(v));
        }
        Ok(Self {
            modulus: CHROMATIC,
            pcs,
        })
    }

    /// The shared modulus
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// Number of pitch classes in the segment
    pub fn len(&self) -> usize {
        self.pcs.len()
    }

    /// Check if the segment is empty
    pub fn is_empty(&self) -> bool {
        self.pcs.is_empty()
    }

    /// The pitch class at position `i`
    pub fn get(&self, i: usize) -> Option<PitchClass> {
        self.pcs.get(i).copied()
    }

    /// The pitch classes as a slice
    pub fn pcs(&self) -> &[PitchClass] {
        &self.pcs
    }

    /// Iterate over the pitch classes
    pub fn iter(&self) -> impl Iterator<Item = &PitchClass> {
        self.pcs.iter()
    }

    /// Transpose every element by `n` steps
    pub fn transpose(&self, n: i64) -> PcSeg {
        Self {
            modulus: self.modulus,
            pcs: self.pcs.iter().map(|pc| pc.transpose(n)).collect(),
        }
    }

    /// Invert every element around 0
    pub fn invert(&self) -> PcSeg {
        self.multiply(-1)
    }

    /// Multiply every element by `n`
    pub fn multiply(&self, n: i64) -> PcSeg {
        Self {
            modulus: self.modulus,
            pcs: self.pcs.iter().map(|pc| pc.multiply(n)).collect(),
        }
    }

    /// Reverse the order of the segment
    pub fn retrograde(&self) -> PcSeg {
        let mut pcs = self.pcs.clone();
        pcs.reverse();
        Self {
            modulus: self.modulus,
            pcs,
        }
    }

    /// Rotate the segment; positive `n` moves the last `n` elements
    /// to the front
    pub fn rotate(&self, n: i64) -> PcSeg {
        if self.pcs.is_empty() {
            return self.clone();
        }
        let len = self.pcs.len() as i64;
        let shift = n.rem_euclid(len) as usize;
        let split = self.pcs.len() - shift;
        let mut pcs = Vec::with_capacity(self.pcs.len());
        pcs.extend_from_slice(&self.pcs[split..]);
        pcs.extend_from_slice(&self.pcs[..split]);
        Self {
            modulus: self.modulus,
            pcs,
        }
    }
}

impl fmt::Display for PcSeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        if self.modulus <= 16 {
            for pc in &self.pcs {
                write!(f, "{}", HEX_DIGITS[pc.pc() as usize])?;
            }
        } else {
            for (i, pc) in self.pcs.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{pc}")?;
            }
        }
        write!(f, "]")
    }
}

/// A twelve-tone row (or its analogue under another modulus): a segment
/// of length `m` containing every residue exactly once
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    seg: PcSeg,
}

impl Row {
    /// Validate a segment as a row
    pub fn new(seg: PcSeg) -> Result<Self> {
        let m = seg.modulus() as usize;
        if seg.len() != m {
            return Err(TheoryError::NotARow(format!(
                "length {} does not match modulus {}",
                seg.len(),
                seg.modulus()
            )));
        }
        let mut seen = vec![false; m];
        for pc in seg.iter() {
            if seen[pc.pc() as usize] {
                return Err(TheoryError::NotARow(format!(
                    "pitch class {} repeats",
                    pc
                )));
            }
            seen[pc.pc() as usize] = true;
        }
        Ok(Self { seg })
    }

    /// Build a mod-12 row from raw integers
    pub fn mod12(values: &[i64]) -> Result<Self> {
        Self::new(PcSeg::mod12(values))
    }

    /// Parse a row from a compact mod-12 literal
    pub fn parse(literal: &str) -> Result<Self> {
        Self::new(PcSeg::parse(literal)?)
    }

    /// The underlying segment
    pub fn seg(&self) -> &PcSeg {
        &self.seg
    }

    /// Give up the row structure, keeping the segment
    pub fn into_seg(self) -> PcSeg {
        self.seg
    }

    /// The shared modulus
    pub fn modulus(&self) -> u32 {
        self.seg.modulus()
    }

    /// The pitch class at position `i`
    pub fn get(&self, i: usize) -> Option<PitchClass> {
        self.seg.get(i)
    }

    /// Number of pitch classes (always equal to the modulus)
    pub fn len(&self) -> usize {
        self.seg.len()
    }

    /// Rows are never empty
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.seg)
    }
}
