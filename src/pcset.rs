// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Unordered pitch-class collections and set-class classification.
//!
//! A [`PcSet`] is a duplicate-free collection of pitch classes under one
//! modulus. A [`SetClass`] is the canonical representative ("prime form")
//! of a set's equivalence class under transposition and inversion,
//! computed with the Rahn packed-left algorithm.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{check_moduli, Result, TheoryError};
use crate::pcseg::PcSeg;
use crate::pitch::{PitchClass, CHROMATIC, HEX_DIGITS};

/// An unordered set of pitch classes under a single modulus
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PcSet {
    modulus: u32,
    pcs: BTreeSet<PitchClass>,
}

impl PcSet {
    /// Create a set from raw integers, normalized under `modulus`
    pub fn new(modulus: u32, values: &[i64]) -> Result<Self> {
        if modulus < 2 {
            return Err(TheoryError::InvalidModulus(modulus));
        }
        let pcs = values
            .iter()
            .map(|&v| PitchClass::new(v, modulus))
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self { modulus, pcs })
    }

    /// Create a chromatic (mod 12) set from raw integers
    pub fn mod12(values: &[i64]) -> Self {
        Self {
            modulus: CHROMATIC,
            pcs: values.iter().map(|&v| PitchClass::mod12(v)).collect(),
        }
    }

    /// Create a set from pitch classes, which must share one modulus
    pub fn from_pitch_classes(modulus: u32, pcs: impl IntoIterator<Item = PitchClass>) -> Result<Self> {
        if modulus < 2 {
            return Err(TheoryError::InvalidModulus(modulus));
        }
        let mut set = BTreeSet::new();
        for pc in pcs {
            check_moduli(modulus, pc.modulus())?;
            set.insert(pc);
        }
        Ok(Self { modulus, pcs: set })
    }

    /// Collapse an ordered segment into a set
    pub fn from_seg(seg: &PcSeg) -> Self {
        Self {
            modulus: seg.modulus(),
            pcs: seg.iter().copied().collect(),
        }
    }

    /// The shared modulus
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// Number of distinct pitch classes
    pub fn len(&self) -> usize {
        self.pcs.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.pcs.is_empty()
    }

    /// Membership test
    pub fn contains(&self, pc: PitchClass) -> bool {
        self.pcs.contains(&pc)
    }

    /// Iterate in ascending pitch-class order
    pub fn iter(&self) -> impl Iterator<Item = &PitchClass> {
        self.pcs.iter()
    }

    /// Transpose every element by `n` steps
    pub fn transpose(&self, n: i64) -> PcSet {
        Self {
            modulus: self.modulus,
            pcs: self.pcs.iter().map(|pc| pc.transpose(n)).collect(),
        }
    }

    /// Invert every element around 0
    pub fn invert(&self) -> PcSet {
        self.multiply(-1)
    }

    /// Multiply every element by `n`; duplicates collapse when `n` is
    /// not a unit
    pub fn multiply(&self, n: i64) -> PcSet {
        Self {
            modulus: self.modulus,
            pcs: self.pcs.iter().map(|pc| pc.multiply(n)).collect(),
        }
    }

    /// Check whether every element of `self` is in `other`
    pub fn is_subset_of(&self, other: &PcSet) -> Result<bool> {
        check_moduli(self.modulus, other.modulus)?;
        Ok(self.pcs.is_subset(&other.pcs))
    }

    /// Check whether `self` contains every element of `other`
    pub fn is_superset_of(&self, other: &PcSet) -> Result<bool> {
        check_moduli(self.modulus, other.modulus)?;
        Ok(self.pcs.is_superset(&other.pcs))
    }

    /// The interval-class vector: counts of each interval class
    /// `1..=m/2` over all unordered pairs
    pub fn interval_class_vector(&self) -> Vec<u32> {
        let m = self.modulus as i64;
        let half = (self.modulus / 2) as usize;
        let mut icv = vec![0u32; half];
        let pcs: Vec<i64> = self.pcs.iter().map(|pc| pc.pc() as i64).collect();
        for i in 0..pcs.len() {
            for j in (i + 1)..pcs.len() {
                let d = (pcs[j] - pcs[i]).rem_euclid(m);
                let ic = d.min(m - d) as usize;
                if ic > 0 {
                    icv[ic - 1] += 1;
                }
            }
        }
        icv
    }
}

impl fmt::Display for PcSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
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
        write!(f, "}}")
    }
}

/// The set class of a pitch-class set: its prime form under the
/// transposition/inversion group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SetClass {
    modulus: u32,
    prime: Vec<u32>,
}

impl SetClass {
    /// Classify a set, computing its prime form
    pub fn of(set: &PcSet) -> Self {
        Self {
            modulus: set.modulus(),
            prime: prime_form(set),
        }
    }

    /// Parse a mod-12 prime-form label such as `"[0134]"`
    ///
    /// The label is re-canonicalized, so any member of the class is
    /// accepted.
    pub fn parse(label: &str) -> Result<Self> {
        let seg = PcSeg::parse(label)?;
        Ok(Self::of(&PcSet::from_seg(&seg)))
    }

    /// The modulus of the classified set
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// The prime form as a set
    pub fn pcset(&self) -> PcSet {
        let pcs = self
            .prime
            .iter()
            .map(|&v| PitchClass::from_parts(v, self.modulus))
            .collect();
        PcSet {
            modulus: self.modulus,
            pcs,
        }
    }

    /// The prime-form label, e.g. `"[0134]"`
    pub fn name_prime(&self) -> String {
        let mut out = String::with_capacity(self.prime.len() + 2);
        out.push('[');
        for &v in &self.prime {
            if self.modulus <= 16 {
                out.push(HEX_DIGITS[v as usize]);
            } else {
                out.push_str(&format!("{v:0>2}"));
            }
        }
        out.push(']');
        out
    }
}

impl fmt::Display for SetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name_prime())
    }
}

/// Classify an unordered collection, returning its canonical prime-form
/// label
pub fn classify(set: &PcSet) -> String {
    SetClass::of(set).name_prime()
}

/// Rahn prime form: the packed-left normal order of the set or its
/// inversion, transposed to start on 0
fn prime_form(set: &PcSet) -> Vec<u32> {
    if set.is_empty() {
        return Vec::new();
    }
    let m = set.modulus() as i64;
    let pcs: Vec<i64> = set.iter().map(|pc| pc.pc() as i64).collect();
    let mut inverted: Vec<i64> = pcs.iter().map(|&v| (-v).rem_euclid(m)).collect();
    inverted.sort_unstable();

    let mut best: Option<Vec<u32>> = None;
    for base in [&pcs, &inverted] {
        for start in 0..base.len() {
            let candidate: Vec<u32> = (0..base.len())
                .map(|k| {
                    let v = base[(start + k) % base.len()];
                    (v - base[start]).rem_euclid(m) as u32
                })
                .collect();
            let better = match &best {
                None => true,
                Some(b) => packed_left(&candidate, b),
            };
            if better {
                best = Some(candidate);
            }
        }
    }
    best.unwrap_or_default()
}

/// Rahn comparison: smaller span first, then smaller intervals from the
/// first element, compared from the right end inwards
fn packed_left(a: &[u32], b: &[u32]) -> bool {
    for i in (1..a.len()).rev() {
        if a[i] != b[i] {
            return a[i] < b[i];
        }
    }
    false
}
