// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Affine transformation groups over pitch classes.
//!
//! A [`Uto`] (unordered transformation) is a pair `(T, M)` acting on
//! pitch-class sets by `v -> M*v + T mod m`, with `M` a unit of the ring.
//! An [`Oto`] (ordered transformation) adds a retrograde flag `R` that
//! reverses a sequence before the affine map is applied elementwise.
//!
//! Both families form finite groups under composition; this module
//! provides label parsing/formatting, inverses, composition, cycle
//! decomposition, catalog enumeration, and a brute-force search for the
//! transformations relating two sequences.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{check_moduli, Result, TheoryError};
use crate::pcseg::PcSeg;
use crate::pcset::PcSet;
use crate::pitch::PitchClass;

/// Multiplier denoted by a bare `M` token in a label
const BARE_M_MULTIPLIER: u32 = 5;

/// An affine transformation of unordered pitch-class collections:
/// `v -> M*v + T mod m`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uto {
    modulus: u32,
    t: u32,
    m: u32,
}

/// An affine transformation of ordered pitch-class sequences:
/// optional reversal, then `v -> M*v + T mod m` elementwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oto {
    modulus: u32,
    t: u32,
    r: bool,
    m: u32,
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Normalize and unit-check the `(T, M)` pair of a transformation
fn check_affine(t: i64, m: i64, modulus: u32) -> Result<(u32, u32)> {
    if modulus < 2 {
        return Err(TheoryError::InvalidModulus(modulus));
    }
    let t = t.rem_euclid(modulus as i64) as u32;
    let m = m.rem_euclid(modulus as i64) as u32;
    if gcd(m, modulus) != 1 {
        return Err(TheoryError::NonUnitMultiplier {
            multiplier: m,
            modulus,
        });
    }
    Ok((t, m))
}

/// Modular inverse of a unit `m` (the caller guarantees coprimality)
fn mod_inverse(m: u32, modulus: u32) -> u32 {
    // moduli are small, so scan rather than run extended Euclid
    (1..modulus)
        .find(|&x| (m as u64 * x as u64) % modulus as u64 == 1)
        .unwrap_or(1)
}

/// Every unit of the ring mod `modulus`, ascending
fn units(modulus: u32) -> Vec<u32> {
    (1..modulus).filter(|&m| gcd(m, modulus) == 1).collect()
}

/// Orbit decomposition of `v -> mult*v + shift` over `{0,..,modulus-1}`
fn affine_cycles(shift: u32, mult: u32, modulus: u32) -> Vec<Vec<u32>> {
    let mut visited = vec![false; modulus as usize];
    let mut cycles = Vec::new();
    for start in 0..modulus {
        if visited[start as usize] {
            continue;
        }
        let mut cycle = Vec::new();
        let mut v = start;
        while !visited[v as usize] {
            visited[v as usize] = true;
            cycle.push(v);
            v = ((mult as u64 * v as u64 + shift as u64) % modulus as u64) as u32;
        }
        cycles.push(cycle);
    }
    cycles
}

/// Tokenized multiplier suffix of a label: a run of `I` and `M[digits]`
/// tokens folded into one unit, following an optional leading `R`
struct LabelParser<'a> {
    label: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    modulus: u32,
}

impl<'a> LabelParser<'a> {
    fn new(label: &'a str, modulus: u32) -> Self {
        Self {
            label,
            chars: label.chars().peekable(),
            modulus,
        }
    }

    fn err(&self, reason: impl Into<String>) -> TheoryError {
        TheoryError::label(self.label, reason)
    }

    /// Read a decimal integer; `None` if the next character is not a digit
    fn number(&mut self) -> Option<i64> {
        let mut value: Option<i64> = None;
        while let Some(c) = self.chars.peek() {
            if let Some(d) = c.to_digit(10) {
                value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d as i64));
                self.chars.next();
            } else {
                break;
            }
        }
        value
    }

    /// Parse the full label; `allow_r` selects the ordered grammar
    fn parse(&mut self, allow_r: bool) -> Result<(u32, u32, bool)> {
        match self.chars.next() {
            Some('T') => {}
            _ => return Err(self.err("label must start with T")),
        }
        let shift = self
            .number()
            .ok_or_else(|| self.err("T must be followed by a shift amount"))?;
        if shift >= self.modulus as i64 {
            return Err(self.err(format!(
                "shift {shift} out of range for modulus {}",
                self.modulus
            )));
        }

        let mut retrograde = false;
        if self.chars.peek() == Some(&'R') {
            if !allow_r {
                return Err(self.err("R is only valid for ordered transformations"));
            }
            retrograde = true;
            self.chars.next();
        }

        // fold any run of multiplier tokens into a single unit
        let mut mult: u64 = 1;
        while let Some(&c) = self.chars.peek() {
            let factor = match c {
                'I' => {
                    self.chars.next();
                    self.modulus - 1
                }
                'M' => {
                    self.chars.next();
                    match self.number() {
                        Some(v) => v.rem_euclid(self.modulus as i64) as u32,
                        None => BARE_M_MULTIPLIER % self.modulus,
                    }
                }
                'R' => return Err(self.err("R may appear only once, after the shift")),
                other => return Err(self.err(format!("unrecognized character {other:?}"))),
            };
            mult = (mult * factor as u64) % self.modulus as u64;
        }
        let mult = mult as u32;
        if gcd(mult, self.modulus) != 1 {
            return Err(TheoryError::NonUnitMultiplier {
                multiplier: mult,
                modulus: self.modulus,
            });
        }
        Ok((shift as u32, mult, retrograde))
    }
}

impl Uto {
    /// Create a transformation from shift and multiplier integers
    pub fn new(t: i64, m: i64, modulus: u32) -> Result<Self> {
        let (t, m) = check_affine(t, m, modulus)?;
        Ok(Self { modulus, t, m })
    }

    /// The identity transformation `T0`
    pub fn identity(modulus: u32) -> Result<Self> {
        Self::new(0, 1, modulus)
    }

    /// Parse a label such as `"T5"`, `"T7I"`, or `"T3MI"`
    pub fn parse(label: &str, modulus: u32) -> Result<Self> {
        if modulus < 2 {
            return Err(TheoryError::InvalidModulus(modulus));
        }
        let (t, m, _) = LabelParser::new(label, modulus).parse(false)?;
        Ok(Self { modulus, t, m })
    }

    /// The additive shift
    pub fn t(&self) -> u32 {
        self.t
    }

    /// The multiplier (always a unit)
    pub fn m(&self) -> u32 {
        self.m
    }

    /// The modulus
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// Apply to a single pitch class
    pub fn apply(&self, pc: PitchClass) -> Result<PitchClass> {
        check_moduli(self.modulus, pc.modulus())?;
        Ok(pc.multiply(self.m as i64).transpose(self.t as i64))
    }

    /// Apply to an unordered collection
    pub fn apply_set(&self, set: &PcSet) -> Result<PcSet> {
        check_moduli(self.modulus, set.modulus())?;
        Ok(set.multiply(self.m as i64).transpose(self.t as i64))
    }

    /// Apply elementwise to an ordered collection (order preserved)
    pub fn apply_seg(&self, seg: &PcSeg) -> Result<PcSeg> {
        check_moduli(self.modulus, seg.modulus())?;
        Ok(seg.multiply(self.m as i64).transpose(self.t as i64))
    }

    /// The inverse transformation: `M' = M^-1`, `T' = -M'*T`
    pub fn inverse(&self) -> Uto {
        let m_inv = mod_inverse(self.m, self.modulus);
        let t_inv = (-(m_inv as i64 * self.t as i64)).rem_euclid(self.modulus as i64) as u32;
        Uto {
            modulus: self.modulus,
            t: t_inv,
            m: m_inv,
        }
    }

    /// Compose so that `self` applies first: `a.then(b)(x) == b(a(x))`
    pub fn then(&self, next: &Uto) -> Result<Uto> {
        check_moduli(self.modulus, next.modulus)?;
        let m = (next.m as u64 * self.m as u64) % self.modulus as u64;
        let t = (next.m as u64 * self.t as u64 + next.t as u64) % self.modulus as u64;
        Ok(Uto {
            modulus: self.modulus,
            t: t as u32,
            m: m as u32,
        })
    }

    /// Disjoint cycles of the affine map over `{0,..,m-1}`, each cycle
    /// starting at its smallest element, cycles ordered by that element
    pub fn cycles(&self) -> Vec<Vec<u32>> {
        affine_cycles(self.t, self.m, self.modulus)
    }
}

impl fmt::Display for Uto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.t)?;
        if self.m != 1 {
            write!(f, "M{}", self.m)?;
        }
        Ok(())
    }
}

impl Oto {
    /// Create a transformation from shift, retrograde flag, and multiplier
    pub fn new(t: i64, r: bool, m: i64, modulus: u32) -> Result<Self> {
        let (t, m) = check_affine(t, m, modulus)?;
        Ok(Self { modulus, t, r, m })
    }

    /// The identity transformation `T0`
    pub fn identity(modulus: u32) -> Result<Self> {
        Self::new(0, false, 1, modulus)
    }

    /// Parse a label such as `"T5R"` or `"T5RM11"`
    pub fn parse(label: &str, modulus: u32) -> Result<Self> {
        if modulus < 2 {
            return Err(TheoryError::InvalidModulus(modulus));
        }
        let (t, m, r) = LabelParser::new(label, modulus).parse(true)?;
        Ok(Self { modulus, t, r, m })
    }

    /// The additive shift
    pub fn t(&self) -> u32 {
        self.t
    }

    /// The multiplier (always a unit)
    pub fn m(&self) -> u32 {
        self.m
    }

    /// The retrograde flag
    pub fn r(&self) -> bool {
        self.r
    }

    /// The modulus
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// The unordered transformation with the same affine part
    pub fn uto(&self) -> Uto {
        Uto {
            modulus: self.modulus,
            t: self.t,
            m: self.m,
        }
    }

    /// Apply to an ordered collection: reverse first when `R` is set,
    /// then map elementwise
    pub fn apply_seg(&self, seg: &PcSeg) -> Result<PcSeg> {
        check_moduli(self.modulus, seg.modulus())?;
        let ordered = if self.r { seg.retrograde() } else { seg.clone() };
        Ok(ordered.multiply(self.m as i64).transpose(self.t as i64))
    }

    /// The inverse transformation; retrograde is an involution, so the
    /// flag is preserved and the affine part inverts
    pub fn inverse(&self) -> Oto {
        let affine = self.uto().inverse();
        Oto {
            modulus: self.modulus,
            t: affine.t(),
            r: self.r,
            m: affine.m(),
        }
    }

    /// Compose so that `self` applies first: `a.then(b)(x) == b(a(x))`
    pub fn then(&self, next: &Oto) -> Result<Oto> {
        let affine = self.uto().then(&next.uto())?;
        Ok(Oto {
            modulus: self.modulus,
            t: affine.t(),
            r: self.r != next.r,
            m: affine.m(),
        })
    }

    /// Disjoint cycles of the affine map over `{0,..,m-1}`; the
    /// retrograde flag does not act on residues and is ignored
    pub fn cycles(&self) -> Vec<Vec<u32>> {
        affine_cycles(self.t, self.m, self.modulus)
    }
}

impl fmt::Display for Oto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.t)?;
        if self.r {
            write!(f, "R")?;
        }
        if self.m != 1 {
            write!(f, "M{}", self.m)?;
        }
        Ok(())
    }
}

/// Compose a list of transformations in application order:
/// `left_multiply_utos(&[t1, t2])` applies `t1` first
pub fn left_multiply_utos(utos: &[Uto]) -> Result<Uto> {
    let (first, rest) = utos.split_first().ok_or(TheoryError::EmptyComposition)?;
    rest.iter().try_fold(*first, |acc, next| acc.then(next))
}

/// Compose a list of ordered transformations in application order
pub fn left_multiply_otos(otos: &[Oto]) -> Result<Oto> {
    let (first, rest) = otos.split_first().ok_or(TheoryError::EmptyComposition)?;
    rest.iter().try_fold(*first, |acc, next| acc.then(next))
}

/// Every unordered transformation for a modulus, keyed by canonical label
pub fn get_utos(modulus: u32) -> Result<BTreeMap<String, Uto>> {
    if modulus < 2 {
        return Err(TheoryError::InvalidModulus(modulus));
    }
    let mut catalog = BTreeMap::new();
    for t in 0..modulus {
        for m in units(modulus) {
            let uto = Uto { modulus, t, m };
            catalog.insert(uto.to_string(), uto);
        }
    }
    Ok(catalog)
}

/// Every ordered transformation for a modulus, keyed by canonical label
pub fn get_otos(modulus: u32) -> Result<BTreeMap<String, Oto>> {
    if modulus < 2 {
        return Err(TheoryError::InvalidModulus(modulus));
    }
    let mut catalog = BTreeMap::new();
    for t in 0..modulus {
        for r in [false, true] {
            for m in units(modulus) {
                let oto = Oto { modulus, t, r, m };
                catalog.insert(oto.to_string(), oto);
            }
        }
    }
    Ok(catalog)
}

/// The 48 chromatic unordered transformations, built once
pub fn get_utos12() -> &'static BTreeMap<String, Uto> {
    static UTOS12: OnceLock<BTreeMap<String, Uto>> = OnceLock::new();
    UTOS12.get_or_init(|| get_utos(12).expect("modulus 12 is valid"))
}

/// The 96 chromatic ordered transformations, built once
pub fn get_otos12() -> &'static BTreeMap<String, Oto> {
    static OTOS12: OnceLock<BTreeMap<String, Oto>> = OnceLock::new();
    OTOS12.get_or_init(|| get_otos(12).expect("modulus 12 is valid"))
}

/// The 192 quarter-tone unordered transformations, built once
pub fn get_utos24() -> &'static BTreeMap<String, Uto> {
    static UTOS24: OnceLock<BTreeMap<String, Uto>> = OnceLock::new();
    UTOS24.get_or_init(|| get_utos(24).expect("modulus 24 is valid"))
}

/// The 384 quarter-tone ordered transformations, built once
pub fn get_otos24() -> &'static BTreeMap<String, Oto> {
    static OTOS24: OnceLock<BTreeMap<String, Oto>> = OnceLock::new();
    OTOS24.get_or_init(|| get_otos(24).expect("modulus 24 is valid"))
}

/// Check whether `target` occurs in `transformed`: as a whole when the
/// lengths match, or as a contiguous subsequence at any offset when
/// `target` is shorter
fn seg_matches(transformed: &PcSeg, target: &PcSeg) -> bool {
    let hay = transformed.pcs();
    let needle = target.pcs();
    if needle.is_empty() {
        return true;
    }
    if needle.len() > hay.len() {
        return false;
    }
    if needle.len() == hay.len() {
        return hay == needle;
    }
    hay.windows(needle.len()).any(|w| w == needle)
}

/// Every catalog UTO carrying `source` onto a sequence consistent with
/// `target` (equal or contained contiguously); empty when `target` is
/// longer than `source`
pub fn find_utos(source: &PcSeg, target: &PcSeg) -> Result<BTreeSet<Uto>> {
    check_moduli(source.modulus(), target.modulus())?;
    let mut found = BTreeSet::new();
    if target.len() > source.len() {
        return Ok(found);
    }
    // the common moduli hit the cached tables
    let built;
    let catalog = match source.modulus() {
        12 => get_utos12(),
        24 => get_utos24(),
        m => {
            built = get_utos(m)?;
            &built
        }
    };
    for uto in catalog.values() {
        if seg_matches(&uto.apply_seg(source)?, target) {
            found.insert(*uto);
        }
    }
    Ok(found)
}

/// Every catalog OTO carrying `source` onto a sequence consistent with
/// `target`
pub fn find_otos(source: &PcSeg, target: &PcSeg) -> Result<BTreeSet<Oto>> {
    check_moduli(source.modulus(), target.modulus())?;
    let mut found = BTreeSet::new();
    if target.len() > source.len() {
        return Ok(found);
    }
    let built;
    let catalog = match source.modulus() {
        12 => get_otos12(),
        24 => get_otos24(),
        m => {
            built = get_otos(m)?;
            &built
        }
    };
    for oto in catalog.values() {
        if seg_matches(&oto.apply_seg(source)?, target) {
            found.insert(*oto);
        }
    }
    Ok(found)
}
