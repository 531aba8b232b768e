// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch and pitch-class residue arithmetic.
//!
//! A [`PitchClass`] is an integer residue under a configurable modulus
//! (12 for semitones, 24 for quarter tones). Arithmetic between two
//! pitch classes requires matching moduli and reports a mismatch rather
//! than coercing; arithmetic with plain integers always succeeds.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{check_moduli, Result, TheoryError};

/// The standard chromatic modulus
pub const CHROMATIC: u32 = 12;

/// The quarter-tone modulus
pub const QUARTER_TONE: u32 = 24;

/// Hex digits used for compact pitch-class strings (moduli 11..=16)
pub(crate) const HEX_DIGITS: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];

// Default letter names for chromatic notes (+ sharp, - flat)
const LETTER_MAP_12: [&[&str]; 12] = [
    &["C"],
    &["C+", "D-"],
    &["D"],
    &["D+", "E-"],
    &["E"],
    &["F"],
    &["F+", "G-"],
    &["G"],
    &["G+", "A-"],
    &["A"],
    &["A+", "B-"],
    &["B"],
];

// Default letter names for quarter-tone notes
// (* quarter sharp, + sharp, _ quarter flat, - flat)
const LETTER_MAP_24: [&[&str]; 24] = [
    &["C"],
    &["C*"],
    &["C+", "D-"],
    &["D_"],
    &["D"],
    &["D*"],
    &["D+", "E-"],
    &["E_"],
    &["E"],
    &["F_"],
    &["F"],
    &["F*"],
    &["F+", "G-"],
    &["G_"],
    &["G"],
    &["G*"],
    &["G+", "A-"],
    &["A_"],
    &["A"],
    &["A*"],
    &["A+", "B-"],
    &["B_"],
    &["B"],
    &["B*"],
];

/// A pitch class: an integer residue in `[0, m)` under modulus `m`
///
/// The derived `Ord` is the arbitrary total order `(modulus, pc)` so pitch
/// classes can live in ordered collections; use [`PitchClass::try_cmp`] for
/// the checked domain comparison, which rejects mixed moduli.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PitchClass {
    modulus: u32,
    pc: u32,
}

impl PitchClass {
    /// Create a pitch class, normalizing the value into `[0, modulus)`
    pub fn new(pc: i64, modulus: u32) -> Result<Self> {
        if modulus < 2 {
            return Err(TheoryError::InvalidModulus(modulus));
        }
        Ok(Self {
            modulus,
            pc: pc.rem_euclid(modulus as i64) as u32,
        })
    }

    /// Internal constructor for a modulus already known to be valid
    pub(crate) fn from_parts(pc: u32, modulus: u32) -> Self {
        Self {
            modulus,
            pc: pc % modulus,
        }
    }

    /// Create a chromatic (mod 12) pitch class
    pub fn mod12(pc: i64) -> Self {
        Self {
            modulus: CHROMATIC,
            pc: pc.rem_euclid(CHROMATIC as i64) as u32,
        }
    }

    /// Create a quarter-tone (mod 24) pitch class
    pub fn mod24(pc: i64) -> Self {
        Self {
            modulus: QUARTER_TONE,
            pc: pc.rem_euclid(QUARTER_TONE as i64) as u32,
        }
    }

    /// The pitch-class integer, always in `[0, modulus)`
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// The modulus
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// Replace the pitch-class integer, re-normalizing into range
    pub fn set_pc(&mut self, value: i64) {
        self.pc = value.rem_euclid(self.modulus as i64) as u32;
    }

    /// Add another pitch class of the same modulus
    pub fn try_add(&self, other: &PitchClass) -> Result<PitchClass> {
        check_moduli(self.modulus, other.modulus)?;
        Ok(self.transpose(other.pc as i64))
    }

    /// Subtract another pitch class of the same modulus
    pub fn try_sub(&self, other: &PitchClass) -> Result<PitchClass> {
        check_moduli(self.modulus, other.modulus)?;
        Ok(self.transpose(-(other.pc as i64)))
    }

    /// Multiply by another pitch class of the same modulus
    pub fn try_mul(&self, other: &PitchClass) -> Result<PitchClass> {
        check_moduli(self.modulus, other.modulus)?;
        Ok(self.multiply(other.pc as i64))
    }

    /// Compare to another pitch class of the same modulus
    pub fn try_cmp(&self, other: &PitchClass) -> Result<Ordering> {
        check_moduli(self.modulus, other.modulus)?;
        Ok(self.pc.cmp(&other.pc))
    }

    /// Transpose by an integer number of steps
    pub fn transpose(&self, steps: i64) -> PitchClass {
        PitchClass {
            modulus: self.modulus,
            pc: (self.pc as i64 + steps).rem_euclid(self.modulus as i64) as u32,
        }
    }

    /// Multiply by an integer factor
    pub fn multiply(&self, factor: i64) -> PitchClass {
        PitchClass {
            modulus: self.modulus,
            pc: (self.pc as i64 * factor).rem_euclid(self.modulus as i64) as u32,
        }
    }

    /// Invert around 0 (multiply by -1)
    pub fn invert(&self) -> PitchClass {
        self.multiply(-1)
    }

    /// Default letter names for this pitch class (mod 12 and 24 only)
    pub fn letter_names(&self) -> Option<&'static [&'static str]> {
        match self.modulus {
            12 => Some(LETTER_MAP_12[self.pc as usize]),
            24 => Some(LETTER_MAP_24[self.pc as usize]),
            _ => None,
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modulus <= 10 {
            write!(f, "{}", self.pc)
        } else if self.modulus <= 16 {
            write!(f, "{}", HEX_DIGITS[self.pc as usize])
        } else {
            write!(f, "{:0>2}", self.pc)
        }
    }
}

/// A pitch: an unbounded integer where 60 is always middle C (C4),
/// carrying the pitch class it reduces to
///
/// In non-chromatic moduli the octave holds `modulus` steps, so the
/// [`Pitch::midi`] accessor maps back to (possibly fractional) MIDI
/// numbers around the fixed point 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pitch {
    p: i64,
    class: PitchClass,
}

impl Pitch {
    /// Create a pitch with the given integer and pitch-class modulus
    pub fn new(p: i64, modulus: u32) -> Result<Self> {
        Ok(Self {
            p,
            class: PitchClass::new(p, modulus)?,
        })
    }

    /// Create a chromatic (mod 12) pitch
    pub fn mod12(p: i64) -> Self {
        Self {
            p,
            class: PitchClass::mod12(p),
        }
    }

    /// The pitch integer
    pub fn p(&self) -> i64 {
        self.p
    }

    /// The pitch class this pitch reduces to
    pub fn pitch_class(&self) -> PitchClass {
        self.class
    }

    /// The modulus of the underlying pitch class
    pub fn modulus(&self) -> u32 {
        self.class.modulus()
    }

    /// Replace the pitch integer, updating the pitch class
    pub fn set_p(&mut self, value: i64) {
        self.p = value;
        self.class.set_pc(value);
    }

    /// Transpose by an integer number of steps
    pub fn transpose(&self, steps: i64) -> Pitch {
        Pitch {
            p: self.p + steps,
            class: self.class.transpose(steps),
        }
    }

    /// The MIDI number, fractional when the modulus is not 12
    ///
    /// The mapping is linear with fixed point 60 (middle C in both scales).
    pub fn midi(&self) -> f64 {
        let m = self.modulus();
        if m == 12 {
            self.p as f64
        } else {
            let coef = 12.0 / m as f64;
            coef * self.p as f64 + (60.0 - 60.0 * coef)
        }
    }

    /// The Morris pitch number, where C4 is 0
    ///
    /// Fractional midi values floor, so quarter tones belong to the
    /// integer pitch below them.
    pub fn morris(&self) -> i64 {
        (self.midi().floor() as i64) - 60
    }

    /// The octave number, where C4 is middle C
    pub fn octave(&self) -> i64 {
        ((self.midi().floor() as i64) - 60).div_euclid(12) + 4
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_normalization() {
        assert_eq!(PitchClass::mod12(0).pc(), 0);
        assert_eq!(PitchClass::mod12(5).pc(), 5);
        assert_eq!(PitchClass::mod12(12).pc(), 0);
        assert_eq!(PitchClass::mod12(15).pc(), 3);
        assert_eq!(PitchClass::mod12(-1).pc(), 11);
        assert_eq!(PitchClass::mod12(-4).pc(), 8);
        assert_eq!(PitchClass::mod12(-33).pc(), 3);

        assert_eq!(PitchClass::mod24(27).pc(), 3);
        assert_eq!(PitchClass::mod24(-25).pc(), 23);
        assert_eq!(PitchClass::mod24(-50).pc(), 22);
    }

    #[test]
    fn test_invalid_modulus() {
        assert_eq!(PitchClass::new(0, 1), Err(TheoryError::InvalidModulus(1)));
        assert_eq!(PitchClass::new(0, 0), Err(TheoryError::InvalidModulus(0)));
        assert!(PitchClass::new(0, 2).is_ok());
    }

    #[test]
    fn test_pitch_class_arithmetic() {
        let five = PitchClass::mod12(5);
        assert_eq!(five.transpose(3), PitchClass::mod12(8));
        assert_eq!(five.transpose(7), PitchClass::mod12(0));
        assert_eq!(five.transpose(18), PitchClass::mod12(11));
        assert_eq!(five.transpose(-9), PitchClass::mod12(8));
        assert_eq!(five.transpose(-23), PitchClass::mod12(6));

        assert_eq!(five.multiply(2), PitchClass::mod12(10));
        assert_eq!(five.multiply(5), PitchClass::mod12(1));
        assert_eq!(five.multiply(7), PitchClass::mod12(11));
        assert_eq!(five.multiply(11), PitchClass::mod12(7));
        assert_eq!(five.multiply(-1), PitchClass::mod12(7));
        assert_eq!(five.multiply(23), PitchClass::mod12(7));
        assert_eq!(five.multiply(-22), PitchClass::mod12(10));

        assert_eq!(five.invert(), PitchClass::mod12(7));
        assert_eq!(PitchClass::mod12(8).invert(), PitchClass::mod12(4));
    }

    #[test]
    fn test_pitch_class_checked_ops() {
        let a = PitchClass::mod12(5);
        let b = PitchClass::mod12(18);
        assert_eq!(a.try_add(&b), Ok(PitchClass::mod12(11)));
        assert_eq!(a.try_sub(&b), Ok(PitchClass::mod12(11)));
        assert_eq!(a.try_mul(&b), Ok(PitchClass::mod12(6)));
        assert_eq!(a.try_cmp(&b), Ok(Ordering::Less));

        let q = PitchClass::mod24(5);
        assert_eq!(
            a.try_add(&q),
            Err(TheoryError::ModulusMismatch { left: 12, right: 24 })
        );
        assert!(a.try_cmp(&q).is_err());
    }

    #[test]
    fn test_pitch_class_mutator() {
        let mut pc = PitchClass::mod12(5);
        pc.set_pc(-1);
        assert_eq!(pc.pc(), 11);
        pc.set_pc(26);
        assert_eq!(pc.pc(), 2);
    }

    #[test]
    fn test_pitch_class_display() {
        assert_eq!(PitchClass::mod12(3).to_string(), "3");
        assert_eq!(PitchClass::mod12(10).to_string(), "A");
        assert_eq!(PitchClass::mod12(11).to_string(), "B");
        assert_eq!(PitchClass::mod24(5).to_string(), "05");
        assert_eq!(PitchClass::mod24(23).to_string(), "23");
        assert_eq!(PitchClass::new(4, 7).unwrap().to_string(), "4");
    }

    #[test]
    fn test_letter_names() {
        assert_eq!(PitchClass::mod12(0).letter_names(), Some(&["C"][..]));
        assert_eq!(
            PitchClass::mod12(1).letter_names(),
            Some(&["C+", "D-"][..])
        );
        assert_eq!(PitchClass::mod24(1).letter_names(), Some(&["C*"][..]));
        assert_eq!(PitchClass::new(3, 7).unwrap().letter_names(), None);
    }

    #[test]
    fn test_pitch_basics() {
        let p = Pitch::mod12(-4);
        assert_eq!(p.p(), -4);
        assert_eq!(p.pitch_class(), PitchClass::mod12(8));
        assert_eq!(p.to_string(), "-4");

        let p = Pitch::mod12(15);
        assert_eq!(p.p(), 15);
        assert_eq!(p.pitch_class().pc(), 3);
    }

    #[test]
    fn test_pitch_arithmetic_keeps_register() {
        assert_eq!(Pitch::mod12(5).transpose(7), Pitch::mod12(12));
        assert_eq!(Pitch::mod12(5).transpose(-13), Pitch::mod12(-8));
    }

    #[test]
    fn test_pitch_midi_and_octave() {
        assert_eq!(Pitch::mod12(60).midi(), 60.0);
        assert_eq!(Pitch::mod12(60).octave(), 4);
        assert_eq!(Pitch::mod12(59).octave(), 3);
        assert_eq!(Pitch::mod12(60).morris(), 0);
        assert_eq!(Pitch::mod12(48).morris(), -12);

        // Quarter-tone pitches map linearly around middle C
        let p = Pitch::new(62, 24).unwrap();
        assert_eq!(p.midi(), 61.0);
        let p = Pitch::new(60, 24).unwrap();
        assert_eq!(p.midi(), 60.0);
    }

    #[test]
    fn test_fractional_midi_floors() {
        // the quarter tone just below middle C sits in octave 3
        let p = Pitch::new(59, 24).unwrap();
        assert_eq!(p.midi(), 59.5);
        assert_eq!(p.morris(), -1);
        assert_eq!(p.octave(), 3);

        // negative fractional midi floors rather than truncating
        let p = Pitch::new(-61, 24).unwrap();
        assert_eq!(p.midi(), -0.5);
        assert_eq!(p.morris(), -61);
        assert_eq!(p.octave(), -2);
    }
}
