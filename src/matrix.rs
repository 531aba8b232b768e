// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Twelve-tone and invariance matrices.
//!
//! A [`TwelveToneMatrix`] is the classical grid of all transpositions of
//! a generator row, arranged so the first column is the row's inversion.
//! An [`InvarianceMatrix`] generalizes the construction to two rows and a
//! relation family, exposing invariant subsequences shared between them.
//!
//! Both grids are computed once at construction and immutable afterward.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{check_moduli, Result};
use crate::pcseg::{PcSeg, Row};
use crate::transformations::Oto;

/// The transformation family relating two rows in an invariance matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Transposition,
    Inversion,
}

/// Label a matrix axis with the canonical transformation name carrying
/// the generator onto that axis, optionally read in retrograde
fn axis_label(t: i64, mult: i64, retrograde: bool, modulus: u32) -> String {
    // t and mult are reduced residues here, so construction cannot fail
    match Oto::new(t, retrograde, mult, modulus) {
        Ok(oto) => oto.to_string(),
        Err(_) => String::new(),
    }
}

/// The grid of all `m` transpositions of a generator row, with the
/// inversion of the row running down the first column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwelveToneMatrix {
    modulus: u32,
    rows: Vec<PcSeg>,
    labels_left: Vec<String>,
    labels_right: Vec<String>,
    labels_top: Vec<String>,
    labels_bottom: Vec<String>,
}

impl TwelveToneMatrix {
    /// Build the full grid from a generator row
    pub fn new(generator: &Row) -> Self {
        let m = generator.modulus();
        let p = generator.seg();
        let p0 = p.get(0).map(|pc| pc.pc() as i64).unwrap_or(0);

        // first column: the inversion of P transposed to start on P[0]
        let col0: Vec<i64> = p
            .iter()
            .map(|pc| (2 * p0 - pc.pc() as i64).rem_euclid(m as i64))
            .collect();

        let mut rows = Vec::with_capacity(m as usize);
        let mut labels_left = Vec::with_capacity(m as usize);
        let mut labels_right = Vec::with_capacity(m as usize);
        for &lead in &col0 {
            let t = (lead - p0).rem_euclid(m as i64);
            rows.push(p.transpose(t));
            labels_left.push(axis_label(t, 1, false, m));
            labels_right.push(axis_label(t, 1, true, m));
        }

        // column j is the inversion form leading from row 0's entry at j
        let mut labels_top = Vec::with_capacity(m as usize);
        let mut labels_bottom = Vec::with_capacity(m as usize);
        for pc in p.iter() {
            let c = (pc.pc() as i64 + p0).rem_euclid(m as i64);
            labels_top.push(axis_label(c, -1, false, m));
            labels_bottom.push(axis_label(c, -1, true, m));
        }

        Self {
            modulus: m,
            rows,
            labels_left,
            labels_right,
            labels_top,
            labels_bottom,
        }
    }

    /// The modulus (also the number of rows and columns)
    pub fn size(&self) -> u32 {
        self.modulus
    }

    /// Row `i` of the grid
    pub fn get_row(&self, i: usize) -> Option<&PcSeg> {
        self.rows.get(i)
    }

    /// Column `j`, read down through the stored rows
    pub fn get_column(&self, j: usize) -> Option<PcSeg> {
        if j >= self.modulus as usize {
            return None;
        }
        let pcs = self.rows.iter().filter_map(|row| row.get(j)).collect();
        PcSeg::from_pitch_classes(self.modulus, pcs).ok()
    }

    /// Transposition labels down the left edge
    pub fn labels_left(&self) -> &[String] {
        &self.labels_left
    }

    /// Retrograde labels down the right edge
    pub fn labels_right(&self) -> &[String] {
        &self.labels_right
    }

    /// Inversion labels across the top edge
    pub fn labels_top(&self) -> &[String] {
        &self.labels_top
    }

    /// Retrograde-inversion labels across the bottom edge
    pub fn labels_bottom(&self) -> &[String] {
        &self.labels_bottom
    }
}

impl fmt::Display for TwelveToneMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// A grid relating two rows under a chosen transformation family
///
/// Rows of the grid are forms of the reference row `P`, seeded so row
/// `i` leads with `Q[i]`; the columns then fall out as transposition
/// forms of `Q`. Cells equal to elements of `Q` expose the invariant
/// common subsequences between the two rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvarianceMatrix {
    relation: Relation,
    modulus: u32,
    rows: Vec<PcSeg>,
    labels_left: Vec<String>,
    labels_right: Vec<String>,
    labels_top: Vec<String>,
    labels_bottom: Vec<String>,
}

impl InvarianceMatrix {
    /// Build the grid from a reference row `p` and a seed row `q`
    pub fn new(relation: Relation, p: &Row, q: &Row) -> Result<Self> {
        check_moduli(p.modulus(), q.modulus())?;
        let m = p.modulus();
        let pseg = p.seg();
        let p0 = pseg.get(0).map(|pc| pc.pc() as i64).unwrap_or(0);

        let mut rows = Vec::with_capacity(m as usize);
        let mut labels_left = Vec::with_capacity(m as usize);
        let mut labels_right = Vec::with_capacity(m as usize);
        for lead in q.seg().iter() {
            let lead = lead.pc() as i64;
            match relation {
                Relation::Transposition => {
                    let t = (lead - p0).rem_euclid(m as i64);
                    rows.push(pseg.transpose(t));
                    labels_left.push(axis_label(t, 1, false, m));
                    labels_right.push(axis_label(t, 1, true, m));
                }
                Relation::Inversion => {
                    let t = (lead + p0).rem_euclid(m as i64);
                    rows.push(pseg.invert().transpose(t));
                    labels_left.push(axis_label(t, -1, false, m));
                    labels_right.push(axis_label(t, -1, true, m));
                }
            }
        }

        // either way, column j is a transposition form of Q
        let mut labels_top = Vec::with_capacity(m as usize);
        let mut labels_bottom = Vec::with_capacity(m as usize);
        for pc in pseg.iter() {
            let c = match relation {
                Relation::Transposition => (pc.pc() as i64 - p0).rem_euclid(m as i64),
                Relation::Inversion => (p0 - pc.pc() as i64).rem_euclid(m as i64),
            };
            labels_top.push(axis_label(c, 1, false, m));
            labels_bottom.push(axis_label(c, 1, true, m));
        }

        Ok(Self {
            relation,
            modulus: m,
            rows,
            labels_left,
            labels_right,
            labels_top,
            labels_bottom,
        })
    }

    /// The relation family the grid was built under
    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// The modulus (also the number of rows and columns)
    pub fn size(&self) -> u32 {
        self.modulus
    }

    /// Row `i` of the grid
    pub fn get_row(&self, i: usize) -> Option<&PcSeg> {
        self.rows.get(i)
    }

    /// Column `j`, read down through the stored rows
    pub fn get_column(&self, j: usize) -> Option<PcSeg> {
        if j >= self.modulus as usize {
            return None;
        }
        let pcs = self.rows.iter().filter_map(|row| row.get(j)).collect();
        PcSeg::from_pitch_classes(self.modulus, pcs).ok()
    }

    /// Labels down the left edge (forms of `P`)
    pub fn labels_left(&self) -> &[String] {
        &self.labels_left
    }

    /// Retrograde labels down the right edge
    pub fn labels_right(&self) -> &[String] {
        &self.labels_right
    }

    /// Labels across the top edge (transposition forms of `Q`)
    pub fn labels_top(&self) -> &[String] {
        &self.labels_top
    }

    /// Retrograde labels across the bottom edge
    pub fn labels_bottom(&self) -> &[String] {
        &self.labels_bottom
    }
}

impl fmt::Display for InvarianceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
