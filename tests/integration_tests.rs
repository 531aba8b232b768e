// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for tonerow
//!
//! These tests verify that multiple components work together correctly:
//! the transformation engine against collections, the finder against the
//! catalogs, matrices against generator rows, and the constrained row
//! generators against the set-class classifier.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use tonerow::{
    all_interval_row, all_trichord_babbitt_row, all_trichord_row, classify, find_otos, find_utos,
    get_otos12, get_utos12, left_multiply_utos, random_row, ten_trichord_row, InvarianceMatrix,
    Oto, PcSeg, PcSet, Relation, RetryBudget, Row, TwelveToneMatrix, Uto,
};

/// Parsing "T5I" yields (T=5, M=11); applying it (multiply, then
/// transpose) to {2,4,9,10} yields the normalized set {1,3,7,8}
#[test]
fn test_t5i_scenario() {
    let t = Uto::parse("T5I", 12).unwrap();
    assert_eq!((t.t(), t.m()), (5, 11));

    let set = PcSet::mod12(&[2, 4, 9, 10]);
    let image = t.apply_set(&set).unwrap();
    assert_eq!(image, PcSet::mod12(&[1, 3, 7, 8]));

    // the same image under T7I would require transposing before
    // multiplying, which is not how application is defined
    let t7i = Uto::parse("T7I", 12).unwrap();
    assert_eq!(t7i.apply_set(&set).unwrap(), PcSet::mod12(&[3, 5, 9, 10]));
}

/// Partial-match search: find_otos([1,2,4,0], [5,6]) returns exactly
/// {T4, T7RM11}
#[test]
fn test_find_otos_partial_scenario() {
    let source = PcSeg::mod12(&[1, 2, 4, 0]);
    let target = PcSeg::mod12(&[5, 6]);
    let found = find_otos(&source, &target).unwrap();

    let expected: BTreeSet<Oto> = [
        Oto::parse("T4", 12).unwrap(),
        Oto::parse("T7RM11", 12).unwrap(),
    ]
    .into_iter()
    .collect();
    assert_eq!(found, expected);
}

/// The finder must recover every catalog transformation actually used
/// to produce the target
#[test]
fn test_finder_recovers_applied_transformations() {
    let row = Row::parse("[01675243A9B8]").unwrap();
    let source = row.seg();

    for t in get_utos12().values() {
        let target = t.apply_seg(source).unwrap();
        let found = find_utos(source, &target).unwrap();
        assert!(found.contains(t), "find_utos missed {t}");
    }
    for t in get_otos12().values() {
        let target = t.apply_seg(source).unwrap();
        let found = find_otos(source, &target).unwrap();
        assert!(found.contains(t), "find_otos missed {t}");
    }
}

/// Group laws over the full chromatic catalog: double inverse is the
/// identity map on the transformation, and t composed with its inverse
/// fixes every residue
#[test]
fn test_group_laws() {
    for t in get_utos12().values() {
        assert_eq!(t.inverse().inverse(), *t);

        let id = left_multiply_utos(&[*t, t.inverse()]).unwrap();
        let aggregate = PcSeg::mod12(&(0..12).collect::<Vec<i64>>());
        assert_eq!(id.apply_seg(&aggregate).unwrap(), aggregate);
    }

    for t in get_otos12().values() {
        let seg = PcSeg::mod12(&[1, 2, 4, 0, 9]);
        let roundtrip = t.inverse().apply_seg(&t.apply_seg(&seg).unwrap()).unwrap();
        assert_eq!(roundtrip, seg);
    }
}

/// The reference twelve-tone matrix from [0,1,6,7,5,2,4,3,10,9,11,8]
#[test]
fn test_reference_matrix() {
    let row = Row::parse("[01675243A9B8]").unwrap();
    let mx = TwelveToneMatrix::new(&row);

    assert_eq!(
        mx.get_row(2).unwrap(),
        &PcSeg::mod12(&[6, 7, 0, 1, 11, 8, 10, 9, 4, 3, 5, 2])
    );
    assert_eq!(
        mx.get_column(2).unwrap(),
        PcSeg::mod12(&[6, 5, 0, 11, 1, 4, 2, 3, 8, 9, 7, 10])
    );

    // every row and every column of the grid is itself a row
    for i in 0..12 {
        assert!(Row::new(mx.get_row(i).unwrap().clone()).is_ok());
        assert!(Row::new(mx.get_column(i).unwrap()).is_ok());
    }

    // the four label arrays name transformations from the catalogs
    for label in mx.labels_left().iter().chain(mx.labels_right()) {
        assert!(get_otos12().contains_key(label), "unknown label {label}");
    }
    for label in mx.labels_top().iter().chain(mx.labels_bottom()) {
        assert!(get_otos12().contains_key(label), "unknown label {label}");
    }
}

/// An invariance matrix between a row and its own T5 form marks the
/// transposition relation on every row of the grid
#[test]
fn test_invariance_matrix_between_related_rows() {
    let p = Row::parse("[01675243A9B8]").unwrap();
    let t5 = Uto::parse("T5", 12).unwrap();
    let q = Row::new(t5.apply_seg(p.seg()).unwrap()).unwrap();

    let mx = InvarianceMatrix::new(Relation::Transposition, &p, &q).unwrap();
    // row 0 leads with Q[0] = P[0]+5, so it is exactly Q
    assert_eq!(mx.get_row(0).unwrap(), q.seg());
    assert_eq!(mx.labels_left()[0], "T5");
}

/// Generated rows satisfy their constraints end to end, checked through
/// the public classifier
#[test]
fn test_generated_rows_hold_constraints() {
    let mut rng = StdRng::seed_from_u64(2026);
    let budget = RetryBudget::unbounded();

    let row = random_row(&mut rng);
    assert_eq!(row.len(), 12);

    let row = all_interval_row(&mut rng, budget).unwrap();
    let values: Vec<u32> = row.seg().iter().map(|pc| pc.pc()).collect();
    let intervals: BTreeSet<u32> = values.windows(2).map(|w| (w[1] + 12 - w[0]) % 12).collect();
    assert_eq!(intervals.len(), 11);

    let row = ten_trichord_row(&mut rng, budget).unwrap();
    let names = window_names(&row, false);
    assert_eq!(names.iter().collect::<BTreeSet<_>>().len(), 10);

    let row = all_trichord_row(&mut rng, budget).unwrap();
    let names = window_names(&row, true);
    assert_eq!(names.iter().collect::<BTreeSet<_>>().len(), 12);

    let row = all_trichord_babbitt_row(&mut rng, budget).unwrap();
    let names = window_names(&row, false);
    let distinct: BTreeSet<&String> = names.iter().collect();
    assert_eq!(distinct.len(), 10);
    assert!(!names.iter().any(|n| n == "[036]" || n == "[048]"));
}

/// Trichord window prime forms of a row, optionally read cyclically
fn window_names(row: &Row, cyclic: bool) -> Vec<String> {
    let values: Vec<i64> = row.seg().iter().map(|pc| pc.pc() as i64).collect();
    let count = if cyclic { 12 } else { 10 };
    (0..count)
        .map(|i| {
            let set = PcSet::mod12(&[
                values[i % 12],
                values[(i + 1) % 12],
                values[(i + 2) % 12],
            ]);
            classify(&set)
        })
        .collect()
}

/// Budgeted generation finds the hardest variant well inside a modest
/// attempt cap
#[test]
fn test_generation_within_budget() {
    let mut rng = StdRng::seed_from_u64(7);
    let result = all_trichord_row(&mut rng, RetryBudget::attempts(50));
    assert!(result.is_ok());
}
