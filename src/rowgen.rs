// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Randomized generation of constrained twelve-tone rows.
//!
//! Each generator runs a randomized depth-first search over permutations
//! of the chromatic aggregate, checking its constraint as every pitch
//! class is appended and backtracking on dead ends. Dead ends are normal
//! control flow, invisible to the caller; the only reportable failure is
//! exhausting an explicit [`RetryBudget`].
//!
//! Callers supply their own `Rng`, so a fixed seed gives a deterministic
//! row.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, TheoryError};
use crate::pcseg::{PcSeg, Row};
use crate::pcset::{classify, PcSet};

/// Trichord classes excluded by the Babbitt variant: the augmented triad
/// and the diminished trichord
const BABBITT_EXCLUDED: [&str; 2] = ["[036]", "[048]"];

/// Nodes a single search attempt may expand before restarting from an
/// empty prefix with fresh randomness
const ATTEMPT_NODE_CAP: u64 = 500_000;

/// Retry cap for the constrained generators
///
/// `None` retries forever, matching the original behavior; `Some(n)`
/// surfaces [`TheoryError::GenerationExhausted`] after `n` failed
/// attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetryBudget {
    pub max_attempts: Option<u64>,
}

impl RetryBudget {
    /// Retry until a row is found
    pub fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    /// Give up after `n` attempts
    pub fn attempts(n: u64) -> Self {
        Self {
            max_attempts: Some(n),
        }
    }
}

/// A random permutation of the chromatic aggregate (no constraint)
pub fn random_row<R: Rng + ?Sized>(rng: &mut R) -> Row {
    let mut values: Vec<i64> = (0..12).collect();
    values.shuffle(rng);
    // a shuffled aggregate is a permutation, so validation cannot fail
    Row::mod12(&values).expect("shuffled aggregate is a row")
}

/// A random mod-12 segment of the given length, optionally without
/// repeated pitch classes
///
/// Only 12 distinct pitch classes exist, so with `distinct` the result
/// is capped at 12 elements regardless of `len`.
pub fn random_pcseg<R: Rng + ?Sized>(rng: &mut R, len: usize, distinct: bool) -> PcSeg {
    if distinct {
        let mut values: Vec<i64> = (0..12).collect();
        values.shuffle(rng);
        values.truncate(len.min(12));
        PcSeg::mod12(&values)
    } else {
        let values: Vec<i64> = (0..len).map(|_| rng.gen_range(0..12)).collect();
        PcSeg::mod12(&values)
    }
}

/// An all-interval row: the 11 successive differences realize every
/// interval `1..=11` exactly once
pub fn all_interval_row<R: Rng + ?Sized>(rng: &mut R, budget: RetryBudget) -> Result<Row> {
    generate(rng, budget, "all_interval", |prefix, candidate| {
        let last = match prefix.last() {
            Some(&v) => v,
            None => return true,
        };
        let interval = (candidate + 12 - last) % 12;
        let mut seen = prefix
            .windows(2)
            .map(|w| (w[1] + 12 - w[0]) % 12);
        !seen.any(|used| used == interval)
    })
}

/// A row whose 10 overlapping trichords reduce to 10 distinct set
/// classes
pub fn ten_trichord_row<R: Rng + ?Sized>(rng: &mut R, budget: RetryBudget) -> Result<Row> {
    generate(rng, budget, "ten_trichord", |prefix, candidate| {
        trichord_extension_ok(prefix, candidate, &[])
    })
}

/// An all-trichord row: read cyclically, the 12 overlapping trichords
/// realize all 12 trichordal set classes
pub fn all_trichord_row<R: Rng + ?Sized>(rng: &mut R, budget: RetryBudget) -> Result<Row> {
    generate_with_completion(
        rng,
        budget,
        "all_trichord",
        |prefix, candidate| trichord_extension_ok(prefix, candidate, &[]),
        |row| {
            // the two wrapping windows must also be fresh
            let names = cyclic_trichord_names(row);
            let distinct: std::collections::BTreeSet<&String> = names.iter().collect();
            distinct.len() == 12
        },
    )
}

/// A Babbitt all-trichord row: the 10 non-cyclic trichords realize 10
/// distinct set classes, excluding the augmented triad `[048]` and the
/// diminished trichord `[036]`
pub fn all_trichord_babbitt_row<R: Rng + ?Sized>(
    rng: &mut R,
    budget: RetryBudget,
) -> Result<Row> {
    generate(rng, budget, "all_trichord_babbitt", |prefix, candidate| {
        trichord_extension_ok(prefix, candidate, &BABBITT_EXCLUDED)
    })
}

/// Set-class names of all 12 trichord windows of a row read cyclically
fn cyclic_trichord_names(row: &[u32]) -> Vec<String> {
    (0..12)
        .map(|i| {
            window_name(
                row[i],
                row[(i + 1) % 12],
                row[(i + 2) % 12],
            )
        })
        .collect()
}

fn window_name(a: u32, b: u32, c: u32) -> String {
    classify(&PcSet::mod12(&[a as i64, b as i64, c as i64]))
}

/// Check that appending `candidate` keeps every completed trichord
/// window distinct and outside the excluded classes
fn trichord_extension_ok(prefix: &[u32], candidate: u32, excluded: &[&str]) -> bool {
    if prefix.len() < 2 {
        return true;
    }
    let new_name = window_name(prefix[prefix.len() - 2], prefix[prefix.len() - 1], candidate);
    if excluded.contains(&new_name.as_str()) {
        return false;
    }
    for w in prefix.windows(3) {
        if window_name(w[0], w[1], w[2]) == new_name {
            return false;
        }
    }
    true
}

/// Run the retry loop around the depth-first search
fn generate<R, F>(rng: &mut R, budget: RetryBudget, variant: &str, extend_ok: F) -> Result<Row>
where
    R: Rng + ?Sized,
    F: Fn(&[u32], u32) -> bool,
{
    generate_with_completion(rng, budget, variant, extend_ok, |_| true)
}

fn generate_with_completion<R, F, C>(
    rng: &mut R,
    budget: RetryBudget,
    variant: &str,
    extend_ok: F,
    complete_ok: C,
) -> Result<Row>
where
    R: Rng + ?Sized,
    F: Fn(&[u32], u32) -> bool,
    C: Fn(&[u32]) -> bool,
{
    let mut attempts: u64 = 0;
    loop {
        attempts += 1;
        let mut prefix = Vec::with_capacity(12);
        let mut nodes: u64 = 0;
        if dfs(rng, &mut prefix, &mut nodes, &extend_ok, &complete_ok) {
            debug!(variant, attempts, nodes, "row generated");
            // the search only completes on a full permutation
            return Row::mod12(&prefix.iter().map(|&v| v as i64).collect::<Vec<_>>());
        }
        trace!(variant, attempts, nodes, "search attempt exhausted, restarting");
        if let Some(max) = budget.max_attempts {
            if attempts >= max {
                return Err(TheoryError::GenerationExhausted { attempts });
            }
        }
    }
}

/// Depth-first extension over the unused pitch classes, candidates
/// shuffled at every level; aborts when the node cap is hit
fn dfs<R, F, C>(
    rng: &mut R,
    prefix: &mut Vec<u32>,
    nodes: &mut u64,
    extend_ok: &F,
    complete_ok: &C,
) -> bool
where
    R: Rng + ?Sized,
    F: Fn(&[u32], u32) -> bool,
    C: Fn(&[u32]) -> bool,
{
    if prefix.len() == 12 {
        return complete_ok(prefix);
    }
    *nodes += 1;
    if *nodes > ATTEMPT_NODE_CAP {
        return false;
    }
    let mut candidates: Vec<u32> = (0..12).filter(|v| !prefix.contains(v)).collect();
    candidates.shuffle(rng);
    for candidate in candidates {
        if !extend_ok(prefix, candidate) {
            continue;
        }
        prefix.push(candidate);
        if dfs(rng, prefix, nodes, extend_ok, complete_ok) {
            return true;
        }
        prefix.pop();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn row_values(row: &Row) -> Vec<u32> {
        row.seg().iter().map(|pc| pc.pc()).collect()
    }

    #[test]
    fn test_random_row_is_permutation() {
        let mut rng = rng(7);
        for _ in 0..20 {
            let row = random_row(&mut rng);
            let mut values = row_values(&row);
            values.sort_unstable();
            assert_eq!(values, (0..12).collect::<Vec<u32>>());
        }
    }

    #[test]
    fn test_random_row_deterministic_for_fixed_seed() {
        let a = random_row(&mut rng(42));
        let b = random_row(&mut rng(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_pcseg() {
        let mut rng = rng(3);
        let seg = random_pcseg(&mut rng, 5, false);
        assert_eq!(seg.len(), 5);

        let seg = random_pcseg(&mut rng, 8, true);
        assert_eq!(seg.len(), 8);
        let distinct: BTreeSet<u32> = seg.iter().map(|pc| pc.pc()).collect();
        assert_eq!(distinct.len(), 8);

        // distinct segments cap at the aggregate
        let seg = random_pcseg(&mut rng, 20, true);
        assert_eq!(seg.len(), 12);
        let distinct: BTreeSet<u32> = seg.iter().map(|pc| pc.pc()).collect();
        assert_eq!(distinct.len(), 12);

        let seg = random_pcseg(&mut rng, 20, false);
        assert_eq!(seg.len(), 20);
    }

    #[test]
    fn test_all_interval_rows() {
        let mut rng = rng(11);
        for _ in 0..10 {
            let row = all_interval_row(&mut rng, RetryBudget::unbounded()).unwrap();
            let values = row_values(&row);
            let intervals: BTreeSet<u32> = values
                .windows(2)
                .map(|w| (w[1] + 12 - w[0]) % 12)
                .collect();
            assert_eq!(intervals, (1..12).collect::<BTreeSet<u32>>());
        }
    }

    #[test]
    fn test_ten_trichord_rows() {
        let mut rng = rng(13);
        for _ in 0..5 {
            let row = ten_trichord_row(&mut rng, RetryBudget::unbounded()).unwrap();
            let values = row_values(&row);
            let names: BTreeSet<String> = values
                .windows(3)
                .map(|w| window_name(w[0], w[1], w[2]))
                .collect();
            assert_eq!(names.len(), 10);
        }
    }

    #[test]
    fn test_all_trichord_rows() {
        let mut rng = rng(17);
        for _ in 0..3 {
            let row = all_trichord_row(&mut rng, RetryBudget::unbounded()).unwrap();
            let values = row_values(&row);
            let names: BTreeSet<String> =
                cyclic_trichord_names(&values).into_iter().collect();
            assert_eq!(names.len(), 12);
        }
    }

    #[test]
    fn test_all_trichord_babbitt_rows() {
        let mut rng = rng(19);
        for _ in 0..3 {
            let row = all_trichord_babbitt_row(&mut rng, RetryBudget::unbounded()).unwrap();
            let values = row_values(&row);
            let names: BTreeSet<String> = values
                .windows(3)
                .map(|w| window_name(w[0], w[1], w[2]))
                .collect();
            assert_eq!(names.len(), 10);
            assert!(!names.contains("[036]"));
            assert!(!names.contains("[048]"));
        }
    }

    #[test]
    fn test_exhausted_budget_is_reported() {
        // an unsatisfiable constraint burns the whole budget
        let mut rng = rng(23);
        let result = generate(&mut rng, RetryBudget::attempts(3), "never", |_, _| false);
        assert_eq!(
            result,
            Err(TheoryError::GenerationExhausted { attempts: 3 })
        );
    }
}
