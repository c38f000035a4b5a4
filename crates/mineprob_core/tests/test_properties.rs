//! Property-based tests for set algebra and solver invariants.
//!
//! Constraint systems are generated from a hidden ground-truth arrangement,
//! so every generated system is satisfiable by construction.

use mineprob_core::{Cell, CellSet, CellStatus, Rational, Solver};
use num_bigint::BigUint;
use proptest::prelude::*;

const BOARD: usize = 6;

fn mask_to_set(mask: &[bool]) -> CellSet {
    CellSet::new(
        mask.iter()
            .enumerate()
            .filter(|(_, &b)| b)
            .map(|(i, _)| Cell(i as u32))
            .collect(),
    )
}

/// Strategy: a hidden mine arrangement over the fixed board.
fn truth_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), BOARD)
}

/// Strategy: a handful of observation masks over the board.
fn masks_strategy() -> impl Strategy<Value = Vec<Vec<bool>>> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), BOARD), 1..5)
}

/// Feed the solver constraints whose counts come from the ground truth.
fn solver_from(truth: &[bool], masks: &[Vec<bool>]) -> Solver {
    let mut solver = Solver::new();
    for mask in masks {
        let cells = mask_to_set(mask);
        if cells.is_empty() {
            continue;
        }
        let count = cells.iter().filter(|c| truth[c.0 as usize]).count();
        solver.add_restrain(&cells, count);
    }
    solver
}

proptest! {
    // 1. Set algebra: size identities and containment
    #[test]
    fn cellset_algebra_identities(a in truth_strategy(), b in truth_strategy()) {
        let sa = mask_to_set(&a);
        let sb = mask_to_set(&b);
        let inter = sa.intersect(&sb);
        let union = sa.union(&sb);
        let diff = sa.difference(&sb);

        prop_assert_eq!(union.len() + inter.len(), sa.len() + sb.len());
        prop_assert_eq!(diff.len() + inter.len(), sa.len());
        for c in inter.iter() {
            prop_assert!(sa.contains(c) && sb.contains(c));
        }
        for c in diff.iter() {
            prop_assert!(sa.contains(c) && !sb.contains(c));
        }
    }

    // 2. Consistent systems always solve, with at least one state
    #[test]
    fn consistent_systems_solve(truth in truth_strategy(), masks in masks_strategy()) {
        let mut solver = solver_from(&truth, &masks);
        let total = solver.solve(true).unwrap();
        prop_assert!(total >= BigUint::from(1u32));
    }

    // 3. Every probability lies in [0, 1]
    #[test]
    fn probabilities_in_unit_interval(truth in truth_strategy(), masks in masks_strategy()) {
        let mut solver = solver_from(&truth, &masks);
        solver.solve(true).unwrap();
        for i in 0..BOARD as u32 {
            if let Some(p) = solver.probability(Cell(i)) {
                prop_assert!(p >= Rational::zero());
                prop_assert!(p <= Rational::one());
            }
        }
    }

    // 4. Forced statuses never contradict the ground truth
    #[test]
    fn forced_cells_match_truth(truth in truth_strategy(), masks in masks_strategy()) {
        let mut solver = solver_from(&truth, &masks);
        solver.solve(true).unwrap();
        for i in 0..BOARD {
            match solver.status(Cell(i as u32)) {
                CellStatus::Mine => prop_assert!(truth[i]),
                CellStatus::Blank => prop_assert!(!truth[i]),
                CellStatus::Unknown => {}
            }
        }
    }

    // 5. Distribution entries sum to the total state count
    #[test]
    fn distribution_sums_to_total(
        truth in truth_strategy(),
        masks in masks_strategy(),
        query in truth_strategy(),
    ) {
        let mut solver = solver_from(&truth, &masks);
        let total = solver.solve(true).unwrap();
        // keep the query inside solver knowledge
        let known = mask_to_set(&query)
            .iter()
            .filter(|&c| solver.probability(c).is_some())
            .collect::<CellSet>();
        let dist = solver.distribution(&known).unwrap();
        let sum: BigUint = dist.iter().sum();
        prop_assert_eq!(sum, total);
    }

    // 6. Solving twice with no new constraints changes nothing
    #[test]
    fn solve_is_idempotent(truth in truth_strategy(), masks in masks_strategy()) {
        let mut solver = solver_from(&truth, &masks);
        let t1 = solver.solve(true).unwrap();
        let p1: Vec<_> = (0..BOARD as u32).map(|i| solver.probability(Cell(i))).collect();
        let t2 = solver.solve(true).unwrap();
        let p2: Vec<_> = (0..BOARD as u32).map(|i| solver.probability(Cell(i))).collect();
        prop_assert_eq!(t1, t2);
        prop_assert_eq!(p1, p2);
    }
}
