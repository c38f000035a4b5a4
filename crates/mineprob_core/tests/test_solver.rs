//! End-to-end solver behavior through the public API.

use mineprob_core::{Cell, CellSet, CellStatus, Rational, Solver, SolverError};
use num_bigint::BigUint;

fn set(ids: &[u32]) -> CellSet {
    CellSet::new(ids.iter().map(|&i| Cell(i)).collect())
}

fn ratio(n: i64, d: i64) -> Rational {
    Rational::new(n.into(), d.into())
}

#[test]
fn one_mine_among_three_unconstrained_cells() {
    let mut solver = Solver::new();
    solver.add_restrain(&set(&[10, 11, 12]), 1);
    let total = solver.solve(true).unwrap();

    assert_eq!(total, BigUint::from(3u32));
    for id in 10..=12 {
        assert_eq!(solver.probability(Cell(id)), Some(ratio(1, 3)));
    }

    // every admissible state puts exactly one mine in the set: the
    // degree-one count is 3, one state per single-cell selection
    let dist = solver.distribution(&set(&[10, 11, 12])).unwrap();
    assert_eq!(
        dist,
        vec![
            BigUint::from(0u32),
            BigUint::from(3u32),
            BigUint::from(0u32),
            BigUint::from(0u32)
        ]
    );
}

#[test]
fn zero_count_forces_every_cell_blank() {
    let mut solver = Solver::new();
    solver.add_restrain(&set(&[0, 1, 2, 3]), 0);
    solver.solve(true).unwrap();
    for id in 0..4 {
        assert_eq!(solver.status(Cell(id)), CellStatus::Blank);
        assert_eq!(solver.probability(Cell(id)), Some(Rational::zero()));
    }
}

#[test]
fn full_count_forces_every_cell_mine() {
    let mut solver = Solver::new();
    solver.add_restrain(&set(&[0, 1, 2]), 3);
    solver.solve(true).unwrap();
    for id in 0..3 {
        assert_eq!(solver.status(Cell(id)), CellStatus::Mine);
        assert_eq!(solver.probability(Cell(id)), Some(Rational::one()));
    }
}

#[test]
fn solve_twice_reports_identical_results() {
    let mut solver = Solver::new();
    solver.add_restrain(&set(&[0, 1, 2, 3, 4]), 2);
    solver.add_restrain(&set(&[0, 1]), 1);
    solver.add_restrain(&set(&[3, 4]), 1);

    let t1 = solver.solve(true).unwrap();
    let probs1: Vec<_> = (0..5).map(|i| solver.probability(Cell(i))).collect();
    let t2 = solver.solve(true).unwrap();
    let probs2: Vec<_> = (0..5).map(|i| solver.probability(Cell(i))).collect();

    assert_eq!(t1, t2);
    assert_eq!(probs1, probs2);
}

#[test]
fn contradictory_restrains_fail_the_solve() {
    let mut solver = Solver::new();
    solver.add_restrain(&set(&[0, 1, 2]), 1);
    solver.add_restrain(&set(&[0, 1, 2]), 2);
    assert_eq!(solver.solve(true), Err(SolverError::InconsistentConstraints));
}

#[test]
fn conditioning_a_set_on_itself_is_a_delta() {
    let mut solver = Solver::new();
    solver.add_restrain(&set(&[0, 1, 2, 3, 4]), 2);
    let total = solver.solve(true).unwrap();
    let cells = set(&[0, 1, 2, 3, 4]);
    let dist = solver.distribution_conditioned(&cells, &cells, 2).unwrap();
    for (degree, count) in dist.iter().enumerate() {
        if degree == 2 {
            assert_eq!(count, &total);
        } else {
            assert_eq!(count, &BigUint::from(0u32));
        }
    }
}

#[test]
fn expectation_matches_probability_sum() {
    let mut solver = Solver::new();
    solver.add_restrain(&set(&[0, 1, 2, 3, 4, 5]), 2);
    solver.add_restrain(&set(&[0, 1, 2]), 1);
    solver.solve(true).unwrap();

    let cells = set(&[0, 1, 2, 3]);
    let by_sum: Rational = cells
        .iter()
        .map(|c| solver.probability(c).unwrap())
        .sum();
    assert_eq!(solver.expectation(&cells), Some(by_sum));
}

#[test]
fn probability_of_unseen_cell_is_unknown() {
    let mut solver = Solver::new();
    solver.add_restrain(&set(&[0, 1]), 1);
    solver.solve(true).unwrap();
    assert_eq!(solver.probability(Cell(99)), None);
    assert_eq!(solver.expectation(&set(&[0, 99])), None);
}

#[test]
fn deductions_chain_across_restrains() {
    // a 1-2-1 pattern along a wall: mines are pinned at the outer cells
    let mut solver = Solver::new();
    solver.add_restrain(&set(&[0, 1]), 1);
    solver.add_restrain(&set(&[0, 1, 2]), 2);
    solver.add_restrain(&set(&[1, 2]), 1);
    solver.solve(true).unwrap();
    assert_eq!(solver.status(Cell(0)), CellStatus::Mine);
    assert_eq!(solver.status(Cell(1)), CellStatus::Blank);
    assert_eq!(solver.status(Cell(2)), CellStatus::Mine);
}

#[test]
fn snapshot_clones_never_alias() {
    let mut solver = Solver::new();
    solver.add_restrain(&set(&[0, 1, 2]), 1);
    solver.solve(true).unwrap();

    let mut fork = solver.clone();
    fork.add_restrain(&set(&[0]), 0);
    fork.solve(true).unwrap();

    assert_eq!(fork.status(Cell(0)), CellStatus::Blank);
    assert_eq!(fork.probability(Cell(1)), Some(ratio(1, 2)));
    // the original is untouched by the fork's deductions
    assert_eq!(solver.status(Cell(0)), CellStatus::Unknown);
    assert_eq!(solver.probability(Cell(1)), Some(ratio(1, 3)));
}
