//! Exhaustive endgame search
//!
//! Builds the full graph of reachable residual-game states from a solver
//! snapshot and computes exact win probabilities by backward induction.
//!
//! # Model
//!
//! - A [`MicroSituation`] is one concrete mine assignment over the unresolved
//!   universe, expanded from a solver solution. Cells inside a group are
//!   interchangeable, so every expansion carries equal weight.
//! - A [`MacroSituation`] is an observationally distinct residual state: the
//!   per-cell revealed degrees, an owned solver snapshot, and the count of
//!   safe cells still to open. Macro states live in an arena addressed by
//!   index and are deduplicated by structural equality of their degree
//!   vectors, which keeps the self-referential transition graph finite and
//!   lets the backward pass run over plain indices.
//!
//! Every transition opens at least one cell, so remaining-to-open strictly
//! decreases along every edge and the graph has no cycles through
//! non-terminal states.
//!
//! The caller is responsible for only draining positions whose admissible
//! state count is small enough to enumerate; nothing here enforces that.

use crate::cell::{Cell, CellSet, CellStatus};
use crate::error::{Result, SolverError};
use crate::numeric::Rational;
use crate::solver::Solver;
use itertools::Itertools;
use std::collections::{HashMap, HashSet, VecDeque};

/// Board topology supplied by the excluded board layer.
pub trait Adjacency {
    fn neighbors(&self, cell: Cell) -> CellSet;
}

/// Arena index of the certain-loss terminal.
const FAIL: usize = 0;
/// Arena index of the certain-win terminal.
const SUCCEED: usize = 1;
/// Arena index of the initial state.
const INITIAL: usize = 2;

/// One concrete mine arrangement consistent with current knowledge.
#[derive(Debug, Clone)]
pub struct MicroSituation {
    /// Mine flag per universe position.
    pub mines: Vec<bool>,
    /// `(macro index, cell position) -> successor macro index`.
    pub transitions: HashMap<(usize, usize), usize>,
}

/// An observationally distinct residual game state.
#[derive(Debug)]
pub struct MacroSituation {
    /// Revealed degree per universe position; `None` when unopened.
    pub degrees: Vec<Option<u8>>,
    /// Safe cells still to open.
    pub remaining: usize,
    /// Owned solver snapshot; terminals carry none.
    pub solver: Option<Solver>,
    /// Attached consistent micro states.
    pub micros: Vec<usize>,
    /// Win probability per universe position, filled by the backward pass.
    pub probs: Vec<Rational>,
    /// Best achievable win probability from this state.
    pub best_prob: Rational,
    /// Every position attaining `best_prob`; ties retained in full.
    pub best_moves: Vec<usize>,
    terminal: bool,
}

impl MacroSituation {
    fn terminal(best_prob: Rational) -> Self {
        Self {
            degrees: Vec::new(),
            remaining: 0,
            solver: None,
            micros: Vec::new(),
            probs: Vec::new(),
            best_prob,
            best_moves: Vec::new(),
            terminal: true,
        }
    }
}

/// Outcome of a drain: the initial state's exact per-cell win probabilities
/// and the optimal move set. All intermediate states are discarded.
#[derive(Debug, Clone)]
pub struct DrainResult {
    /// The unresolved universe, in canonical order.
    pub cells: CellSet,
    /// Win probability per universe position when opening that cell next.
    pub probabilities: Vec<Rational>,
    /// The optimum over all positions.
    pub best_probability: Rational,
    /// Every cell attaining the optimum.
    pub best_moves: CellSet,
}

impl DrainResult {
    /// Win probability for opening `cell` next, if it is in the universe.
    pub fn probability_of(&self, cell: Cell) -> Option<&Rational> {
        self.cells.position(cell).map(|p| &self.probabilities[p])
    }
}

/// Solve the residual game below `solver` exactly.
///
/// `open_count` is the number of safe cells within the solver's constrained
/// universe; the caller owns that bookkeeping. The snapshot is re-solved,
/// every consistent mine arrangement is expanded, and the reachable state
/// graph is built and folded right to left.
pub fn drain<A: Adjacency>(
    mut solver: Solver,
    open_count: usize,
    adjacency: &A,
) -> Result<DrainResult> {
    solver.solve(true)?;
    let cells = solver.constrained_cells();
    if open_count == 0 || cells.is_empty() {
        // Nothing left to open: the residual game is already won
        let n = cells.len();
        return Ok(DrainResult {
            cells,
            probabilities: vec![Rational::zero(); n],
            best_probability: Rational::one(),
            best_moves: CellSet::empty(),
        });
    }

    let mut drainer = Drainer::new(solver, open_count, adjacency);
    drainer.explore()?;
    drainer.backward_induction();
    Ok(drainer.into_result())
}

struct Drainer {
    cells: CellSet,
    neighbor_sets: Vec<CellSet>,
    neighbor_pos: Vec<Vec<usize>>,
    macros: Vec<MacroSituation>,
    micro_sets: Vec<HashSet<usize>>,
    micros: Vec<MicroSituation>,
    dedup: HashMap<Vec<Option<u8>>, usize>,
    work: VecDeque<(usize, usize)>,
}

impl Drainer {
    fn new(solver: Solver, open_count: usize, adjacency: &impl Adjacency) -> Self {
        let cells = solver.constrained_cells();
        let n = cells.len();

        let neighbor_sets: Vec<CellSet> = (0..n)
            .map(|p| adjacency.neighbors(cells.get(p)).intersect(&cells))
            .collect();
        let neighbor_pos: Vec<Vec<usize>> = neighbor_sets
            .iter()
            .map(|ns| {
                ns.iter()
                    .map(|c| cells.position(c).expect("neighbor sets are clipped to the universe"))
                    .collect()
            })
            .collect();

        let micros = expand_micros(&solver, &cells);

        let mut drainer = Self {
            cells,
            neighbor_sets,
            neighbor_pos,
            macros: Vec::new(),
            micro_sets: Vec::new(),
            micros,
            dedup: HashMap::new(),
            work: VecDeque::new(),
        };

        drainer.macros.push(MacroSituation::terminal(Rational::zero()));
        drainer.micro_sets.push(HashSet::new());
        drainer.macros.push(MacroSituation::terminal(Rational::one()));
        drainer.micro_sets.push(HashSet::new());

        let initial = MacroSituation {
            degrees: vec![None; n],
            remaining: open_count,
            solver: Some(solver),
            micros: Vec::new(),
            probs: Vec::new(),
            best_prob: Rational::zero(),
            best_moves: Vec::new(),
            terminal: false,
        };
        drainer.dedup.insert(initial.degrees.clone(), INITIAL);
        drainer.macros.push(initial);
        drainer.micro_sets.push(HashSet::new());
        for u in 0..drainer.micros.len() {
            drainer.attach(INITIAL, u);
        }
        drainer
    }

    fn attach(&mut self, macro_idx: usize, micro_idx: usize) {
        if self.micro_sets[macro_idx].insert(micro_idx) {
            self.macros[macro_idx].micros.push(micro_idx);
            self.work.push_back((macro_idx, micro_idx));
        }
    }

    /// Expand every reachable (macro, micro, cell) opening until no new
    /// macro state appears.
    fn explore(&mut self) -> Result<()> {
        while let Some((mi, ui)) = self.work.pop_front() {
            let unopened: Vec<usize> = (0..self.cells.len())
                .filter(|&p| self.macros[mi].degrees[p].is_none())
                .collect();
            for p in unopened {
                let target = self.transition(mi, ui, p)?;
                self.micros[ui].transitions.insert((mi, p), target);
            }
        }
        Ok(())
    }

    /// Simulate opening position `p` in macro `mi` under ground truth `ui`.
    ///
    /// A mine hit is the Fail terminal. Otherwise the revealed degree is
    /// registered, zero-degree opens cascade, and forced-safe cells keep
    /// opening through deduction-only reductions; the full probability solve
    /// runs once no further forced opens remain.
    fn transition(&mut self, mi: usize, ui: usize, p: usize) -> Result<usize> {
        if self.micros[ui].mines[p] {
            return Ok(FAIL);
        }

        let (mut fork, mut degrees, base_remaining) = {
            let base = &self.macros[mi];
            (
                base.solver
                    .as_ref()
                    .expect("non-terminal macro carries a solver")
                    .clone(),
                base.degrees.clone(),
                base.remaining,
            )
        };

        let mut opened = 0usize;
        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(p);
        loop {
            while let Some(q) = queue.pop_front() {
                if degrees[q].is_some() {
                    continue;
                }
                let deg = self.neighbor_pos[q]
                    .iter()
                    .filter(|&&np| self.micros[ui].mines[np])
                    .count();
                degrees[q] = Some(deg as u8);
                opened += 1;
                fork.add_restrain(&CellSet::singleton(self.cells.get(q)), 0);
                fork.add_restrain(&self.neighbor_sets[q], deg);
                if deg == 0 {
                    for &np in &self.neighbor_pos[q] {
                        if degrees[np].is_none() {
                            queue.push_back(np);
                        }
                    }
                }
            }

            fork.deduce()?;
            let mut forced = self.forced_blanks(&fork, &degrees);
            if forced.is_empty() {
                fork.solve(true)?;
                forced = self.forced_blanks(&fork, &degrees);
                if forced.is_empty() {
                    break;
                }
            }
            queue.extend(forced);
        }

        let remaining = base_remaining
            .checked_sub(opened)
            .ok_or(SolverError::InconsistentConstraints)?;
        if remaining == 0 {
            return Ok(SUCCEED);
        }

        if let Some(&existing) = self.dedup.get(&degrees) {
            self.attach(existing, ui);
            return Ok(existing);
        }
        let idx = self.macros.len();
        self.dedup.insert(degrees.clone(), idx);
        self.macros.push(MacroSituation {
            degrees,
            remaining,
            solver: Some(fork),
            micros: Vec::new(),
            probs: Vec::new(),
            best_prob: Rational::zero(),
            best_moves: Vec::new(),
            terminal: false,
        });
        self.micro_sets.push(HashSet::new());
        self.attach(idx, ui);
        Ok(idx)
    }

    fn forced_blanks(&self, fork: &Solver, degrees: &[Option<u8>]) -> Vec<usize> {
        (0..degrees.len())
            .filter(|&q| {
                degrees[q].is_none() && fork.status(self.cells.get(q)) == CellStatus::Blank
            })
            .collect()
    }

    /// Fold the arena from terminals upward: a macro's per-cell win
    /// probability is the average over its attached micros of the successor's
    /// best probability, and its own best is the exact maximum over cells.
    fn backward_induction(&mut self) {
        let mut order: Vec<usize> = (INITIAL..self.macros.len()).collect();
        order.sort_by_key(|&i| self.macros[i].remaining);

        let n = self.cells.len();
        for mi in order {
            debug_assert!(!self.macros[mi].terminal);
            let micro_ids = self.macros[mi].micros.clone();
            let count = micro_ids.len();
            debug_assert!(count > 0, "non-terminal macro without consistent micros");
            let mut probs = vec![Rational::zero(); n];
            let mut best: Option<Rational> = None;
            let mut best_moves: Vec<usize> = Vec::new();
            for p in 0..n {
                if self.macros[mi].degrees[p].is_some() {
                    continue;
                }
                let mut sum = Rational::zero();
                for &u in &micro_ids {
                    let target = self.micros[u].transitions[&(mi, p)];
                    sum += &self.macros[target].best_prob;
                }
                let prob = sum / Rational::from_int(count as i64);
                let is_better = match &best {
                    None => true,
                    Some(b) => prob > *b,
                };
                if is_better {
                    best = Some(prob.clone());
                    best_moves = vec![p];
                } else if matches!(&best, Some(b) if prob == *b) {
                    best_moves.push(p);
                }
                probs[p] = prob;
            }
            let entry = &mut self.macros[mi];
            entry.probs = probs;
            entry.best_prob = best.unwrap_or_else(Rational::zero);
            entry.best_moves = best_moves;
        }
    }

    fn into_result(self) -> DrainResult {
        let initial = &self.macros[INITIAL];
        DrainResult {
            probabilities: initial.probs.clone(),
            best_probability: initial.best_prob.clone(),
            best_moves: CellSet::new(
                initial
                    .best_moves
                    .iter()
                    .map(|&p| self.cells.get(p))
                    .collect(),
            ),
            cells: self.cells,
        }
    }
}

/// Expand every solution into concrete mine arrangements over the universe.
/// Cells in a group are symmetric, so each concrete sub-selection of a
/// group's assigned count appears exactly once.
fn expand_micros(solver: &Solver, cells: &CellSet) -> Vec<MicroSituation> {
    let n = cells.len();
    let mut base = vec![false; n];
    for (p, c) in cells.iter().enumerate() {
        if solver.status(c) == CellStatus::Mine {
            base[p] = true;
        }
    }

    let group_positions: Vec<Vec<usize>> = solver
        .groups()
        .iter()
        .map(|g| {
            g.iter()
                .map(|c| cells.position(c).expect("groups are inside the universe"))
                .collect()
        })
        .collect();

    let mut micros = Vec::new();
    for sol in solver.solutions() {
        let per_group: Vec<Vec<Vec<usize>>> = group_positions
            .iter()
            .zip(&sol.counts)
            .map(|(positions, &k)| positions.iter().copied().combinations(k).collect())
            .collect();

        let mut partial: Vec<Vec<usize>> = vec![Vec::new()];
        for combos in &per_group {
            let mut next = Vec::with_capacity(partial.len() * combos.len());
            for chosen in &partial {
                for combo in combos {
                    let mut extended = chosen.clone();
                    extended.extend_from_slice(combo);
                    next.push(extended);
                }
            }
            partial = next;
        }

        for chosen in partial {
            let mut mines = base.clone();
            for p in chosen {
                mines[p] = true;
            }
            micros.push(MicroSituation {
                mines,
                transitions: HashMap::new(),
            });
        }
    }
    micros
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u32]) -> CellSet {
        CellSet::new(ids.iter().map(|&i| Cell(i)).collect())
    }

    fn ratio(n: i64, d: i64) -> Rational {
        Rational::new(n.into(), d.into())
    }

    /// Adjacency backed by an explicit neighbor table.
    struct TableBoard {
        table: HashMap<Cell, CellSet>,
    }

    impl TableBoard {
        fn new(edges: &[(u32, &[u32])]) -> Self {
            let table = edges
                .iter()
                .map(|&(c, ns)| (Cell(c), set(ns)))
                .collect();
            Self { table }
        }
    }

    impl Adjacency for TableBoard {
        fn neighbors(&self, cell: Cell) -> CellSet {
            self.table.get(&cell).cloned().unwrap_or_else(CellSet::empty)
        }
    }

    #[test]
    fn test_fifty_fifty_guess() {
        // two isolated cells, one mine: either guess wins half the time
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[0, 1]), 1);
        let board = TableBoard::new(&[(0, &[]), (1, &[])]);
        let result = drain(solver, 1, &board).unwrap();
        assert_eq!(result.best_probability, ratio(1, 2));
        assert_eq!(result.best_moves, set(&[0, 1]));
        assert_eq!(result.probability_of(Cell(0)), Some(&ratio(1, 2)));
    }

    #[test]
    fn test_line_of_three_prefers_the_ends() {
        // cells 0-1-2 in a row, exactly one mine. Opening an end cell either
        // hits the mine (1/3) or reveals enough to finish deterministically;
        // opening the middle leaves a coin flip behind.
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[0, 1, 2]), 1);
        let board = TableBoard::new(&[(0, &[1]), (1, &[0, 2]), (2, &[1])]);
        let result = drain(solver, 2, &board).unwrap();
        assert_eq!(result.best_probability, ratio(2, 3));
        assert_eq!(result.best_moves, set(&[0, 2]));
        assert_eq!(result.probability_of(Cell(1)), Some(&ratio(1, 3)));
    }

    #[test]
    fn test_zero_open_count_is_already_won() {
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[0, 1]), 2);
        let board = TableBoard::new(&[(0, &[1]), (1, &[0])]);
        let result = drain(solver, 0, &board).unwrap();
        assert_eq!(result.best_probability, Rational::one());
        assert!(result.best_moves.is_empty());
    }

    #[test]
    fn test_best_prob_is_true_maximum() {
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[0, 1, 2]), 1);
        let board = TableBoard::new(&[(0, &[1]), (1, &[0, 2]), (2, &[1])]);
        let result = drain(solver, 2, &board).unwrap();
        let max = result.probabilities.iter().max().unwrap();
        assert_eq!(&result.best_probability, max);
        assert!(!result.best_moves.is_empty());
        for c in result.best_moves.iter() {
            assert_eq!(result.probability_of(c), Some(max));
        }
    }
}
