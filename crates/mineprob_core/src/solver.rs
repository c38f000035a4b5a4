//! Exact constraint solver
//!
//! Maintains a partition of the unresolved constrained cells into groups,
//! linear restrains over those groups, and the enumerated admissible
//! solutions with exact state multiplicities.
//!
//! # Key Steps
//!
//! - [`Solver::add_restrain`] splits overlapping groups so every restrain
//!   keeps referencing whole groups, applying the index remapping to all
//!   existing restrains in one transaction.
//! - [`Solver::solve`] reduces to a fixed point, Gauss-Jordan eliminates the
//!   restrain matrix with a numeric tolerance, enumerates every integer
//!   assignment of the free columns, and aggregates exact per-group
//!   expectations from the admissible solutions.
//! - Probability and expectation queries answer in exact rationals; cells in
//!   the same group are interchangeable and share a probability exactly.

use crate::binomial::BinomialCache;
use crate::cell::{Cell, CellSet, CellStatus, StatusMap};
use crate::error::{Result, SolverError};
use crate::numeric::Rational;
use crate::sparse::SparseMatrix;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::collections::HashMap;

/// Pivot magnitude threshold for elimination.
const PIVOT_TOL: f64 = 1e-9;
/// Entries below this magnitude are dropped during pivot rewrites.
const DROP_TOL: f64 = 1e-12;
/// Back-substituted values farther than this from an integer are rejected.
const INT_TOL: f64 = 1e-6;

/// Linear constraint: the referenced groups contain exactly `mines` mines.
///
/// Restrains reference whole groups only; `add_restrain` restores that
/// invariant by splitting groups before the restrain is recorded.
#[derive(Debug, Clone)]
pub struct Restrain {
    pub groups: Vec<usize>,
    pub mines: usize,
}

/// One admissible integer assignment of mines per group.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Mine count per group, parallel to `Solver::groups`.
    pub counts: Vec<usize>,
    /// Exact number of concrete states this assignment represents:
    /// the product of C(group size, count) over all groups.
    pub states: BigUint,
    /// `states` over the total state count.
    pub ratio: Rational,
}

/// Incremental exact solver over accumulating mine-count constraints.
///
/// All state is exclusively owned; `Clone` deep-copies, so forked snapshots
/// never alias. The shared binomial cache is the single cross-instance
/// exception.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    pub(crate) groups: Vec<CellSet>,
    pub(crate) restrains: Vec<Restrain>,
    pub(crate) statuses: StatusMap,
    pub(crate) solutions: Vec<Solution>,
    pub(crate) total_states: BigUint,
    pub(crate) expectations: Vec<Rational>,
    pub(crate) probabilities: HashMap<Cell, Rational>,
    pub(crate) dist_cache: HashMap<crate::distribution::DistKey, Vec<BigUint>>,
    pub(crate) cond_cache: HashMap<crate::distribution::CondKey, Vec<BigUint>>,
    pub(crate) impossible: bool,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, cell: Cell) -> CellStatus {
        self.statuses.get(cell)
    }

    pub fn groups(&self) -> &[CellSet] {
        &self.groups
    }

    pub fn restrains(&self) -> &[Restrain] {
        &self.restrains
    }

    /// Admissible solutions from the most recent `solve`.
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Total admissible state count from the most recent `solve`.
    pub fn total_states(&self) -> &BigUint {
        &self.total_states
    }

    /// Exact expected mine count of a group, after `solve(true)`.
    pub fn group_expectation(&self, group: usize) -> Option<&Rational> {
        self.expectations.get(group)
    }

    /// Group index holding `cell`, if the cell is constrained.
    pub fn group_of(&self, cell: Cell) -> Option<usize> {
        self.groups.iter().position(|g| g.contains(cell))
    }

    /// Every cell referenced by the group partition, resolved or not.
    pub fn constrained_cells(&self) -> CellSet {
        self.groups
            .iter()
            .fold(CellSet::empty(), |acc, g| acc.union(g))
    }

    /// Constrained cells still of unknown status.
    pub fn unresolved_cells(&self) -> CellSet {
        self.constrained_cells()
            .iter()
            .filter(|&c| self.statuses.get(c) == CellStatus::Unknown)
            .collect()
    }

    /// Mine probability of a cell: exact 1/0 for resolved cells, the group
    /// probability for constrained cells after `solve(true)`, `None` for
    /// cells the solver has never seen.
    pub fn probability(&self, cell: Cell) -> Option<Rational> {
        match self.statuses.get(cell) {
            CellStatus::Mine => Some(Rational::one()),
            CellStatus::Blank => Some(Rational::zero()),
            CellStatus::Unknown => self.probabilities.get(&cell).cloned(),
        }
    }

    /// Exact expected number of mines in `cells`; `None` if any member is
    /// outside the solver's knowledge.
    pub fn expectation(&self, cells: &CellSet) -> Option<Rational> {
        let mut sum = Rational::zero();
        for c in cells.iter() {
            sum += &self.probability(c)?;
        }
        Some(sum)
    }

    fn invalidate(&mut self) {
        self.solutions.clear();
        self.total_states = BigUint::zero();
        self.expectations.clear();
        self.probabilities.clear();
        self.dist_cache.clear();
        self.cond_cache.clear();
    }

    /// Register "this cell set contains exactly `mines` mines".
    ///
    /// Already-resolved cells are stripped with `mines` adjusted, partially
    /// overlapping groups are split into (remainder, overlap), and the
    /// resulting old-index to new-index-list remapping is applied to every
    /// existing restrain before the new restrain is appended.
    pub fn add_restrain(&mut self, cells: &CellSet, mines: usize) {
        self.invalidate();

        let mut mines = mines;
        let mut unknown = Vec::new();
        for c in cells.iter() {
            match self.statuses.get(c) {
                CellStatus::Mine => {
                    if mines == 0 {
                        self.impossible = true;
                        return;
                    }
                    mines -= 1;
                }
                CellStatus::Blank => {}
                CellStatus::Unknown => unknown.push(c),
            }
        }
        let mut scope = CellSet::new(unknown);
        if mines > scope.len() {
            self.impossible = true;
            return;
        }

        let mut new_groups: Vec<CellSet> = Vec::with_capacity(self.groups.len() + 2);
        let mut remap: Vec<Vec<usize>> = Vec::with_capacity(self.groups.len());
        let mut referenced: Vec<usize> = Vec::new();

        for g in &self.groups {
            let overlap = g.intersect(&scope);
            if overlap.is_empty() {
                remap.push(vec![new_groups.len()]);
                new_groups.push(g.clone());
                continue;
            }
            scope = scope.difference(&overlap);
            if overlap.len() == g.len() {
                referenced.push(new_groups.len());
                remap.push(vec![new_groups.len()]);
                new_groups.push(g.clone());
            } else {
                let remainder = g.difference(&overlap);
                let remainder_id = new_groups.len();
                new_groups.push(remainder);
                let overlap_id = new_groups.len();
                new_groups.push(overlap);
                referenced.push(overlap_id);
                remap.push(vec![remainder_id, overlap_id]);
            }
        }
        if !scope.is_empty() {
            referenced.push(new_groups.len());
            new_groups.push(scope);
        }

        for r in &mut self.restrains {
            r.groups = r
                .groups
                .iter()
                .flat_map(|&g| remap[g].iter().copied())
                .collect();
        }
        self.groups = new_groups;

        if referenced.is_empty() {
            // Fully covered by resolved cells; only a count mismatch is left
            if mines != 0 {
                self.impossible = true;
            }
            return;
        }
        self.restrains.push(Restrain {
            groups: referenced,
            mines,
        });
    }

    fn force(&mut self, cell: Cell, status: CellStatus) -> Result<bool> {
        match self.statuses.get(cell) {
            CellStatus::Unknown => {
                self.statuses.set(cell, status);
                Ok(true)
            }
            s if s == status => Ok(false),
            _ => Err(SolverError::InconsistentConstraints),
        }
    }

    fn force_group(&mut self, group: usize, status: CellStatus) -> Result<bool> {
        let cells: Vec<Cell> = self.groups[group].iter().collect();
        let mut changed = false;
        for c in cells {
            changed |= self.force(c, status)?;
        }
        Ok(changed)
    }

    /// Deduction-only reduction: resolve trivial restrains and shrink groups,
    /// without the pairwise bound tightening that a full `solve` performs.
    pub fn deduce(&mut self) -> Result<()> {
        self.invalidate();
        self.reduce(false)
    }

    /// Run reduction to a fixed point.
    ///
    /// (a) restrains with count zero or count equal to their full referenced
    /// size force their cells and disappear; (b) groups shed resolved cells,
    /// folding resolved mine counts into referencing restrains and dropping
    /// empty groups with an index remap; (c) optionally, pairwise bounds
    /// between restrains sharing groups force further cells whenever a
    /// derived bound collapses to a single value.
    pub(crate) fn reduce(&mut self, tighten: bool) -> Result<()> {
        if self.impossible {
            return Err(SolverError::InconsistentConstraints);
        }
        loop {
            let mut changed = false;

            // (a) trivially resolved restrains
            let mut idx = 0;
            while idx < self.restrains.len() {
                let size: usize = self.restrains[idx]
                    .groups
                    .iter()
                    .map(|&g| self.groups[g].len())
                    .sum();
                let mines = self.restrains[idx].mines;
                if mines > size {
                    return Err(SolverError::InconsistentConstraints);
                }
                if mines == 0 || mines == size {
                    let status = if mines == 0 {
                        CellStatus::Blank
                    } else {
                        CellStatus::Mine
                    };
                    let groups = self.restrains[idx].groups.clone();
                    for g in groups {
                        self.force_group(g, status)?;
                    }
                    self.restrains.swap_remove(idx);
                    changed = true;
                } else {
                    idx += 1;
                }
            }

            // (b) shrink groups holding resolved cells
            changed |= self.shrink_groups()?;

            // (c) pairwise tightening, only once deduction is quiet
            if tighten && !changed {
                changed = self.tighten_pairs()?;
            }

            if !changed {
                return Ok(());
            }
        }
    }

    /// Remove resolved cells from groups, folding resolved mine counts into
    /// every referencing restrain and dropping groups that empty out.
    fn shrink_groups(&mut self) -> Result<bool> {
        let mut any = false;
        let mut mines_in = vec![0usize; self.groups.len()];
        let mut shrunk: Vec<CellSet> = Vec::with_capacity(self.groups.len());
        for (gi, g) in self.groups.iter().enumerate() {
            let mut keep = Vec::new();
            for c in g.iter() {
                match self.statuses.get(c) {
                    CellStatus::Unknown => keep.push(c),
                    CellStatus::Mine => mines_in[gi] += 1,
                    CellStatus::Blank => {}
                }
            }
            if keep.len() != g.len() {
                any = true;
            }
            shrunk.push(CellSet::new(keep));
        }
        if !any {
            return Ok(false);
        }

        let mut remap: Vec<Option<usize>> = Vec::with_capacity(shrunk.len());
        let mut new_groups = Vec::new();
        for s in shrunk {
            if s.is_empty() {
                remap.push(None);
            } else {
                remap.push(Some(new_groups.len()));
                new_groups.push(s);
            }
        }
        for r in &mut self.restrains {
            let mut folded = 0usize;
            let mut refs = Vec::with_capacity(r.groups.len());
            for &g in &r.groups {
                folded += mines_in[g];
                if let Some(n) = remap[g] {
                    refs.push(n);
                }
            }
            r.mines = r
                .mines
                .checked_sub(folded)
                .ok_or(SolverError::InconsistentConstraints)?;
            r.groups = refs;
        }
        self.groups = new_groups;
        Ok(true)
    }

    /// Derive bounds on the shared part of every restrain pair; when a bound
    /// collapses to a single value, the shared and exclusive spans may pin
    /// to empty or full and force their cells.
    fn tighten_pairs(&mut self) -> Result<bool> {
        let mut changed = false;
        let n = self.restrains.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let forced = {
                    let a = &self.restrains[i];
                    let b = &self.restrains[j];
                    let shared: Vec<usize> = a
                        .groups
                        .iter()
                        .copied()
                        .filter(|g| b.groups.contains(g))
                        .collect();
                    if shared.is_empty() {
                        continue;
                    }
                    let a_only: Vec<usize> = a
                        .groups
                        .iter()
                        .copied()
                        .filter(|g| !shared.contains(g))
                        .collect();
                    let b_only: Vec<usize> = b
                        .groups
                        .iter()
                        .copied()
                        .filter(|g| !shared.contains(g))
                        .collect();
                    let span = |gs: &[usize]| gs.iter().map(|&g| self.groups[g].len()).sum::<usize>();
                    let s_shared = span(&shared);
                    let s_a = span(&a_only);
                    let s_b = span(&b_only);
                    let lo = a
                        .mines
                        .saturating_sub(s_a)
                        .max(b.mines.saturating_sub(s_b));
                    let hi = s_shared.min(a.mines).min(b.mines);
                    if lo > hi {
                        return Err(SolverError::InconsistentConstraints);
                    }
                    if lo < hi {
                        continue;
                    }
                    let k = lo;
                    let mut forced: Vec<(usize, CellStatus)> = Vec::new();
                    let pin = |gs: &[usize], m: usize, total: usize, out: &mut Vec<(usize, CellStatus)>| {
                        if total == 0 {
                            return;
                        }
                        if m == 0 {
                            out.extend(gs.iter().map(|&g| (g, CellStatus::Blank)));
                        } else if m == total {
                            out.extend(gs.iter().map(|&g| (g, CellStatus::Mine)));
                        }
                    };
                    pin(&shared, k, s_shared, &mut forced);
                    pin(&a_only, a.mines - k, s_a, &mut forced);
                    pin(&b_only, b.mines - k, s_b, &mut forced);
                    forced
                };
                for (g, status) in forced {
                    changed |= self.force_group(g, status)?;
                }
            }
        }
        Ok(changed)
    }

    /// Reduce, eliminate, and enumerate every admissible assignment.
    ///
    /// Returns the exact total state count. With `compute_probabilities`,
    /// also aggregates per-group expectations, fills per-cell probabilities,
    /// and force-resolves any group whose expectation collapses to zero or
    /// to its full size.
    pub fn solve(&mut self, compute_probabilities: bool) -> Result<BigUint> {
        self.invalidate();
        self.reduce(true)?;

        let cache = BinomialCache::global();
        if let Some(max_group) = self.groups.iter().map(|g| g.len()).max() {
            cache.ensure(max_group);
        }

        let assignments = if self.restrains.is_empty() {
            debug_assert!(self.groups.is_empty(), "groups exist only through restrains");
            vec![vec![0usize; self.groups.len()]]
        } else {
            self.eliminate_and_enumerate()?
        };
        if assignments.is_empty() {
            return Err(SolverError::InconsistentConstraints);
        }

        let sizes: Vec<usize> = self.groups.iter().map(|g| g.len()).collect();
        let mut total = BigUint::zero();
        let mut solutions = Vec::with_capacity(assignments.len());
        for counts in assignments {
            let mut states = BigUint::one();
            for (g, &c) in counts.iter().enumerate() {
                states *= cache.choose(sizes[g], c);
            }
            total += &states;
            solutions.push(Solution {
                counts,
                states,
                ratio: Rational::zero(),
            });
        }
        for s in &mut solutions {
            s.ratio = Rational::from_biguint_ratio(&s.states, &total);
        }
        self.solutions = solutions;
        self.total_states = total.clone();

        if compute_probabilities {
            self.compute_probabilities()?;
        }
        Ok(total)
    }

    /// Build the restrain matrix, Gauss-Jordan eliminate with tolerance, and
    /// enumerate integer assignments of the free columns.
    fn eliminate_and_enumerate(&self) -> Result<Vec<Vec<usize>>> {
        let n_groups = self.groups.len();
        let n_rows = self.restrains.len();
        let target_col = n_groups;

        let mut m = SparseMatrix::new(n_rows, n_groups + 1);
        for (ri, r) in self.restrains.iter().enumerate() {
            for &g in &r.groups {
                m.set(ri, g, 1.0);
            }
            m.set(ri, target_col, r.mines as f64);
        }

        let mut row_used = vec![false; n_rows];
        let mut pivot_row = vec![usize::MAX; n_groups];
        let mut majors = Vec::new();
        let mut minors = Vec::new();
        for col in 0..n_groups {
            let pivot = m
                .col_entries(col)
                .into_iter()
                .find(|&(r, v)| !row_used[r] && v.abs() > PIVOT_TOL);
            let Some((pr, pv)) = pivot else {
                minors.push(col);
                continue;
            };
            row_used[pr] = true;
            pivot_row[col] = pr;
            majors.push(col);
            m.scale_row(pr, 1.0 / pv);
            for (r2, v2) in m.col_entries(col) {
                if r2 == pr {
                    continue;
                }
                m.row_axpy(r2, pr, -v2, DROP_TOL);
            }
        }

        // A pivotless row with a nonzero target admits no assignment at all
        for r in 0..n_rows {
            if row_used[r] {
                continue;
            }
            let mut has_coeff = false;
            let mut target = 0.0;
            for (c, v) in m.row_entries(r) {
                if c == target_col {
                    target = v;
                } else if v.abs() > PIVOT_TOL {
                    has_coeff = true;
                }
            }
            if !has_coeff && target.abs() > PIVOT_TOL {
                return Err(SolverError::InconsistentConstraints);
            }
        }

        let sizes: Vec<usize> = self.groups.iter().map(|g| g.len()).collect();
        let mut out = Vec::new();
        let mut assign = vec![0usize; n_groups];
        enumerate_minors(
            &m, &minors, &majors, &pivot_row, &sizes, target_col, 0, &mut assign, &mut out,
        );
        Ok(out)
    }

    /// Aggregate exact expectations and per-cell probabilities over the
    /// enumerated solutions.
    fn compute_probabilities(&mut self) -> Result<()> {
        let sizes: Vec<usize> = self.groups.iter().map(|g| g.len()).collect();
        let n_groups = sizes.len();

        let mut expectation_num = vec![BigUint::zero(); n_groups];
        for s in &self.solutions {
            for (g, &c) in s.counts.iter().enumerate() {
                expectation_num[g] += &s.states * BigUint::from(c);
            }
        }
        self.expectations = expectation_num
            .iter()
            .map(|e| Rational::from_biguint_ratio(e, &self.total_states))
            .collect();

        let mut collapsed: Vec<(usize, CellStatus)> = Vec::new();
        for g in 0..n_groups {
            let full = &self.total_states * BigUint::from(sizes[g]);
            if expectation_num[g].is_zero() {
                collapsed.push((g, CellStatus::Blank));
            } else if expectation_num[g] == full {
                collapsed.push((g, CellStatus::Mine));
            }
            let p = Rational::from_biguint_ratio(&expectation_num[g], &full);
            for c in self.groups[g].iter().collect::<Vec<_>>() {
                self.probabilities.insert(c, p.clone());
            }
        }
        for (g, status) in collapsed {
            self.force_group(g, status)?;
        }
        Ok(())
    }
}

/// Depth-first enumeration over the free columns; at each leaf the pivot
/// columns back-substitute and must land on an in-range integer.
#[allow(clippy::too_many_arguments)]
fn enumerate_minors(
    m: &SparseMatrix,
    minors: &[usize],
    majors: &[usize],
    pivot_row: &[usize],
    sizes: &[usize],
    target_col: usize,
    depth: usize,
    assign: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if depth == minors.len() {
        let mut counts = assign.clone();
        for &mc in majors {
            let pr = pivot_row[mc];
            let mut val = 0.0;
            for (c, v) in m.row_entries(pr) {
                if c == mc {
                    continue;
                } else if c == target_col {
                    val += v;
                } else {
                    val -= v * assign[c] as f64;
                }
            }
            if val < -INT_TOL || val > sizes[mc] as f64 + INT_TOL {
                return;
            }
            let rounded = val.round();
            if (val - rounded).abs() > INT_TOL {
                return;
            }
            counts[mc] = rounded as usize;
        }
        out.push(counts);
        return;
    }
    let col = minors[depth];
    for v in 0..=sizes[col] {
        assign[col] = v;
        enumerate_minors(
            m, minors, majors, pivot_row, sizes, target_col, depth + 1, assign, out,
        );
    }
    assign[col] = 0;
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

    #[test]
    fn test_one_of_three() {
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[0, 1, 2]), 1);
        let total = solver.solve(true).unwrap();
        assert_eq!(total, BigUint::from(3u32));
        for id in 0..3 {
            assert_eq!(solver.probability(Cell(id)), Some(ratio(1, 3)));
        }
        assert_eq!(solver.expectation(&set(&[0, 1, 2])), Some(ratio(1, 1)));
    }

    #[test]
    fn test_zero_count_forces_blank() {
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[4, 5, 6]), 0);
        solver.solve(true).unwrap();
        for id in 4..=6 {
            assert_eq!(solver.status(Cell(id)), CellStatus::Blank);
            assert_eq!(solver.probability(Cell(id)), Some(Rational::zero()));
        }
    }

    #[test]
    fn test_full_count_forces_mine() {
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[1, 2]), 2);
        solver.solve(true).unwrap();
        assert_eq!(solver.status(Cell(1)), CellStatus::Mine);
        assert_eq!(solver.status(Cell(2)), CellStatus::Mine);
        assert_eq!(solver.probability(Cell(1)), Some(Rational::one()));
    }

    #[test]
    fn test_group_splitting_on_overlap() {
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[0, 1, 2]), 1);
        solver.add_restrain(&set(&[2, 3, 4]), 1);
        // {0,1,2} split against {2,3,4}: partition is {0,1}, {2}, {3,4}
        assert_eq!(solver.groups().len(), 3);
        let total = solver.solve(true).unwrap();
        // mine at 2: 1 state; mines in {0,1} and {3,4}: 2*2 states
        assert_eq!(total, BigUint::from(5u32));
        assert_eq!(solver.probability(Cell(2)), Some(ratio(1, 5)));
        assert_eq!(solver.probability(Cell(0)), Some(ratio(2, 5)));
        assert_eq!(solver.probability(Cell(3)), Some(ratio(2, 5)));
    }

    #[test]
    fn test_subset_restrain_deduces_remainder() {
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[0, 1, 2, 3]), 1);
        solver.add_restrain(&set(&[0, 1]), 1);
        solver.solve(true).unwrap();
        // the single mine lives in {0,1}, so {2,3} must be blank
        assert_eq!(solver.status(Cell(2)), CellStatus::Blank);
        assert_eq!(solver.status(Cell(3)), CellStatus::Blank);
        assert_eq!(solver.probability(Cell(0)), Some(ratio(1, 2)));
    }

    #[test]
    fn test_inconsistent_counts_propagate() {
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[0, 1]), 0);
        solver.add_restrain(&set(&[0, 1]), 2);
        assert_eq!(solver.solve(true), Err(SolverError::InconsistentConstraints));
    }

    #[test]
    fn test_solve_is_idempotent() {
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[0, 1, 2]), 1);
        solver.add_restrain(&set(&[2, 3, 4]), 1);
        let t1 = solver.solve(true).unwrap();
        let p1 = solver.probability(Cell(0));
        let t2 = solver.solve(true).unwrap();
        assert_eq!(t1, t2);
        assert_eq!(p1, solver.probability(Cell(0)));
    }

    #[test]
    fn test_group_probability_times_size_is_expectation() {
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[0, 1, 2]), 1);
        solver.add_restrain(&set(&[2, 3, 4]), 1);
        solver.solve(true).unwrap();
        for (g, cells) in solver.groups().to_vec().iter().enumerate() {
            if cells.is_empty() {
                continue;
            }
            let per_cell = solver.probability(cells.get(0)).unwrap();
            let total: Rational = (0..cells.len()).map(|_| per_cell.clone()).sum();
            assert_eq!(&total, solver.group_expectation(g).unwrap());
        }
    }

    #[test]
    fn test_resolved_cells_stripped_from_new_restrains() {
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[0, 1]), 2);
        solver.solve(true).unwrap();
        // both cells are mines now; a new restrain over them plus fresh cells
        // folds the two resolved mines into the count
        solver.add_restrain(&set(&[0, 1, 2, 3]), 2);
        solver.solve(true).unwrap();
        assert_eq!(solver.status(Cell(2)), CellStatus::Blank);
        assert_eq!(solver.status(Cell(3)), CellStatus::Blank);
    }

    #[test]
    fn test_total_mine_count_constraint() {
        // classic endgame: 5 cells, 2 mines total, frontier restrain of 1
        let mut solver = Solver::new();
        solver.add_restrain(&set(&[0, 1, 2, 3, 4]), 2);
        solver.add_restrain(&set(&[0, 1]), 1);
        let total = solver.solve(true).unwrap();
        // mine in {0,1}: 2 ways to place, second mine among {2,3,4}: 3 ways
        assert_eq!(total, BigUint::from(6u32));
        assert_eq!(solver.probability(Cell(0)), Some(ratio(1, 2)));
        assert_eq!(solver.probability(Cell(2)), Some(ratio(1, 3)));
    }
}
