//! Exact mine-count distribution queries
//!
//! For a query set, the per-degree state counts follow from convolving each
//! group's local hypergeometric terms across every admissible solution. The
//! drainer issues many overlapping queries, so results are memoized per
//! solver on a canonicalized overlap signature; the caches are dropped
//! whenever the constraint state changes.

use crate::binomial::BinomialCache;
use crate::cell::{CellSet, CellStatus};
use crate::error::Result;
use crate::numeric::Rational;
use crate::solver::Solver;
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Memo key: non-zero per-group overlap counts plus the degree shift from
/// already-resolved mines and the query length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct DistKey {
    overlaps: Vec<(usize, usize)>,
    shift: usize,
    len: usize,
}

/// Memo key for the conditioned variant: per-group (both, target-only,
/// condition-only) splits plus the residual condition total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CondKey {
    splits: Vec<(usize, usize, usize, usize)>,
    shift: usize,
    len: usize,
    cond_count: usize,
}

impl Solver {
    fn require_solved(&mut self) -> Result<()> {
        if self.solutions.is_empty() {
            self.solve(false)?;
        }
        Ok(())
    }

    /// Per-group overlap of the unknown members of `cells`, plus the count of
    /// resolved mines among them.
    ///
    /// Panics if an unknown member is outside every group: a distribution
    /// over unconstrained cells has no exact answer, so asking for one is a
    /// programming error.
    fn classify(&self, cells: &CellSet) -> (Vec<usize>, usize) {
        let mut overlap = vec![0usize; self.groups.len()];
        let mut shift = 0usize;
        for c in cells.iter() {
            match self.statuses.get(c) {
                CellStatus::Mine => shift += 1,
                CellStatus::Blank => {}
                CellStatus::Unknown => {
                    let g = self
                        .group_of(c)
                        .unwrap_or_else(|| panic!("distribution over unconstrained cell {c}"));
                    overlap[g] += 1;
                }
            }
        }
        (overlap, shift)
    }

    /// Exact per-degree state counts for the number of mines inside `cells`.
    ///
    /// Entry `d` counts the admissible concrete states placing exactly `d`
    /// mines in the set; the entries sum to the total state count.
    pub fn distribution(&mut self, cells: &CellSet) -> Result<Vec<BigUint>> {
        self.require_solved()?;
        let (overlap, shift) = self.classify(cells);

        let key = DistKey {
            overlaps: overlap
                .iter()
                .enumerate()
                .filter(|&(_, &o)| o > 0)
                .map(|(g, &o)| (g, o))
                .collect(),
            shift,
            len: cells.len(),
        };
        if let Some(cached) = self.dist_cache.get(&key) {
            return Ok(cached.clone());
        }

        let cache = BinomialCache::global();
        let sizes: Vec<usize> = self.groups.iter().map(|g| g.len()).collect();
        let mut dist = vec![BigUint::zero(); cells.len() + 1];
        for sol in &self.solutions {
            let mut acc = vec![BigUint::one()];
            for g in 0..sizes.len() {
                let local = local_terms(cache, sizes[g], sol.counts[g], overlap[g]);
                acc = convolve(&acc, &local);
            }
            for (d, count) in acc.iter().enumerate() {
                if !count.is_zero() {
                    dist[d + shift] += count;
                }
            }
        }

        self.dist_cache.insert(key, dist.clone());
        Ok(dist)
    }

    /// Distribution over `cells` restricted to states placing exactly
    /// `cond_count` mines inside `condition`.
    ///
    /// Each group's assigned mines split three ways between the overlap with
    /// both sets, the target-only part, and the condition-only part, under
    /// the condition total. Impossible or empty conditions yield an all-zero
    /// distribution; that is a legitimate answer, not a failure.
    pub fn distribution_conditioned(
        &mut self,
        cells: &CellSet,
        condition: &CellSet,
        cond_count: usize,
    ) -> Result<Vec<BigUint>> {
        self.require_solved()?;
        let zeros = vec![BigUint::zero(); cells.len() + 1];

        let (_, shift) = self.classify(cells);
        let mut cond_needed = cond_count;
        for c in condition.iter() {
            if self.statuses.get(c) == CellStatus::Mine {
                if cond_needed == 0 {
                    return Ok(zeros);
                }
                cond_needed -= 1;
            }
        }

        // Per-group three-way splits of the unknown members
        let n_groups = self.groups.len();
        let mut both = vec![0usize; n_groups];
        let mut target_only = vec![0usize; n_groups];
        let mut cond_only = vec![0usize; n_groups];
        for c in cells.iter() {
            if self.statuses.get(c) != CellStatus::Unknown {
                continue;
            }
            let g = self
                .group_of(c)
                .unwrap_or_else(|| panic!("distribution over unconstrained cell {c}"));
            if condition.contains(c) {
                both[g] += 1;
            } else {
                target_only[g] += 1;
            }
        }
        for c in condition.iter() {
            if self.statuses.get(c) != CellStatus::Unknown || cells.contains(c) {
                continue;
            }
            let g = self
                .group_of(c)
                .unwrap_or_else(|| panic!("condition over unconstrained cell {c}"));
            cond_only[g] += 1;
        }

        let cond_capacity: usize = (0..n_groups).map(|g| both[g] + cond_only[g]).sum();
        if cond_needed > cond_capacity {
            return Ok(zeros);
        }

        let key = CondKey {
            splits: (0..n_groups)
                .filter(|&g| both[g] + target_only[g] + cond_only[g] > 0)
                .map(|g| (g, both[g], target_only[g], cond_only[g]))
                .collect(),
            shift,
            len: cells.len(),
            cond_count: cond_needed,
        };
        if let Some(cached) = self.cond_cache.get(&key) {
            return Ok(cached.clone());
        }

        let cache = BinomialCache::global();
        let sizes: Vec<usize> = self.groups.iter().map(|g| g.len()).collect();
        let mut dist = zeros;
        for sol in &self.solutions {
            split_groups(
                cache,
                &sizes,
                &sol.counts,
                &both,
                &target_only,
                &cond_only,
                0,
                cond_needed,
                shift,
                &BigUint::from(1u32),
                &mut dist,
            );
        }

        self.cond_cache.insert(key, dist.clone());
        Ok(dist)
    }

    /// Distribution entries as exact ratios over the total state count.
    pub fn distribution_ratios(&mut self, cells: &CellSet) -> Result<Vec<Rational>> {
        let dist = self.distribution(cells)?;
        let total = self.total_states.clone();
        Ok(dist
            .iter()
            .map(|d| Rational::from_biguint_ratio(d, &total))
            .collect())
    }
}

/// Local hypergeometric term counts for one group: entry `j` counts the ways
/// to put `j` of the group's `count` mines into its `overlap` cells.
fn local_terms(cache: &BinomialCache, size: usize, count: usize, overlap: usize) -> Vec<BigUint> {
    let hi = overlap.min(count);
    let mut terms = vec![BigUint::zero(); hi + 1];
    for (j, term) in terms.iter_mut().enumerate() {
        if count - j <= size - overlap {
            *term = cache.choose(overlap, j) * cache.choose(size - overlap, count - j);
        }
    }
    terms
}

fn convolve(a: &[BigUint], b: &[BigUint]) -> Vec<BigUint> {
    let mut out = vec![BigUint::zero(); a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        if x.is_zero() {
            continue;
        }
        for (j, y) in b.iter().enumerate() {
            if !y.is_zero() {
                out[i + j] += x * y;
            }
        }
    }
    out
}

/// Bounded enumeration of one solution's per-group splits under the residual
/// condition total, accumulating degree weights straight into `dist`.
#[allow(clippy::too_many_arguments)]
fn split_groups(
    cache: &BinomialCache,
    sizes: &[usize],
    counts: &[usize],
    both: &[usize],
    target_only: &[usize],
    cond_only: &[usize],
    group: usize,
    cond_left: usize,
    degree: usize,
    weight: &BigUint,
    dist: &mut Vec<BigUint>,
) {
    if group == sizes.len() {
        if cond_left == 0 {
            dist[degree] += weight;
        }
        return;
    }
    let (n, c) = (sizes[group], counts[group]);
    let (b, t, co) = (both[group], target_only[group], cond_only[group]);
    let rest = n - b - t - co;
    for jb in 0..=b.min(c).min(cond_left) {
        for jt in 0..=t.min(c - jb) {
            for jc in 0..=co.min(c - jb - jt).min(cond_left - jb) {
                let jr = c - jb - jt - jc;
                if jr > rest {
                    continue;
                }
                let ways = cache.choose(b, jb)
                    * cache.choose(t, jt)
                    * cache.choose(co, jc)
                    * cache.choose(rest, jr);
                if ways.is_zero() {
                    continue;
                }
                let w = weight * ways;
                split_groups(
                    cache,
                    sizes,
                    counts,
                    both,
                    target_only,
                    cond_only,
                    group + 1,
                    cond_left - jb - jc,
                    degree + jb + jt,
                    &w,
                    dist,
                );
            }
        }
    }
}
