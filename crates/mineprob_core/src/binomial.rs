//! Shared binomial coefficient cache
//!
//! A growable Pascal's triangle of exact `BigUint` coefficients. The cache is
//! the only state shared between solver instances: independent solves may run
//! on separate threads, so reads take a shared lock and growth takes the
//! exclusive lock. Growth is monotonic; rows are never shrunk or replaced.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::sync::{OnceLock, RwLock};

static GLOBAL: OnceLock<BinomialCache> = OnceLock::new();

/// Read-write-locked Pascal's triangle.
#[derive(Debug)]
pub struct BinomialCache {
    rows: RwLock<Vec<Vec<BigUint>>>,
}

impl BinomialCache {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(vec![vec![BigUint::one()]]),
        }
    }

    /// The process-wide cache, created on first use.
    pub fn global() -> &'static BinomialCache {
        GLOBAL.get_or_init(BinomialCache::new)
    }

    /// Grow the triangle so that every `choose(m, _)` with `m <= n` is served.
    /// Concurrent readers keep reading the already-grown prefix.
    pub fn ensure(&self, n: usize) {
        {
            let rows = self.rows.read().expect("binomial cache lock poisoned");
            if rows.len() > n {
                return;
            }
        }
        let mut rows = self.rows.write().expect("binomial cache lock poisoned");
        while rows.len() <= n {
            let prev = rows.last().expect("cache holds at least row zero");
            let mut next = Vec::with_capacity(prev.len() + 1);
            next.push(BigUint::one());
            for i in 1..prev.len() {
                next.push(&prev[i - 1] + &prev[i]);
            }
            next.push(BigUint::one());
            rows.push(next);
        }
    }

    /// Exact C(n, k).
    ///
    /// Requesting a row beyond the grown bound is a programming error and
    /// panics; callers grow the cache up front via [`ensure`](Self::ensure).
    pub fn choose(&self, n: usize, k: usize) -> BigUint {
        let rows = self.rows.read().expect("binomial cache lock poisoned");
        assert!(
            n < rows.len(),
            "binomial({n}, {k}) requested beyond cached bound {}",
            rows.len() - 1
        );
        if k > n {
            return BigUint::zero();
        }
        rows[n][k].clone()
    }

    /// Largest `n` currently served.
    pub fn bound(&self) -> usize {
        self.rows.read().expect("binomial cache lock poisoned").len() - 1
    }
}

impl Default for BinomialCache {
    fn default() -> Self {
        Self::new()
    }
}
