//! Cell identities, sets, and per-cell status
//!
//! Cells are opaque, totally ordered identities handed in by the board layer.
//! [`CellSet`] is the constraint-scope primitive: an immutable, sorted,
//! deduplicated sequence with linear-time set algebra and content-based
//! equality and hashing.

use std::collections::HashMap;
use std::fmt;

/// Opaque cell identity with a total order.
///
/// The solver never interprets the value; the board layer owns the mapping
/// to coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell(pub u32);

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-cell knowledge state. Mutated only by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellStatus {
    #[default]
    Unknown,
    Mine,
    Blank,
}

/// Immutable sorted, deduplicated sequence of cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CellSet {
    cells: Vec<Cell>,
}

impl CellSet {
    /// Build a set from arbitrary cells, sorting and deduplicating.
    pub fn new(mut cells: Vec<Cell>) -> Self {
        cells.sort_unstable();
        cells.dedup();
        Self { cells }
    }

    pub fn empty() -> Self {
        Self { cells: Vec::new() }
    }

    pub fn singleton(cell: Cell) -> Self {
        Self { cells: vec![cell] }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Cell {
        self.cells[index]
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    /// Position of `cell` in the sorted order, if present.
    pub fn position(&self, cell: Cell) -> Option<usize> {
        self.cells.binary_search(&cell).ok()
    }

    /// Cells present in both sets. Linear two-pointer merge.
    pub fn intersect(&self, other: &CellSet) -> CellSet {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.cells.len() && j < other.cells.len() {
            match self.cells[i].cmp(&other.cells[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    out.push(self.cells[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        CellSet { cells: out }
    }

    /// Cells of `self` absent from `other`. Linear two-pointer merge.
    pub fn difference(&self, other: &CellSet) -> CellSet {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.cells.len() {
            if j >= other.cells.len() {
                out.extend_from_slice(&self.cells[i..]);
                break;
            }
            match self.cells[i].cmp(&other.cells[j]) {
                std::cmp::Ordering::Less => {
                    out.push(self.cells[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
            }
        }
        CellSet { cells: out }
    }

    /// Cells present in either set. Linear two-pointer merge.
    pub fn union(&self, other: &CellSet) -> CellSet {
        let mut out = Vec::with_capacity(self.cells.len() + other.cells.len());
        let (mut i, mut j) = (0, 0);
        while i < self.cells.len() || j < other.cells.len() {
            if i >= self.cells.len() {
                out.extend_from_slice(&other.cells[j..]);
                break;
            }
            if j >= other.cells.len() {
                out.extend_from_slice(&self.cells[i..]);
                break;
            }
            match self.cells[i].cmp(&other.cells[j]) {
                std::cmp::Ordering::Less => {
                    out.push(self.cells[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.push(other.cells[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    out.push(self.cells[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        CellSet { cells: out }
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, c) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "}}")
    }
}

/// Per-cell tri-state tracker. Absent cells read as [`CellStatus::Unknown`].
#[derive(Debug, Clone, Default)]
pub struct StatusMap {
    map: HashMap<Cell, CellStatus>,
}

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, cell: Cell) -> CellStatus {
        self.map.get(&cell).copied().unwrap_or(CellStatus::Unknown)
    }

    pub fn set(&mut self, cell: Cell, status: CellStatus) {
        self.map.insert(cell, status);
    }

    pub fn is_resolved(&self, cell: Cell) -> bool {
        self.get(cell) != CellStatus::Unknown
    }
}
