//! Grid board model for the bench scenarios
//!
//! The solver core never sees a grid; this module owns coordinates, mine
//! placement, and adjacency, and feeds the core opaque cell identities.

use mineprob_core::{Adjacency, Cell, CellSet};
use rand::rngs::StdRng;
use rand::Rng;

pub struct GridBoard {
    pub width: usize,
    pub height: usize,
    mines: Vec<bool>,
}

impl GridBoard {
    /// Place `mine_count` mines uniformly at random.
    pub fn random(width: usize, height: usize, mine_count: usize, rng: &mut StdRng) -> Self {
        let size = width * height;
        assert!(mine_count < size, "board must keep at least one safe cell");
        let mut mines = vec![false; size];
        let mut placed = 0;
        while placed < mine_count {
            let i = rng.gen_range(0..size);
            if !mines[i] {
                mines[i] = true;
                placed += 1;
            }
        }
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn size(&self) -> usize {
        self.width * self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        Cell((y * self.width + x) as u32)
    }

    pub fn coords(&self, cell: Cell) -> (usize, usize) {
        let i = cell.0 as usize;
        (i % self.width, i / self.width)
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines[cell.0 as usize]
    }

    pub fn mine_count(&self) -> usize {
        self.mines.iter().filter(|&&m| m).count()
    }

    pub fn safe_count(&self) -> usize {
        self.size() - self.mine_count()
    }

    pub fn all_cells(&self) -> CellSet {
        CellSet::new((0..self.size() as u32).map(Cell).collect())
    }

    /// Number of mines adjacent to `cell`.
    pub fn degree(&self, cell: Cell) -> usize {
        self.neighbors(cell)
            .iter()
            .filter(|&n| self.is_mine(n))
            .count()
    }
}

impl Adjacency for GridBoard {
    fn neighbors(&self, cell: Cell) -> CellSet {
        let (x, y) = self.coords(cell);
        let mut out = Vec::with_capacity(8);
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx >= 0 && ny >= 0 && (nx as usize) < self.width && (ny as usize) < self.height {
                    out.push(self.cell(nx as usize, ny as usize));
                }
            }
        }
        CellSet::new(out)
    }
}
