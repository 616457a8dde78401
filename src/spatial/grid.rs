//! Fixed-size lattice geometry
//!
//! Cells are stored row-major (`y * width + x`). The lattice itself holds no data;
//! houses and offender occupancy are kept in separate containers keyed by
//! [`Lattice::index`].

use crate::core::config::BoundaryPolicy;
use crate::core::types::Cell;

/// Up to four von Neumann neighbors, without allocating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    cells: [Cell; 4],
    len: usize,
}

impl Neighbors {
    fn new() -> Self {
        Self {
            cells: [Cell::new(0, 0); 4],
            len: 0,
        }
    }

    fn push_unique(&mut self, cell: Cell, center: Cell) {
        if cell == center || self.as_slice().contains(&cell) {
            return;
        }
        self.cells[self.len] = cell;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.cells[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a Neighbors {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 2D lattice with a boundary policy fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lattice {
    pub width: usize,
    pub height: usize,
    pub boundary: BoundaryPolicy,
}

impl Lattice {
    pub fn new(width: usize, height: usize, boundary: BoundaryPolicy) -> Self {
        Self {
            width,
            height,
            boundary,
        }
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Row-major index of an in-bounds cell
    #[inline]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.y * self.width + cell.x)
        } else {
            None
        }
    }

    /// Inverse of [`Lattice::index`]
    #[inline]
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        if index < self.cell_count() {
            Some(Cell::new(index % self.width, index / self.width))
        } else {
            None
        }
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }

    /// Von Neumann radius-1 neighborhood, center excluded, in N, S, W, E order
    ///
    /// Under [`BoundaryPolicy::Toroidal`] a lattice narrower than 3 cells would
    /// produce the same neighbor twice (or the center itself); duplicates and the
    /// center are dropped. Out-of-bounds input yields no neighbors.
    pub fn neighbors(&self, cell: Cell) -> Neighbors {
        let mut out = Neighbors::new();
        if !self.contains(cell) {
            return out;
        }

        let Cell { x, y } = cell;
        match self.boundary {
            BoundaryPolicy::Bounded => {
                if y > 0 {
                    out.push_unique(Cell::new(x, y - 1), cell);
                }
                if y + 1 < self.height {
                    out.push_unique(Cell::new(x, y + 1), cell);
                }
                if x > 0 {
                    out.push_unique(Cell::new(x - 1, y), cell);
                }
                if x + 1 < self.width {
                    out.push_unique(Cell::new(x + 1, y), cell);
                }
            }
            BoundaryPolicy::Toroidal => {
                let up = (y + self.height - 1) % self.height;
                let down = (y + 1) % self.height;
                let left = (x + self.width - 1) % self.width;
                let right = (x + 1) % self.width;
                out.push_unique(Cell::new(x, up), cell);
                out.push_unique(Cell::new(x, down), cell);
                out.push_unique(Cell::new(left, y), cell);
                out.push_unique(Cell::new(right, y), cell);
            }
        }
        out
    }
}
