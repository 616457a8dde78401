//! Multi-occupancy index mapping offenders to lattice cells

use ahash::AHashMap;

use crate::core::types::{Cell, OffenderId};
use crate::spatial::grid::Lattice;

/// Per-cell offender lists plus a reverse lookup by id
///
/// The reverse map is authoritative: `move_offender` and `remove` look the
/// offender up by id rather than trusting a caller-supplied position.
#[derive(Debug, Clone)]
pub struct OccupancyIndex {
    lattice: Lattice,
    cells: Vec<Vec<OffenderId>>,
    positions: AHashMap<OffenderId, Cell>,
}

impl OccupancyIndex {
    pub fn new(lattice: Lattice) -> Self {
        Self {
            lattice,
            cells: vec![Vec::new(); lattice.cell_count()],
            positions: AHashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, offender: OffenderId) -> bool {
        self.positions.contains_key(&offender)
    }

    pub fn position(&self, offender: OffenderId) -> Option<Cell> {
        self.positions.get(&offender).copied()
    }

    /// Offenders currently at `cell` (empty for out-of-bounds cells)
    pub fn occupants(&self, cell: Cell) -> &[OffenderId] {
        self.lattice
            .index(cell)
            .and_then(|idx| self.cells.get(idx))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Put an offender on the lattice. Re-placing a known offender relocates it.
    ///
    /// Returns false if `cell` is outside the lattice.
    pub fn place(&mut self, offender: OffenderId, cell: Cell) -> bool {
        let Some(idx) = self.lattice.index(cell) else {
            return false;
        };
        self.detach(offender);
        self.cells[idx].push(offender);
        self.positions.insert(offender, cell);
        true
    }

    /// Relocate an offender. `from` is advisory; the recorded position wins.
    ///
    /// Returns false if the offender is unknown or `to` is out of bounds, in
    /// which case nothing changes.
    pub fn move_offender(&mut self, offender: OffenderId, from: Cell, to: Cell) -> bool {
        if !self.lattice.contains(to) {
            return false;
        }
        match self.positions.get(&offender) {
            Some(&recorded) => {
                if recorded != from {
                    tracing::trace!(%offender, %from, %recorded, "stale move origin");
                }
                self.place(offender, to)
            }
            None => false,
        }
    }

    /// Take an offender off the lattice. Absent offenders are a no-op.
    pub fn remove(&mut self, offender: OffenderId) -> Option<Cell> {
        let cell = self.detach(offender);
        if cell.is_none() {
            tracing::trace!(%offender, "remove of absent offender ignored");
        }
        cell
    }

    fn detach(&mut self, offender: OffenderId) -> Option<Cell> {
        let cell = self.positions.remove(&offender)?;
        if let Some(list) = self.lattice.index(cell).and_then(|i| self.cells.get_mut(i)) {
            list.retain(|&o| o != offender);
        }
        Some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BoundaryPolicy;

    fn index() -> OccupancyIndex {
        OccupancyIndex::new(Lattice::new(3, 3, BoundaryPolicy::Bounded))
    }

    #[test]
    fn test_place_allows_multi_occupancy() {
        let mut idx = index();
        assert!(idx.place(OffenderId(1), Cell::new(1, 1)));
        assert!(idx.place(OffenderId(2), Cell::new(1, 1)));
        assert_eq!(idx.occupants(Cell::new(1, 1)), &[OffenderId(1), OffenderId(2)]);
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn test_place_out_of_bounds_is_rejected() {
        let mut idx = index();
        assert!(!idx.place(OffenderId(1), Cell::new(3, 0)));
        assert!(idx.is_empty());
    }

    #[test]
    fn test_move_updates_both_views() {
        let mut idx = index();
        idx.place(OffenderId(7), Cell::new(0, 0));
        assert!(idx.move_offender(OffenderId(7), Cell::new(0, 0), Cell::new(0, 1)));
        assert!(idx.occupants(Cell::new(0, 0)).is_empty());
        assert_eq!(idx.occupants(Cell::new(0, 1)), &[OffenderId(7)]);
        assert_eq!(idx.position(OffenderId(7)), Some(Cell::new(0, 1)));
    }

    #[test]
    fn test_move_with_stale_origin_uses_recorded_cell() {
        let mut idx = index();
        idx.place(OffenderId(7), Cell::new(2, 2));
        assert!(idx.move_offender(OffenderId(7), Cell::new(0, 0), Cell::new(2, 1)));
        assert!(idx.occupants(Cell::new(2, 2)).is_empty());
        assert_eq!(idx.position(OffenderId(7)), Some(Cell::new(2, 1)));
    }

    #[test]
    fn test_move_unknown_offender_is_noop() {
        let mut idx = index();
        assert!(!idx.move_offender(OffenderId(9), Cell::new(0, 0), Cell::new(1, 0)));
        assert!(idx.is_empty());
    }

    #[test]
    fn test_double_remove_is_noop() {
        let mut idx = index();
        idx.place(OffenderId(3), Cell::new(1, 2));
        assert_eq!(idx.remove(OffenderId(3)), Some(Cell::new(1, 2)));
        assert_eq!(idx.remove(OffenderId(3)), None);
        assert!(idx.occupants(Cell::new(1, 2)).is_empty());
        assert!(idx.is_empty());
    }
}
