//! CandidateFabric: dual-indexed candidate state built from Grid.
//!
//! Provides O(1) lookups for "which cells hold candidate d?" and "which
//! digits remain in cell c?". The chain engine only reads candidates through
//! [`CandidateView`], so any read-only grid snapshot can back it.

use crate::bitset::DigitSet;
use crate::cells::CellSet;
use crate::Grid;

/// Read-only candidate access consumed by chain validation and derivation.
pub trait CandidateView {
    /// Whether `digit` is still a live candidate of `cell`.
    fn has_candidate(&self, cell: usize, digit: u8) -> bool;

    /// Live candidates of `cell`; empty for a filled cell.
    fn candidates(&self, cell: usize) -> DigitSet;

    /// Every cell still holding `digit` as a candidate.
    fn digit_cells(&self, digit: u8) -> CellSet;

    /// Whether two distinct cells share a row, column or block.
    fn sees(&self, a: usize, b: usize) -> bool {
        CellSet::peers(a).contains(b)
    }
}

/// Dual-indexed candidate state, built once per solve step from Grid.
pub struct CandidateFabric {
    /// Per-cell candidates (indexed by linear cell index 0..80)
    pub cell_cands: [DigitSet; 81],
    /// Placed values (None if empty)
    pub values: [Option<u8>; 81],
    /// digit_cells[digit] = cells still holding that candidate
    pub digit_cells: [CellSet; 9],
}

impl CandidateFabric {
    /// Build the fabric from a Grid snapshot. Call once per solve step.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut fab = CandidateFabric {
            cell_cands: [DigitSet::empty(); 81],
            values: [None; 81],
            digit_cells: [CellSet::empty(); 9],
        };

        for idx in 0..81 {
            if let Some(v) = grid.value(idx) {
                fab.values[idx] = Some(v);
                continue;
            }

            let cands = grid.candidates(idx);
            fab.cell_cands[idx] = cands;
            for d in cands.iter() {
                fab.digit_cells[d as usize].insert(idx);
            }
        }

        fab
    }

    /// Get all empty cell indices
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..81).filter(|&i| self.values[i].is_none()).collect()
    }

    /// Cells of `sector` holding `digit`
    #[inline]
    pub fn sector_digit_cells(&self, sector: usize, digit: u8) -> CellSet {
        CellSet::house(sector) & self.digit_cells[digit as usize]
    }
}

impl CandidateView for CandidateFabric {
    #[inline]
    fn has_candidate(&self, cell: usize, digit: u8) -> bool {
        self.cell_cands[cell].contains(digit)
    }

    #[inline]
    fn candidates(&self, cell: usize) -> DigitSet {
        self.cell_cands[cell]
    }

    #[inline]
    fn digit_cells(&self, digit: u8) -> CellSet {
        self.digit_cells[digit as usize]
    }
}

impl CandidateView for Grid {
    #[inline]
    fn has_candidate(&self, cell: usize, digit: u8) -> bool {
        Grid::has_candidate(self, cell, digit)
    }

    #[inline]
    fn candidates(&self, cell: usize) -> DigitSet {
        Grid::candidates(self, cell)
    }

    fn digit_cells(&self, digit: u8) -> CellSet {
        (0..81).filter(|&c| Grid::has_candidate(self, c, digit)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn test_fabric_from_grid() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let fab = CandidateFabric::from_grid(&grid);

        // Cell (0,0) = 5
        assert_eq!(fab.values[0], Some(4));
        assert_eq!(fab.empty_cells().len(), 51);

        // Cell (0,2) is empty, should have candidates
        assert!(fab.values[2].is_none());
        assert!(!fab.cell_cands[2].is_empty());
        assert!(!fab.has_candidate(2, 4));
        assert!(!fab.digit_cells(4).contains(2));
    }

    #[test]
    fn test_sector_digit_cells() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let fab = CandidateFabric::from_grid(&grid);
        // Row 1 holds 5, so no cell of it keeps 5 as a candidate
        assert!(fab.sector_digit_cells(0, 4).is_empty());
        for sector in 0..27 {
            for digit in 0..9u8 {
                let cells = fab.sector_digit_cells(sector, digit);
                assert!(cells.is_subset_of(CellSet::house(sector)));
                assert!(cells.iter().all(|c| fab.has_candidate(c, digit)));
            }
        }
    }

    #[test]
    fn test_sees() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let fab = CandidateFabric::from_grid(&grid);
        let fab: &dyn CandidateView = &fab;

        // Same row
        assert!(fab.sees(0, 5));
        // Same col
        assert!(fab.sees(0, 9));
        // Same box
        assert!(fab.sees(0, 10));
        // Not seeing each other
        assert!(!fab.sees(0, 40)); // (0,0) and (4,4)
    }

    #[test]
    fn test_grid_view_agrees_with_fabric() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let fab = CandidateFabric::from_grid(&grid);
        for digit in 0..9u8 {
            assert_eq!(CandidateView::digit_cells(&grid, digit), fab.digit_cells(digit));
        }
    }
}
