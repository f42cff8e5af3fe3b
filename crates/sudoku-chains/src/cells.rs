//! Cell sets and the static 9x9 topology.
//!
//! Houses are indexed 0..27: 0..9 rows, 9..18 columns, 18..27 blocks.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not, Sub};

use serde::{Deserialize, Serialize};

use crate::ChainError;

/// Sector index convention: 0..8 = rows, 9..17 = columns, 18..26 = boxes.
pub const SECTOR_ROW_BASE: usize = 0;
pub const SECTOR_COL_BASE: usize = 9;
pub const SECTOR_BOX_BASE: usize = 18;

const ALL_CELLS: u128 = (1u128 << 81) - 1;

/// Convert (row, col) to linear cell index
#[inline]
pub const fn cell_index(row: usize, col: usize) -> usize {
    row * 9 + col
}

/// Convert linear cell index back to (row, col)
#[inline]
pub const fn cell_pos(idx: usize) -> (usize, usize) {
    (idx / 9, idx % 9)
}

/// The three houses of a cell: [row, column, block].
#[inline]
pub const fn cell_houses(idx: usize) -> [usize; 3] {
    let (row, col) = cell_pos(idx);
    [
        SECTOR_ROW_BASE + row,
        SECTOR_COL_BASE + col,
        SECTOR_BOX_BASE + (row / 3) * 3 + col / 3,
    ]
}

/// Get the 9 cell indices belonging to a sector
pub const fn sector_cells(sector: usize) -> [usize; 9] {
    let mut cells = [0usize; 9];
    let mut i = 0;
    while i < 9 {
        cells[i] = if sector < 9 {
            cell_index(sector, i)
        } else if sector < 18 {
            cell_index(i, sector - 9)
        } else {
            let box_idx = sector - 18;
            cell_index((box_idx / 3) * 3 + i / 3, (box_idx % 3) * 3 + i % 3)
        };
        i += 1;
    }
    cells
}

const HOUSE_MAPS: [CellSet; 27] = {
    let mut maps = [CellSet(0); 27];
    let mut house = 0;
    while house < 27 {
        let cells = sector_cells(house);
        let mut mask = 0u128;
        let mut i = 0;
        while i < 9 {
            mask |= 1u128 << cells[i];
            i += 1;
        }
        maps[house] = CellSet(mask);
        house += 1;
    }
    maps
};

const PEER_MAPS: [CellSet; 81] = {
    let mut maps = [CellSet(0); 81];
    let mut cell = 0;
    while cell < 81 {
        let houses = cell_houses(cell);
        let mask = HOUSE_MAPS[houses[0]].0 | HOUSE_MAPS[houses[1]].0 | HOUSE_MAPS[houses[2]].0;
        maps[cell] = CellSet(mask & !(1u128 << cell));
        cell += 1;
    }
    maps
};

/// A set of grid cells, one bit per cell.
///
/// Only cells 0..81 can be members: out-of-range indices are ignored by
/// [`insert`](CellSet::insert), and bits above 80 are dropped on deserialize.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u128", into = "u128")]
pub struct CellSet(u128);

impl CellSet {
    #[inline]
    pub const fn empty() -> Self {
        CellSet(0)
    }

    /// Every cell of the grid.
    #[inline]
    pub const fn all() -> Self {
        CellSet(ALL_CELLS)
    }

    /// The set holding `cell`; empty when `cell` is off the grid.
    #[inline]
    pub fn single(cell: usize) -> Self {
        let mut set = CellSet::empty();
        set.insert(cell);
        set
    }

    /// The nine cells of `house`.
    #[inline]
    pub fn house(house: usize) -> Self {
        HOUSE_MAPS[house]
    }

    /// The 20 cells sharing a house with `cell`, excluding the cell itself.
    #[inline]
    pub fn peers(cell: usize) -> Self {
        PEER_MAPS.get(cell).copied().unwrap_or_default()
    }

    /// Add `cell`. Indices past 80 are ignored.
    #[inline]
    pub fn insert(&mut self, cell: usize) {
        if cell < 81 {
            self.0 |= 1u128 << cell;
        }
    }

    #[inline]
    pub fn remove(&mut self, cell: usize) {
        if cell < 81 {
            self.0 &= !(1u128 << cell);
        }
    }

    #[inline]
    pub fn contains(self, cell: usize) -> bool {
        cell < 81 && self.0 & (1u128 << cell) != 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn first(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as usize)
        }
    }

    /// The only cell of a one-cell set.
    #[inline]
    pub fn single_cell(self) -> Option<usize> {
        if self.len() == 1 {
            self.first()
        } else {
            None
        }
    }

    #[inline]
    pub fn overlaps(self, other: CellSet) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_subset_of(self, other: CellSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterate cell indices in ascending order.
    pub fn iter(self) -> CellIter {
        CellIter(self.0)
    }

    /// Houses that contain every cell of the set. Empty for an empty set.
    pub fn covered_houses(self) -> impl Iterator<Item = usize> {
        (0..27).filter(move |&h| self.0 != 0 && self.is_subset_of(HOUSE_MAPS[h]))
    }

    /// Whether all cells lie in at least one common house.
    pub fn in_one_house(self) -> bool {
        self.covered_houses().next().is_some()
    }

    /// Cells that see every member of the set. Never contains a member.
    pub fn peer_intersection(self) -> CellSet {
        if self.is_empty() {
            return CellSet::empty();
        }
        self.iter()
            .fold(CellSet::all(), |acc, cell| acc & PEER_MAPS[cell])
    }
}

/// Iterator over the cells of a [`CellSet`].
#[derive(Debug, Clone)]
pub struct CellIter(u128);

impl Iterator for CellIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let cell = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(cell)
    }
}

impl IntoIterator for CellSet {
    type Item = usize;
    type IntoIter = CellIter;

    fn into_iter(self) -> CellIter {
        self.iter()
    }
}

impl FromIterator<usize> for CellSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = CellSet::empty();
        for cell in iter {
            set.insert(cell);
        }
        set
    }
}

/// Checked construction: fails on the first index past 80.
impl TryFrom<&[usize]> for CellSet {
    type Error = ChainError;

    fn try_from(cells: &[usize]) -> Result<Self, ChainError> {
        let mut set = CellSet::empty();
        for &cell in cells {
            if cell > 80 {
                return Err(ChainError::InvalidCell(cell));
            }
            set.insert(cell);
        }
        Ok(set)
    }
}

impl From<u128> for CellSet {
    fn from(bits: u128) -> Self {
        CellSet(bits & ALL_CELLS)
    }
}

impl From<CellSet> for u128 {
    fn from(set: CellSet) -> u128 {
        set.0
    }
}

impl BitOr for CellSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        CellSet(self.0 | rhs.0)
    }
}

impl BitAnd for CellSet {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        CellSet(self.0 & rhs.0)
    }
}

impl Sub for CellSet {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        CellSet(self.0 & !rhs.0)
    }
}

impl Not for CellSet {
    type Output = Self;
    fn not(self) -> Self {
        CellSet(!self.0 & ALL_CELLS)
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellSet({})", self)
    }
}

/// RxCy notation: `r1c1`, `r1c23` for a row segment, `r12c3` for a column segment.
impl fmt::Display for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<usize> = self.iter().map(|c| cell_pos(c).0).collect();
        let cols: Vec<usize> = self.iter().map(|c| cell_pos(c).1).collect();
        let Some(&row0) = rows.first() else {
            return write!(f, "{{}}");
        };
        let col0 = cols[0];

        if rows.iter().all(|&r| r == row0) {
            write!(f, "r{}c", row0 + 1)?;
            for c in cols {
                write!(f, "{}", c + 1)?;
            }
            Ok(())
        } else if cols.iter().all(|&c| c == col0) {
            write!(f, "r")?;
            for r in rows {
                write!(f, "{}", r + 1)?;
            }
            write!(f, "c{}", col0 + 1)
        } else {
            for (i, (r, c)) in rows.iter().zip(&cols).enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "r{}c{}", r + 1, c + 1)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_index_roundtrip() {
        for row in 0..9 {
            for col in 0..9 {
                let idx = cell_index(row, col);
                assert_eq!(cell_pos(idx), (row, col));
            }
        }
    }

    #[test]
    fn test_sector_cells() {
        assert_eq!(sector_cells(0), [0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(sector_cells(9), [0, 9, 18, 27, 36, 45, 54, 63, 72]);
        assert_eq!(sector_cells(18), [0, 1, 2, 9, 10, 11, 18, 19, 20]);
    }

    #[test]
    fn test_peers() {
        let peers = CellSet::peers(0);
        assert_eq!(peers.len(), 20);
        assert!(peers.contains(1));
        assert!(peers.contains(9));
        assert!(peers.contains(10));
        assert!(!peers.contains(0));
        assert!(!peers.contains(40));
    }

    #[test]
    fn test_in_one_house() {
        let row_pair: CellSet = [0, 5].into_iter().collect();
        assert!(row_pair.in_one_house());
        assert_eq!(row_pair.covered_houses().collect::<Vec<_>>(), vec![0]);

        // r1c1 and r2c2 share only the first block
        let block_pair: CellSet = [0, 10].into_iter().collect();
        assert_eq!(block_pair.covered_houses().collect::<Vec<_>>(), vec![18]);

        // r1c2 and r1c3 share a row and a block
        let mini_line: CellSet = [1, 2].into_iter().collect();
        assert_eq!(mini_line.covered_houses().collect::<Vec<_>>(), vec![0, 18]);

        let scattered: CellSet = [0, 40].into_iter().collect();
        assert!(!scattered.in_one_house());
        assert!(!CellSet::empty().in_one_house());
    }

    #[test]
    fn test_peer_intersection() {
        // r1c1 and r1c4 both see the rest of row 1 only
        let ends: CellSet = [0, 3].into_iter().collect();
        let common = ends.peer_intersection();
        assert_eq!(common.len(), 7);
        assert!(!common.contains(0));
        assert!(!common.contains(3));
        assert!(common.contains(8));

        // A single cell sees its 20 peers
        assert_eq!(CellSet::single(40).peer_intersection(), CellSet::peers(40));
    }

    #[test]
    fn test_out_of_range_cells_never_join() {
        let set: CellSet = [3, 100, 200, usize::MAX].into_iter().collect();
        assert_eq!(set, CellSet::single(3));
        assert!(CellSet::single(81).is_empty());
        assert!(CellSet::peers(100).is_empty());
        assert!(!set.contains(200));

        let mut set = set;
        set.remove(500);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_try_from_rejects_invalid_cell() {
        assert_eq!(
            CellSet::try_from(&[0, 100][..]),
            Err(ChainError::InvalidCell(100))
        );
        let ok = CellSet::try_from(&[0, 80][..]).unwrap();
        assert!(ok.contains(80));
        assert_eq!(ok.len(), 2);
    }

    #[test]
    fn test_deserialize_masks_high_bits() {
        let raw = (1u128 << 100) | 1;
        let json = serde_json::to_string(&raw).unwrap();
        let set: CellSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, CellSet::single(0));
        assert_eq!(u128::from(set), 1);
    }

    #[test]
    fn test_display_rxcy() {
        assert_eq!(CellSet::single(0).to_string(), "r1c1");
        let row_seg: CellSet = [1, 2].into_iter().collect();
        assert_eq!(row_seg.to_string(), "r1c23");
        let col_seg: CellSet = [2, 11].into_iter().collect();
        assert_eq!(col_seg.to_string(), "r12c3");
        let mixed: CellSet = [0, 10].into_iter().collect();
        assert_eq!(mixed.to_string(), "r1c1,r2c2");
    }
}
