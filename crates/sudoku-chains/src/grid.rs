//! The candidate grid: placed digits plus per-cell candidate masks.

use std::fmt;

use crate::bitset::DigitSet;
use crate::cells::CellSet;
use crate::error::ParseError;
use crate::solver::{Conclusion, ConclusionKind};

/// A single cell: a placed digit or a set of remaining candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Given(u8),
    Filled(u8),
    Empty(DigitSet),
}

impl Cell {
    #[inline]
    pub fn value(&self) -> Option<u8> {
        match *self {
            Cell::Given(d) | Cell::Filled(d) => Some(d),
            Cell::Empty(_) => None,
        }
    }

    #[inline]
    pub fn is_given(&self) -> bool {
        matches!(self, Cell::Given(_))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty(_))
    }
}

/// A 9x9 grid. Digits are zero-based.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [Cell; 81],
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    /// A grid with no placed digits and every candidate open.
    pub fn empty() -> Self {
        Grid {
            cells: [Cell::Empty(DigitSet::all()); 81],
        }
    }

    /// Parse an 81-character line: `1-9` are givens, `0` or `.` are empty.
    ///
    /// Whitespace is ignored. Candidates are recalculated from the givens.
    pub fn from_string(s: &str) -> Result<Self, ParseError> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != 81 {
            return Err(ParseError::WrongLength(chars.len()));
        }

        let mut grid = Grid::empty();
        for (cell, &ch) in chars.iter().enumerate() {
            grid.cells[cell] = match ch {
                '0' | '.' => Cell::Empty(DigitSet::all()),
                '1'..='9' => Cell::Given(ch as u8 - b'1'),
                _ => return Err(ParseError::InvalidChar { cell, ch }),
            };
        }
        grid.recalculate_candidates();
        Ok(grid)
    }

    /// Reset every empty cell's candidates to the digits not placed in its peers.
    pub fn recalculate_candidates(&mut self) {
        for cell in 0..81 {
            if !self.cells[cell].is_empty() {
                continue;
            }
            let mut cands = DigitSet::all();
            for peer in CellSet::peers(cell) {
                if let Some(d) = self.cells[peer].value() {
                    cands.remove(d);
                }
            }
            self.cells[cell] = Cell::Empty(cands);
        }
    }

    #[inline]
    pub fn cell(&self, cell: usize) -> Cell {
        self.cells[cell]
    }

    #[inline]
    pub fn value(&self, cell: usize) -> Option<u8> {
        self.cells[cell].value()
    }

    /// Candidates of an empty cell; empty for a filled one.
    #[inline]
    pub fn candidates(&self, cell: usize) -> DigitSet {
        match self.cells[cell] {
            Cell::Empty(cands) => cands,
            _ => DigitSet::empty(),
        }
    }

    #[inline]
    pub fn has_candidate(&self, cell: usize, digit: u8) -> bool {
        self.candidates(cell).contains(digit)
    }

    /// Overwrite the candidates of an empty cell. No effect on filled cells.
    pub fn set_candidates(&mut self, cell: usize, cands: DigitSet) {
        if self.cells[cell].is_empty() {
            self.cells[cell] = Cell::Empty(cands);
        }
    }

    /// Remove one candidate. Returns whether it was present.
    pub fn eliminate(&mut self, cell: usize, digit: u8) -> bool {
        match &mut self.cells[cell] {
            Cell::Empty(cands) if cands.contains(digit) => {
                cands.remove(digit);
                true
            }
            _ => false,
        }
    }

    /// Place a digit and strike it from the peers' candidates.
    pub fn place(&mut self, cell: usize, digit: u8) {
        self.cells[cell] = Cell::Filled(digit);
        for peer in CellSet::peers(cell) {
            self.eliminate(peer, digit);
        }
    }

    /// Apply a derived conclusion. Returns whether the grid changed.
    pub fn apply(&mut self, conclusion: &Conclusion) -> bool {
        let cell = conclusion.cell as usize;
        match conclusion.kind {
            ConclusionKind::Assignment => {
                if self.cells[cell].is_empty() {
                    self.place(cell, conclusion.digit);
                    true
                } else {
                    false
                }
            }
            ConclusionKind::Elimination => self.eliminate(cell, conclusion.digit),
        }
    }

    pub fn empty_cells(&self) -> Vec<usize> {
        (0..81).filter(|&c| self.cells[c].is_empty()).collect()
    }

    pub fn given_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_given()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    /// The grid as an 81-character line, `.` for empty cells.
    pub fn to_line(&self) -> String {
        self.cells
            .iter()
            .map(|c| match c.value() {
                Some(d) => (b'1' + d) as char,
                None => '.',
            })
            .collect()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({})", self.to_line())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..9 {
            if row > 0 && row % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for col in 0..9 {
                if col > 0 && col % 3 == 0 {
                    write!(f, "| ")?;
                }
                match self.cells[row * 9 + col].value() {
                    Some(d) => write!(f, "{} ", d + 1)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
