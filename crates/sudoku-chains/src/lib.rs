//! Alternating inference chains for 9x9 Sudoku.
//!
//! This crate builds, classifies and evaluates AICs over a candidate grid:
//! continuous and discontinuous nice loops, X-chains, XY-chains and the
//! short irregular wings. A breadth-first searcher enumerates the chains a
//! grid supports and reports them as named steps with their conclusions.

mod bitset;
mod cells;
mod error;
mod grid;
mod solver;

pub use bitset::DigitSet;
pub use cells::{
    cell_houses, cell_index, cell_pos, CellSet, SECTOR_BOX_BASE, SECTOR_COL_BASE, SECTOR_ROW_BASE,
};
pub use error::{ChainError, ParseError};
pub use grid::{Cell, Grid};
pub use solver::{
    almost_locked_sets, classify, search, AlternatingInferenceChain, CandidateFabric, CandidateView, Chain, ChainSolver,
    ChainStep, Conclusion, ConclusionKind, Hint, HintType, Inference, Link, LinkGraph, LinkType,
    Node, NodeArena, NodeId, NodeKind, Polarity, Position, SearchOptions, Technique,
};
