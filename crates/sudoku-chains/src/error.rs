//! Error types.
//!
//! Construction errors signal a defect in whatever produced the nodes; they are
//! never retried and must not be swallowed by a search.

#[cfg(doc)]
use crate::{AlternatingInferenceChain, Grid, Node};

/// Rejected construction of a [`Node`], link or [`AlternatingInferenceChain`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// Fewer than three raw nodes
    #[error("a chain needs at least 3 nodes, found {len}")]
    TooShort { len: usize },
    /// A strong loop whose first and last node differ
    #[error("a chain starting and ending with strong inferences must begin and end on the same node")]
    OpenStrongLoop,
    /// Multi-cell node whose cells share no house
    #[error("grouped node cells {cells} do not lie in a single house")]
    GroupedNodeSpansHouses { cells: String },
    /// ALS cells outside one house, or digit count not one more than cell count
    #[error("cells {cells} do not form an almost locked set for that digit")]
    InvalidAlmostLockedSet { cells: String },
    #[error("a node must cover at least one cell")]
    EmptyNode,
    #[error("digit index {0} is out of range 0..=8")]
    InvalidDigit(u8),
    #[error("cell index {0} is out of range 0..=80")]
    InvalidCell(usize),
    /// A link from a node to itself
    #[error("a link cannot start and end on the same node")]
    SelfLink,
}

/// Error for [`Grid::from_string`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Input does not have 81 cell characters
    #[error("grid string should have length 81, found {0}")]
    WrongLength(usize),
    /// Character other than `1-9`, `0` or `.`
    #[error("invalid character {ch:?} at cell {cell}")]
    InvalidChar { cell: usize, ch: char },
}
