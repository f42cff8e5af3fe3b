//! Chain nodes: a digit asserted on or off in a cell or a group of cells.
//!
//! A node with one cell is a simple candidate. Larger cell sets must lie in
//! a single house, so that the node collapses to "the digit is somewhere in
//! these cells of that house".

use std::fmt;
use std::hash::{Hash, Hasher};

use super::explain::Conclusion;
use super::fabric::CandidateView;
use super::inference::Polarity;
use crate::bitset::DigitSet;
use crate::cells::CellSet;
use crate::ChainError;

/// Index of a node inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// What backs a node. Chain logic only differs per variant in
/// [`Node::potential_conclusions_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// One candidate.
    Simple,
    /// Several cells of one house (a box/line intersection, usually).
    Grouped,
    /// The cells of an almost locked set that hold the node's digit.
    AlmostLockedSet {
        /// All cells of the ALS (N cells).
        cells: CellSet,
        /// All digits of the ALS (N + 1 digits).
        digits: DigitSet,
    },
}

/// A logical assertion "digit D is on/off in cells C".
///
/// Equality and hashing only look at the cells and the digit; polarity,
/// variant and parents are ignored.
#[derive(Debug, Clone)]
pub struct Node {
    cells: CellSet,
    digit: u8,
    polarity: Polarity,
    kind: NodeKind,
    parents: Vec<NodeId>,
}

fn check_digit(digit: u8) -> Result<(), ChainError> {
    if digit > 8 {
        return Err(ChainError::InvalidDigit(digit));
    }
    Ok(())
}

fn check_cells(cells: CellSet) -> Result<(), ChainError> {
    if cells.is_empty() {
        return Err(ChainError::EmptyNode);
    }
    if cells.len() > 1 && !cells.in_one_house() {
        return Err(ChainError::GroupedNodeSpansHouses {
            cells: cells.to_string(),
        });
    }
    Ok(())
}

impl Node {
    /// A single candidate `(cell, digit)`.
    pub fn simple(cell: usize, digit: u8, polarity: Polarity) -> Result<Self, ChainError> {
        if cell > 80 {
            return Err(ChainError::InvalidCell(cell));
        }
        check_digit(digit)?;
        Ok(Node {
            cells: CellSet::single(cell),
            digit,
            polarity,
            kind: NodeKind::Simple,
            parents: Vec::new(),
        })
    }

    /// A digit confined to `cells`, which must share a house.
    ///
    /// A one-cell set yields a simple node.
    pub fn grouped(cells: CellSet, digit: u8, polarity: Polarity) -> Result<Self, ChainError> {
        check_digit(digit)?;
        check_cells(cells)?;
        let kind = if cells.len() == 1 {
            NodeKind::Simple
        } else {
            NodeKind::Grouped
        };
        Ok(Node {
            cells,
            digit,
            polarity,
            kind,
            parents: Vec::new(),
        })
    }

    /// The cells of an almost locked set that hold `digit`.
    ///
    /// `als_cells` must lie in one house and carry exactly one more digit than
    /// it has cells; `digit_cells` must be the ALS cells holding `digit`.
    pub fn almost_locked_set(
        digit_cells: CellSet,
        digit: u8,
        als_cells: CellSet,
        als_digits: DigitSet,
        polarity: Polarity,
    ) -> Result<Self, ChainError> {
        check_digit(digit)?;
        check_cells(digit_cells)?;
        if !als_cells.in_one_house()
            || !digit_cells.is_subset_of(als_cells)
            || !als_digits.contains(digit)
            || als_digits.count() as usize != als_cells.len() + 1
        {
            return Err(ChainError::InvalidAlmostLockedSet {
                cells: als_cells.to_string(),
            });
        }
        Ok(Node {
            cells: digit_cells,
            digit,
            polarity,
            kind: NodeKind::AlmostLockedSet {
                cells: als_cells,
                digits: als_digits,
            },
            parents: Vec::new(),
        })
    }

    /// Attach the parent links that produced this node during a tree search.
    pub fn with_parents(mut self, parents: Vec<NodeId>) -> Self {
        self.parents = parents;
        self
    }

    /// The same node with another polarity.
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    #[inline]
    pub fn cells(&self) -> CellSet {
        self.cells
    }

    #[inline]
    pub fn digit(&self) -> u8 {
        self.digit
    }

    #[inline]
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.polarity.is_on()
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// More than one cell.
    #[inline]
    pub fn is_grouped(&self) -> bool {
        self.cells.len() > 1
    }

    /// The only cell of a one-cell node.
    #[inline]
    pub fn single_cell(&self) -> Option<usize> {
        self.cells.single_cell()
    }

    /// Candidate index `cell * 9 + digit` for a one-cell node.
    pub fn candidate(&self) -> Option<usize> {
        self.single_cell().map(|c| c * 9 + self.digit as usize)
    }

    #[inline]
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    #[inline]
    pub fn parents_count(&self) -> usize {
        self.parents.len()
    }

    #[inline]
    pub fn parent(&self, index: usize) -> Option<NodeId> {
        self.parents.get(index).copied()
    }

    /// No parent links: the node started a search tree.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Same digit over overlapping cells.
    pub fn collides_with(&self, other: &Node) -> bool {
        self.digit == other.digit && self.cells.overlaps(other.cells)
    }

    /// Extra eliminations this node implies together with `next` inside a loop.
    ///
    /// Only ALS nodes contribute: when `next` is the same ALS on another digit,
    /// the remaining ALS digits are locked inside the ALS cells.
    pub fn potential_conclusions_with<V>(&self, view: &V, next: &Node) -> Vec<Conclusion>
    where
        V: CandidateView + ?Sized,
    {
        let NodeKind::AlmostLockedSet { cells, digits } = self.kind else {
            return Vec::new();
        };
        match next.kind {
            NodeKind::AlmostLockedSet { cells: next_cells, .. }
                if next_cells == cells && next.digit != self.digit => {}
            _ => return Vec::new(),
        }

        let mut result = Vec::new();
        let locked = digits - DigitSet::single(self.digit) - DigitSet::single(next.digit);
        for digit in locked.iter() {
            let holders = cells & view.digit_cells(digit);
            if holders.is_empty() {
                continue;
            }
            let targets = (holders.peer_intersection() & view.digit_cells(digit)) - cells;
            result.extend(targets.iter().map(|cell| Conclusion::elimination(cell, digit)));
        }
        result
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells && self.digit == other.digit
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cells.hash(state);
        self.digit.hash(state);
    }
}

/// Short label: one-based digit then RxCy cells, e.g. `5r1c2` or `5r1c23`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.digit + 1, self.cells)
    }
}

/// Flat storage for nodes that refer to their parents by index.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node. Parent ids must already be in the arena.
    pub fn push(&mut self, node: Node) -> NodeId {
        debug_assert!(node.parents.iter().all(|p| p.0 < self.nodes.len()));
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Ids from the root down to `id`, following each node's first parent.
    pub fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids = vec![id];
        let mut current = id;
        // Parents always precede their children, so this walk is bounded.
        while let Some(parent) = self.get(current).parent(0) {
            if parent.0 >= current.0 {
                break;
            }
            ids.push(parent);
            current = parent;
        }
        ids.reverse();
        ids
    }

    /// The node sequence from the root down to `id`.
    pub fn path_to_root(&self, id: NodeId) -> Vec<Node> {
        self.ancestry(id)
            .into_iter()
            .map(|i| self.get(i).clone())
            .collect()
    }
}
