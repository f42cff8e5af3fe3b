//! Alternating inference chains: shape classification and conclusion derivation.
//!
//! A chain is stored as its *raw* node array. For an ordinary chain the raw
//! array carries the two closing nodes at both ends (`[last, real.., first]`),
//! so that the weak inference closing a potential loop is explicit; those two
//! are dropped by [`AlternatingInferenceChain::real_chain_nodes`]. A closed
//! strong loop stores its anchor twice and keeps every raw node.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use super::explain::Conclusion;
use super::fabric::CandidateView;
use super::inference::{Inference, Polarity};
use super::node::Node;
use crate::bitset::DigitSet;
use crate::cells::CellSet;
use crate::ChainError;

/// Node sequence with a strictly alternating polarity per position.
#[derive(Debug, Clone)]
pub struct Chain {
    nodes: Vec<Node>,
    polarities: Vec<Polarity>,
}

impl Chain {
    /// `starts_with_strong` tells whether the first raw inference is strong.
    pub fn new(nodes: Vec<Node>, starts_with_strong: bool) -> Result<Self, ChainError> {
        if nodes.len() < 3 {
            return Err(ChainError::TooShort { len: nodes.len() });
        }

        let mut current = Polarity::from(!starts_with_strong);
        let mut polarities = Vec::with_capacity(nodes.len());
        for _ in 0..nodes.len() {
            polarities.push(current);
            current = current.flip();
        }
        Ok(Chain { nodes, polarities })
    }

    /// Like [`Chain::new`], and the first and last node must be the same.
    pub fn new_loop(nodes: Vec<Node>, starts_with_strong: bool) -> Result<Self, ChainError> {
        let chain = Chain::new(nodes, starts_with_strong)?;
        if chain.nodes.first() != chain.nodes.last() {
            return Err(ChainError::OpenStrongLoop);
        }
        Ok(chain)
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn polarities(&self) -> &[Polarity] {
        &self.polarities
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: construction rejects short arrays.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<usize> for Chain {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        &self.nodes[index]
    }
}

impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl Eq for Chain {}

/// An AIC over [`Node`]s, classified from its raw node array.
#[derive(Debug, Clone)]
pub struct AlternatingInferenceChain {
    chain: Chain,
    is_strong: bool,
}

impl AlternatingInferenceChain {
    /// `is_strong` marks a closed strong loop: the chain starts and ends with
    /// strong inferences on the same node.
    pub fn new(nodes: Vec<Node>, is_strong: bool) -> Result<Self, ChainError> {
        let chain = if is_strong {
            Chain::new_loop(nodes, true)?
        } else {
            Chain::new(nodes, false)?
        };
        Ok(AlternatingInferenceChain { chain, is_strong })
    }

    /// Wrap the reportable nodes of a chain that starts and ends with a
    /// strong inference into the raw `[last, real.., first]` form.
    pub fn from_real_nodes(real: Vec<Node>) -> Result<Self, ChainError> {
        let (Some(first), Some(last)) = (real.first().cloned(), real.last().cloned()) else {
            return Err(ChainError::TooShort { len: 0 });
        };
        let mut raw = Vec::with_capacity(real.len() + 2);
        raw.push(last);
        raw.extend(real);
        raw.push(first);
        Self::new(raw, false)
    }

    #[inline]
    pub fn is_strong(&self) -> bool {
        self.is_strong
    }

    /// The raw node array, closing nodes included.
    #[inline]
    pub fn full_chain_nodes(&self) -> &[Node] {
        self.chain.nodes()
    }

    /// The reportable nodes.
    pub fn real_chain_nodes(&self) -> &[Node] {
        let nodes = self.chain.nodes();
        if self.is_strong {
            nodes
        } else {
            &nodes[1..nodes.len() - 1]
        }
    }

    /// Polarities of the reportable nodes.
    pub fn real_polarities(&self) -> &[Polarity] {
        let polarities = self.chain.polarities();
        if self.is_strong {
            polarities
        } else {
            &polarities[1..polarities.len() - 1]
        }
    }

    #[inline]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Number of reportable nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.real_chain_nodes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.real_chain_nodes().is_empty()
    }

    /// Adjacent reportable node pairs with the inference joining them.
    pub fn inferences(&self) -> impl Iterator<Item = (&Node, Inference, &Node)> {
        self.real_chain_nodes()
            .windows(2)
            .enumerate()
            .map(|(i, pair)| (&pair[0], Inference::at_position(i), &pair[1]))
    }

    fn ends(&self) -> Option<(&Node, &Node)> {
        let real = self.real_chain_nodes();
        Some((real.first()?, real.last()?))
    }

    /// Any node, closing nodes included, spans several cells.
    pub fn is_grouped(&self) -> bool {
        self.chain.nodes().iter().any(Node::is_grouped)
    }

    /// First and last reportable node claim the same digit on overlapping
    /// cells inside one house.
    pub fn has_node_collision(&self) -> bool {
        if self.is_strong {
            return false;
        }
        let Some((a, b)) = self.ends() else {
            return false;
        };
        a.digit() == b.digit()
            && (a.cells() | b.cells()).in_one_house()
            && a.cells().overlaps(b.cells())
    }

    /// The closing weak inference turns the chain into a loop: either the
    /// ends are two digits of one cell, or one digit on disjoint cells of a
    /// common house.
    pub fn is_continuous_nice_loop(&self) -> bool {
        if self.is_strong {
            return false;
        }
        let Some((a, b)) = self.ends() else {
            return false;
        };
        if let (Some(ac), Some(bc)) = (a.single_cell(), b.single_cell()) {
            if ac == bc && a.digit() != b.digit() {
                return true;
            }
        }
        a.digit() == b.digit()
            && (a.cells() | b.cells()).in_one_house()
            && !a.cells().overlaps(b.cells())
    }

    pub fn is_irregular_wing(&self) -> bool {
        !self.is_strong && self.len() == 5
    }

    /// Every reportable node uses the same digit.
    pub fn is_x_chain(&self) -> bool {
        let mut digits = self.real_chain_nodes().iter().map(Node::digit);
        match digits.next() {
            Some(first) => digits.all(|d| d == first),
            None => false,
        }
    }

    /// Every strong inference lies inside one bivalue cell.
    pub fn is_xy_chain(&self) -> bool {
        let real = self.real_chain_nodes();
        if real.is_empty() || real.len() % 2 != 0 {
            return false;
        }
        real.chunks(2).all(|pair| match (pair[0].single_cell(), pair[1].single_cell()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        })
    }

    /// An XY-chain over exactly two digits.
    pub fn is_remote_pair(&self) -> bool {
        if !self.is_xy_chain() {
            return false;
        }
        let digits: DigitSet = self.real_chain_nodes().iter().map(Node::digit).collect();
        digits.count() == 2
    }

    /// `(cell, digit)` per reportable node of a six-node open chain.
    fn wing_shape(&self) -> Option<[(Option<usize>, u8); 6]> {
        let real = self.real_chain_nodes();
        if self.is_strong || real.len() != 6 {
            return None;
        }
        let mut shape = [(None, 0); 6];
        for (slot, node) in shape.iter_mut().zip(real) {
            *slot = (node.single_cell(), node.digit());
        }
        Some(shape)
    }

    /// `(x = y) - y = y - (y = x)`
    pub fn is_w_wing(&self) -> bool {
        matches!(
            self.wing_shape(),
            Some([(Some(c1), d1), (Some(c2), d2), (_, d3), (_, d4), (Some(c5), d5), (Some(c6), d6)])
                if c1 == c2 && c5 == c6 && d1 == d6 && d2 == d3 && d3 == d4 && d4 == d5
        )
    }

    /// `(x = y) - y = (y - x) = x`, either direction.
    pub fn is_m_wing(&self) -> bool {
        match self.wing_shape() {
            Some([(Some(c1), d1), (Some(c2), d2), (_, d3), (Some(c4), d4), (Some(c5), d5), (_, d6)])
                if c1 == c2 && c4 == c5 && d2 == d3 && d3 == d4 && d1 == d5 && d5 == d6 =>
            {
                true
            }
            Some([(_, d1), (Some(c2), d2), (Some(c3), d3), (_, d4), (Some(c5), d5), (Some(c6), d6)])
                if c2 == c3 && c5 == c6 && d2 == d3 && d3 == d4 && d1 == d5 && d5 == d6 =>
            {
                true
            }
            _ => false,
        }
    }

    /// `x = x - (x = y) - y = y`
    pub fn is_split_wing(&self) -> bool {
        matches!(
            self.wing_shape(),
            Some([(_, d1), (_, d2), (Some(c3), d3), (Some(c4), d4), (_, d5), (_, d6)])
                if d1 == d2 && d2 == d3 && d4 == d5 && d5 == d6 && c3 == c4
        )
    }

    /// `(x = y) - y = (y - z) = z` or `(x = y) - (y = z) - z = z`, either direction.
    pub fn is_hybrid_wing(&self) -> bool {
        match self.wing_shape() {
            Some([(Some(c1), _), (Some(c2), d2), (_, d3), (Some(c4), d4), (Some(c5), d5), (_, d6)])
                if c1 == c2 && c4 == c5 && d2 == d3 && d3 == d4 && d5 == d6 =>
            {
                true
            }
            Some([(_, d1), (Some(c2), d2), (Some(c3), d3), (_, d4), (Some(c5), d5), (Some(c6), _)])
                if c2 == c3 && c5 == c6 && d5 == d4 && d4 == d3 && d1 == d2 =>
            {
                true
            }
            Some([(Some(c1), _), (Some(c2), d2), (Some(c3), d3), (Some(c4), d4), (_, d5), (_, d6)])
                if c1 == c2 && c3 == c4 && d2 == d3 && d4 == d5 && d5 == d6 =>
            {
                true
            }
            Some([(_, d1), (_, d2), (Some(c3), d3), (Some(c4), d4), (Some(c5), d5), (Some(c6), _)])
                if c3 == c4 && c5 == c6 && d1 == d2 && d2 == d3 && d4 == d5 =>
            {
                true
            }
            _ => false,
        }
    }

    /// `x = (x - z) = (z - y) = y`
    pub fn is_local_wing(&self) -> bool {
        matches!(
            self.wing_shape(),
            Some([(_, d1), (Some(c2), d2), (Some(c3), d3), (Some(c4), d4), (Some(c5), d5), (_, d6)])
                if c2 == c3 && c4 == c5 && d1 == d2 && d3 == d4 && d5 == d6
        )
    }

    /// Derive the assignments and eliminations this chain proves against the
    /// live candidates of `view`.
    pub fn conclusions<V>(&self, view: &V) -> Vec<Conclusion>
    where
        V: CandidateView + ?Sized,
    {
        if self.is_strong {
            let anchor = &self.chain[0];
            return match anchor.single_cell() {
                Some(cell) => vec![Conclusion::assignment(cell, anchor.digit())],
                None => {
                    let targets = anchor.cells().peer_intersection() & view.digit_cells(anchor.digit());
                    eliminations(targets, anchor.digit())
                }
            };
        }

        if self.is_continuous_nice_loop() {
            return self.loop_conclusions(view);
        }
        self.endpoint_conclusions(view)
    }

    /// What the two reportable ends prove on their own, one of them being
    /// true: same digit eliminates it from their common peers, different
    /// digits eliminate the other digit from an end cell that sees the
    /// opposite end.
    ///
    /// The `sees` guard on different digits is intentional: an end cell
    /// loses the other digit only when it sees every cell of the other end.
    pub fn endpoint_conclusions<V>(&self, view: &V) -> Vec<Conclusion>
    where
        V: CandidateView + ?Sized,
    {
        let real = self.real_chain_nodes();
        if real.len() < 2 {
            return Vec::new();
        }
        let (first, last) = (&real[0], &real[real.len() - 1]);
        let (d1, d2) = (first.digit(), last.digit());

        if d1 == d2 {
            let targets = first.cells().peer_intersection()
                & last.cells().peer_intersection()
                & view.digit_cells(d1);
            return eliminations(targets, d1);
        }

        let mut result = Vec::new();
        if let Some(cell) = first.single_cell() {
            if view.has_candidate(cell, d2) && last.cells().iter().all(|c| view.sees(cell, c)) {
                result.push(Conclusion::elimination(cell, d2));
            }
        }
        if let Some(cell) = last.single_cell() {
            if view.has_candidate(cell, d1) && first.cells().iter().all(|c| view.sees(cell, c)) {
                result.push(Conclusion::elimination(cell, d1));
            }
        }
        result
    }

    fn loop_conclusions<V>(&self, view: &V) -> Vec<Conclusion>
    where
        V: CandidateView + ?Sized,
    {
        let nodes = self.real_chain_nodes();
        let mut result = Vec::new();

        for i in 0..nodes.len() {
            let node = &nodes[i];
            let next = &nodes[(i + 1) % nodes.len()];

            // Odd positions start the weak inferences, the last one wraps to 0.
            if i % 2 == 1 {
                match (node.single_cell(), next.single_cell()) {
                    (Some(a), Some(b)) if a == b => {
                        let others = view.candidates(a)
                            - DigitSet::single(node.digit())
                            - DigitSet::single(next.digit());
                        for digit in others.iter() {
                            push_unique(&mut result, Conclusion::elimination(a, digit));
                        }
                    }
                    _ if node.digit() == next.digit() => {
                        let digit = node.digit();
                        let union = node.cells() | next.cells();
                        let mut houses = union.covered_houses().peekable();
                        if houses.peek().is_some() {
                            for house in houses {
                                let targets = (CellSet::house(house) & view.digit_cells(digit)) - union;
                                for cell in targets {
                                    push_unique(&mut result, Conclusion::elimination(cell, digit));
                                }
                            }
                        } else {
                            let targets = node.cells().peer_intersection()
                                & next.cells().peer_intersection()
                                & view.digit_cells(digit);
                            for cell in targets {
                                push_unique(&mut result, Conclusion::elimination(cell, digit));
                            }
                        }
                    }
                    _ => {}
                }
            }

            for extra in node.potential_conclusions_with(view, next) {
                push_unique(&mut result, extra);
            }
        }
        result
    }

    /// Listing with every reportable node's polarity, off nodes prefixed `!`.
    pub fn verbose(&self) -> String {
        let mut out = String::new();
        for (i, (node, polarity)) in self
            .real_chain_nodes()
            .iter()
            .zip(self.real_polarities())
            .enumerate()
        {
            if i > 0 {
                out.push_str(Inference::at_position(i - 1).glyph());
            }
            if !polarity.is_on() {
                out.push('!');
            }
            out.push_str(&node.to_string());
        }
        out
    }
}

fn push_unique(result: &mut Vec<Conclusion>, conclusion: Conclusion) {
    if !result.contains(&conclusion) {
        result.push(conclusion);
    }
}

fn eliminations(targets: CellSet, digit: u8) -> Vec<Conclusion> {
    targets
        .iter()
        .map(|cell| Conclusion::elimination(cell, digit))
        .collect()
}

impl Index<usize> for AlternatingInferenceChain {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        &self.real_chain_nodes()[index]
    }
}

/// Same occurrence: same strength, endpoints equal in either order.
impl PartialEq for AlternatingInferenceChain {
    fn eq(&self, other: &Self) -> bool {
        if self.is_strong != other.is_strong {
            return false;
        }
        match (self.ends(), other.ends()) {
            (Some((a1, b1)), Some((a2, b2))) => (a1 == a2 && b1 == b2) || (a1 == b2 && b1 == a2),
            _ => false,
        }
    }
}

impl Eq for AlternatingInferenceChain {}

impl Hash for AlternatingInferenceChain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_strong.hash(state);
        if let Some((a, b)) = self.ends() {
            let (lo, hi) = if (a.cells(), a.digit()) <= (b.cells(), b.digit()) {
                (a, b)
            } else {
                (b, a)
            };
            lo.hash(state);
            hi.hash(state);
        }
    }
}

/// `5r1c1 == 5r1c4 -- 5r3c4 == 5r3c1`
impl fmt::Display for AlternatingInferenceChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.real_chain_nodes().iter().enumerate() {
            if i > 0 {
                f.write_str(Inference::at_position(i - 1).glyph())?;
            }
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}
