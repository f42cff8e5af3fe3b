//! AIC Engine: link graph construction and chain search.
//!
//! Core: build ON/OFF nodes (candidates, box/line groups and optionally
//! almost locked sets) with strong and weak inference tables, then grow
//! alternating paths breadth-first from every node. Each path that arrives on
//! a strong inference is wrapped into an [`AlternatingInferenceChain`] and kept
//! when it proves something. A strong inference landing back on the start node
//! closes a strong loop, which proves the start true.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace};

use super::chain::AlternatingInferenceChain;
use super::explain::ChainStep;
use super::fabric::CandidateFabric;
use super::inference::{Link, LinkType, Polarity};
use super::node::{Node, NodeArena, NodeId, NodeKind};
use super::options::SearchOptions;
use crate::bitset::DigitSet;
use crate::cells::{CellSet, SECTOR_BOX_BASE};
use crate::ChainError;

/// Every almost locked set of two or more empty cells: N cells of one house
/// holding N + 1 digits between them. Each cell set is listed once.
pub fn almost_locked_sets(fab: &CandidateFabric) -> Vec<(CellSet, DigitSet)> {
    let mut seen = HashSet::new();
    let mut sets = Vec::new();
    for house in 0..27 {
        let empty: Vec<usize> = CellSet::house(house)
            .iter()
            .filter(|&c| fab.values[c].is_none())
            .collect();
        for mask in 1u32..(1 << empty.len()) {
            if mask.count_ones() < 2 {
                continue;
            }
            let cells: CellSet = empty
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, &c)| c)
                .collect();
            let digits = cells
                .iter()
                .fold(DigitSet::empty(), |acc, c| acc | fab.cell_cands[c]);
            if digits.count() as usize == cells.len() + 1 && seen.insert(cells) {
                sets.push((cells, digits));
            }
        }
    }
    sets
}

/// Strong and weak inference tables over a node arena.
pub struct LinkGraph {
    nodes: NodeArena,
    index: HashMap<(CellSet, u8, NodeKind), NodeId>,
    strong: Vec<Vec<Link>>,
    weak: Vec<Vec<Link>>,
}

impl LinkGraph {
    /// Build the graph from the CandidateFabric.
    ///
    /// Strong: the only two node sets of a digit in a house, the two
    /// candidates of a bivalue cell, and any two digits of one almost locked
    /// set. Weak: disjoint nodes of one digit inside a common house, and
    /// different digits of one cell.
    pub fn build(fab: &CandidateFabric, options: &SearchOptions) -> Result<Self, ChainError> {
        let mut graph = LinkGraph {
            nodes: NodeArena::new(),
            index: HashMap::new(),
            strong: Vec::new(),
            weak: Vec::new(),
        };

        // Sole candidates
        for cell in fab.empty_cells() {
            for digit in fab.cell_cands[cell].iter() {
                graph.add_node(Node::simple(cell, digit, Polarity::Off)?);
            }
        }

        // Locked candidates: 2-3 cells of a box/line intersection
        if options.grouped_nodes {
            for b in 0..9 {
                let block = CellSet::house(SECTOR_BOX_BASE + b);
                for line in 0..18 {
                    let segment = block & CellSet::house(line);
                    if segment.is_empty() {
                        continue;
                    }
                    for digit in 0..9u8 {
                        let cells = segment & fab.digit_cells[digit as usize];
                        if cells.len() >= 2 {
                            graph.add_node(Node::grouped(cells, digit, Polarity::Off)?);
                        }
                    }
                }
            }
        }

        // Almost locked sets: one node per digit, any two digits strong
        if options.almost_locked_sets {
            let sets = almost_locked_sets(fab);
            for &(cells, digits) in &sets {
                let mut ids = Vec::with_capacity(digits.count() as usize);
                for digit in digits.iter() {
                    let holders = cells & fab.digit_cells[digit as usize];
                    let node = Node::almost_locked_set(holders, digit, cells, digits, Polarity::Off)?;
                    ids.push(graph.add_node(node));
                }
                for (i, &a) in ids.iter().enumerate() {
                    for &b in &ids[i + 1..] {
                        graph.add_link(a, b, LinkType::Strong)?;
                    }
                }
            }
            debug!("link graph: {} almost locked sets", sets.len());
        }

        // Nodes per house and digit
        let mut house_nodes: Vec<[Vec<NodeId>; 9]> = (0..27).map(|_| Default::default()).collect();
        for (id, node) in graph.nodes.iter() {
            for house in node.cells().covered_houses() {
                house_nodes[house][node.digit() as usize].push(id);
            }
        }

        for (house, per_digit) in house_nodes.iter().enumerate() {
            for (digit, ids) in per_digit.iter().enumerate() {
                let target = fab.sector_digit_cells(house, digit as u8);
                for (i, &a) in ids.iter().enumerate() {
                    for &b in &ids[i + 1..] {
                        let (ca, cb) = (graph.nodes.get(a).cells(), graph.nodes.get(b).cells());
                        if ca.overlaps(cb) {
                            continue;
                        }
                        graph.add_link(a, b, LinkType::Weak)?;
                        if (ca | cb) == target {
                            graph.add_link(a, b, LinkType::Strong)?;
                        }
                    }
                }
            }
        }

        // Different digits of one cell; bivalue cells are strong
        for cell in fab.empty_cells() {
            let ids: Vec<NodeId> = fab.cell_cands[cell]
                .iter()
                .filter_map(|d| graph.find(CellSet::single(cell), d))
                .collect();
            for (i, &a) in ids.iter().enumerate() {
                for &b in &ids[i + 1..] {
                    graph.add_link(a, b, LinkType::Weak)?;
                    if ids.len() == 2 {
                        graph.add_link(a, b, LinkType::Strong)?;
                    }
                }
            }
        }

        // Deduplicate
        for list in graph.strong.iter_mut().chain(graph.weak.iter_mut()) {
            list.sort_unstable_by_key(|link| link.end);
            list.dedup();
        }

        let (strong, weak) = graph.link_count();
        debug!(
            "link graph: {} nodes, {} strong links, {} weak links",
            graph.len(),
            strong,
            weak
        );
        Ok(graph)
    }

    fn add_node(&mut self, node: Node) -> NodeId {
        let key = (node.cells(), node.digit(), node.kind());
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.nodes.push(node);
        self.index.insert(key, id);
        self.strong.push(Vec::new());
        self.weak.push(Vec::new());
        id
    }

    fn add_link(&mut self, a: NodeId, b: NodeId, link_type: LinkType) -> Result<(), ChainError> {
        let link = Link::new(a, b, link_type)?;
        let table = match link_type {
            LinkType::Strong => &mut self.strong,
            LinkType::Weak => &mut self.weak,
            LinkType::Line => return Ok(()),
        };
        table[a.0].push(link);
        table[b.0].push(link.reversed());
        Ok(())
    }

    /// Simple or grouped node id for a cell set and digit, if the graph
    /// holds it.
    pub fn find(&self, cells: CellSet, digit: u8) -> Option<NodeId> {
        let kind = if cells.len() == 1 {
            NodeKind::Simple
        } else {
            NodeKind::Grouped
        };
        self.index.get(&(cells, digit, kind)).copied()
    }

    /// Almost locked set node for `digit` on the set `als_cells`.
    pub fn find_almost_locked_set(&self, als_cells: CellSet, digit: u8) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| match node.kind() {
                NodeKind::AlmostLockedSet { cells, .. } => cells == als_cells && node.digit() == digit,
                _ => false,
            })
            .map(|(id, _)| id)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn strong_links(&self, id: NodeId) -> &[Link] {
        &self.strong[id.0]
    }

    #[inline]
    pub fn weak_links(&self, id: NodeId) -> &[Link] {
        &self.weak[id.0]
    }

    /// Directed link counts `(strong, weak)`.
    pub fn link_count(&self) -> (usize, usize) {
        (
            self.strong.iter().map(Vec::len).sum(),
            self.weak.iter().map(Vec::len).sum(),
        )
    }

    /// Nodes that can open a chain, in digit order.
    fn start_nodes(&self) -> Vec<NodeId> {
        let mut starts: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(id, _)| !self.strong[id.0].is_empty())
            .map(|(id, _)| id)
            .collect();
        starts.sort_by_key(|&id| (self.node(id).digit(), id));
        starts
    }
}

/// Search every chain the graph supports.
///
/// Colliding chains and chains without conclusions are dropped; mirrored
/// duplicates are reported once. Shorter chains come first.
pub fn search(
    fab: &CandidateFabric,
    graph: &LinkGraph,
    options: &SearchOptions,
) -> Result<Vec<ChainStep>, ChainError> {
    let starts = graph.start_nodes();
    let start_count = starts.len();
    let cancel = AtomicBool::new(false);

    let found = if options.parallel {
        let mut by_digit: [Vec<NodeId>; 9] = Default::default();
        for id in starts {
            by_digit[graph.node(id).digit() as usize].push(id);
        }

        let results: Vec<Result<Vec<ChainStep>, ChainError>> = std::thread::scope(|s| {
            let handles: Vec<_> = by_digit
                .iter()
                .filter(|starts| !starts.is_empty())
                .map(|starts| {
                    let cancel = &cancel;
                    s.spawn(move || search_from(fab, graph, starts, options, cancel))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| match h.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        let mut merged = Vec::new();
        for result in results {
            merged.extend(result?);
        }
        merged
    } else {
        search_from(fab, graph, &starts, options, &cancel)?
    };

    let mut seen = HashSet::new();
    let mut steps: Vec<ChainStep> = found
        .into_iter()
        .filter(|step| seen.insert(step.chain.clone()))
        .collect();
    steps.sort_by_key(|step| step.chain.len());
    if options.stop_at_first {
        steps.truncate(1);
    }
    steps.truncate(options.max_steps);

    debug!("chain search: {} start nodes, {} steps", start_count, steps.len());
    Ok(steps)
}

/// Breadth-first search from each start in turn, alternating strong and weak.
fn search_from(
    fab: &CandidateFabric,
    graph: &LinkGraph,
    starts: &[NodeId],
    options: &SearchOptions,
    cancel: &AtomicBool,
) -> Result<Vec<ChainStep>, ChainError> {
    let mut steps = Vec::new();
    let mut seen: HashSet<AlternatingInferenceChain> = HashSet::new();

    for &start in starts {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        let start_digit = graph.node(start).digit();

        // Search tree: arena nodes point at their parent, `origin` maps them
        // back to graph ids.
        let mut tree = NodeArena::new();
        let mut origin: Vec<NodeId> = Vec::new();
        let mut queue: VecDeque<(NodeId, bool, usize)> = VecDeque::new();
        let mut visited: HashSet<(NodeId, bool)> = HashSet::new();

        let root = tree.push(graph.node(start).clone().with_polarity(Polarity::Off));
        origin.push(start);
        queue.push_back((root, false, 1));

        while let Some((current, arrived_strong, length)) = queue.pop_front() {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            let at = origin[current.0];
            if !visited.insert((at, arrived_strong)) {
                continue;
            }

            if arrived_strong && length >= 4 {
                let chain = AlternatingInferenceChain::from_real_nodes(tree.path_to_root(current))?;
                if record(fab, chain, &mut seen, &mut steps) && options.stop_at_first {
                    cancel.store(true, Ordering::Relaxed);
                    return Ok(steps);
                }
            }

            if length >= options.max_length {
                continue;
            }

            let on_path: Vec<NodeId> = tree.ancestry(current);
            let (links, polarity) = if arrived_strong {
                (graph.weak_links(at), Polarity::Off)
            } else {
                (graph.strong_links(at), Polarity::On)
            };

            for link in links {
                // Start off, ..., start on: the start holds
                if !arrived_strong && link.end == start && length >= 3 {
                    let mut nodes = tree.path_to_root(current);
                    nodes.push(graph.node(start).clone().with_polarity(Polarity::On));
                    let chain = AlternatingInferenceChain::new(nodes, true)?;
                    if record(fab, chain, &mut seen, &mut steps) && options.stop_at_first {
                        cancel.store(true, Ordering::Relaxed);
                        return Ok(steps);
                    }
                    continue;
                }

                let next = graph.node(link.end);
                if options.single_digit_only && next.digit() != start_digit {
                    continue;
                }
                if on_path.iter().any(|&id| tree.get(id) == next)
                    || visited.contains(&(link.end, !arrived_strong))
                {
                    continue;
                }
                let child = tree.push(
                    next.clone()
                        .with_polarity(polarity)
                        .with_parents(vec![current]),
                );
                origin.push(link.end);
                queue.push_back((child, !arrived_strong, length + 1));
            }
        }
    }
    Ok(steps)
}

/// Keep `chain` as a step when it is new, collision free and proves
/// something. Returns whether it was kept.
fn record(
    fab: &CandidateFabric,
    chain: AlternatingInferenceChain,
    seen: &mut HashSet<AlternatingInferenceChain>,
    steps: &mut Vec<ChainStep>,
) -> bool {
    if chain.has_node_collision() || seen.contains(&chain) {
        return false;
    }
    let conclusions = chain.conclusions(fab);
    if conclusions.is_empty() {
        return false;
    }
    let step = ChainStep::new(chain.clone(), conclusions);
    trace!("{}", step);
    seen.insert(chain);
    steps.push(step);
    true
}
