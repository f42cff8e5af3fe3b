//! Chain solver orchestrator.
//!
//! Builds the candidate fabric and link graph for a grid, runs the chain
//! search and turns the result into steps, hints or grid updates.

mod types;
pub(crate) mod fabric;
pub(crate) mod explain;
pub(crate) mod inference;
pub(crate) mod node;
pub(crate) mod chain;
mod options;
mod aic_engine;

use log::debug;

use crate::{ChainError, Grid};

pub use aic_engine::{almost_locked_sets, search, LinkGraph};
pub use chain::{AlternatingInferenceChain, Chain};
pub use explain::{classify, ChainStep, Conclusion, ConclusionKind};
pub use fabric::{CandidateFabric, CandidateView};
pub use inference::{Inference, Link, LinkType, Polarity};
pub use node::{Node, NodeArena, NodeId, NodeKind};
pub use options::SearchOptions;
pub use types::{Hint, HintType, Position, Technique};

/// Stateless between calls apart from its options.
#[derive(Debug, Clone, Default)]
pub struct ChainSolver {
    options: SearchOptions,
}

impl ChainSolver {
    /// Create a solver with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SearchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Every chain step the grid's current candidates support, shortest first.
    pub fn find_chains(&self, grid: &Grid) -> Result<Vec<ChainStep>, ChainError> {
        let fab = CandidateFabric::from_grid(grid);
        let graph = LinkGraph::build(&fab, &self.options)?;
        search(&fab, &graph, &self.options)
    }

    /// Get a hint for the current position.
    pub fn get_hint(&self, grid: &Grid) -> Result<Option<Hint>, ChainError> {
        Ok(self.find_chains(grid)?.first().map(ChainStep::to_hint))
    }

    /// Apply the conclusions of the first step found. Returns that step, or
    /// `None` when no chain changes the grid.
    pub fn apply_first(&self, grid: &mut Grid) -> Result<Option<ChainStep>, ChainError> {
        for step in self.find_chains(grid)? {
            let mut changed = false;
            for conclusion in &step.conclusions {
                changed |= grid.apply(conclusion);
            }
            if changed {
                debug!("applied {}", step);
                return Ok(Some(step));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::cell_index;

    fn sparse_fives() -> Grid {
        // Digit 5 only in r1c1 r1c5 r5c1 r5c2 r5c5 r9c2
        let mut grid = Grid::empty();
        let keep = [
            cell_index(0, 0),
            cell_index(0, 4),
            cell_index(4, 0),
            cell_index(4, 1),
            cell_index(4, 4),
            cell_index(8, 1),
        ];
        for cell in 0..81 {
            if !keep.contains(&cell) {
                grid.eliminate(cell, 4);
            }
        }
        grid
    }

    #[test]
    fn test_get_hint() {
        let solver = ChainSolver::new();
        let hint = solver.get_hint(&sparse_fives()).unwrap();
        assert!(hint.is_some());
    }

    #[test]
    fn test_apply_first_changes_grid() {
        let solver = ChainSolver::with_options(SearchOptions {
            single_digit_only: true,
            ..SearchOptions::default()
        });
        let mut grid = sparse_fives();
        let before = grid.clone();
        let step = solver.apply_first(&mut grid).unwrap().unwrap();
        assert!(!step.conclusions.is_empty());
        assert_ne!(grid, before);
        // Both r5c2 and r5c5 are provably not 5; the first step removes one
        assert!(
            !grid.has_candidate(cell_index(4, 1), 4) || !grid.has_candidate(cell_index(4, 4), 4)
        );
    }

    #[test]
    fn test_no_chains_on_full_candidates() {
        let solver = ChainSolver::new();
        assert!(solver.find_chains(&Grid::empty()).unwrap().is_empty());
        let mut grid = Grid::empty();
        assert!(solver.apply_first(&mut grid).unwrap().is_none());
    }
}
