use std::collections::HashSet;

use sudoku_chains::{
    cell_index, AlternatingInferenceChain, CandidateFabric, ChainError, ChainSolver, ChainStep,
    Conclusion, ConclusionKind, DigitSet, Grid, HintType, LinkGraph, Node, NodeKind, Polarity,
    SearchOptions, Technique,
};

const EASY: &str =
    "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
const EASY_SOLUTION: &str =
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179";
const INKALA: &str =
    "800000000003600000070090200050007000000045700000100030001000068008500010090000400";
const INKALA_SOLUTION: &str =
    "812753649943682175675491283154237896369845721287169534521974368438526917796318452";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn node(row: usize, col: usize, digit: u8, polarity: Polarity) -> Node {
    Node::simple(cell_index(row, col), digit, polarity).unwrap()
}

fn on(row: usize, col: usize, digit: u8) -> Node {
    node(row, col, digit, Polarity::On)
}

fn off(row: usize, col: usize, digit: u8) -> Node {
    node(row, col, digit, Polarity::Off)
}

/// Solution digit (0-based) of a cell.
fn solution_digit(solution: &str, cell: usize) -> u8 {
    solution.as_bytes()[cell] - b'1'
}

#[test]
fn test_length_boundary() {
    let a = on(0, 0, 0);
    let b = on(0, 1, 0);
    assert!(AlternatingInferenceChain::new(vec![a.clone(), b.clone(), a.clone()], false).is_ok());
    let err = AlternatingInferenceChain::new(vec![a, b], false).unwrap_err();
    assert_eq!(err, ChainError::TooShort { len: 2 });
    assert_eq!(err.to_string(), "a chain needs at least 3 nodes, found 2");
}

#[test]
fn test_closed_loop_identity() {
    let anchor = on(4, 4, 3);
    let chain = AlternatingInferenceChain::new(
        vec![anchor.clone(), off(4, 4, 6), on(4, 8, 6), off(4, 8, 3), anchor],
        true,
    )
    .unwrap();
    let nodes = chain.full_chain_nodes();
    assert_eq!(nodes[0], nodes[nodes.len() - 1]);

    let open = AlternatingInferenceChain::new(vec![on(4, 4, 3), off(4, 4, 6), on(4, 8, 6)], true);
    assert_eq!(open.unwrap_err(), ChainError::OpenStrongLoop);
}

#[test]
fn test_polarity_alternation() {
    let chain = AlternatingInferenceChain::from_real_nodes(vec![
        off(0, 0, 4),
        on(0, 1, 4),
        off(0, 2, 4),
        on(0, 3, 4),
    ])
    .unwrap();
    let polarities = chain.chain().polarities();
    for i in 0..polarities.len() - 1 {
        assert_ne!(polarities[i], polarities[i + 1]);
    }
}

#[test]
fn test_scenario_same_digit_row() {
    // (r1c1,5,off) (r1c2,5,on) (r1c3,5,off) (r1c4,5,on)
    let chain = AlternatingInferenceChain::from_real_nodes(vec![
        off(0, 0, 4),
        on(0, 1, 4),
        off(0, 2, 4),
        on(0, 3, 4),
    ])
    .unwrap();
    let grid = Grid::empty();
    let mut cells: Vec<usize> = chain
        .endpoint_conclusions(&grid)
        .iter()
        .map(|c| {
            assert_eq!(c.kind, ConclusionKind::Elimination);
            assert_eq!(c.digit, 4);
            c.cell as usize
        })
        .collect();
    cells.sort_unstable();
    assert_eq!(cells, vec![1, 2, 4, 5, 6, 7, 8]);
}

#[test]
fn test_scenario_different_digits() {
    // 2 at r2c2 ... 7 at r2c8, both cells in row 2
    let chain = AlternatingInferenceChain::from_real_nodes(vec![
        off(1, 1, 1),
        on(1, 4, 1),
        off(1, 4, 6),
        on(1, 7, 6),
    ])
    .unwrap();
    let (c1, c2) = (cell_index(1, 1), cell_index(1, 7));

    let mut grid = Grid::empty();
    let conclusions = chain.conclusions(&grid);
    assert_eq!(
        conclusions,
        vec![Conclusion::elimination(c1, 6), Conclusion::elimination(c2, 1)]
    );

    grid.set_candidates(c1, DigitSet::single(1) | DigitSet::single(3));
    assert_eq!(chain.conclusions(&grid), vec![Conclusion::elimination(c2, 1)]);

    grid.set_candidates(c2, DigitSet::single(6) | DigitSet::single(3));
    assert!(chain.conclusions(&grid).is_empty());
}

#[test]
fn test_scenario_strong_loop_assignment() {
    let anchor = on(4, 4, 3);
    let chain = AlternatingInferenceChain::new(
        vec![anchor.clone(), off(4, 4, 6), on(4, 8, 6), off(4, 8, 3), anchor],
        true,
    )
    .unwrap();
    assert_eq!(
        chain.conclusions(&Grid::empty()),
        vec![Conclusion::assignment(cell_index(4, 4), 3)]
    );
}

#[test]
fn test_scenario_nice_loop_bivalue_joint() {
    // 1r3c3 == 1r3c7 -- 6r3c7 == 6r1c7 -- 6r1c3 == 6r3c3, closed in r3c3
    let chain = AlternatingInferenceChain::from_real_nodes(vec![
        off(2, 2, 0),
        on(2, 6, 0),
        off(2, 6, 5),
        on(0, 6, 5),
        off(0, 2, 5),
        on(2, 2, 5),
    ])
    .unwrap();
    assert!(chain.is_continuous_nice_loop());

    let conclusions = chain.conclusions(&Grid::empty());
    let r3c3 = cell_index(2, 2);
    let removed: DigitSet = conclusions
        .iter()
        .filter(|c| c.cell as usize == r3c3)
        .map(|c| c.digit)
        .collect();
    assert_eq!(removed.count(), 7);
    assert!(!removed.contains(0));
    assert!(!removed.contains(5));
}

#[test]
fn test_collision_is_classified_and_stable() {
    let grouped = Node::grouped([0, 1].into_iter().collect(), 4, Polarity::Off).unwrap();
    let chain = AlternatingInferenceChain::from_real_nodes(vec![
        grouped,
        on(3, 0, 4),
        off(3, 4, 4),
        on(0, 1, 4),
    ])
    .unwrap();
    for _ in 0..3 {
        assert!(chain.has_node_collision());
        assert!(!chain.is_continuous_nice_loop());
        assert!(chain.is_grouped());
    }
}

#[test]
fn test_grouped_node_spanning_houses_is_rejected() {
    let err = Node::grouped([0, 80].into_iter().collect(), 0, Polarity::On).unwrap_err();
    assert!(matches!(err, ChainError::GroupedNodeSpansHouses { .. }));
}

#[test]
fn test_mirror_chains_are_equal() {
    let forward = vec![off(0, 0, 4), on(0, 4, 4), off(4, 4, 4), on(4, 1, 4)];
    let mut backward = forward.clone();
    backward.reverse();
    let a = AlternatingInferenceChain::from_real_nodes(forward).unwrap();
    let b = AlternatingInferenceChain::from_real_nodes(backward).unwrap();
    assert_eq!(a, b);
    let set: HashSet<_> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);
}

/// Every conclusion a search reports must agree with the known solution.
fn assert_sound(puzzle: &str, solution: &str, options: &SearchOptions) -> Vec<ChainStep> {
    let grid = Grid::from_string(puzzle).unwrap();
    let fab = CandidateFabric::from_grid(&grid);
    let graph = LinkGraph::build(&fab, options).unwrap();
    let steps = sudoku_chains::search(&fab, &graph, options).unwrap();

    for step in &steps {
        assert!(!step.chain.has_node_collision());
        assert!(!step.conclusions.is_empty());
        for c in &step.conclusions {
            let expected = solution_digit(solution, c.cell as usize);
            match c.kind {
                ConclusionKind::Elimination => assert_ne!(
                    expected, c.digit,
                    "unsound elimination {} by {} ({})",
                    c, step.technique, step.chain
                ),
                ConclusionKind::Assignment => assert_eq!(
                    expected, c.digit,
                    "unsound assignment {} by {} ({})",
                    c, step.technique, step.chain
                ),
            }
        }
    }
    steps
}

#[test]
fn test_search_soundness_easy() {
    init_logger();
    let options = SearchOptions {
        max_length: 8,
        max_steps: usize::MAX,
        ..SearchOptions::default()
    };
    let found = assert_sound(EASY, EASY_SOLUTION, &options);
    assert!(!found.is_empty());
}

#[test]
fn test_search_with_almost_locked_sets_is_sound() {
    init_logger();
    let options = SearchOptions {
        max_length: 6,
        max_steps: usize::MAX,
        almost_locked_sets: true,
        ..SearchOptions::default()
    };
    let found = assert_sound(EASY, EASY_SOLUTION, &options);
    let uses_als = found.iter().any(|step| {
        step.chain
            .real_chain_nodes()
            .iter()
            .any(|node| matches!(node.kind(), NodeKind::AlmostLockedSet { .. }))
    });
    assert!(uses_als);
}

#[test]
fn test_search_soundness_hard() {
    init_logger();
    let options = SearchOptions {
        max_length: 8,
        max_steps: usize::MAX,
        parallel: true,
        ..SearchOptions::default()
    };
    assert_sound(INKALA, INKALA_SOLUTION, &options);
}

#[test]
fn test_solver_steps_stay_consistent_with_solution() {
    init_logger();
    let solver = ChainSolver::with_options(SearchOptions {
        max_length: 6,
        ..SearchOptions::default()
    });
    let mut grid = Grid::from_string(EASY).unwrap();
    for _ in 0..5 {
        match solver.apply_first(&mut grid).unwrap() {
            Some(_) => {}
            None => break,
        }
    }
    for cell in 0..81 {
        let digit = solution_digit(EASY_SOLUTION, cell);
        match grid.value(cell) {
            Some(v) => assert_eq!(v, digit),
            None => assert!(grid.has_candidate(cell, digit)),
        }
    }
}

#[test]
fn test_hint_serialization() {
    let solver = ChainSolver::new();
    let grid = Grid::from_string(EASY).unwrap();
    let hint = solver.get_hint(&grid).unwrap().unwrap();
    assert!(!hint.actions.is_empty());
    for action in &hint.actions {
        match action {
            HintType::SetValue { value, .. } => assert!((1..=9).contains(value)),
            HintType::EliminateCandidates { values, .. } => assert!(!values.is_empty()),
        }
    }

    let json = serde_json::to_string(&hint).unwrap();
    let back: sudoku_chains::Hint = serde_json::from_str(&json).unwrap();
    assert_eq!(back.technique, hint.technique);
    assert_eq!(back.chain, hint.chain);
}

#[test]
fn test_single_digit_search_reports_x_chains() {
    let grid = Grid::from_string(EASY).unwrap();
    let solver = ChainSolver::with_options(SearchOptions {
        single_digit_only: true,
        grouped_nodes: false,
        max_length: 8,
        ..SearchOptions::default()
    });
    let steps = solver.find_chains(&grid).unwrap();
    assert!(!steps.is_empty());
    for step in steps {
        assert!(step.chain.is_x_chain());
        assert!(matches!(
            step.technique,
            Technique::XChain | Technique::FishyCycle
        ));
    }
}
