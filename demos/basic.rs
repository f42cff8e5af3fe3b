//! Basic example of using the chain engine

use sudoku_chains::{ChainSolver, Grid, SearchOptions};

fn main() {
    env_logger::init();

    // Parse a puzzle from a string
    let puzzle_string =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    let mut grid = match Grid::from_string(puzzle_string) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Could not parse puzzle: {}", e);
            return;
        }
    };

    println!("Parsed puzzle:");
    println!("{}", grid);
    println!("Given cells: {}", grid.given_count());
    println!("Empty cells: {}\n", grid.empty_count());

    // List the shortest chains
    let solver = ChainSolver::with_options(SearchOptions {
        max_length: 8,
        ..SearchOptions::default()
    });
    match solver.find_chains(&grid) {
        Ok(steps) => {
            println!("Found {} chains:", steps.len());
            for step in steps.iter().take(10) {
                println!("  {}", step);
            }
        }
        Err(e) => eprintln!("Search failed: {}", e),
    }

    // Get a hint
    println!("\nGetting a hint:");
    if let Ok(Some(hint)) = solver.get_hint(&grid) {
        println!("Technique: {}", hint.technique);
        println!("Chain: {}", hint.chain);
        println!("Explanation: {}", hint.explanation);
    }

    // Apply chains until none changes the grid
    println!("\nApplying chains...");
    let mut applied = 0;
    while applied < 20 {
        match solver.apply_first(&mut grid) {
            Ok(Some(step)) => {
                applied += 1;
                println!("{:>2}. {}", applied, step);
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("Search failed: {}", e);
                break;
            }
        }
    }
    println!("\nAfter {} steps:", applied);
    println!("{}", grid);
}
