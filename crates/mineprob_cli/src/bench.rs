//! Bench scenarios
//!
//! Full-game playthroughs driven by the exact solver, and exhaustive endgame
//! drains over small boards.

use crate::board::GridBoard;
use mineprob_core::{drain, Adjacency, Cell, CellStatus, Rational, Solver};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

/// Outcome of one solver-driven playthrough.
struct GameStats {
    won: bool,
    guesses: usize,
    solves: usize,
    elapsed_ms: f64,
}

/// Play `games` random boards with the exact solver and report win rates.
pub fn run_play(width: usize, height: usize, mines: usize, games: usize, seed: u64) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║           Mineprob - Exact Solver Playthrough        ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("Board:   {width}x{height}, {mines} mines");
    println!("Games:   {games}");
    println!("Seed:    {seed}");
    println!();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut wins = 0usize;
    let mut results = Vec::with_capacity(games);

    println!("┌───────┬────────┬─────────┬────────┬────────────┐");
    println!("│ Game  │ Result │ Guesses │ Solves │ Time (ms)  │");
    println!("├───────┼────────┼─────────┼────────┼────────────┤");

    for game in 0..games {
        let board = GridBoard::random(width, height, mines, &mut rng);
        let stats = play_one(&board);
        if stats.won {
            wins += 1;
        }
        println!(
            "│ {:>5} │ {:>6} │ {:>7} │ {:>6} │ {:>10.3} │",
            game,
            if stats.won { "win" } else { "loss" },
            stats.guesses,
            stats.solves,
            stats.elapsed_ms
        );
        results.push(stats);
    }

    println!("└───────┴────────┴─────────┴────────┴────────────┘");
    println!();
    let total_ms: f64 = results.iter().map(|s| s.elapsed_ms).sum();
    println!(
        "Won {wins}/{games} ({:.1}%), total solve time {:.1} ms",
        wins as f64 / games as f64 * 100.0,
        total_ms
    );
}

/// Drive one game: open every certain-safe cell, guess the least likely
/// mine otherwise, stop on a mine hit or a cleared board.
fn play_one(board: &GridBoard) -> GameStats {
    let start = Instant::now();
    let mut solver = Solver::new();
    solver.add_restrain(&board.all_cells(), board.mine_count());

    let mut opened: Vec<bool> = vec![false; board.size()];
    let mut opened_count = 0usize;
    let mut guesses = 0usize;
    let mut solves = 0usize;
    let mut won = true;

    while opened_count < board.safe_count() {
        solver.solve(true).expect("board constraints are consistent");
        solves += 1;

        // open every cell the solver has proven safe
        let mut progress = false;
        for i in 0..board.size() {
            let cell = Cell(i as u32);
            if !opened[i] && solver.status(cell) == CellStatus::Blank {
                open_cell(&mut solver, board, cell, &mut opened, &mut opened_count);
                progress = true;
            }
        }
        if progress {
            continue;
        }

        // no certain move: guess the cell with the lowest exact probability
        let mut best: Option<(Cell, Rational)> = None;
        for i in 0..board.size() {
            let cell = Cell(i as u32);
            if opened[i] || solver.status(cell) != CellStatus::Unknown {
                continue;
            }
            let p = solver
                .probability(cell)
                .expect("every cell sits under the total-mines restrain");
            match &best {
                Some((_, bp)) if *bp <= p => {}
                _ => best = Some((cell, p)),
            }
        }
        let (cell, _) = best.expect("unopened safe cells remain");
        guesses += 1;
        if board.is_mine(cell) {
            won = false;
            break;
        }
        open_cell(&mut solver, board, cell, &mut opened, &mut opened_count);
    }

    GameStats {
        won,
        guesses,
        solves,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    }
}

fn open_cell(
    solver: &mut Solver,
    board: &GridBoard,
    cell: Cell,
    opened: &mut [bool],
    opened_count: &mut usize,
) {
    if opened[cell.0 as usize] {
        return;
    }
    opened[cell.0 as usize] = true;
    *opened_count += 1;
    solver.add_restrain(&mineprob_core::CellSet::singleton(cell), 0);
    solver.add_restrain(&board.neighbors(cell), board.degree(cell));
}

/// Drain a small hidden board exhaustively and print the optimal opening.
pub fn run_drain(width: usize, height: usize, mines: usize, seed: u64) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║          Mineprob - Exhaustive Endgame Drain         ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("Board:   {width}x{height}, {mines} mines, seed {seed}");
    println!();

    let mut rng = StdRng::seed_from_u64(seed);
    let board = GridBoard::random(width, height, mines, &mut rng);

    let mut solver = Solver::new();
    solver.add_restrain(&board.all_cells(), board.mine_count());

    let start = Instant::now();
    let result = drain(solver, board.safe_count(), &board).expect("hidden board is consistent");
    let elapsed = start.elapsed().as_secs_f64() * 1000.0;

    println!("┌────────────┬─────────────────┬──────────────┐");
    println!("│   Cell     │  Win chance     │  Approx      │");
    println!("├────────────┼─────────────────┼──────────────┤");
    for (p, cell) in result.cells.iter().enumerate() {
        let (x, y) = board.coords(cell);
        let prob = &result.probabilities[p];
        println!("│ ({x:>2},{y:>2})    │ {:>15} │ {:>12.6} │", prob.to_string(), prob.to_f64());
    }
    println!("└────────────┴─────────────────┴──────────────┘");
    println!();
    let moves: Vec<String> = result
        .best_moves
        .iter()
        .map(|c| {
            let (x, y) = board.coords(c);
            format!("({x},{y})")
        })
        .collect();
    println!(
        "Best win chance {} ({:.6}) via {} in {:.1} ms",
        result.best_probability,
        result.best_probability.to_f64(),
        moves.join(", "),
        elapsed
    );
}
