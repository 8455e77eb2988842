//! Local deduction rules.
//!
//! - Rule A (forced mine): a number whose Default neighbors exactly fill its
//!   remaining quota flags all of them.
//! - Rule B (forced safe): a number whose quota is already met reveals every
//!   other Default neighbor.
//! - Rule C (partial probability): a cheap heuristic that pre-seeds
//!   probabilities around large numbers. It never flags or reveals.
//!
//! Rules A and B are sound; Rule C is not a proof.

use log::trace;

use crate::board::Board;

/// Rule A: flag every Default neighbor of an exposed cell whose Default
/// neighbor count equals its number minus its flagged neighbors.
///
/// Returns true if at least one flag was placed.
pub fn apply_forced_mines(board: &mut Board) -> bool {
    let mut applied = false;

    for idx in board.exposed_indices() {
        let quota = board.cells()[idx].adjacent_mines() as usize;
        let unflagged = board.count_neighbors(idx, |c| c.is_default());
        let flagged = board.count_neighbors(idx, |c| c.is_flagged());
        if unflagged == 0 || flagged > quota || unflagged != quota - flagged {
            continue;
        }

        let around = board.neighbor_indices(idx).to_vec();
        for n in around {
            if board.cells()[n].is_default() {
                trace!("Rule A flags {:?}", board.coord_of(n));
                board.flag_index(n);
                applied = true;
            }
        }
    }

    applied
}

/// Rule B: reveal the remaining Default neighbors of every revealed cell
/// whose number is already matched by neighbors counted as mines.
///
/// Stops as soon as a reveal ends the game. Returns true if anything was
/// revealed.
pub fn apply_forced_safe(board: &mut Board) -> bool {
    let mut applied = false;

    let revealed: Vec<usize> = (0..board.cell_count())
        .filter(|&i| board.cells()[i].is_revealed())
        .collect();

    for idx in revealed {
        let quota = board.cells()[idx].adjacent_mines() as usize;
        let mines = board.count_neighbors(idx, |c| c.counts_as_mine());
        if mines != quota {
            continue;
        }

        let around = board.neighbor_indices(idx).to_vec();
        for n in around {
            let cell = &board.cells()[n];
            if !cell.is_default() || cell.counts_as_mine() {
                continue;
            }
            trace!("Rule B reveals {:?}", board.coord_of(n));
            board.set_probability(n, Some(0));
            board.reveal_index(n);
            applied = true;
            if board.is_over() {
                return applied;
            }
        }
    }

    applied
}

/// Run Rules A and B until neither changes the board or the game ends.
///
/// Rule B only runs once Rule A has nothing left to flag.
pub fn run_to_fixed_point(board: &mut Board) -> usize {
    let mut rounds = 0;
    while !board.is_over() && (apply_forced_mines(board) || apply_forced_safe(board)) {
        rounds += 1;
    }
    rounds
}

/// Rule C: for revealed cells numbered above 2, count the Default or Flagged
/// neighbors that touch exactly one revealed cell. If that count equals the
/// number of Default and Flagged neighbors, every Default one among them
/// gets the uniform estimate `number / count * 100`. Flags keep their 100.
///
/// Heuristic only. Returns the number of cells seeded.
pub fn apply_partial_probability(board: &mut Board) -> usize {
    let mut seeded = 0;

    for idx in 0..board.cell_count() {
        let cell = &board.cells()[idx];
        if !cell.is_revealed() || cell.adjacent_mines() <= 2 {
            continue;
        }
        let number = cell.adjacent_mines() as usize;

        let lonely: Vec<usize> = board
            .neighbor_indices(idx)
            .iter()
            .copied()
            .filter(|&n| {
                let c = &board.cells()[n];
                (c.is_default() || c.is_flagged()) && board.count_neighbors(n, |x| x.is_revealed()) == 1
            })
            .collect();
        let undecided = board.count_neighbors(idx, |c| c.is_default() || c.is_flagged());

        if lonely.is_empty() || lonely.len() != undecided {
            continue;
        }

        let estimate = (number as f64 / lonely.len() as f64 * 100.0).round().min(100.0) as u8;
        for n in lonely {
            if board.cells()[n].is_default() {
                board.set_probability(n, Some(estimate));
                seeded += 1;
            }
        }
        trace!("Rule C seeded {} cells around {:?} at {}%", undecided, board.coord_of(idx), estimate);
    }

    seeded
}
