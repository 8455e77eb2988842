//! Decision policy and the auto-solve loop.
//!
//! One pass:
//! 1. Open a shuffled corner if nothing has been revealed yet
//! 2. Run the deduction rules to a fixed point, then Rule C once
//! 3. Enumerate arrangements over the border and aggregate probabilities
//! 4. Flag every border cell at 100%
//! 5. Reveal the lowest-probability border cell
//!
//! `run_auto_solve` repeats passes until the game ends or no move is left.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::SolverConfig;
use crate::enumerate::enumerate_arrangements;
use crate::probability::{apply_probabilities, SolverAssignment};
use crate::rng::GameRng;
use crate::rules::{apply_partial_probability, run_to_fixed_point};
use crate::types::{Coord, Outcome};

/// Summary of one auto-solve run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    /// `Continue` only when the solver ran out of cells to reveal.
    pub outcome: Outcome,
    pub flags_placed_at_end: usize,
    /// Number of solve passes run.
    pub elapsed_ticks: usize,
}

// ─── Opening move ───────────────────────────────────────────────────────────

/// Reveal corners in random order until one cascades or the game ends.
fn open_corners(board: &mut Board, rng: &mut GameRng) {
    let (w, h) = (board.width(), board.height());
    let mut corners = vec![
        Coord::new(0, 0),
        Coord::new(0, w - 1),
        Coord::new(h - 1, 0),
        Coord::new(h - 1, w - 1),
    ];
    corners.sort();
    corners.dedup();
    rng.shuffle(&mut corners);

    for coord in corners {
        let idx = board.neighbor_cache().index(coord);
        if !board.cells()[idx].is_default() {
            continue;
        }
        debug!("Opening at ({}, {})", coord.row, coord.col);
        board.reveal_index(idx);
        if board.is_over() || board.cells()[idx].adjacent_mines() == 0 {
            return;
        }
    }
}

// ─── Move selection ─────────────────────────────────────────────────────────

/// Flag every still-Default cell in `candidates` computed at 100%.
fn flag_certain_mines(board: &mut Board, candidates: &[usize]) -> usize {
    let mut flagged = 0;
    for &idx in candidates {
        let cell = &board.cells()[idx];
        if cell.is_default() && cell.probability() == Some(100) {
            board.flag_index(idx);
            flagged += 1;
        }
    }
    flagged
}

/// The Default cell with the strictly lowest known probability. Ties keep
/// the earliest index; if nothing has a probability, the first Default cell.
fn pick_lowest(board: &Board, candidates: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, u8)> = None;
    let mut first = None;

    for &idx in candidates {
        let cell = &board.cells()[idx];
        if !cell.is_default() {
            continue;
        }
        first.get_or_insert(idx);
        if let Some(p) = cell.probability() {
            if best.map_or(true, |(_, b)| p < b) {
                best = Some((idx, p));
            }
        }
    }

    best.map(|(idx, _)| idx).or(first)
}

// ─── Solve pass ─────────────────────────────────────────────────────────────

/// Run one pass of the decision policy.
///
/// Returns the outcome after the pass, or `None` when the game is still
/// running but no Default cell is left to reveal.
pub fn solve_pass(board: &mut Board, rng: &mut GameRng, config: &SolverConfig) -> Option<Outcome> {
    if board.is_over() {
        return Some(board.outcome());
    }

    if board.revealed_count() == 0 {
        open_corners(board, rng);
        if board.is_over() {
            return Some(board.outcome());
        }
    }

    board.clear_probabilities();
    run_to_fixed_point(board);
    if board.is_over() {
        return Some(board.outcome());
    }
    apply_partial_probability(board);

    let exposed = board.exposed_indices();
    let border = board.border_indices();
    let unbordered = board.unbordered_indices();

    let mut infeasible = false;
    if !border.is_empty() {
        let arrangements = enumerate_arrangements(board, &exposed, &border, config.validation);
        let table = SolverAssignment::aggregate(
            &arrangements,
            border.len(),
            unbordered.len(),
            board.mine_count(),
            board.flagged_count(),
        );
        infeasible = table.is_infeasible();
        apply_probabilities(board, &border, &unbordered, &table);
    }

    let flagged = flag_certain_mines(board, &border);
    if flagged > 0 {
        debug!("Flagged {} certain mines", flagged);
    }

    let choice = if infeasible {
        let first = border.iter().copied().find(|&i| board.cells()[i].is_default());
        if let Some(idx) = first {
            let coord = board.coord_of(idx);
            warn!("No feasible arrangement, falling back to ({}, {})", coord.row, coord.col);
        }
        first
    } else {
        None
    };
    let choice = choice
        .or_else(|| pick_lowest(board, &border))
        .or_else(|| pick_lowest(board, &unbordered));

    let idx = choice?;
    let coord = board.coord_of(idx);
    debug!(
        "Revealing ({}, {}) at {:?}% with {} border cells",
        coord.row,
        coord.col,
        board.cells()[idx].probability(),
        border.len()
    );
    Some(board.reveal_index(idx).outcome)
}

/// Drive solve passes until the game is won, lost, or stuck.
///
/// Every pass that does not end the game reveals at least one cell, so the
/// number of passes is bounded by the cell count.
pub fn run_auto_solve(board: &mut Board, rng: &mut GameRng, config: &SolverConfig) -> SolveReport {
    let limit = board.cell_count() + 1;
    let mut ticks = 0;

    let outcome = loop {
        if board.is_over() {
            break board.outcome();
        }
        if ticks >= limit {
            warn!("Auto-solve gave up after {} passes", ticks);
            break Outcome::Continue;
        }
        ticks += 1;
        match solve_pass(board, rng, config) {
            Some(Outcome::Continue) => {}
            Some(outcome) => break outcome,
            None => {
                warn!("No Default cell left to reveal after {} passes", ticks);
                break Outcome::Continue;
            }
        }
    };

    info!(
        "Auto-solve finished: {:?} after {} passes with {} flags",
        outcome,
        ticks,
        board.flagged_count()
    );
    SolveReport { outcome, flags_placed_at_end: board.flagged_count(), elapsed_ticks: ticks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, ValidationMode};
    use crate::types::GameState;

    fn assert_counters(board: &Board) {
        assert_eq!(
            board.revealed_count() + board.flagged_count() + board.default_count(),
            board.cell_count()
        );
    }

    #[test]
    fn test_opening_and_rule_a_win_small_board() {
        // No corner is a mine, and (2,2) pins the mine once any corner cascades.
        for seed in 0..10 {
            let mut board = Board::from_layout(&["....", ".*..", "....", "...."]).unwrap();
            let mut rng = GameRng::from_seed(seed);
            let report = run_auto_solve(&mut board, &mut rng, &SolverConfig::default());
            assert_eq!(report.outcome, Outcome::Win, "seed {seed}");
            assert_eq!(report.flags_placed_at_end, 1, "seed {seed}");
            assert!(report.elapsed_ticks >= 1);
            assert_counters(&board);
        }
    }

    #[test]
    fn test_already_won_board_takes_no_passes() {
        let mut board = Board::from_layout(&["*...", "....", "....", "...."]).unwrap();
        let result = board.reveal(Coord::new(3, 3)).unwrap();
        assert_eq!(result.outcome, Outcome::Win);
        assert_eq!(result.cascaded.len(), 14);

        let report = run_auto_solve(&mut board, &mut GameRng::from_seed(0), &SolverConfig::default());
        assert_eq!(report.outcome, Outcome::Win);
        assert_eq!(report.elapsed_ticks, 0);
        assert_eq!(report.flags_placed_at_end, 0);
    }

    #[test]
    fn test_pass_flags_certain_mines_then_reveals_safe_cell() {
        let mut board = Board::from_layout(&["*.*", "...", "..."]).unwrap();
        board.reveal(Coord::new(2, 2)).unwrap();

        let outcome = solve_pass(&mut board, &mut GameRng::from_seed(1), &SolverConfig::default());
        assert_eq!(outcome, Some(Outcome::Win));
        assert_eq!(board.flagged_count(), 2);
        assert_eq!(board.correct_flag_count(), 2);
    }

    #[test]
    fn test_ties_go_to_the_first_border_cell() {
        // Three border cells at 33% each against 50% for the two unbordered
        // cells; the first border cell in row-major order is the mine.
        let mut board = Board::from_layout(&["*.*", "..."]).unwrap();
        board.reveal(Coord::new(1, 0)).unwrap();

        let outcome = solve_pass(&mut board, &mut GameRng::from_seed(1), &SolverConfig::default());
        assert_eq!(outcome, Some(Outcome::Loss));
        assert_eq!(board.exploded(), Some(Coord::new(0, 0)));
        assert_eq!(board.cell(Coord::new(0, 1)).unwrap().probability(), Some(33));
        assert_eq!(board.cell(Coord::new(1, 2)).unwrap().probability(), Some(50));
    }

    #[test]
    fn test_infeasible_aggregation_falls_back_to_first_border_cell() {
        // Two wrong flags around a 1 leave a negative mine count for every
        // arrangement.
        let mut board = Board::from_layout(&["*..", "..."]).unwrap();
        board.reveal(Coord::new(0, 1)).unwrap();
        board.flag(Coord::new(1, 0)).unwrap();
        board.flag(Coord::new(1, 2)).unwrap();

        let outcome = solve_pass(&mut board, &mut GameRng::from_seed(3), &SolverConfig::default());
        assert_eq!(outcome, Some(Outcome::Loss));
        assert_eq!(board.exploded(), Some(Coord::new(0, 0)));
        assert_counters(&board);
    }

    #[test]
    fn test_no_default_cells_stalls() {
        let mut board = Board::from_layout(&["*."]).unwrap();
        board.flag(Coord::new(0, 0)).unwrap();
        board.flag(Coord::new(0, 1)).unwrap();

        let report = run_auto_solve(&mut board, &mut GameRng::from_seed(0), &SolverConfig::default());
        assert_eq!(report.outcome, Outcome::Continue);
        assert_eq!(report.elapsed_ticks, 1);
        assert_eq!(board.game_state(), GameState::Running);
    }

    #[test]
    fn test_auto_solve_terminates_on_seeded_boards() {
        for mode in [ValidationMode::LocalOnly, ValidationMode::Full] {
            let solver = SolverConfig { validation: mode };
            for seed in 0..30 {
                let config = GameConfig::beginner().with_seed(seed);
                let mut rng = GameRng::from_seed(seed);
                let mut board = Board::new(&config, &mut rng).unwrap();
                let report = run_auto_solve(&mut board, &mut rng, &solver);

                assert_ne!(report.outcome, Outcome::Continue, "seed {seed}");
                assert!(report.elapsed_ticks <= board.cell_count(), "seed {seed}");
                assert_eq!(board.flagged_count(), board.correct_flag_count(), "seed {seed}");
                assert_eq!(report.outcome == Outcome::Loss, board.exploded().is_some());
                assert_counters(&board);
            }
        }
    }

    #[test]
    fn test_probabilities_stay_in_bounds() {
        let mut rng = GameRng::from_seed(11);
        let mut board = Board::new(&GameConfig::beginner(), &mut rng).unwrap();
        let solver = SolverConfig::default();
        while solve_pass(&mut board, &mut rng, &solver) == Some(Outcome::Continue) {
            assert!(board.cells().iter().all(|c| c.probability().map_or(true, |p| p <= 100)));
            assert!(board.cells().iter().filter(|c| c.is_flagged()).all(|c| c.probability() == Some(100)));
        }
        assert!(board.is_over());
    }
}
