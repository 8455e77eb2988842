//! Arrangement enumeration over the border.
//!
//! Depth-first backtracking in border order (row-major). Each border cell
//! tries "mine" then "safe", and each branch is gated by a local check
//! against the numbered neighbors of that cell. Search state lives on an
//! explicit stack, and every stack entry owns its own copy of the partial
//! assignment so sibling branches never share state.

use std::collections::HashMap;

use log::debug;

use crate::board::Board;
use crate::config::ValidationMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Undecided,
    Mine,
    Safe,
}

/// One complete mine/safe assignment over the border, in border order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    decisions: Vec<Decision>,
}

impl Arrangement {
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    #[inline(always)]
    pub fn is_mine(&self, pos: usize) -> bool {
        self.decisions[pos] == Decision::Mine
    }

    pub fn mine_count(&self) -> usize {
        self.decisions.iter().filter(|&&d| d == Decision::Mine).count()
    }
}

impl From<Vec<Decision>> for Arrangement {
    fn from(decisions: Vec<Decision>) -> Self {
        Self { decisions }
    }
}

/// The numeric constraint of one exposed cell.
#[derive(Debug)]
struct Constraint {
    quota: usize,
    /// Neighbors already counted as mines on the board (flagged or certain).
    fixed_mines: usize,
    flagged: usize,
    /// Default plus Flagged neighbors.
    candidates: usize,
    /// Border positions of the Default neighbors.
    members: Vec<usize>,
}

impl Constraint {
    fn count(&self, assignment: &[Decision], decision: Decision) -> usize {
        self.members.iter().filter(|&&m| assignment[m] == decision).count()
    }

    /// Quota already filled: one more mine would overshoot.
    fn is_saturated(&self, assignment: &[Decision]) -> bool {
        self.quota <= self.fixed_mines + self.count(assignment, Decision::Mine)
    }

    /// One more safe cell would leave too few places for the quota.
    fn is_starved(&self, assignment: &[Decision]) -> bool {
        self.quota >= self.candidates - self.count(assignment, Decision::Safe)
    }

    fn is_satisfied(&self, assignment: &[Decision]) -> bool {
        self.quota
            .checked_sub(self.flagged)
            .is_some_and(|needed| needed == self.count(assignment, Decision::Mine))
    }
}

/// Constraints and their lookup by border position, built once per pass.
struct ConstraintSet {
    constraints: Vec<Constraint>,
    by_position: Vec<Vec<usize>>,
}

impl ConstraintSet {
    fn build(board: &Board, exposed: &[usize], border: &[usize]) -> Self {
        let position: HashMap<usize, usize> = border.iter().enumerate().map(|(pos, &idx)| (idx, pos)).collect();
        let mut by_position = vec![Vec::new(); border.len()];
        let mut constraints = Vec::with_capacity(exposed.len());

        for &idx in exposed {
            let members: Vec<usize> = board
                .neighbor_indices(idx)
                .iter()
                .filter_map(|n| position.get(n).copied())
                .collect();
            for &pos in &members {
                by_position[pos].push(constraints.len());
            }
            constraints.push(Constraint {
                quota: board.cells()[idx].adjacent_mines() as usize,
                fixed_mines: board.count_neighbors(idx, |c| c.counts_as_mine()),
                flagged: board.count_neighbors(idx, |c| c.is_flagged()),
                candidates: board.count_neighbors(idx, |c| c.is_default() || c.is_flagged()),
                members,
            });
        }

        Self { constraints, by_position }
    }

    fn around(&self, pos: usize) -> impl Iterator<Item = &Constraint> {
        self.by_position[pos].iter().map(|&c| &self.constraints[c])
    }

    fn can_be_mine(&self, pos: usize, assignment: &[Decision]) -> bool {
        self.around(pos).all(|c| !c.is_saturated(assignment))
    }

    fn can_be_safe(&self, pos: usize, assignment: &[Decision]) -> bool {
        self.around(pos).all(|c| !c.is_starved(assignment))
    }

    fn validate(&self, assignment: &[Decision], mode: ValidationMode) -> bool {
        match mode {
            ValidationMode::LocalOnly => true,
            ValidationMode::Full => self.constraints.iter().all(|c| c.is_satisfied(assignment)),
        }
    }
}

/// Enumerate every locally consistent arrangement of `border`, using the
/// numbers of `exposed` as constraints.
///
/// Both slices hold flat board indices. Arrangement positions follow the
/// order of `border`.
pub fn enumerate_arrangements(
    board: &Board,
    exposed: &[usize],
    border: &[usize],
    mode: ValidationMode,
) -> Vec<Arrangement> {
    if border.is_empty() {
        return vec![];
    }

    let set = ConstraintSet::build(board, exposed, border);
    let last = border.len() - 1;
    let mut arrangements = Vec::new();
    let mut stack: Vec<(usize, Vec<Decision>)> = vec![(0, vec![Decision::Undecided; border.len()])];
    let mut visited: u64 = 0;

    while let Some((pos, assignment)) = stack.pop() {
        visited += 1;
        let mine_ok = set.can_be_mine(pos, &assignment);
        let safe_ok = set.can_be_safe(pos, &assignment);

        let mut branches = Vec::with_capacity(2);
        if mine_ok && safe_ok {
            let mut mine = assignment.clone();
            mine[pos] = Decision::Mine;
            let mut safe = assignment;
            safe[pos] = Decision::Safe;
            branches.push(mine);
            branches.push(safe);
        } else if mine_ok || safe_ok {
            let mut only = assignment;
            only[pos] = if mine_ok { Decision::Mine } else { Decision::Safe };
            branches.push(only);
        }

        if pos == last {
            for decisions in branches {
                if set.validate(&decisions, mode) {
                    arrangements.push(Arrangement { decisions });
                }
            }
        } else {
            // Reversed so the mine branch is explored first.
            for decisions in branches.into_iter().rev() {
                stack.push((pos + 1, decisions));
            }
        }
    }

    debug!(
        "Enumerated {} arrangements over {} border cells ({} search nodes)",
        arrangements.len(),
        border.len(),
        visited
    );
    arrangements
}
