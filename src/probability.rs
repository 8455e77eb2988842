//! Exact mine probabilities from enumerated arrangements.
//!
//! Every arrangement is weighted by the number of ways the unbordered region
//! can hold the mines it leaves over, `C(unbordered, remaining)`. Those
//! coefficients overflow every machine integer on an expert board
//! (`C(381, 99)` is above 10^90), so all weights are `BigUint`.

use log::{debug, warn};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::board::Board;
use crate::enumerate::Arrangement;

/// Binomial coefficient `C(n, k)`, exact. Zero when `k > n`.
pub fn binomial(n: usize, k: usize) -> BigUint {
    if k > n {
        return BigUint::zero();
    }
    let k = k.min(n - k);
    let mut result = BigUint::one();
    for i in 0..k {
        result *= BigUint::from(n - i);
        result /= BigUint::from(i + 1);
    }
    result
}

/// `numerator / denominator * 100`, rounded half to even and capped at 100.
///
/// `None` when the denominator is zero.
pub fn percent(numerator: &BigUint, denominator: &BigUint) -> Option<u8> {
    if denominator.is_zero() {
        return None;
    }
    let scaled = numerator * 100u32;
    let mut quotient = &scaled / denominator;
    let twice_rest = (&scaled % denominator) * 2u32;
    if twice_rest > *denominator || (twice_rest == *denominator && quotient.bit(0)) {
        quotient += 1u32;
    }
    Some(quotient.to_u8().map_or(100, |p| p.min(100)))
}

/// Per-pass side table of combinatorial weights.
///
/// Built fresh from one batch of arrangements and dropped after the
/// probabilities are written back, so nothing leaks between passes.
#[derive(Debug, Clone)]
pub struct SolverAssignment {
    /// Accumulated weight per border position.
    border_weights: Vec<BigUint>,
    /// Sum of `weight * remaining` over feasible arrangements.
    unbordered_numerator: BigUint,
    unbordered_count: usize,
    total_weight: BigUint,
    feasible: usize,
}

impl SolverAssignment {
    /// Weigh every arrangement against the mines left for the unbordered
    /// region. Arrangements leaving a negative count, or more mines than
    /// unbordered cells, contribute nothing.
    pub fn aggregate(
        arrangements: &[Arrangement],
        border_len: usize,
        unbordered_count: usize,
        total_mines: usize,
        flagged: usize,
    ) -> Self {
        let mut table = Self {
            border_weights: vec![BigUint::zero(); border_len],
            unbordered_numerator: BigUint::zero(),
            unbordered_count,
            total_weight: BigUint::zero(),
            feasible: 0,
        };

        for arrangement in arrangements {
            let remaining = match total_mines.checked_sub(arrangement.mine_count() + flagged) {
                Some(r) if r <= unbordered_count => r,
                _ => continue,
            };
            let weight = binomial(unbordered_count, remaining);

            for (pos, acc) in table.border_weights.iter_mut().enumerate() {
                if arrangement.is_mine(pos) {
                    *acc += &weight;
                }
            }
            table.unbordered_numerator += &weight * BigUint::from(remaining);
            table.total_weight += weight;
            table.feasible += 1;
        }

        if table.is_infeasible() && !arrangements.is_empty() {
            warn!("None of {} arrangements fits the remaining mine count", arrangements.len());
        }
        table
    }

    pub fn total_weight(&self) -> &BigUint {
        &self.total_weight
    }

    pub fn border_weight(&self, pos: usize) -> &BigUint {
        &self.border_weights[pos]
    }

    /// No arrangement survived the remaining-mine bounds.
    pub fn is_infeasible(&self) -> bool {
        self.total_weight.is_zero()
    }

    pub fn feasible_arrangements(&self) -> usize {
        self.feasible
    }

    pub fn border_probability(&self, pos: usize) -> Option<u8> {
        percent(&self.border_weights[pos], &self.total_weight)
    }

    /// Uniform probability shared by every unbordered Default cell.
    pub fn unbordered_probability(&self) -> Option<u8> {
        if self.unbordered_count == 0 {
            return None;
        }
        percent(
            &self.unbordered_numerator,
            &(&self.total_weight * BigUint::from(self.unbordered_count)),
        )
    }
}

/// Write probabilities into cells that have none yet this pass.
///
/// `border` and `unbordered` hold flat board indices; `border` must be in
/// the order the arrangements were enumerated in. Returns how many cells
/// received a value.
pub fn apply_probabilities(
    board: &mut Board,
    border: &[usize],
    unbordered: &[usize],
    table: &SolverAssignment,
) -> usize {
    let mut written = 0;

    for (pos, &idx) in border.iter().enumerate() {
        if board.cells()[idx].probability().is_none() {
            if let Some(p) = table.border_probability(pos) {
                board.set_probability(idx, Some(p));
                written += 1;
            }
        }
    }

    if let Some(p) = table.unbordered_probability() {
        for &idx in unbordered {
            if board.cells()[idx].probability().is_none() {
                board.set_probability(idx, Some(p));
                written += 1;
            }
        }
    }

    debug!(
        "{} feasible arrangements, {} unbordered cells, {} probabilities written",
        table.feasible_arrangements(),
        unbordered.len(),
        written
    );
    written
}
