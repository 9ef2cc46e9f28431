//! Points for closed loops.
//!
//! A loop of `n` links is worth the sum of an arithmetic series of `n` terms
//! starting at `lowest_value` and growing by `increment`. With the defaults
//! this is the `n`-th triangular number. Loops closed by the same placement
//! form a combo: their points are summed and multiplied by the number of
//! loops.

use crate::constants::{CLEAR_BOARD_BONUS, INCREMENT, LOWEST_POINT_VALUE};
use crate::loops::Loop;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScoreParams {
    pub lowest_value: u64,
    pub increment: u64,
    pub clear_board_bonus: u64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            lowest_value: LOWEST_POINT_VALUE,
            increment: INCREMENT,
            clear_board_bonus: CLEAR_BOARD_BONUS,
        }
    }
}

impl ScoreParams {
    /// `n / 2 * (2 * lowest + (n - 1) * increment)`, computed without
    /// rounding: `n * (n - 1)` is always even.
    pub fn loop_points(&self, n: usize) -> u64 {
        if n == 0 {
            return 0;
        }
        let n = n as u64;
        let series = (n * (n - 1) / 2).saturating_mul(self.increment);
        n.saturating_mul(self.lowest_value).saturating_add(series)
    }

    /// Points for a batch of loops closed by one placement.
    pub fn batch_points(&self, loops: &[Loop]) -> u64 {
        let sum = loops
            .iter()
            .fold(0u64, |acc, l| acc.saturating_add(self.loop_points(l.len())));
        sum.saturating_mul(loops.len() as u64)
    }
}

/// Default-parameter loop score.
pub fn loop_points(n: usize) -> u64 {
    ScoreParams::default().loop_points(n)
}

/// Default-parameter batch score.
pub fn batch_points(loops: &[Loop]) -> u64 {
    ScoreParams::default().batch_points(loops)
}

/// Format a score with thousands separators, e.g. `1,234,567`.
pub fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
