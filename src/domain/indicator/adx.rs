//! Directional movement strength, reported as a one-shot DX value.
//!
//! +DM = up_move if up_move > down_move and up_move > 0, else 0
//! -DM = down_move if down_move > up_move and down_move > 0, else 0
//! ±DI = 100 * sum(last n ±DM) / ATR(n)
//! DX  = 100 * |+DI - -DI| / (+DI + -DI)
//!
//! This is a single-pass DX, not Wilder's smoothed ADX. Fewer than n+1 bars,
//! a zero ATR, or no directional movement at all → 0.

use super::atr::{tail_mean, tail_sum, true_ranges};

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> f64 {
    if period == 0
        || highs.len() < period + 1
        || lows.len() < period + 1
        || closes.len() < period + 1
    {
        return 0.0;
    }

    let n = closes.len().min(highs.len()).min(lows.len());
    let mut plus_dm = Vec::with_capacity(n - 1);
    let mut minus_dm = Vec::with_capacity(n - 1);

    for i in 1..n {
        let up_move = highs[i] - highs[i - 1];
        let down_move = lows[i - 1] - lows[i];

        plus_dm.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
    }

    let atr = tail_mean(&true_ranges(highs, lows, closes), period);
    if atr == 0.0 {
        return 0.0;
    }

    let plus_di = 100.0 * tail_sum(&plus_dm, period) / atr;
    let minus_di = 100.0 * tail_sum(&minus_dm, period) / atr;
    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        return 0.0;
    }

    100.0 * (plus_di - minus_di).abs() / di_sum
}
