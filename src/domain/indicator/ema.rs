//! Exponential Moving Average and the MACD proxy built on it.
//!
//! k = 2/(n+1), seed with the SMA of the first n closes, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k) for every later close.
//! Fewer than n closes → 0.
//!
//! MACD = EMA(12) - EMA(26). The signal line is EMA(9) of the *closes*, not an
//! EMA of the MACD line; downstream scoring depends on this definition.

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

pub fn calculate_ema(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period {
        return 0.0;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = closes[..period].iter().sum::<f64>() / period as f64;

    // Same recurrence as C*k + EMA*(1-k), but exact on flat input.
    for &close in &closes[period..] {
        ema += k * (close - ema);
    }

    ema
}

/// Returns `(macd, signal)`.
pub fn calculate_macd(closes: &[f64]) -> (f64, f64) {
    let macd = calculate_ema(closes, MACD_FAST) - calculate_ema(closes, MACD_SLOW);
    let signal = calculate_ema(closes, MACD_SIGNAL);
    (macd, signal)
}
