//! RSI (Relative Strength Index) at the latest close.
//!
//! Gains and losses are summed over the last `period` close-to-close changes
//! (a simple average, no Wilder smoothing):
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! Fallbacks: fewer than period+1 closes → 50. avg_loss == 0 → 100, except a
//! completely flat window (no gains either), which is neutral → 50.

pub const DEFAULT_PERIOD: usize = 14;
pub const NEUTRAL: f64 = 50.0;

pub fn calculate_rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return NEUTRAL;
    }

    let mut gain = 0.0;
    let mut loss = 0.0;
    for i in (closes.len() - period)..closes.len() {
        let change = closes[i] - closes[i - 1];
        if change >= 0.0 {
            gain += change;
        } else {
            loss -= change;
        }
    }

    if loss == 0.0 {
        return if gain == 0.0 { NEUTRAL } else { 100.0 };
    }

    let avg_gain = gain / period as f64;
    let avg_loss = loss / period as f64;
    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
}
