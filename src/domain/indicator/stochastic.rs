//! Stochastic oscillator %K / %D at the latest close.
//!
//! raw %K[i] = 100 * (C[i] - lowest_low) / (highest_high - lowest_low)
//! over the trailing `period` bars, for every i from period-1 onward.
//!
//! Reported %K is the mean of the last `smooth_k` raw values; %D is the mean
//! of the last `smooth_d` values of the same raw series (not of smoothed %K).
//! A window with zero range reads 50. Fewer than `period` closes → (50, 50).

pub const DEFAULT_PERIOD: usize = 14;
pub const DEFAULT_SMOOTH_K: usize = 3;
pub const DEFAULT_SMOOTH_D: usize = 3;
pub const NEUTRAL: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stochastic {
    pub k: f64,
    pub d: f64,
}

impl Stochastic {
    const FALLBACK: Stochastic = Stochastic {
        k: NEUTRAL,
        d: NEUTRAL,
    };
}

pub fn calculate_stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
    smooth_k: usize,
    smooth_d: usize,
) -> Stochastic {
    let n = closes.len().min(highs.len()).min(lows.len());
    if period == 0 || n < period {
        return Stochastic::FALLBACK;
    }

    let raw_k: Vec<f64> = (period - 1..n)
        .map(|i| {
            let start = i + 1 - period;
            let highest = highs[start..=i]
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            let lowest = lows[start..=i].iter().copied().fold(f64::INFINITY, f64::min);
            let range = highest - lowest;
            if range == 0.0 {
                NEUTRAL
            } else {
                100.0 * (closes[i] - lowest) / range
            }
        })
        .collect();

    Stochastic {
        k: trailing_mean(&raw_k, smooth_k),
        d: trailing_mean(&raw_k, smooth_d),
    }
}

fn trailing_mean(values: &[f64], count: usize) -> f64 {
    let count = count.max(1).min(values.len());
    let tail = &values[values.len() - count..];
    tail.iter().sum::<f64>() / count as f64
}
