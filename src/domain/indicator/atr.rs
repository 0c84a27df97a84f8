//! Average True Range.
//!
//! TR[i] = max(H[i] - L[i], |H[i] - C[i-1]|, |L[i] - C[i-1]|) for i >= 1.
//! ATR is the simple mean of the last `period` TR values (no Wilder smoothing).
//! Fewer than `period` bars → 0.

pub const DEFAULT_PERIOD: usize = 14;

/// True range of every bar that has a predecessor.
pub fn true_ranges(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = closes.len().min(highs.len()).min(lows.len());
    (1..n)
        .map(|i| {
            let prev_close = closes[i - 1];
            let hl = highs[i] - lows[i];
            let hc = (highs[i] - prev_close).abs();
            let lc = (lows[i] - prev_close).abs();
            hl.max(hc).max(lc)
        })
        .collect()
}

/// Mean of the last `count` values, or of all of them when there are fewer.
pub(crate) fn tail_mean(values: &[f64], count: usize) -> f64 {
    let count = count.min(values.len());
    if count == 0 {
        return 0.0;
    }
    values[values.len() - count..].iter().sum::<f64>() / count as f64
}

pub(crate) fn tail_sum(values: &[f64], count: usize) -> f64 {
    let count = count.min(values.len());
    values[values.len() - count..].iter().sum()
}

pub fn calculate_atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> f64 {
    if period == 0 || highs.len() < period || lows.len() < period || closes.len() < period {
        return 0.0;
    }
    tail_mean(&true_ranges(highs, lows, closes), period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn true_range_gap_up() {
        // high-low=20, |110-70|=40, |90-70|=20 → 40
        let trs = true_ranges(&[75.0, 110.0], &[65.0, 90.0], &[70.0, 105.0]);
        assert_eq!(trs, vec![40.0]);
    }

    #[test]
    fn true_range_gap_down() {
        // high-low=20, |110-130|=20, |90-130|=40 → 40
        let trs = true_ranges(&[135.0, 110.0], &[125.0, 90.0], &[130.0, 105.0]);
        assert_eq!(trs, vec![40.0]);
    }

    #[test]
    fn atr_insufficient_data() {
        let v = vec![100.0; 13];
        assert_eq!(calculate_atr(&v, &v, &v, 14), 0.0);
    }

    #[test]
    fn atr_constant_range() {
        let highs = vec![110.0; 30];
        let lows = vec![90.0; 30];
        let closes = vec![100.0; 30];
        assert_abs_diff_eq!(calculate_atr(&highs, &lows, &closes, 14), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn atr_uses_last_period_only() {
        // Early wide bars fall outside the 3-bar window.
        let highs = [200.0, 200.0, 102.0, 102.0, 102.0, 102.0];
        let lows = [0.0, 0.0, 100.0, 100.0, 100.0, 100.0];
        let closes = [100.0, 100.0, 101.0, 101.0, 101.0, 101.0];
        assert_abs_diff_eq!(calculate_atr(&highs, &lows, &closes, 3), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn atr_flat_series_is_zero() {
        let v = vec![50.0; 150];
        assert_eq!(calculate_atr(&v, &v, &v, 14), 0.0);
    }

    #[test]
    fn atr_single_bar_period_one() {
        assert_eq!(calculate_atr(&[10.0], &[5.0], &[7.0], 1), 0.0);
    }
}
