//! Technical indicators evaluated at the latest candle of a series.
//!
//! Every calculation is a pure function over ordered price slices and returns
//! a documented neutral value when the series is too short, so the signal
//! pipeline never fails on sparse data:
//! - RSI → 50
//! - EMA → 0
//! - Stochastic → (50, 50)
//! - ATR / ADX → 0
//!
//! [`IndicatorSnapshot`] bundles the full set for one timeframe.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod rsi;
pub mod stddev;
pub mod stochastic;

pub use adx::calculate_adx;
pub use atr::calculate_atr;
pub use bollinger::{calculate_bollinger, BollingerBands};
pub use ema::{calculate_ema, calculate_macd};
pub use rsi::calculate_rsi;
pub use stochastic::{calculate_stochastic, Stochastic};

use crate::domain::candle::{Candle, PriceSeries};

pub const EMA_FAST: usize = 9;
pub const EMA_SLOW: usize = 21;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub close: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub adx: f64,
    pub atr: f64,
}

impl IndicatorSnapshot {
    pub fn from_candles(candles: &[Candle]) -> Self {
        Self::from_series(&PriceSeries::from_candles(candles))
    }

    pub fn from_series(series: &PriceSeries) -> Self {
        let PriceSeries {
            highs,
            lows,
            closes,
        } = series;

        let (macd, macd_signal) = calculate_macd(closes);
        let bands = calculate_bollinger(closes, bollinger::DEFAULT_MULTIPLIER);
        let stoch = calculate_stochastic(
            highs,
            lows,
            closes,
            stochastic::DEFAULT_PERIOD,
            stochastic::DEFAULT_SMOOTH_K,
            stochastic::DEFAULT_SMOOTH_D,
        );

        IndicatorSnapshot {
            rsi: calculate_rsi(closes, rsi::DEFAULT_PERIOD),
            ema_fast: calculate_ema(closes, EMA_FAST),
            ema_slow: calculate_ema(closes, EMA_SLOW),
            macd,
            macd_signal,
            bb_upper: bands.upper,
            bb_lower: bands.lower,
            close: closes.last().copied().unwrap_or(0.0),
            stoch_k: stoch.k,
            stoch_d: stoch.d,
            adx: calculate_adx(highs, lows, closes, adx::DEFAULT_PERIOD),
            atr: calculate_atr(highs, lows, closes, atr::DEFAULT_PERIOD),
        }
    }
}
