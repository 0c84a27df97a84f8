//! Bollinger Bands over the full supplied window.
//!
//! - Middle: mean of every close passed in (no rolling period)
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the sample standard deviation (divides by N-1).

use super::stddev::{mean, sample_stddev};

pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

pub fn calculate_bollinger(closes: &[f64], multiplier: f64) -> BollingerBands {
    let middle = mean(closes);
    let stddev = sample_stddev(closes);

    BollingerBands {
        upper: middle + multiplier * stddev,
        middle,
        lower: middle - multiplier * stddev,
    }
}
