//! Weighted-vote signal scoring.
//!
//! Each [`ScoreRule`] inspects an [`IndicatorSnapshot`] and votes its weight
//! to the long side, the short side, or neither. The score is the larger side
//! total; a direction is only reported when that side is strictly ahead and
//! reaches `min_score`.
//!
//! | category    | weight | long when            | short when           |
//! |-------------|--------|----------------------|----------------------|
//! | ema_cross   | 0.25   | ema_fast > ema_slow  | ema_fast < ema_slow  |
//! | macd_cross  | 0.25   | macd > signal        | macd < signal        |
//! | rsi         | 0.15   | rsi < 30             | rsi > 70             |
//! | stoch_cross | 0.15   | %K > %D              | %K < %D              |
//! | bb          | 0.10   | close <= lower band  | close >= upper band  |
//! | adx         | 0.10   | adx >= 25, follows ema_cross             ||
//! | atr         | 0.05   | atr > 0, follows ema_cross               ||
//! | pattern     | 0.15   | never votes                              ||
//! | divergence  | 0.05   | never votes                              ||

use super::error::SigtraderError;
use super::indicator::IndicatorSnapshot;
use super::signal::Direction;

pub const DEFAULT_MIN_SCORE: f64 = 0.7;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const ADX_TRENDING: f64 = 25.0;

/// A category's vote for one snapshot: `Long`, `Short`, or `None` to abstain.
pub type Vote = fn(&IndicatorSnapshot) -> Option<Direction>;

#[derive(Debug, Clone, Copy)]
pub struct ScoreRule {
    pub category: &'static str,
    pub weight: f64,
    pub vote: Vote,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub direction: Direction,
    pub score: f64,
    pub long_total: f64,
    pub short_total: f64,
}

fn compare(a: f64, b: f64) -> Option<Direction> {
    if a > b {
        Some(Direction::Long)
    } else if a < b {
        Some(Direction::Short)
    } else {
        None
    }
}

fn ema_cross(s: &IndicatorSnapshot) -> Option<Direction> {
    compare(s.ema_fast, s.ema_slow)
}

fn macd_cross(s: &IndicatorSnapshot) -> Option<Direction> {
    compare(s.macd, s.macd_signal)
}

fn rsi_extreme(s: &IndicatorSnapshot) -> Option<Direction> {
    if s.rsi < RSI_OVERSOLD {
        Some(Direction::Long)
    } else if s.rsi > RSI_OVERBOUGHT {
        Some(Direction::Short)
    } else {
        None
    }
}

fn stoch_cross(s: &IndicatorSnapshot) -> Option<Direction> {
    compare(s.stoch_k, s.stoch_d)
}

fn band_touch(s: &IndicatorSnapshot) -> Option<Direction> {
    if s.close <= s.bb_lower {
        Some(Direction::Long)
    } else if s.close >= s.bb_upper {
        Some(Direction::Short)
    } else {
        None
    }
}

fn adx_trend_filter(s: &IndicatorSnapshot) -> Option<Direction> {
    if s.adx >= ADX_TRENDING {
        ema_cross(s)
    } else {
        None
    }
}

fn atr_volatility_filter(s: &IndicatorSnapshot) -> Option<Direction> {
    if s.atr > 0.0 { ema_cross(s) } else { None }
}

fn abstain(_: &IndicatorSnapshot) -> Option<Direction> {
    None
}

pub fn default_rules() -> Vec<ScoreRule> {
    vec![
        ScoreRule {
            category: "ema_cross",
            weight: 0.25,
            vote: ema_cross,
        },
        ScoreRule {
            category: "macd_cross",
            weight: 0.25,
            vote: macd_cross,
        },
        ScoreRule {
            category: "rsi",
            weight: 0.15,
            vote: rsi_extreme,
        },
        ScoreRule {
            category: "stoch_cross",
            weight: 0.15,
            vote: stoch_cross,
        },
        ScoreRule {
            category: "bb",
            weight: 0.10,
            vote: band_touch,
        },
        ScoreRule {
            category: "adx",
            weight: 0.10,
            vote: adx_trend_filter,
        },
        ScoreRule {
            category: "atr",
            weight: 0.05,
            vote: atr_volatility_filter,
        },
        // Reserved for candlestick patterns and RSI/price divergence.
        ScoreRule {
            category: "pattern",
            weight: 0.15,
            vote: abstain,
        },
        ScoreRule {
            category: "divergence",
            weight: 0.05,
            vote: abstain,
        },
    ]
}

fn validate_min_score(min_score: f64) -> Result<f64, SigtraderError> {
    if !(0.0..=1.0).contains(&min_score) {
        return Err(SigtraderError::invalid_argument(
            "min_score",
            format!("{} is outside [0, 1] (e.g. 0.7 = 70%)", min_score),
        ));
    }
    Ok(min_score)
}

#[derive(Debug, Clone)]
pub struct SignalScorer {
    rules: Vec<ScoreRule>,
    min_score: f64,
}

impl Default for SignalScorer {
    fn default() -> Self {
        SignalScorer {
            rules: default_rules(),
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl SignalScorer {
    pub fn new(min_score: f64) -> Result<Self, SigtraderError> {
        Self::with_rules(default_rules(), min_score)
    }

    pub fn with_rules(rules: Vec<ScoreRule>, min_score: f64) -> Result<Self, SigtraderError> {
        Ok(SignalScorer {
            rules,
            min_score: validate_min_score(min_score)?,
        })
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// Leaves the threshold unchanged when `min_score` is outside [0, 1].
    pub fn set_min_score(&mut self, min_score: f64) -> Result<(), SigtraderError> {
        self.min_score = validate_min_score(min_score)?;
        Ok(())
    }

    pub fn rules(&self) -> &[ScoreRule] {
        &self.rules
    }

    pub fn score(&self, snapshot: &IndicatorSnapshot) -> ScoreResult {
        let mut long_total = 0.0;
        let mut short_total = 0.0;

        for rule in &self.rules {
            match (rule.vote)(snapshot) {
                Some(Direction::Long) => long_total += rule.weight,
                Some(Direction::Short) => short_total += rule.weight,
                Some(Direction::Neutral) | None => {}
            }
        }

        let score = f64::max(long_total, short_total);
        let direction = if long_total > short_total && score >= self.min_score {
            Direction::Long
        } else if short_total > long_total && score >= self.min_score {
            Direction::Short
        } else {
            Direction::Neutral
        };

        ScoreResult {
            direction,
            score,
            long_total,
            short_total,
        }
    }
}
