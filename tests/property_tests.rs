//! Property tests for indicator fallbacks and ledger invariants.
//!
//! 1. Short series never fail and resolve to the neutral fallbacks
//! 2. Position size is non-negative and finite for sane inputs
//! 3. Balance always equals initial capital plus realized PnL
//! 4. Closing a trade twice changes nothing the second time

mod common;

use common::{make_candles, MemoryStore};
use proptest::prelude::*;
use sigtrader::domain::indicator::{self, IndicatorSnapshot};
use sigtrader::domain::ledger::{position_size, PortfolioLedger};
use sigtrader::domain::scorer::SignalScorer;
use sigtrader::domain::signal::Direction;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..100_000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Long),
        Just(Direction::Short),
        Just(Direction::Neutral)
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Open {
        long: bool,
        entry: f64,
    },
    Close {
        id: usize,
        price: f64,
    },
    Check {
        price: f64,
    },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<bool>(), 50.0..150.0_f64).prop_map(|(long, entry)| Op::Open { long, entry }),
        (0..10usize, 50.0..150.0_f64).prop_map(|(id, price)| Op::Close { id, price }),
        (50.0..150.0_f64).prop_map(|price| Op::Check { price }),
    ]
}

fn realized(ledger: &PortfolioLedger) -> f64 {
    ledger.trades().iter().filter_map(|t| t.profit_loss).sum()
}

// ── 1. Fallbacks ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn short_series_use_fallbacks(closes in prop::collection::vec(arb_price(), 0..9)) {
        let snap = IndicatorSnapshot::from_candles(&make_candles(&closes));
        prop_assert_eq!(snap.rsi, indicator::rsi::NEUTRAL);
        prop_assert_eq!(snap.ema_fast, 0.0);
        prop_assert_eq!(snap.ema_slow, 0.0);
        prop_assert_eq!(snap.stoch_k, 50.0);
        prop_assert_eq!(snap.stoch_d, 50.0);
        prop_assert_eq!(snap.atr, 0.0);
        prop_assert_eq!(snap.adx, 0.0);
    }

    #[test]
    fn any_series_scores_in_range(
        closes in prop::collection::vec(arb_price(), 0..200),
        min_score in 0.0..=1.0_f64,
    ) {
        let snap = IndicatorSnapshot::from_candles(&make_candles(&closes));
        let result = SignalScorer::new(min_score).unwrap().score(&snap);
        prop_assert!(result.score.is_finite());
        prop_assert!(result.score >= 0.0 && result.score <= 1.25);
        if result.direction.is_actionable() {
            prop_assert!(result.score >= min_score);
        }
    }
}

// ── 2. Position sizing ───────────────────────────────────────────────

proptest! {
    #[test]
    fn size_is_non_negative_and_finite(
        balance in 1.0..1_000_000.0_f64,
        risk in 0.0001..=1.0_f64,
        direction in arb_direction(),
        entry in arb_price(),
        stop_loss in arb_price(),
    ) {
        let size = position_size(balance, risk, direction, entry, stop_loss);
        prop_assert!(size.is_finite());
        prop_assert!(size >= 0.0);
    }
}

// ── 3/4. Ledger accounting ───────────────────────────────────────────

proptest! {
    #[test]
    fn balance_tracks_realized_pnl(ops in prop::collection::vec(arb_op(), 1..40)) {
        let mut ledger =
            PortfolioLedger::open(Box::new(MemoryStore::default()), 1000.0, 0.01).unwrap();

        for op in ops {
            match op {
                Op::Open { long, entry } => {
                    let direction = if long { Direction::Long } else { Direction::Short };
                    let (sl, tp) = sigtrader::domain::signal::bracket(direction, entry);
                    ledger.open_trade("BTCUSDT", direction, entry, sl, tp).unwrap();
                }
                Op::Close { id, price } => {
                    let _ = ledger.close_trade(id, price);
                }
                Op::Check { price } => {
                    ledger.check_and_close_trades("BTCUSDT", price).unwrap();
                }
            }
            let expected = ledger.initial_capital() + realized(&ledger);
            prop_assert!((ledger.balance() - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn second_close_is_a_no_op(
        entry in 50.0..150.0_f64,
        first in 50.0..150.0_f64,
        second in 50.0..150.0_f64,
    ) {
        let mut ledger =
            PortfolioLedger::open(Box::new(MemoryStore::default()), 1000.0, 0.01).unwrap();
        ledger
            .open_trade("ETHUSDT", Direction::Long, entry, entry * 0.99, entry * 1.02)
            .unwrap();

        prop_assert!(ledger.close_trade(0, first).unwrap().is_some());
        let balance = ledger.balance();
        let trade = ledger.trade(0).cloned();

        prop_assert!(ledger.close_trade(0, second).unwrap().is_none());
        prop_assert_eq!(ledger.balance(), balance);
        prop_assert_eq!(ledger.trade(0).cloned(), trade);
    }
}
