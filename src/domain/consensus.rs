//! Multi-timeframe majority vote.
//!
//! Two or more LONG timeframes → LONG, else two or more SHORT → SHORT, else
//! NEUTRAL. The representative signal used for sizing is the first timeframe,
//! in declaration order, whose own direction matches the overall decision.

use super::signal::{Direction, TimeframeResult, TradeSignal};

pub const MIN_AGREEING_TIMEFRAMES: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Consensus<'a> {
    pub direction: Direction,
    pub long_votes: usize,
    pub short_votes: usize,
    pub representative: Option<&'a TimeframeResult>,
}

impl Consensus<'_> {
    pub fn signal(&self) -> Option<&TradeSignal> {
        self.representative.map(|r| &r.signal)
    }
}

pub fn aggregate(results: &[TimeframeResult]) -> Consensus<'_> {
    let long_votes = results
        .iter()
        .filter(|r| r.signal.direction == Direction::Long)
        .count();
    let short_votes = results
        .iter()
        .filter(|r| r.signal.direction == Direction::Short)
        .count();

    let direction = if long_votes >= MIN_AGREEING_TIMEFRAMES {
        Direction::Long
    } else if short_votes >= MIN_AGREEING_TIMEFRAMES {
        Direction::Short
    } else {
        Direction::Neutral
    };

    let representative = if direction.is_actionable() {
        results.iter().find(|r| r.signal.direction == direction)
    } else {
        None
    };

    Consensus {
        direction,
        long_votes,
        short_votes,
        representative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorSnapshot;

    fn result(timeframe: &str, direction: Direction, close: f64) -> TimeframeResult {
        let snap = IndicatorSnapshot {
            close,
            ..IndicatorSnapshot::default()
        };
        TimeframeResult {
            timeframe: timeframe.to_string(),
            signal: TradeSignal::new("BTCUSDT", direction, 0.8, &snap),
        }
    }

    #[test]
    fn two_longs_win_regardless_of_third() {
        for third in [Direction::Long, Direction::Short, Direction::Neutral] {
            let results = vec![
                result("5m", Direction::Long, 100.0),
                result("15m", third, 101.0),
                result("1h", Direction::Long, 102.0),
            ];
            assert_eq!(aggregate(&results).direction, Direction::Long);
        }
    }

    #[test]
    fn two_shorts_win() {
        let results = vec![
            result("5m", Direction::Neutral, 100.0),
            result("15m", Direction::Short, 101.0),
            result("1h", Direction::Short, 102.0),
        ];
        let consensus = aggregate(&results);
        assert_eq!(consensus.direction, Direction::Short);
        assert_eq!(consensus.short_votes, 2);
        assert_eq!(consensus.representative.unwrap().timeframe, "15m");
    }

    #[test]
    fn split_vote_is_neutral() {
        let results = vec![
            result("5m", Direction::Long, 100.0),
            result("15m", Direction::Short, 101.0),
            result("1h", Direction::Neutral, 102.0),
        ];
        let consensus = aggregate(&results);
        assert_eq!(consensus.direction, Direction::Neutral);
        assert!(consensus.representative.is_none());
        assert!(consensus.signal().is_none());
    }

    #[test]
    fn all_neutral_is_neutral() {
        let results = vec![
            result("5m", Direction::Neutral, 100.0),
            result("15m", Direction::Neutral, 101.0),
            result("1h", Direction::Neutral, 102.0),
        ];
        assert_eq!(aggregate(&results).direction, Direction::Neutral);
    }

    #[test]
    fn representative_is_first_matching_in_declaration_order() {
        let results = vec![
            result("5m", Direction::Short, 100.0),
            result("15m", Direction::Long, 101.0),
            result("1h", Direction::Long, 102.0),
        ];
        let consensus = aggregate(&results);
        let signal = consensus.signal().unwrap();
        assert_eq!(consensus.representative.unwrap().timeframe, "15m");
        assert_eq!(signal.entry, 101.0);
        assert_eq!(signal.direction, Direction::Long);
    }

    #[test]
    fn empty_results_are_neutral() {
        let consensus = aggregate(&[]);
        assert_eq!(consensus.direction, Direction::Neutral);
        assert_eq!(consensus.long_votes, 0);
        assert_eq!(consensus.short_votes, 0);
    }
}
