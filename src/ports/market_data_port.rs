//! Market data port trait.

use crate::domain::candle::Candle;
use crate::domain::error::SigtraderError;
use crate::domain::interval::Interval;

/// Source of candles and spot prices. Failures surface as
/// [`SigtraderError::Provider`] and are recoverable per call.
pub trait MarketDataPort: Send + Sync {
    /// The `limit` most recent candles, ordered ascending by open time.
    fn get_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, SigtraderError>;

    fn get_price(&self, symbol: &str) -> Result<f64, SigtraderError>;
}
