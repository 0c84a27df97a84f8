//! Trade log persistence port trait.

use crate::domain::error::SigtraderError;
use crate::domain::trade::Trade;

/// Whole-list store: every save replaces the previous contents.
pub trait TradeStorePort: Send + Sync {
    /// An absent log is an empty history, not an error.
    fn load(&self) -> Result<Vec<Trade>, SigtraderError>;

    fn save(&self, trades: &[Trade]) -> Result<(), SigtraderError>;
}
