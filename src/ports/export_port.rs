//! Trade export port trait.

use crate::domain::error::SigtraderError;
use crate::domain::trade::Trade;
use std::path::Path;

pub trait TradeExportPort: Send + Sync {
    fn export(&self, trades: &[Trade], path: &Path) -> Result<(), SigtraderError>;
}
