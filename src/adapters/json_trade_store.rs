//! Trade log persisted as a pretty-printed JSON array.
//!
//! Saves write a sibling temp file and rename it over the log, so a crash
//! mid-write leaves the previous log intact.

use crate::domain::error::SigtraderError;
use crate::domain::trade::Trade;
use crate::ports::trade_store_port::TradeStorePort;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct JsonTradeStore {
    path: PathBuf,
}

impl JsonTradeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn persistence_error(&self, reason: impl std::fmt::Display) -> SigtraderError {
        SigtraderError::Persistence {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl TradeStorePort for JsonTradeStore {
    fn load(&self) -> Result<Vec<Trade>, SigtraderError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no trade log yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.persistence_error(e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| self.persistence_error(e))
    }

    fn save(&self, trades: &[Trade]) -> Result<(), SigtraderError> {
        let json = serde_json::to_string_pretty(trades).map_err(|e| self.persistence_error(e))?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| self.persistence_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.persistence_error(e))?;
        debug!(path = %self.path.display(), trades = trades.len(), "trade log written");
        Ok(())
    }
}
