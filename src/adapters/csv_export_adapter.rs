//! CSV export of the trade history.

use crate::domain::error::SigtraderError;
use crate::domain::trade::Trade;
use crate::ports::export_port::TradeExportPort;
use chrono::{DateTime, Utc};
use std::path::Path;

pub const HEADER: [&str; 10] = [
    "Symbol",
    "Direction",
    "Entry",
    "StopLoss",
    "TakeProfit",
    "Size",
    "OpenTime",
    "CloseTime",
    "ClosePrice",
    "ProfitLoss",
];

/// Sortable UTC, e.g. `2024-01-15 09:30:00Z`.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%SZ";

pub struct CsvExportAdapter;

fn amount(value: f64) -> String {
    format!("{:.2}", value)
}

fn time(value: DateTime<Utc>) -> String {
    value.format(TIME_FORMAT).to_string()
}

fn row(trade: &Trade) -> [String; 10] {
    [
        trade.symbol.clone(),
        trade.direction.to_string(),
        amount(trade.entry),
        amount(trade.stop_loss),
        amount(trade.take_profit),
        amount(trade.size),
        time(trade.open_time),
        trade.close_time.map(time).unwrap_or_default(),
        trade.close_price.map(amount).unwrap_or_default(),
        trade.profit_loss.map(amount).unwrap_or_default(),
    ]
}

impl TradeExportPort for CsvExportAdapter {
    fn export(&self, trades: &[Trade], path: &Path) -> Result<(), SigtraderError> {
        let err = |reason: String| SigtraderError::Export {
            path: path.display().to_string(),
            reason,
        };

        let mut writer = csv::Writer::from_path(path).map_err(|e| err(e.to_string()))?;
        writer.write_record(HEADER).map_err(|e| err(e.to_string()))?;
        for trade in trades {
            writer
                .write_record(row(trade))
                .map_err(|e| err(e.to_string()))?;
        }
        writer.flush().map_err(|e| err(e.to_string()))?;
        Ok(())
    }
}
