//! Concrete adapter implementations for ports.

#[cfg(feature = "binance")]
pub mod binance_adapter;
pub mod console_notifier;
pub mod csv_adapter;
pub mod csv_export_adapter;
pub mod file_config_adapter;
pub mod json_trade_store;
