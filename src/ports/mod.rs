//! Port traits at the I/O seams: market data, configuration, trade log
//! persistence, export, and message delivery.

pub mod config_port;
pub mod export_port;
pub mod market_data_port;
pub mod notifier_port;
pub mod trade_store_port;
