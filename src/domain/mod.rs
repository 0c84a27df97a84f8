//! Core domain types and logic: indicators, scoring, consensus, and the
//! simulated portfolio ledger.

pub mod candle;
pub mod config;
pub mod config_validation;
pub mod consensus;
pub mod error;
pub mod indicator;
pub mod interval;
pub mod ledger;
pub mod pipeline;
pub mod scorer;
pub mod signal;
pub mod trade;
