//! sigtrader — multi-timeframe crypto signal bot with a simulated portfolio.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], scan and command entry points in
//! [`bot`].

pub mod adapters;
pub mod bot;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod ports;
