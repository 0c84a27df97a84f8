//! Human-readable replies and notices. Amounts use two decimals.

use super::command::CommandError;
use crate::domain::consensus::Consensus;
use crate::domain::ledger::PortfolioInfo;
use crate::domain::signal::{TimeframeResult, TradeSignal};
use crate::domain::trade::Trade;
use std::fmt::Write;

pub const WELCOME: &str = "Welcome to sigtrader. Scheduled scan notices will be sent here.";
pub const NOTHING_TO_EXPORT: &str = "No trades to export.";
pub const EXPORT_CAPTION: &str = "Trade export";

pub fn help() -> String {
    [
        "Available commands:",
        "",
        "/start - bind this chat for scheduled scan notices",
        "/price SYMBOL - current price (e.g. /price BTCUSDT)",
        "/analyze SYMBOL - multi-timeframe analysis",
        "/info - portfolio status",
        "/history [N] - last closed trades",
        "/open - open trades",
        "/reset - reset the portfolio",
        "/set_risk X - risk per trade (e.g. 0.01 = 1%)",
        "/set_min_score X - minimum signal score (e.g. 0.7 = 70%)",
        "/export - export all trades as CSV",
        "/help - this overview",
    ]
    .join("\n")
}

pub fn price(symbol: &str, price: f64) -> String {
    format!("{} = {:.2} USDT", symbol, price)
}

pub fn analysis(symbol: &str, results: &[TimeframeResult], consensus: &Consensus<'_>) -> String {
    let mut msg = format!("Analysis {}\n", symbol);
    for result in results {
        let s = &result.signal;
        let _ = write!(
            msg,
            "\n{}\nSignal: {} (score {:.2})\nEntry: {:.2}\n",
            result.timeframe, s.direction, s.score, s.entry
        );
        if s.stop_loss > 0.0 {
            let _ = writeln!(msg, "SL: {:.2} | TP: {:.2}", s.stop_loss, s.take_profit);
        }
        let _ = writeln!(
            msg,
            "RSI: {:.2} | EMA9: {:.2} / EMA21: {:.2} | MACD: {:.2}",
            s.rsi, s.ema_fast, s.ema_slow, s.macd
        );
    }
    let _ = write!(
        msg,
        "\nConsensus: {} ({} long / {} short)",
        consensus.direction, consensus.long_votes, consensus.short_votes
    );
    msg
}

pub fn trade_closed(trade: &Trade, balance: f64) -> String {
    format!(
        "Trade closed {}\n{}\nEntry: {:.2}\nExit: {:.2}\nPnL: {:.2} USDT\nBalance: {:.2} USDT",
        trade.symbol,
        trade.direction,
        trade.entry,
        trade.close_price.unwrap_or_default(),
        trade.profit_loss.unwrap_or_default(),
        balance
    )
}

pub fn auto_signal(signal: &TradeSignal, trade: &Trade, balance: f64) -> String {
    format!(
        "Auto-signal {}\n{}\nEntry: {:.2}\nSL: {:.2} | TP: {:.2}\nSize: {:.2}\nBalance: {:.2} USDT",
        trade.symbol,
        trade.direction,
        signal.entry,
        signal.stop_loss,
        signal.take_profit,
        trade.size,
        balance
    )
}

pub fn portfolio_info(info: &PortfolioInfo) -> String {
    format!(
        "Portfolio info\n\nStart: {:.2} USDT\nBalance: {:.2} USDT\nPnL: {:.2} USDT\nOpen trades: {}\nClosed trades: {}\nRisk per trade: {:.2}%",
        info.initial_capital,
        info.balance,
        info.total_pnl,
        info.open_trades,
        info.closed_trades,
        info.risk_per_trade * 100.0
    )
}

pub fn trade_history(trades: &[&Trade]) -> String {
    if trades.is_empty() {
        return "No closed trades.".to_string();
    }
    let mut msg = String::from("Last trades:\n");
    for t in trades {
        let _ = writeln!(
            msg,
            "{} {} | Entry: {:.2} | Exit: {:.2} | PnL: {:.2}",
            t.symbol,
            t.direction,
            t.entry,
            t.close_price.unwrap_or_default(),
            t.profit_loss.unwrap_or_default()
        );
    }
    msg
}

pub fn open_trades(trades: &[&Trade]) -> String {
    if trades.is_empty() {
        return "No open trades.".to_string();
    }
    let mut msg = String::from("Open trades:\n");
    for t in trades {
        let _ = writeln!(
            msg,
            "{} {} | Entry: {:.2} | SL: {:.2} | TP: {:.2} | Size: {:.2}",
            t.symbol, t.direction, t.entry, t.stop_loss, t.take_profit, t.size
        );
    }
    msg
}

pub fn reset(initial_capital: f64, risk_per_trade: f64) -> String {
    format!(
        "Portfolio reset to {:.2} USDT with {:.2}% risk.",
        initial_capital,
        risk_per_trade * 100.0
    )
}

pub fn risk_set(risk_per_trade: f64) -> String {
    format!("Risk per trade set to {:.2}%", risk_per_trade * 100.0)
}

pub fn min_score_set(min_score: f64) -> String {
    format!("Min score set to {:.0}%", min_score * 100.0)
}

pub fn error(reason: impl std::fmt::Display) -> String {
    format!("Error: {}", reason)
}

pub fn command_error(err: &CommandError) -> String {
    match err {
        CommandError::Empty => "Send /help for the list of commands.".to_string(),
        CommandError::Usage(usage) => format!("Usage: {}", usage),
        CommandError::InvalidInput { input, example } => {
            format!("Invalid input '{}'. Example: {}", input, example)
        }
        CommandError::Unknown(verb) => {
            format!("Unknown command {}. Send /help for the list of commands.", verb)
        }
    }
}
