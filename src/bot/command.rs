//! Chat command parsing.
//!
//! Commands are whitespace-separated words. The leading `/` is optional, the
//! verb is case-insensitive and symbols are upper-cased. Extra arguments are
//! ignored.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Price(String),
    Analyze(String),
    Info,
    History(Option<usize>),
    Open,
    Reset,
    SetRisk(f64),
    SetMinScore(f64),
    Export,
    Help,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid input '{input}', e.g. {example}")]
    InvalidInput {
        input: String,
        example: &'static str,
    },

    #[error("unknown command: {0}")]
    Unknown(String),
}

pub const PRICE_USAGE: &str = "/price SYMBOL (e.g. /price BTCUSDT)";
pub const ANALYZE_USAGE: &str = "/analyze SYMBOL (e.g. /analyze BTCUSDT)";
pub const SET_RISK_USAGE: &str = "/set_risk 0.01 (for 1%)";
pub const SET_MIN_SCORE_USAGE: &str = "/set_min_score 0.7 (for 70%)";

fn symbol_arg(arg: Option<&str>, usage: &'static str) -> Result<String, CommandError> {
    arg.map(str::to_uppercase).ok_or(CommandError::Usage(usage))
}

fn number_arg(
    arg: Option<&str>,
    usage: &'static str,
    example: &'static str,
) -> Result<f64, CommandError> {
    let raw = arg.ok_or(CommandError::Usage(usage))?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandError::InvalidInput {
            input: raw.to_string(),
            example,
        })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut words = text.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;
        let arg = words.next();
        let name = verb.trim_start_matches('/').to_lowercase();

        match name.as_str() {
            "start" => Ok(Command::Start),
            "price" => Ok(Command::Price(symbol_arg(arg, PRICE_USAGE)?)),
            "analyze" => Ok(Command::Analyze(symbol_arg(arg, ANALYZE_USAGE)?)),
            "info" => Ok(Command::Info),
            "history" => match arg {
                None => Ok(Command::History(None)),
                Some(raw) => raw
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .map(|n| Command::History(Some(n)))
                    .ok_or_else(|| CommandError::InvalidInput {
                        input: raw.to_string(),
                        example: "/history 10",
                    }),
            },
            "open" => Ok(Command::Open),
            "reset" => Ok(Command::Reset),
            "set_risk" => Ok(Command::SetRisk(number_arg(
                arg,
                SET_RISK_USAGE,
                "/set_risk 0.01",
            )?)),
            "set_min_score" => Ok(Command::SetMinScore(number_arg(
                arg,
                SET_MIN_SCORE_USAGE,
                "/set_min_score 0.7",
            )?)),
            "export" => Ok(Command::Export),
            "help" => Ok(Command::Help),
            _ => Err(CommandError::Unknown(verb.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Start => write!(f, "/start"),
            Command::Price(s) => write!(f, "/price {}", s),
            Command::Analyze(s) => write!(f, "/analyze {}", s),
            Command::Info => write!(f, "/info"),
            Command::History(None) => write!(f, "/history"),
            Command::History(Some(n)) => write!(f, "/history {}", n),
            Command::Open => write!(f, "/open"),
            Command::Reset => write!(f, "/reset"),
            Command::SetRisk(v) => write!(f, "/set_risk {}", v),
            Command::SetMinScore(v) => write!(f, "/set_min_score {}", v),
            Command::Export => write!(f, "/export"),
            Command::Help => write!(f, "/help"),
        }
    }
}
