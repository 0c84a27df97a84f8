//! Domain error types.

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("market data error for {symbol}: {reason}")]
    Provider { symbol: String, reason: String },

    #[error("invalid {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("trade log error at {path}: {reason}")]
    Persistence { path: String, reason: String },

    #[error("export to {path} failed: {reason}")]
    Export { path: String, reason: String },

    #[error("unknown command: {input}")]
    UnknownCommand { input: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigtraderError {
    pub fn provider(symbol: &str, reason: impl Into<String>) -> Self {
        SigtraderError::Provider {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(name: &str, reason: impl Into<String>) -> Self {
        SigtraderError::InvalidArgument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl SigtraderError {
    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            SigtraderError::Io(_) => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. } => 2,
            SigtraderError::Provider { .. } => 3,
            SigtraderError::InvalidArgument { .. } => 4,
            SigtraderError::Persistence { .. } | SigtraderError::Export { .. } => 5,
            SigtraderError::UnknownCommand { .. } => 6,
        }
    }
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
