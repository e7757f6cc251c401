//! Domain error types.

/// Error raised while parsing the configured symbol list.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

/// Top-level error type for papertrader.
#[derive(Debug, thiserror::Error)]
pub enum PapertraderError {
    #[error("quantity must be positive, got {quantity}")]
    InvalidQuantity { quantity: i64 },

    #[error("price must be positive, got {price}")]
    InvalidPrice { price: f64 },

    #[error("insufficient funds: cost {cost:.2} exceeds balance {balance:.2}")]
    InsufficientFunds { cost: f64, balance: f64 },

    #[error("not enough shares of {symbol}: requested {requested}, own {owned}")]
    InsufficientShares {
        symbol: String,
        requested: i64,
        owned: i64,
    },

    #[error("no holding for {symbol}")]
    NoSuchHolding { symbol: String },

    #[error("{symbol} is not in the configured symbol list")]
    UnknownSymbol { symbol: String },

    #[error("no price available for {symbol}: {reason}")]
    PriceUnavailable { symbol: String, reason: String },

    #[error("state file {file} is corrupted: {reason}")]
    CorruptState { file: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PapertraderError> for std::process::ExitCode {
    fn from(err: &PapertraderError) -> Self {
        let code: u8 = match err {
            PapertraderError::Io(_) => 1,
            PapertraderError::ConfigParse { .. }
            | PapertraderError::ConfigInvalid { .. }
            | PapertraderError::Universe(_) => 2,
            PapertraderError::CorruptState { .. } => 3,
            PapertraderError::UnknownSymbol { .. }
            | PapertraderError::PriceUnavailable { .. } => 4,
            PapertraderError::InvalidQuantity { .. }
            | PapertraderError::InvalidPrice { .. }
            | PapertraderError::InsufficientFunds { .. }
            | PapertraderError::InsufficientShares { .. }
            | PapertraderError::NoSuchHolding { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
