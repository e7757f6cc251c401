//! The fixed set of symbols the tool recognizes.
//!
//! Quotes and trades are rejected up front for anything outside the
//! configured list, before any port or ledger call.

use std::collections::HashSet;

use super::error::{PapertraderError, UniverseError};

/// Symbols recognized when no list is configured.
pub const DEFAULT_SYMBOLS: &[&str] = &[
    "RELIANCE.NS",
    "TCS.NS",
    "INFY.NS",
    "HDFCBANK.NS",
    "ICICIBANK.NS",
    "MRF.NS",
];

#[derive(Debug, Clone)]
pub struct Universe {
    pub symbols: Vec<String>,
}

impl Universe {
    pub fn new(symbols: Vec<String>) -> Self {
        Universe { symbols }
    }

    pub fn default_symbols() -> Self {
        Universe {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// Normalize a user-entered symbol and check membership.
    pub fn resolve(&self, symbol: &str) -> Result<String, PapertraderError> {
        let symbol = normalize(symbol);
        if self.contains(&symbol) {
            Ok(symbol)
        } else {
            Err(PapertraderError::UnknownSymbol { symbol })
        }
    }
}

pub fn normalize(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Parse a comma-separated symbol list from configuration.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if seen.contains(&symbol) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        seen.insert(symbol.clone());
        symbols.push(symbol);
    }

    Ok(symbols)
}
