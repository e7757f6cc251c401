#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use papertrader::domain::error::PapertraderError;
use papertrader::domain::ledger::LedgerState;
use papertrader::ports::quote_port::QuotePort;
use std::collections::HashMap;

pub struct MockQuotePort {
    pub prices: HashMap<String, f64>,
    pub errors: HashMap<String, String>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl QuotePort for MockQuotePort {
    fn latest_close(&self, symbol: &str) -> Result<f64, PapertraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(PapertraderError::PriceUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| PapertraderError::PriceUnavailable {
                symbol: symbol.to_string(),
                reason: "no trading data".to_string(),
            })
    }
}

pub fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
}

pub fn make_state(balance: f64) -> LedgerState {
    LedgerState::new(balance)
}
