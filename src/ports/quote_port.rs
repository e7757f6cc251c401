//! Market quote port trait.
//!
//! The ledger never calls this itself: the shell fetches a price first and
//! passes it into buy/sell/valuation, so the ledger stays testable with
//! injected prices.

use crate::domain::error::PapertraderError;

pub trait QuotePort {
    /// Latest closing price for a symbol, or `PriceUnavailable`.
    fn latest_close(&self, symbol: &str) -> Result<f64, PapertraderError>;
}
