//! CSV file quote adapter.
//!
//! Reads per-symbol files named `<SYMBOL>.csv` with a `date,close` header
//! from a configured directory and reports the close of the latest dated
//! row as the current price.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::PapertraderError;
use crate::ports::quote_port::QuotePort;

pub struct CsvQuoteAdapter {
    quotes_dir: PathBuf,
}

impl CsvQuoteAdapter {
    pub fn new(quotes_dir: PathBuf) -> Self {
        Self { quotes_dir }
    }

    fn quote_path(&self, symbol: &str) -> PathBuf {
        self.quotes_dir.join(format!("{symbol}.csv"))
    }

    fn unavailable(&self, symbol: &str, reason: String) -> PapertraderError {
        PapertraderError::PriceUnavailable {
            symbol: symbol.to_string(),
            reason,
        }
    }
}

impl QuotePort for CsvQuoteAdapter {
    fn latest_close(&self, symbol: &str) -> Result<f64, PapertraderError> {
        let path = self.quote_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| self.unavailable(symbol, format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut latest: Option<(NaiveDate, f64)> = None;

        for result in rdr.records() {
            let record =
                result.map_err(|e| self.unavailable(symbol, format!("CSV parse error: {e}")))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| self.unavailable(symbol, "missing date column".into()))?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| self.unavailable(symbol, format!("invalid date format: {e}")))?;

            let close: f64 = record
                .get(1)
                .ok_or_else(|| self.unavailable(symbol, "missing close column".into()))?
                .parse()
                .map_err(|e| self.unavailable(symbol, format!("invalid close value: {e}")))?;

            if latest.is_none_or(|(d, _)| date > d) {
                latest = Some((date, close));
            }
        }

        match latest {
            Some((_, close)) => Ok(close),
            None => Err(self.unavailable(symbol, "no trading data".into())),
        }
    }
}
