//! Transaction history export as CSV.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::domain::error::PapertraderError;
use crate::domain::transaction::Transaction;

pub const EXPORT_HEADER: [&str; 6] = [
    "Action",
    "Stock",
    "Quantity",
    "Price",
    "Profit/Loss",
    "Time",
];

/// Write one row per transaction in log order. Buy rows leave the
/// profit/loss column blank; an empty log produces the header alone.
pub fn write_transactions<W: Write>(
    transactions: &[Transaction],
    writer: W,
) -> Result<(), PapertraderError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(EXPORT_HEADER).map_err(io::Error::other)?;
    for tx in transactions {
        let profit_loss = match tx.profit_loss {
            Some(pnl) => pnl.to_string(),
            None => String::new(),
        };
        wtr.write_record([
            tx.action.as_str(),
            &tx.symbol,
            &tx.quantity.to_string(),
            &tx.price.to_string(),
            &profit_loss,
            &tx.time.to_rfc3339(),
        ])
        .map_err(io::Error::other)?;
    }
    wtr.flush()?;

    Ok(())
}

pub fn export_to_file<P: AsRef<Path>>(
    transactions: &[Transaction],
    path: P,
) -> Result<(), PapertraderError> {
    let file = File::create(path)?;
    write_transactions(transactions, file)
}
