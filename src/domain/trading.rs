//! Buy and sell execution against the ledger.
//!
//! Both operations validate every precondition before touching state, so a
//! failed trade leaves balance, holdings and the transaction log unchanged.

use chrono::{DateTime, Utc};

use super::error::PapertraderError;
use super::ledger::LedgerState;
use super::lot::Lot;
use super::transaction::{TradeAction, Transaction};

/// Result of a successful buy.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyReceipt {
    pub symbol: String,
    pub quantity: i64,
    pub price: f64,
    pub cost: f64,
}

/// Result of a successful sell.
#[derive(Debug, Clone, PartialEq)]
pub struct SellReceipt {
    pub symbol: String,
    pub quantity: i64,
    pub price: f64,
    pub proceeds: f64,
    pub profit_loss: f64,
}

/// Buy `quantity` shares at `price`.
///
/// Appends a fresh lot (never merges with existing lots), deducts the cost
/// from the balance, records a buy transaction and puts the symbol on the
/// watchlist. A cost exactly equal to the balance succeeds.
pub fn buy(
    state: &mut LedgerState,
    symbol: &str,
    quantity: i64,
    price: f64,
    time: DateTime<Utc>,
) -> Result<BuyReceipt, PapertraderError> {
    if quantity <= 0 {
        return Err(PapertraderError::InvalidQuantity { quantity });
    }
    if price <= 0.0 {
        return Err(PapertraderError::InvalidPrice { price });
    }

    let cost = quantity as f64 * price;
    if cost > state.balance {
        return Err(PapertraderError::InsufficientFunds {
            cost,
            balance: state.balance,
        });
    }

    state.balance -= cost;
    state
        .holdings
        .entry(symbol.to_string())
        .or_default()
        .push(Lot::new(quantity, price));
    state.watch(symbol);
    state.record_transaction(Transaction {
        action: TradeAction::Buy,
        symbol: symbol.to_string(),
        quantity,
        price,
        profit_loss: None,
        time,
    });

    Ok(BuyReceipt {
        symbol: symbol.to_string(),
        quantity,
        price,
        cost,
    })
}

/// Sell `quantity` shares at `price`, consuming lots oldest-first.
///
/// Realized profit/loss accumulates per consumed portion as
/// `(price - lot.purchase_price) * consumed`. Exhausted lots are dropped; a
/// partially consumed lot keeps its place with reduced quantity; the holding
/// key is removed once no lots remain.
pub fn sell(
    state: &mut LedgerState,
    symbol: &str,
    quantity: i64,
    price: f64,
    time: DateTime<Utc>,
) -> Result<SellReceipt, PapertraderError> {
    if quantity <= 0 {
        return Err(PapertraderError::InvalidQuantity { quantity });
    }
    if price <= 0.0 {
        return Err(PapertraderError::InvalidPrice { price });
    }

    let Some(lots) = state.holdings.get_mut(symbol) else {
        return Err(PapertraderError::NoSuchHolding {
            symbol: symbol.to_string(),
        });
    };

    let owned: i64 = lots.iter().map(|lot| lot.quantity).sum();
    if quantity > owned {
        return Err(PapertraderError::InsufficientShares {
            symbol: symbol.to_string(),
            requested: quantity,
            owned,
        });
    }

    let mut remaining = quantity;
    let mut profit_loss = 0.0;
    for lot in lots.iter_mut() {
        if remaining == 0 {
            break;
        }
        let consumed = lot.quantity.min(remaining);
        profit_loss += (price - lot.purchase_price) * consumed as f64;
        lot.quantity -= consumed;
        remaining -= consumed;
    }

    lots.retain(|lot| lot.quantity > 0);
    if lots.is_empty() {
        state.holdings.remove(symbol);
    }

    let proceeds = quantity as f64 * price;
    state.balance += proceeds;
    state.record_transaction(Transaction {
        action: TradeAction::Sell,
        symbol: symbol.to_string(),
        quantity,
        price,
        profit_loss: Some(profit_loss),
        time,
    });

    Ok(SellReceipt {
        symbol: symbol.to_string(),
        quantity,
        price,
        proceeds,
        profit_loss,
    })
}
